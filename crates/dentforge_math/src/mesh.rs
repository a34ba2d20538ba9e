//! Triangle-list mesh buffer
//!
//! A [`MeshBuffer`] is a flat list of positions where every three consecutive
//! entries form one counter-clockwise (outward facing) triangle. There is no
//! index buffer, so a corner shared by several triangles appears once per
//! triangle.
//!
//! Normals are derived data. They are recomputed from the triangles by
//! [`MeshBuffer::recompute_normals`] and are never accepted as input; the
//! serialized form carries positions only.

use serde::{Serialize, Deserialize};
use crate::{Bounds3, Vec3};

/// Flat triangle-list vertex buffer with derived flat normals
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Vec3>", into = "Vec<Vec3>")]
pub struct MeshBuffer {
    /// Vertex positions, three per triangle
    positions: Vec<Vec3>,
    /// One face normal per position (all three corners of a triangle share it)
    normals: Vec<Vec3>,
}

impl MeshBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty buffer with room for `vertices` positions
    pub fn with_capacity(vertices: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            normals: Vec::with_capacity(vertices),
        }
    }

    /// Build a buffer from raw triangle-list positions, deriving normals
    pub fn from_positions(positions: Vec<Vec3>) -> Self {
        let mut mesh = Self { positions, normals: Vec::new() };
        mesh.recompute_normals();
        mesh
    }

    /// Append one triangle (counter-clockwise when seen from outside)
    ///
    /// Normals are stale until [`recompute_normals`](Self::recompute_normals) runs.
    #[inline]
    pub fn push_triangle(&mut self, a: Vec3, b: Vec3, c: Vec3) {
        self.positions.extend_from_slice(&[a, b, c]);
    }

    /// Append all triangles of another buffer after this one's
    pub fn append(&mut self, other: &MeshBuffer) {
        self.positions.extend_from_slice(&other.positions);
        self.recompute_normals();
    }

    /// Vertex positions
    #[inline]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Mutable vertex positions
    ///
    /// Callers that move vertices must call
    /// [`recompute_normals`](Self::recompute_normals) afterwards.
    #[inline]
    pub fn positions_mut(&mut self) -> &mut [Vec3] {
        &mut self.positions
    }

    /// Derived per-vertex normals
    #[inline]
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Number of vertices (always a multiple of 3 for a well-formed buffer)
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of complete triangles
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// True if the buffer holds no vertices
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Corners of triangle `index`
    pub fn triangle(&self, index: usize) -> [Vec3; 3] {
        let i = index * 3;
        [self.positions[i], self.positions[i + 1], self.positions[i + 2]]
    }

    /// Iterate over triangle corners
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.positions.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Positions as a flat `f32` slice, ready for a vertex-buffer upload
    #[inline]
    pub fn as_f32_slice(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Normals as a flat `f32` slice
    #[inline]
    pub fn normals_f32_slice(&self) -> &[f32] {
        bytemuck::cast_slice(&self.normals)
    }

    /// Bounding box of all positions (`None` when empty)
    pub fn bounds(&self) -> Option<Bounds3> {
        Bounds3::from_points(&self.positions)
    }

    /// Recompute flat normals from the current triangles
    ///
    /// Degenerate (zero-area) triangles get a zero normal, which validation
    /// reports. A trailing partial triangle gets zero normals as well.
    pub fn recompute_normals(&mut self) {
        self.normals.clear();
        self.normals.reserve(self.positions.len());
        for tri in self.positions.chunks(3) {
            let n = match tri {
                [a, b, c] => (*b - *a).cross(*c - *a).normalized(),
                _ => Vec3::ZERO,
            };
            self.normals.extend(std::iter::repeat(n).take(tri.len()));
        }
    }

    /// Stable-partition triangles so that those matching `to_back` come last
    ///
    /// Relative order is preserved within both groups. Returns the number of
    /// triangles left at the front.
    pub fn partition_triangles<F>(&mut self, mut to_back: F) -> usize
    where
        F: FnMut(usize) -> bool,
    {
        let mut front = Vec::with_capacity(self.positions.len());
        let mut back = Vec::new();
        for (index, tri) in self.positions.chunks_exact(3).enumerate() {
            if to_back(index) {
                back.extend_from_slice(tri);
            } else {
                front.extend_from_slice(tri);
            }
        }
        let kept = front.len() / 3;
        front.extend(back);
        self.positions = front;
        self.recompute_normals();
        kept
    }
}

impl From<Vec<Vec3>> for MeshBuffer {
    fn from(positions: Vec<Vec3>) -> Self {
        Self::from_positions(positions)
    }
}

impl From<MeshBuffer> for Vec<Vec3> {
    fn from(mesh: MeshBuffer) -> Self {
        mesh.positions
    }
}
