//! Mesh construction primitives
//!
//! Tooth shapes are stacks of closed rings. A ring is a loop of points around
//! a center, ordered by increasing angle θ with `x = rx·cos θ`, `z = rz·sin θ`.
//! [`loft`] stitches consecutive rings into quad strips and [`fan`] closes a
//! ring against a single point. With that ring orientation every primitive
//! here emits outward-facing (counter-clockwise) triangles.

use std::f32::consts::TAU;
use crate::{MeshBuffer, Vec3};

/// Which side a [`fan`] cap faces
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facing {
    /// Cap seen from +Y (top of a solid)
    Up,
    /// Cap seen from -Y (bottom of a solid)
    Down,
}

/// Elliptical ring of `segments` points at height `center.y`
pub fn ellipse_ring(center: Vec3, radius_x: f32, radius_z: f32, segments: usize) -> Vec<Vec3> {
    superellipse_ring(center, radius_x, radius_z, 2.0, segments)
}

/// Superellipse ring of `segments` points at height `center.y`
///
/// `exponent` 2.0 gives an ellipse; larger values square the outline off
/// (4.0 reads as a rounded rectangle).
pub fn superellipse_ring(
    center: Vec3,
    radius_x: f32,
    radius_z: f32,
    exponent: f32,
    segments: usize,
) -> Vec<Vec3> {
    let power = 2.0 / exponent;
    (0..segments)
        .map(|i| {
            let theta = TAU * i as f32 / segments as f32;
            let (sin, cos) = theta.sin_cos();
            Vec3::new(
                center.x + radius_x * cos.signum() * cos.abs().powf(power),
                center.y,
                center.z + radius_z * sin.signum() * sin.abs().powf(power),
            )
        })
        .collect()
}

/// Angle of ring point `index` out of `segments`
#[inline]
pub fn ring_angle(index: usize, segments: usize) -> f32 {
    TAU * index as f32 / segments as f32
}

/// Stitch consecutive rings into closed quad strips
///
/// Rings are ordered from the outer/lower end to the inner/upper end, and
/// all must have the same point count. Each ring pair emits
/// `6 * segments` vertices.
pub fn loft(mesh: &mut MeshBuffer, rings: &[Vec<Vec3>]) {
    for pair in rings.windows(2) {
        let (lo, hi) = (&pair[0], &pair[1]);
        debug_assert_eq!(lo.len(), hi.len(), "loft rings must match in size");
        let n = lo.len();
        for j in 0..n {
            let k = (j + 1) % n;
            mesh.push_triangle(lo[j], hi[j], lo[k]);
            mesh.push_triangle(lo[k], hi[j], hi[k]);
        }
    }
}

/// Close a ring against a single point; emits `3 * ring.len()` vertices
pub fn fan(mesh: &mut MeshBuffer, ring: &[Vec3], center: Vec3, facing: Facing) {
    let n = ring.len();
    for j in 0..n {
        let k = (j + 1) % n;
        match facing {
            Facing::Up => mesh.push_triangle(ring[j], center, ring[k]),
            Facing::Down => mesh.push_triangle(ring[j], ring[k], center),
        }
    }
}

/// Vertex count of [`capped_cylinder`] for a given segment count
#[inline]
pub const fn capped_cylinder_vertex_count(segments: usize) -> usize {
    segments * 12
}

/// Closed upright cylinder standing on `base` (center of the bottom cap)
pub fn capped_cylinder(mesh: &mut MeshBuffer, base: Vec3, radius: f32, height: f32, segments: usize) {
    let top = base + Vec3::Y * height;
    let bottom_ring = ellipse_ring(base, radius, radius, segments);
    let top_ring = ellipse_ring(top, radius, radius, segments);
    fan(mesh, &bottom_ring, base, Facing::Down);
    loft(mesh, &[bottom_ring, top_ring.clone()]);
    fan(mesh, &top_ring, top, Facing::Up);
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Outward check: each face normal points away from the solid's center
    fn assert_outward(mesh: &MeshBuffer, center: Vec3) {
        for tri in mesh.triangles() {
            let n = (tri[1] - tri[0]).cross(tri[2] - tri[0]);
            let centroid = (tri[0] + tri[1] + tri[2]) / 3.0;
            assert!(n.dot(centroid - center) > 0.0, "inward face at {:?}", centroid);
        }
    }

    #[test]
    fn test_ellipse_ring_radii() {
        let ring = ellipse_ring(Vec3::new(0.0, 2.0, 0.0), 1.0, 0.5, 4);
        assert_eq!(ring.len(), 4);
        assert!((ring[0].x - 1.0).abs() < 1e-6);
        assert!((ring[1].z - 0.5).abs() < 1e-6);
        assert!(ring.iter().all(|p| p.y == 2.0));
    }

    #[test]
    fn test_superellipse_is_boxier() {
        let round = ellipse_ring(Vec3::ZERO, 1.0, 1.0, 8);
        let boxy = superellipse_ring(Vec3::ZERO, 1.0, 1.0, 4.0, 8);
        // Diagonal point sits further out on the squarer outline
        assert!(boxy[1].length() > round[1].length());
    }

    #[test]
    fn test_capped_cylinder_count_and_orientation() {
        let mut mesh = MeshBuffer::new();
        capped_cylinder(&mut mesh, Vec3::ZERO, 0.5, 2.0, 16);
        mesh.recompute_normals();
        assert_eq!(mesh.vertex_count(), capped_cylinder_vertex_count(16));
        assert_outward(&mesh, Vec3::new(0.0, 1.0, 0.0));
        assert!(mesh.normals().iter().all(|n| n.length() > 0.5));
    }

    #[test]
    fn test_fan_facing() {
        let ring = ellipse_ring(Vec3::ZERO, 1.0, 1.0, 6);

        let mut up = MeshBuffer::new();
        fan(&mut up, &ring, Vec3::ZERO, Facing::Up);
        up.recompute_normals();
        assert!(up.normals().iter().all(|n| n.y > 0.99));

        let mut down = MeshBuffer::new();
        fan(&mut down, &ring, Vec3::ZERO, Facing::Down);
        down.recompute_normals();
        assert!(down.normals().iter().all(|n| n.y < -0.99));
    }

    #[test]
    fn test_loft_vertex_count() {
        let rings: Vec<Vec<Vec3>> = (0..4)
            .map(|i| ellipse_ring(Vec3::new(0.0, i as f32, 0.0), 1.0, 1.0, 10))
            .collect();
        let mut mesh = MeshBuffer::new();
        loft(&mut mesh, &rings);
        assert_eq!(mesh.vertex_count(), 3 * 10 * 6);
    }
}
