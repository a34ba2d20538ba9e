//! The generated tooth artifact
//!
//! A [`GeneratedTooth`] is only constructed through
//! [`GeneratedTooth::assemble`], which checks every geometry and region
//! invariant first. Once built it is never mutated; the factory shares it
//! behind an `Arc`.

use serde::Serialize;
use dentforge_math::{MeshBuffer, Vec3};
use crate::animation::AnimationClip;
use crate::material::{MaterialRegion, SurfaceMaterial};
use crate::tooth::tooth_key;
use crate::{ToothCategory, ToothCondition, ToothError};

/// Normals shorter than this count as degenerate
const MIN_NORMAL_LENGTH: f32 = 1e-3;

/// Renderable mesh, materials and animations for one (category, condition)
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GeneratedTooth {
    name: String,
    category: ToothCategory,
    condition: ToothCondition,
    mesh: MeshBuffer,
    materials: Vec<SurfaceMaterial>,
    regions: Vec<MaterialRegion>,
    animations: Vec<AnimationClip>,
}

impl GeneratedTooth {
    /// Validate the parts and assemble them into a tooth
    ///
    /// # Errors
    ///
    /// Returns [`ToothError::GeometryAssembly`] if the mesh or the region
    /// layout is malformed.
    pub fn assemble(
        category: ToothCategory,
        condition: ToothCondition,
        mesh: MeshBuffer,
        materials: Vec<SurfaceMaterial>,
        regions: Vec<MaterialRegion>,
        animations: Vec<AnimationClip>,
    ) -> Result<Self, ToothError> {
        let name = tooth_key(category, condition);
        validate_mesh(&mesh).map_err(|e| prefix(&name, e))?;
        validate_regions(&regions, materials.len(), mesh.vertex_count()).map_err(|e| prefix(&name, e))?;
        Ok(Self {
            name,
            category,
            condition,
            mesh,
            materials,
            regions,
            animations,
        })
    }

    /// `"{category}_{condition}"`
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> ToothCategory {
        self.category
    }

    pub fn condition(&self) -> ToothCondition {
        self.condition
    }

    /// Triangle-list vertex data
    pub fn mesh(&self) -> &MeshBuffer {
        &self.mesh
    }

    /// Ordered shading materials; region `i` uses material `i`
    pub fn materials(&self) -> &[SurfaceMaterial] {
        &self.materials
    }

    /// Contiguous vertex ranges covering the mesh, in emission order
    pub fn regions(&self) -> &[MaterialRegion] {
        &self.regions
    }

    pub fn animations(&self) -> &[AnimationClip] {
        &self.animations
    }

    /// Positions belonging to one region
    pub fn region_positions(&self, region: &MaterialRegion) -> &[Vec3] {
        &self.mesh.positions()[region.range()]
    }

    /// Material shading a region
    pub fn region_material(&self, region: &MaterialRegion) -> &SurfaceMaterial {
        &self.materials[region.material]
    }
}

fn prefix(name: &str, err: ToothError) -> ToothError {
    match err {
        ToothError::GeometryAssembly(msg) => ToothError::GeometryAssembly(format!("{}: {}", name, msg)),
        other => other,
    }
}

/// Check that a mesh is a usable triangle list
///
/// Non-empty, a whole number of triangles, finite coordinates, normals in
/// sync with positions and no zero-area triangle.
pub fn validate_mesh(mesh: &MeshBuffer) -> Result<(), ToothError> {
    if mesh.is_empty() {
        return Err(ToothError::GeometryAssembly("empty mesh buffer".to_string()));
    }
    if mesh.vertex_count() % 3 != 0 {
        return Err(ToothError::GeometryAssembly(format!(
            "vertex count {} is not a multiple of 3",
            mesh.vertex_count()
        )));
    }
    if mesh.normals().len() != mesh.vertex_count() {
        return Err(ToothError::GeometryAssembly("normals out of date".to_string()));
    }
    if let Some(i) = mesh.positions().iter().position(|p| !p.is_finite()) {
        return Err(ToothError::GeometryAssembly(format!("non-finite coordinate at vertex {}", i)));
    }
    if let Some(i) = mesh.normals().iter().position(|n| n.length() < MIN_NORMAL_LENGTH) {
        return Err(ToothError::GeometryAssembly(format!("degenerate triangle {}", i / 3)));
    }
    Ok(())
}

/// Check that regions tile the buffer and point at existing materials
///
/// Region `i` must use material `i`, start where region `i - 1` ended and
/// cover whole triangles; together they must cover every vertex.
pub fn validate_regions(
    regions: &[MaterialRegion],
    material_count: usize,
    vertex_count: usize,
) -> Result<(), ToothError> {
    if regions.len() != material_count {
        return Err(ToothError::GeometryAssembly(format!(
            "{} regions for {} materials",
            regions.len(),
            material_count
        )));
    }
    let mut next = 0;
    for (i, region) in regions.iter().enumerate() {
        if region.material != i || region.start != next || region.count % 3 != 0 {
            return Err(ToothError::GeometryAssembly(format!("malformed region {}: {:?}", i, region)));
        }
        next = region.start + region.count;
    }
    if next != vertex_count {
        return Err(ToothError::GeometryAssembly(format!(
            "regions cover {} of {} vertices",
            next, vertex_count
        )));
    }
    Ok(())
}
