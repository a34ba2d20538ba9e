//! 3D Mathematics and Mesh Library
//!
//! This crate provides the vector and mesh types used by the DentForge
//! geometry engine.
//!
//! ## Core Types
//!
//! - [`Vec3`] - 3D vector with x, y, z components
//! - [`Bounds3`] - Axis-aligned bounding box
//! - [`MeshBuffer`] - Flat triangle-list vertex buffer with derived normals
//!
//! ## Primitives
//!
//! Ring, loft, fan and cylinder helpers in [`primitives`] emit
//! outward-facing triangles into a [`MeshBuffer`].

mod vec3;
mod bounds;
pub mod mesh;
pub mod primitives;

pub use vec3::Vec3;
pub use bounds::Bounds3;
pub use mesh::MeshBuffer;
pub use primitives::{
    capped_cylinder, capped_cylinder_vertex_count, ellipse_ring, fan, loft, ring_angle,
    superellipse_ring, Facing,
};
