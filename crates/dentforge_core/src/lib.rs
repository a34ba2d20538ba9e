//! Procedural tooth geometry for DentForge
//!
//! This crate turns a (category, condition) pair into a renderable tooth:
//!
//! - [`ToothCategory`] / [`ToothCondition`] - The closed sets of tooth kinds and states
//! - [`build_base`] - Parametric base mesh for each category
//! - [`apply_condition`] - Geometry changes and material regions for each condition
//! - [`SurfaceMaterial`] - Shading parameters; [`materials_for`] picks them per condition
//! - [`AnimationClip`] - Keyframe clips; [`standard_animations`] gives the two every tooth carries
//! - [`GeneratedTooth`] - The validated, immutable result
//! - [`ToothFactory`] - Memoizing, thread-safe entry point
//! - [`export`] - OBJ/MTL and RON writers

mod error;
mod tooth;
mod material;
mod animation;
mod generated;
mod factory;
pub mod builders;
pub mod modifiers;
pub mod export;

pub use error::ToothError;
pub use tooth::{ToothCategory, ToothCondition, tooth_key};
pub use material::{SurfaceMaterial, MaterialRegion, materials_for};
pub use animation::{
    AnimationClip, AnimationTrack, Channel, Keyframe, standard_animations, congruent_angles,
    IDLE_ROTATION, HIGHLIGHT_PULSE,
};
pub use generated::{GeneratedTooth, validate_mesh, validate_regions};
pub use factory::ToothFactory;
pub use builders::{build_base, base_vertex_count};
pub use modifiers::{apply_condition, IMPLANT_POST_VERTEX_COUNT, FILLING_VERTEX_COUNT};
pub use export::ExportError;

// Re-export the geometry types teeth are made of
pub use dentforge_math::{Vec3, Bounds3, MeshBuffer};
