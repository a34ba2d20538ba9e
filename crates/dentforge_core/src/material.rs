//! Surface materials and shading regions
//!
//! A generated tooth carries an ordered list of one or two materials and an
//! explicit list of [`MaterialRegion`]s. Regions partition the mesh buffer
//! into contiguous vertex ranges in emission order; region `i` is shaded by
//! material `i`. Index 0 is always the tooth body, index 1 (when present) the
//! accent sub-mesh added by the condition.

use std::borrow::Cow;
use std::ops::Range;
use serde::{Serialize, Deserialize};
use crate::ToothCondition;

/// Shading descriptor for one mesh region
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SurfaceMaterial {
    /// Material name (used as the OBJ/MTL material id)
    pub name: Cow<'static, str>,
    /// Base color as linear RGB (each component 0.0-1.0)
    pub base_color: [f32; 3],
    /// Specular exponent (higher = tighter, glossier highlight)
    pub shininess: f32,
    /// Opacity (1.0 = fully opaque)
    pub opacity: f32,
    /// Metalness (0.0 = dielectric, 1.0 = metal)
    pub metalness: f32,
}

impl SurfaceMaterial {
    /// Natural enamel
    pub const ENAMEL: Self = Self::preset("enamel", [0.96, 0.94, 0.88], 60.0, 0.0);

    /// Dark decay accent for cavity pits
    pub const CAVITY_DECAY: Self = Self::preset("cavity_decay", [0.23, 0.16, 0.10], 5.0, 0.0);

    /// Porcelain prosthetic crown
    pub const PORCELAIN_CROWN: Self = Self::preset("porcelain_crown", [0.98, 0.97, 0.95], 90.0, 0.0);

    /// Bonded veneer shell: brighter and glossier than enamel
    pub const VENEER: Self = Self::preset("veneer", [1.0, 1.0, 0.99], 120.0, 0.0);

    /// Titanium implant post
    pub const TITANIUM: Self = Self::preset("titanium", [0.62, 0.64, 0.66], 80.0, 0.9);

    /// Gold-toned root canal filling
    pub const GOLD_FILLING: Self = Self::preset("gold_filling", [0.83, 0.69, 0.22], 100.0, 0.8);

    const fn preset(name: &'static str, base_color: [f32; 3], shininess: f32, metalness: f32) -> Self {
        Self {
            name: Cow::Borrowed(name),
            base_color,
            shininess,
            opacity: 1.0,
            metalness,
        }
    }

    /// Create a custom material
    ///
    /// Color, opacity and metalness are clamped to [0.0, 1.0]; shininess to
    /// be non-negative.
    pub fn new(
        name: impl Into<String>,
        base_color: [f32; 3],
        shininess: f32,
        opacity: f32,
        metalness: f32,
    ) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            base_color: base_color.map(|c| c.clamp(0.0, 1.0)),
            shininess: shininess.max(0.0),
            opacity: opacity.clamp(0.0, 1.0),
            metalness: metalness.clamp(0.0, 1.0),
        }
    }

    /// Perceived brightness of the base color (Rec. 709 luma)
    pub fn luminance(&self) -> f32 {
        let [r, g, b] = self.base_color;
        0.2126 * r + 0.7152 * g + 0.0722 * b
    }
}

/// Ordered material list for a condition
///
/// The order matches region emission: the tooth body first, then the accent
/// the condition's modifier emits last.
pub fn materials_for(condition: ToothCondition) -> Vec<SurfaceMaterial> {
    match condition {
        ToothCondition::Healthy => vec![SurfaceMaterial::ENAMEL],
        ToothCondition::Crown => vec![SurfaceMaterial::PORCELAIN_CROWN],
        ToothCondition::Veneer => vec![SurfaceMaterial::VENEER],
        ToothCondition::Cavity => vec![SurfaceMaterial::ENAMEL, SurfaceMaterial::CAVITY_DECAY],
        ToothCondition::Implant => vec![SurfaceMaterial::PORCELAIN_CROWN, SurfaceMaterial::TITANIUM],
        ToothCondition::RootCanal => vec![SurfaceMaterial::ENAMEL, SurfaceMaterial::GOLD_FILLING],
    }
}

/// A contiguous vertex range shaded by one material
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialRegion {
    /// Index into the tooth's material list
    pub material: usize,
    /// First vertex of the range
    pub start: usize,
    /// Number of vertices (a multiple of 3; may be 0)
    pub count: usize,
}

impl MaterialRegion {
    /// Create a region
    pub fn new(material: usize, start: usize, count: usize) -> Self {
        Self { material, start, count }
    }

    /// Vertex index range covered by this region
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.start..self.start + self.count
    }

    /// Region covering a whole buffer with material 0
    pub fn whole(vertex_count: usize) -> Vec<MaterialRegion> {
        vec![MaterialRegion::new(0, 0, vertex_count)]
    }

    /// Tooth body followed by an accent range at the tail
    pub fn body_and_accent(body: usize, accent: usize) -> Vec<MaterialRegion> {
        vec![MaterialRegion::new(0, 0, body), MaterialRegion::new(1, body, accent)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_counts_per_condition() {
        for condition in ToothCondition::ALL {
            let expected = match condition {
                ToothCondition::Cavity | ToothCondition::Implant | ToothCondition::RootCanal => 2,
                ToothCondition::Healthy | ToothCondition::Crown | ToothCondition::Veneer => 1,
            };
            assert_eq!(materials_for(condition).len(), expected, "{}", condition);
        }
    }

    #[test]
    fn test_veneer_brighter_and_glossier_than_enamel() {
        let veneer = &materials_for(ToothCondition::Veneer)[0];
        let healthy = &materials_for(ToothCondition::Healthy)[0];
        assert!(veneer.luminance() > healthy.luminance());
        assert!(veneer.shininess > healthy.shininess);
    }

    #[test]
    fn test_accent_materials() {
        let cavity = materials_for(ToothCondition::Cavity);
        assert!(cavity[1].luminance() < cavity[0].luminance());

        let implant = materials_for(ToothCondition::Implant);
        assert!(implant[1].metalness > 0.5);
        assert_eq!(implant[0].metalness, 0.0);

        let root_canal = materials_for(ToothCondition::RootCanal);
        assert_eq!(root_canal[1], SurfaceMaterial::GOLD_FILLING);
    }

    #[test]
    fn test_new_clamps_values() {
        let m = SurfaceMaterial::new("custom", [1.5, -0.2, 0.5], -3.0, 2.0, -1.0);
        assert_eq!(m.base_color, [1.0, 0.0, 0.5]);
        assert_eq!(m.shininess, 0.0);
        assert_eq!(m.opacity, 1.0);
        assert_eq!(m.metalness, 0.0);
        assert_eq!(m.name, "custom");
    }

    #[test]
    fn test_presets_are_opaque() {
        for condition in ToothCondition::ALL {
            for material in materials_for(condition) {
                assert_eq!(material.opacity, 1.0);
            }
        }
    }

    #[test]
    fn test_region_helpers() {
        let regions = MaterialRegion::body_and_accent(30, 12);
        assert_eq!(regions[0].range(), 0..30);
        assert_eq!(regions[1].range(), 30..42);
        assert_eq!(regions[1].material, 1);
        assert_eq!(MaterialRegion::whole(9), vec![MaterialRegion::new(0, 0, 9)]);
    }
}
