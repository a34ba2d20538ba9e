//! Base tooth shape builders
//!
//! Each category is described by a [`ToothProfile`]: a crown made of stacked
//! superellipse rings with an occlusal finish, plus one or more tapered
//! roots. The crown is emitted first as a closed shell, followed by each root
//! as its own closed tube, so region boundaries are stable across conditions.
//!
//! Tooth space: the cemento-enamel junction lies at `y = 0`, the crown rises
//! along +Y and roots hang toward -Y. Output is fully deterministic.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};
use dentforge_math::{
    ellipse_ring, fan, loft, ring_angle, superellipse_ring, Facing, MeshBuffer, Vec3,
};
use crate::ToothCategory;

/// Radial segments around the crown
pub const CROWN_SEGMENTS: usize = 24;

/// Radial segments around each root
pub const ROOT_SEGMENTS: usize = 16;

/// Rings per root, from the cervical line toward the apex
const ROOT_RINGS: usize = 5;

/// Fraction of the root length covered by rings; the apex point closes the rest
const ROOT_RING_SPAN: f32 = 0.92;

/// Radius left at the last ring, as a fraction of the cervical radius
const ROOT_TIP_TAPER: f32 = 0.25;

/// One horizontal crown cross-section
#[derive(Clone, Copy, Debug)]
struct CrownLevel {
    y: f32,
    radius_x: f32,
    radius_z: f32,
}

const fn level(y: f32, radius_x: f32, radius_z: f32) -> CrownLevel {
    CrownLevel { y, radius_x, radius_z }
}

/// How the top crown ring is closed
#[derive(Clone, Copy, Debug)]
enum Occlusal {
    /// Flat closure across the top ring (incisal cutting edge)
    Edge,
    /// Single cusp tip above the top ring
    Tip(Vec3),
    /// Ring of cusps around a central fossa
    Cusps {
        /// Cusp directions, as ring angles
        angles: &'static [f32],
        /// Cusp height above the top ring
        height: f32,
        /// Cusp ring radius as a fraction of the top ring
        inset: f32,
        /// Height of the central fossa
        fossa: f32,
    },
}

/// One tapered root hanging from the cervical line
#[derive(Clone, Copy, Debug)]
struct RootSpec {
    /// Center on the cervical line (x, z)
    offset: (f32, f32),
    /// Apex displacement relative to the cervical center (x, z)
    splay: (f32, f32),
    radius_x: f32,
    radius_z: f32,
    length: f32,
}

/// Full shape description of one category
#[derive(Clone, Copy, Debug)]
struct ToothProfile {
    /// Crown cross-sections, bottom (y = 0) to top
    levels: &'static [CrownLevel],
    /// Superellipse exponent for the crown outline
    exponent: f32,
    occlusal: Occlusal,
    roots: &'static [RootSpec],
}

const PREMOLAR_CUSPS: [f32; 2] = [FRAC_PI_2, 3.0 * FRAC_PI_2];
const MOLAR_CUSPS: [f32; 4] = [FRAC_PI_4, 3.0 * FRAC_PI_4, 5.0 * FRAC_PI_4, 7.0 * FRAC_PI_4];

const INCISOR: ToothProfile = ToothProfile {
    levels: &[
        level(0.0, 0.38, 0.26),
        level(0.3, 0.42, 0.27),
        level(0.6, 0.44, 0.20),
        level(0.9, 0.45, 0.11),
        level(1.1, 0.46, 0.05),
    ],
    exponent: 4.0,
    occlusal: Occlusal::Edge,
    roots: &[RootSpec {
        offset: (0.0, 0.0),
        splay: (0.0, -0.04),
        radius_x: 0.22,
        radius_z: 0.20,
        length: 1.5,
    }],
};

const CANINE: ToothProfile = ToothProfile {
    levels: &[
        level(0.0, 0.34, 0.30),
        level(0.35, 0.40, 0.34),
        level(0.7, 0.36, 0.28),
        level(1.0, 0.24, 0.18),
    ],
    exponent: 2.4,
    occlusal: Occlusal::Tip(Vec3::new(0.0, 1.4, 0.04)),
    roots: &[RootSpec {
        offset: (0.0, 0.0),
        splay: (0.0, -0.06),
        radius_x: 0.22,
        radius_z: 0.24,
        length: 2.0,
    }],
};

const PREMOLAR_LEVELS: [CrownLevel; 4] = [
    level(0.0, 0.32, 0.34),
    level(0.3, 0.38, 0.42),
    level(0.6, 0.38, 0.42),
    level(0.8, 0.33, 0.37),
];

const PREMOLAR_OCCLUSAL: Occlusal = Occlusal::Cusps {
    angles: &PREMOLAR_CUSPS,
    height: 0.22,
    inset: 0.55,
    fossa: 0.72,
};

const PREMOLAR: ToothProfile = ToothProfile {
    levels: &PREMOLAR_LEVELS,
    exponent: 2.6,
    occlusal: PREMOLAR_OCCLUSAL,
    roots: &[RootSpec {
        offset: (0.0, 0.0),
        splay: (0.0, 0.0),
        radius_x: 0.20,
        radius_z: 0.26,
        length: 1.55,
    }],
};

/// Premolar with the root split into buccal (+Z) and lingual (-Z) branches
const PREMOLAR_BIFURCATED: ToothProfile = ToothProfile {
    levels: &PREMOLAR_LEVELS,
    exponent: 2.6,
    occlusal: PREMOLAR_OCCLUSAL,
    roots: &[
        RootSpec {
            offset: (0.0, 0.14),
            splay: (0.0, 0.10),
            radius_x: 0.17,
            radius_z: 0.13,
            length: 1.45,
        },
        RootSpec {
            offset: (0.0, -0.14),
            splay: (0.0, -0.10),
            radius_x: 0.17,
            radius_z: 0.13,
            length: 1.45,
        },
    ],
};

const MOLAR: ToothProfile = ToothProfile {
    levels: &[
        level(0.0, 0.50, 0.46),
        level(0.3, 0.60, 0.55),
        level(0.55, 0.60, 0.55),
        level(0.75, 0.54, 0.50),
    ],
    exponent: 3.0,
    occlusal: Occlusal::Cusps {
        angles: &MOLAR_CUSPS,
        height: 0.18,
        inset: 0.6,
        fossa: 0.68,
    },
    roots: &[
        // Two buccal roots and one palatal root
        RootSpec {
            offset: (-0.26, 0.20),
            splay: (-0.15, 0.08),
            radius_x: 0.16,
            radius_z: 0.16,
            length: 1.35,
        },
        RootSpec {
            offset: (0.26, 0.20),
            splay: (0.15, 0.08),
            radius_x: 0.16,
            radius_z: 0.16,
            length: 1.35,
        },
        RootSpec {
            offset: (0.0, -0.24),
            splay: (0.0, -0.18),
            radius_x: 0.18,
            radius_z: 0.17,
            length: 1.45,
        },
    ],
};

fn profile(category: ToothCategory) -> &'static ToothProfile {
    match category {
        ToothCategory::Incisor => &INCISOR,
        ToothCategory::Canine => &CANINE,
        ToothCategory::Premolar => &PREMOLAR,
        ToothCategory::Molar => &MOLAR,
    }
}

/// Build the healthy base mesh for a category
///
/// Crown shell first, then each root. Normals are recomputed from the
/// emitted triangles before returning.
pub fn build_base(category: ToothCategory) -> MeshBuffer {
    build_profile(profile(category))
}

/// Build the two-rooted premolar variant
///
/// Same crown as [`build_base`]`(Premolar)`, so the crown vertices match
/// exactly; only the roots differ. The factory always uses the single-rooted
/// form.
pub fn build_bifurcated_premolar() -> MeshBuffer {
    build_profile(&PREMOLAR_BIFURCATED)
}

fn build_profile(profile: &ToothProfile) -> MeshBuffer {
    let mut mesh = MeshBuffer::with_capacity(profile_vertex_count(profile));
    emit_crown(&mut mesh, profile);
    for root in profile.roots {
        emit_root(&mut mesh, root);
    }
    mesh.recompute_normals();
    mesh
}

/// Number of vertices [`build_base`] emits for a category
pub fn base_vertex_count(category: ToothCategory) -> usize {
    profile_vertex_count(profile(category))
}

fn profile_vertex_count(profile: &ToothProfile) -> usize {
    crown_vertex_count(profile) + profile.roots.len() * root_vertex_count()
}

/// Number of crown-shell vertices at the front of the base buffer
///
/// Everything after this index belongs to the roots.
pub fn crown_vertex_count_for(category: ToothCategory) -> usize {
    crown_vertex_count(profile(category))
}

/// Number of roots a category is built with
pub fn root_count(category: ToothCategory) -> usize {
    profile(category).roots.len()
}

fn crown_vertex_count(profile: &ToothProfile) -> usize {
    let walls = (profile.levels.len() - 1) * CROWN_SEGMENTS * 6;
    let cervical = CROWN_SEGMENTS * 3;
    let occlusal = match profile.occlusal {
        Occlusal::Edge | Occlusal::Tip(_) => CROWN_SEGMENTS * 3,
        Occlusal::Cusps { .. } => CROWN_SEGMENTS * 9,
    };
    walls + cervical + occlusal
}

fn root_vertex_count() -> usize {
    (ROOT_RINGS - 1) * ROOT_SEGMENTS * 6 + ROOT_SEGMENTS * 6
}

fn crown_ring(profile: &ToothProfile, level: &CrownLevel) -> Vec<Vec3> {
    superellipse_ring(
        Vec3::new(0.0, level.y, 0.0),
        level.radius_x,
        level.radius_z,
        profile.exponent,
        CROWN_SEGMENTS,
    )
}

fn emit_crown(mesh: &mut MeshBuffer, profile: &ToothProfile) {
    let rings: Vec<Vec<Vec3>> = profile
        .levels
        .iter()
        .map(|level| crown_ring(profile, level))
        .collect();

    let bottom = &profile.levels[0];
    fan(mesh, &rings[0], Vec3::new(0.0, bottom.y, 0.0), Facing::Down);
    loft(mesh, &rings);

    let top_level = &profile.levels[profile.levels.len() - 1];
    let top_ring = &rings[rings.len() - 1];
    match profile.occlusal {
        Occlusal::Edge => {
            fan(mesh, top_ring, Vec3::new(0.0, top_level.y, 0.0), Facing::Up);
        }
        Occlusal::Tip(tip) => {
            fan(mesh, top_ring, tip, Facing::Up);
        }
        Occlusal::Cusps { angles, height, inset, fossa } => {
            let cusp_ring: Vec<Vec3> = top_ring
                .iter()
                .enumerate()
                .map(|(i, p)| {
                    let lift = cusp_weight(ring_angle(i, CROWN_SEGMENTS), angles) * height;
                    Vec3::new(p.x * inset, top_level.y + lift, p.z * inset)
                })
                .collect();
            loft(mesh, &[top_ring.clone(), cusp_ring.clone()]);
            fan(mesh, &cusp_ring, Vec3::new(0.0, fossa, 0.0), Facing::Up);
        }
    }
}

/// Raised-cosine bump peaking at each cusp angle
///
/// Each bump spans half the gap to its neighbours, so adjacent cusps meet
/// at zero height between them.
fn cusp_weight(theta: f32, cusps: &[f32]) -> f32 {
    let n = cusps.len() as f32;
    cusps
        .iter()
        .map(|&cusp| {
            let delta = wrap_angle(theta - cusp);
            (delta * n * 0.5).cos().max(0.0)
        })
        .fold(0.0, f32::max)
}

/// Wrap an angle into `[-π, π)`
fn wrap_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(2.0 * PI) - PI
}

fn emit_root(mesh: &mut MeshBuffer, root: &RootSpec) {
    let (ox, oz) = root.offset;
    let (sx, sz) = root.splay;

    // Rings from apex side up to the cervical line
    let rings: Vec<Vec<Vec3>> = (0..ROOT_RINGS)
        .rev()
        .map(|i| {
            let t = ROOT_RING_SPAN * i as f32 / (ROOT_RINGS - 1) as f32;
            let scale = 1.0 - (1.0 - ROOT_TIP_TAPER) * t / ROOT_RING_SPAN;
            let center = Vec3::new(ox + sx * t, -root.length * t, oz + sz * t);
            ellipse_ring(center, root.radius_x * scale, root.radius_z * scale, ROOT_SEGMENTS)
        })
        .collect();

    let apex = Vec3::new(ox + sx, -root.length, oz + sz);
    fan(mesh, &rings[0], apex, Facing::Down);
    loft(mesh, &rings);
    fan(mesh, &rings[rings.len() - 1], Vec3::new(ox, 0.0, oz), Facing::Up);
}
