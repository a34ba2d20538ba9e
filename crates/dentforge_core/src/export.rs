//! Exporters for generated teeth
//!
//! - Wavefront OBJ + MTL, one material group per region
//! - Pretty RON dump of the whole record

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use crate::GeneratedTooth;

/// Error writing an exported tooth
#[derive(Debug)]
pub enum ExportError {
    /// IO error (permission denied, disk full, etc.)
    Io(io::Error),
    /// Serialization error
    Serialize(ron::Error),
}

impl From<io::Error> for ExportError {
    fn from(e: io::Error) -> Self {
        ExportError::Io(e)
    }
}

impl From<ron::Error> for ExportError {
    fn from(e: ron::Error) -> Self {
        ExportError::Serialize(e)
    }
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Io(e) => write!(f, "IO error: {}", e),
            ExportError::Serialize(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Io(e) => Some(e),
            ExportError::Serialize(e) => Some(e),
        }
    }
}

/// Write a tooth as Wavefront OBJ text
///
/// Positions and normals are written one per vertex; faces reference both
/// with 1-based indices. Each region becomes a `usemtl` group named after its
/// material. The material library is expected at `{tooth name}.mtl`.
pub fn write_obj<W: Write>(tooth: &GeneratedTooth, writer: &mut W) -> io::Result<()> {
    let mesh = tooth.mesh();
    writeln!(writer, "# DentForge tooth: {}", tooth.name())?;
    writeln!(writer, "# Vertices: {}, Triangles: {}", mesh.vertex_count(), mesh.triangle_count())?;
    writeln!(writer, "mtllib {}.mtl", tooth.name())?;
    writeln!(writer, "o {}", tooth.name())?;

    for p in mesh.positions() {
        writeln!(writer, "v {:.6} {:.6} {:.6}", p.x, p.y, p.z)?;
    }
    for n in mesh.normals() {
        writeln!(writer, "vn {:.6} {:.6} {:.6}", n.x, n.y, n.z)?;
    }

    for region in tooth.regions() {
        writeln!(writer, "usemtl {}", tooth.region_material(region).name)?;
        for first in region.range().step_by(3) {
            let (i0, i1, i2) = (first + 1, first + 2, first + 3);
            writeln!(writer, "f {i0}//{i0} {i1}//{i1} {i2}//{i2}")?;
        }
    }

    Ok(())
}

/// Write the MTL library matching [`write_obj`]
///
/// `Pm` (metalness) is the PBR extension understood by most importers.
pub fn write_mtl<W: Write>(tooth: &GeneratedTooth, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "# DentForge materials: {}", tooth.name())?;
    for material in tooth.materials() {
        let [r, g, b] = material.base_color;
        writeln!(writer)?;
        writeln!(writer, "newmtl {}", material.name)?;
        writeln!(writer, "Kd {:.4} {:.4} {:.4}", r, g, b)?;
        writeln!(writer, "Ns {:.1}", material.shininess)?;
        writeln!(writer, "d {:.3}", material.opacity)?;
        writeln!(writer, "Pm {:.3}", material.metalness)?;
    }
    Ok(())
}

/// Serialize a tooth to pretty RON text
pub fn to_ron_string(tooth: &GeneratedTooth) -> Result<String, ExportError> {
    let pretty = ron::ser::PrettyConfig::new()
        .struct_names(true)
        .enumerate_arrays(false);
    Ok(ron::ser::to_string_pretty(tooth, pretty)?)
}

/// Save a tooth to a RON file
pub fn save_ron<P: AsRef<Path>>(tooth: &GeneratedTooth, path: P) -> Result<(), ExportError> {
    fs::write(path, to_ron_string(tooth)?)?;
    Ok(())
}

/// Save `{name}.obj` and `{name}.mtl` into a directory
pub fn save_obj<P: AsRef<Path>>(tooth: &GeneratedTooth, dir: P) -> Result<(), ExportError> {
    let dir = dir.as_ref();
    let mut obj = io::BufWriter::new(fs::File::create(dir.join(format!("{}.obj", tooth.name())))?);
    write_obj(tooth, &mut obj)?;
    obj.flush()?;

    let mut mtl = io::BufWriter::new(fs::File::create(dir.join(format!("{}.mtl", tooth.name())))?);
    write_mtl(tooth, &mut mtl)?;
    mtl.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ToothCategory, ToothCondition, ToothFactory};

    fn implant_molar() -> std::sync::Arc<GeneratedTooth> {
        ToothFactory::with_seed(3)
            .request(ToothCategory::Molar, ToothCondition::Implant)
            .unwrap()
    }

    fn obj_text(tooth: &GeneratedTooth) -> String {
        let mut buf = Vec::new();
        write_obj(tooth, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_obj_counts() {
        let tooth = implant_molar();
        let text = obj_text(&tooth);

        let v_count = text.lines().filter(|l| l.starts_with("v ")).count();
        let vn_count = text.lines().filter(|l| l.starts_with("vn ")).count();
        let f_count = text.lines().filter(|l| l.starts_with("f ")).count();

        assert_eq!(v_count, tooth.mesh().vertex_count());
        assert_eq!(vn_count, tooth.mesh().vertex_count());
        assert_eq!(f_count, tooth.mesh().triangle_count());
    }

    #[test]
    fn test_obj_groups_follow_regions() {
        let tooth = implant_molar();
        let text = obj_text(&tooth);
        let groups: Vec<&str> = text
            .lines()
            .filter_map(|l| l.strip_prefix("usemtl "))
            .collect();
        assert_eq!(groups, vec!["porcelain_crown", "titanium"]);
        assert!(text.contains("mtllib molar_implant.mtl"));
    }

    #[test]
    fn test_obj_indices_in_range() {
        let tooth = implant_molar();
        let text = obj_text(&tooth);
        let max = tooth.mesh().vertex_count();
        for line in text.lines().filter(|l| l.starts_with("f ")) {
            for part in line.split_whitespace().skip(1) {
                let idx: usize = part.split("//").next().unwrap().parse().unwrap();
                assert!(idx >= 1 && idx <= max, "index {} out of range", idx);
            }
        }
    }

    #[test]
    fn test_mtl_lists_materials() {
        let tooth = implant_molar();
        let mut buf = Vec::new();
        write_mtl(&tooth, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().filter(|l| l.starts_with("newmtl ")).count(), 2);
        assert!(text.contains("newmtl titanium"));
        assert!(text.contains("Pm 0.900"));
    }

    #[test]
    fn test_ron_dump() {
        let tooth = implant_molar();
        let text = to_ron_string(&tooth).unwrap();
        assert!(text.contains("GeneratedTooth"));
        assert!(text.contains("molar_implant"));
        assert!(text.contains("idle_rotation"));
    }

    #[test]
    fn test_save_files() {
        let dir = std::env::temp_dir().join("dentforge_export_tests");
        fs::create_dir_all(&dir).unwrap();
        let tooth = implant_molar();

        save_obj(&tooth, &dir).unwrap();
        save_ron(&tooth, dir.join("molar_implant.ron")).unwrap();

        for ext in ["obj", "mtl", "ron"] {
            let path = dir.join(format!("molar_implant.{}", ext));
            assert!(path.exists(), "missing {}", ext);
            let _ = fs::remove_file(path);
        }
    }

    #[test]
    fn test_save_to_missing_dir_fails() {
        let tooth = implant_molar();
        let result = save_obj(&tooth, "/nonexistent/dentforge/output");
        assert!(matches!(result, Err(ExportError::Io(_))));
    }
}
