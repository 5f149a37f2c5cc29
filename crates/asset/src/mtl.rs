//! MTL material library parser supporting `newmtl` and `map_Kd`.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::{AssetError, Result};

/// Shading descriptor resolved from a material library. Only one
/// material is tracked; the last `newmtl` in the file wins.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Material {
    pub name: String,
    /// Diffuse texture path, resolved against the .mtl file's own
    /// directory (never the process working directory). Decoding is
    /// deferred to the caller; see [`crate::ppm`].
    pub diffuse_texture: Option<PathBuf>,
}

/// Parse a material library from a file path.
pub fn load_mtl_from_path(path: impl AsRef<Path>) -> Result<Material> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| AssetError::io(path, source))?;
    parse_mtl(BufReader::new(file), path.parent())
}

/// Parse a material library from a string; `map_Kd` paths resolve
/// against `base_dir` when given.
pub fn load_mtl_from_str(contents: &str, base_dir: Option<&Path>) -> Result<Material> {
    parse_mtl(io::Cursor::new(contents), base_dir)
}

fn parse_mtl<R: BufRead>(reader: R, base_dir: Option<&Path>) -> Result<Material> {
    let mut material = Material::default();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| {
            AssetError::Format(format!("read failed on MTL line {}: {e}", line_no + 1))
        })?;
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("newmtl") => {
                if let Some(name) = parts.next() {
                    material.name = name.to_string();
                }
            }
            Some("map_Kd") => {
                if let Some(rel) = parts.next() {
                    material.diffuse_texture = Some(match base_dir {
                        Some(dir) => dir.join(rel),
                        None => PathBuf::from(rel),
                    });
                }
            }
            // Ka/Kd/Ks/Ns/illum and friends are irrelevant here.
            _ => {}
        }
    }

    log::debug!(
        "MTL parsed: material '{}', diffuse texture {:?}",
        material.name,
        material.diffuse_texture
    );
    Ok(material)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_name_and_texture() {
        let src = "newmtl crate\nKd 1.0 1.0 1.0\nmap_Kd crate.ppm\n";
        let mat = load_mtl_from_str(src, None).expect("parse mtl");
        assert_eq!(mat.name, "crate");
        assert_eq!(mat.diffuse_texture, Some(PathBuf::from("crate.ppm")));
    }

    #[test]
    fn texture_path_resolves_against_base_dir() {
        let src = "newmtl m\nmap_Kd textures/wood.ppm\n";
        let mat = load_mtl_from_str(src, Some(Path::new("assets/models"))).expect("parse mtl");
        assert_eq!(
            mat.diffuse_texture,
            Some(PathBuf::from("assets/models/textures/wood.ppm"))
        );
    }

    #[test]
    fn last_newmtl_wins() {
        let src = "newmtl first\nnewmtl second\n";
        let mat = load_mtl_from_str(src, None).expect("parse mtl");
        assert_eq!(mat.name, "second");
    }

    #[test]
    fn unknown_directives_are_ignored() {
        let src = "# comment\nKa 0.2 0.2 0.2\nillum 2\n";
        let mat = load_mtl_from_str(src, None).expect("parse mtl");
        assert_eq!(mat, Material::default());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_mtl_from_path("definitely/not/here.mtl").unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
    }
}
