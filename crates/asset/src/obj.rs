//! OBJ parser for the subset `v`, `vn`, `vt`, `f`, `mtllib`.
//!
//! Faces must be triangles; n-gons are rejected rather than fanned out.
//! The output is a triangle soup: every face carries its own copies of
//! the attribute values, with no shared-vertex indexing.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::str::SplitWhitespace;

use bytemuck::Zeroable;
use glam::{Vec2, Vec3};

use crate::error::{AssetError, Result};
use crate::mesh::{Mesh, Triangle, Vertex};
use crate::mtl;

/// How out-of-range face indices are treated. Applied uniformly to the
/// position, uv and normal pools, but only to indices the file
/// actually wrote: a component omitted from the token (`P`, `P//N`)
/// falls back without a range check, under either policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IndexPolicy {
    /// Fail the load with [`AssetError::Index`].
    #[default]
    Strict,
    /// Remap to the first pool entry; an empty pool falls back to a
    /// fixed default attribute (uv `(0,0)`, normal `+Z`).
    Clamp,
}

/// Loader policy knobs.
#[derive(Clone, Copy, Debug)]
pub struct ObjConfig {
    /// Store `vt s t` as `(s, 1 - t)`. The PPM decoder keeps file row
    /// order by default (row 0 = top), so flipping `t` here gives
    /// upright sampling under a bottom-left-origin texture convention.
    pub flip_v: bool,
    pub index_policy: IndexPolicy,
}

impl Default for ObjConfig {
    fn default() -> Self {
        Self {
            flip_v: true,
            index_policy: IndexPolicy::Strict,
        }
    }
}

/// Zero-based indices into the attribute pools, resolved from one face
/// vertex token (`P`, `P/T`, `P/T/N` or `P//N`; 1-based in the file).
///
/// An omitted component resolves to index 0 (see [`Self::uv_index`]),
/// aliasing the first pool entry rather than acting as an absence
/// marker in the resolved value. The loader only range-checks indices
/// the file actually wrote; omitted components never fail the load.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceIndices {
    pub position: usize,
    /// `None` when the token omitted the component (`P`, `P//N`).
    pub uv: Option<usize>,
    /// `None` when the token omitted the component (`P`, `P/T`).
    pub normal: Option<usize>,
}

impl FaceIndices {
    /// Parse a single face vertex token. Non-integer components and
    /// explicit `0` indices are format errors.
    pub fn parse(token: &str, line_no: usize) -> Result<Self> {
        let mut split = token.split('/');
        let pos_part = split.next().unwrap_or("");
        if pos_part.is_empty() {
            return Err(AssetError::Format(format!(
                "face element '{token}' on line {line_no} has no position index"
            )));
        }

        let position = parse_component(pos_part, token, line_no)?;
        let uv = match split.next() {
            None | Some("") => None,
            Some(part) => Some(parse_component(part, token, line_no)?),
        };
        let normal = match split.next() {
            None | Some("") => None,
            Some(part) => Some(parse_component(part, token, line_no)?),
        };
        if split.next().is_some() {
            return Err(AssetError::Format(format!(
                "face element '{token}' on line {line_no} has too many components"
            )));
        }

        Ok(Self {
            position,
            uv,
            normal,
        })
    }

    /// Resolved uv index; an omitted component addresses entry 0.
    pub fn uv_index(&self) -> usize {
        self.uv.unwrap_or(0)
    }

    /// Resolved normal index; an omitted component addresses entry 0.
    pub fn normal_index(&self) -> usize {
        self.normal.unwrap_or(0)
    }
}

fn parse_component(part: &str, token: &str, line_no: usize) -> Result<usize> {
    let raw: usize = part.parse().map_err(|_| {
        AssetError::Format(format!(
            "invalid index '{part}' in face element '{token}' on line {line_no}"
        ))
    })?;
    if raw == 0 {
        return Err(AssetError::Format(format!(
            "face indices are 1-based; found 0 on line {line_no}"
        )));
    }
    Ok(raw - 1)
}

/// Parse-time scratch: attribute values in declaration order. Owned by
/// a single load call and discarded once every face is resolved.
#[derive(Debug, Default)]
struct AttributePools {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    uvs: Vec<Vec2>,
}

impl AttributePools {
    fn position(&self, idx: usize, policy: IndexPolicy, line_no: usize) -> Result<Vec3> {
        lookup(&self.positions, idx, policy, "position", line_no, Vec3::ZERO)
    }

    fn normal(&self, idx: Option<usize>, policy: IndexPolicy, line_no: usize) -> Result<Vec3> {
        match idx {
            Some(i) => lookup(&self.normals, i, policy, "normal", line_no, Vec3::Z),
            None => Ok(self.normals.first().copied().unwrap_or(Vec3::Z)),
        }
    }

    fn uv(&self, idx: Option<usize>, policy: IndexPolicy, line_no: usize) -> Result<Vec2> {
        match idx {
            Some(i) => lookup(&self.uvs, i, policy, "uv", line_no, Vec2::ZERO),
            None => Ok(self.uvs.first().copied().unwrap_or(Vec2::ZERO)),
        }
    }
}

fn lookup<T: Copy>(
    pool: &[T],
    index: usize,
    policy: IndexPolicy,
    name: &'static str,
    line: usize,
    fallback: T,
) -> Result<T> {
    if let Some(value) = pool.get(index) {
        return Ok(*value);
    }
    match policy {
        IndexPolicy::Strict => Err(AssetError::Index {
            pool: name,
            index,
            len: pool.len(),
            line,
        }),
        IndexPolicy::Clamp => Ok(pool.first().copied().unwrap_or(fallback)),
    }
}

/// Load an OBJ mesh from a file path with the default config.
pub fn load_obj_from_path(path: impl AsRef<Path>) -> Result<Mesh> {
    load_obj_with(path, &ObjConfig::default())
}

/// Load an OBJ mesh from a file path. `mtllib` names resolve against
/// the OBJ file's own directory.
pub fn load_obj_with(path: impl AsRef<Path>, config: &ObjConfig) -> Result<Mesh> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| AssetError::io(path, source))?;
    parse_obj(BufReader::new(file), path.parent(), config)
}

/// Convenience helper to parse an OBJ string literal. `mtllib` names
/// are taken as given (no base directory).
pub fn load_obj_from_str(contents: &str, config: &ObjConfig) -> Result<Mesh> {
    parse_obj(io::Cursor::new(contents), None, config)
}

fn parse_obj<R: BufRead>(reader: R, base_dir: Option<&Path>, config: &ObjConfig) -> Result<Mesh> {
    let mut pools = AttributePools::default();
    let mut triangles: Vec<Triangle> = Vec::new();
    let mut material = None;

    for (line_no, line) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line = line
            .map_err(|e| AssetError::Format(format!("read failed on OBJ line {line_no}: {e}")))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut parts = trimmed.split_whitespace();
        let Some(tag) = parts.next() else { continue };

        match tag {
            "v" => pools.positions.push(parse_vec3(&mut parts, line_no, "v")?),
            "vn" => {
                // Normals are unit length from ingestion onward.
                let n = parse_vec3(&mut parts, line_no, "vn")?;
                pools.normals.push(n.normalize_or_zero());
            }
            "vt" => {
                let mut uv = parse_vec2(&mut parts, line_no)?;
                if config.flip_v {
                    uv.y = 1.0 - uv.y;
                }
                pools.uvs.push(uv);
            }
            "mtllib" => {
                // A broken material library is not fatal; the mesh
                // proceeds untextured.
                if let Some(name) = parts.next() {
                    let mtl_path = match base_dir {
                        Some(dir) => dir.join(name),
                        None => PathBuf::from(name),
                    };
                    match mtl::load_mtl_from_path(&mtl_path) {
                        Ok(m) => material = Some(m),
                        Err(err) => log::warn!(
                            "skipping material library {}: {err}",
                            mtl_path.display()
                        ),
                    }
                }
            }
            "f" => {
                let tokens: Vec<&str> = parts.collect();
                triangles.push(resolve_face(&tokens, &pools, config, line_no)?);
            }
            // o/g/s/usemtl and anything newer: forward-compatible skip.
            _ => {}
        }
    }

    log::info!(
        "OBJ parsed: {} positions, {} normals, {} uvs, {} triangles",
        pools.positions.len(),
        pools.normals.len(),
        pools.uvs.len(),
        triangles.len()
    );

    Ok(Mesh {
        triangles,
        material,
    })
}

fn resolve_face(
    tokens: &[&str],
    pools: &AttributePools,
    config: &ObjConfig,
    line_no: usize,
) -> Result<Triangle> {
    if tokens.len() != 3 {
        return Err(AssetError::Format(format!(
            "face on line {line_no} has {} vertex tokens, expected 3 (triangles only)",
            tokens.len()
        )));
    }

    let mut vertices = [Vertex::zeroed(); 3];
    for (slot, token) in vertices.iter_mut().zip(tokens) {
        let idx = FaceIndices::parse(token, line_no)?;
        let position = pools.position(idx.position, config.index_policy, line_no)?;
        let normal = pools.normal(idx.normal, config.index_policy, line_no)?;
        let uv = pools.uv(idx.uv, config.index_policy, line_no)?;
        *slot = Vertex::new(position.to_array(), normal.to_array(), uv.to_array());
    }
    Ok(Triangle { vertices })
}

fn parse_vec3(parts: &mut SplitWhitespace, line_no: usize, what: &str) -> Result<Vec3> {
    let x = parse_f32(parts.next(), line_no, what)?;
    let y = parse_f32(parts.next(), line_no, what)?;
    let z = parse_f32(parts.next(), line_no, what)?;
    Ok(Vec3::new(x, y, z))
}

fn parse_vec2(parts: &mut SplitWhitespace, line_no: usize) -> Result<Vec2> {
    let s = parse_f32(parts.next(), line_no, "vt")?;
    let t = parse_f32(parts.next(), line_no, "vt")?;
    Ok(Vec2::new(s, t))
}

fn parse_f32(value: Option<&str>, line_no: usize, what: &str) -> Result<f32> {
    let token = value.ok_or_else(|| {
        AssetError::Format(format!("missing {what} coordinate on line {line_no}"))
    })?;
    token.parse::<f32>().map_err(|_| {
        AssetError::Format(format!(
            "bad {what} coordinate '{token}' on line {line_no}"
        ))
    })
}
