//! Asset loading/parsers: OBJ geometry, MTL materials, PPM textures.
//!
//! Everything here is CPU-side. The output of [`load_mesh`] plus
//! [`Mesh::flatten`] is an upload-ready interleaved float stream; the
//! output of [`decode_texture`] is a raw pixel buffer. GPU resource
//! creation and lifetimes belong to the rendering side.

pub mod error;
pub mod mesh;
pub mod mtl;
pub mod obj;
pub mod ppm;

pub use error::{AssetError, Result};
pub use mesh::{Mesh, Triangle, Vertex};
pub use mtl::Material;
pub use obj::{FaceIndices, IndexPolicy, ObjConfig, load_obj_from_path, load_obj_with};
pub use ppm::{ChannelOrder, DecodeOptions, Image, decode_ppm_from_path};

/// Load an OBJ mesh (and its material library, when referenced) with
/// the default policies. See [`obj::load_obj_with`] for the knobs.
pub fn load_mesh(path: impl AsRef<std::path::Path>) -> Result<Mesh> {
    obj::load_obj_from_path(path)
}

/// Decode a PPM texture with the default post-processing (no row flip,
/// RGB channel order).
pub fn decode_texture(path: impl AsRef<std::path::Path>) -> Result<Image> {
    ppm::decode_ppm_from_path(path, &DecodeOptions::default())
}

/// Flatten a mesh into the interleaved vertex stream.
pub fn flatten(mesh: &Mesh) -> Vec<f32> {
    mesh.flatten()
}
