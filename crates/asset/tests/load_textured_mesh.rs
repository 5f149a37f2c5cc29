//! Full load path against real files: OBJ referencing an MTL in its
//! own directory, MTL referencing a PPM next to it. Exercises the
//! directory-relative resolution that string-literal tests cannot.

use std::fs;
use std::path::PathBuf;

use asset::{AssetError, DecodeOptions, Vertex};

/// Temp directory removed on drop, passing or failing.
struct Fixture {
    root: PathBuf,
}

impl Fixture {
    fn new(tag: &str) -> Self {
        let root = std::env::temp_dir().join(format!("asset-test-{tag}-{}", std::process::id()));
        fs::create_dir_all(root.join("models")).expect("create fixture dir");
        Self { root }
    }

    fn write(&self, rel: &str, contents: &[u8]) -> PathBuf {
        let path = self.root.join(rel);
        fs::write(&path, contents).expect("write fixture file");
        path
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

const OBJ: &str = "\
mtllib cube.mtl
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
vn 0.0 0.0 1.0
vt 0.0 0.0
vt 1.0 0.0
vt 0.0 1.0
f 1/1/1 2/2/1 3/3/1
";

const MTL: &str = "\
newmtl cube
map_Kd cube.ppm
";

const PPM: &[u8] = b"P3\n2 2\n255\n255 0 0  0 255 0  0 0 255  255 255 0\n";

#[test]
fn textured_mesh_resolves_relative_to_its_own_files() {
    let fix = Fixture::new("textured");
    let obj_path = fix.write("models/cube.obj", OBJ.as_bytes());
    fix.write("models/cube.mtl", MTL.as_bytes());
    fix.write("models/cube.ppm", PPM);

    // Deliberately not the cwd: all resolution must go through the
    // files' own directories.
    let mesh = asset::load_mesh(&obj_path).expect("load mesh");
    assert_eq!(mesh.triangle_count(), 1);

    let material = mesh.material.as_ref().expect("material resolved");
    assert_eq!(material.name, "cube");
    let texture_path = material.diffuse_texture.as_ref().expect("texture path");
    assert_eq!(texture_path, &fix.root.join("models").join("cube.ppm"));

    // Decode is decoupled from the mesh load.
    let image = asset::decode_texture(texture_path).expect("decode texture");
    assert_eq!((image.width, image.height), (2, 2));
    assert_eq!(image.pixel(0, 0), [255, 0, 0]);

    let stream = asset::flatten(&mesh);
    assert_eq!(stream.len(), Vertex::STRIDE * 3 * mesh.triangle_count());
}

#[test]
fn missing_geometry_is_io_error() {
    let fix = Fixture::new("missing");
    let err = asset::load_mesh(fix.root.join("models/absent.obj")).unwrap_err();
    assert!(matches!(err, AssetError::Io { .. }));
}

#[test]
fn broken_material_library_leaves_mesh_untextured() {
    let fix = Fixture::new("untextured");
    let obj_path = fix.write("models/plain.obj", OBJ.as_bytes());
    // No cube.mtl on disk.

    let mesh = asset::load_mesh(&obj_path).expect("load mesh");
    assert_eq!(mesh.triangle_count(), 1);
    assert!(mesh.material.is_none());
}

#[test]
fn binary_texture_decodes_with_options() {
    let fix = Fixture::new("binary");
    let mut ppm = b"P6\n# binary fixture\n1 2\n255\n".to_vec();
    ppm.extend_from_slice(&[10, 20, 30, 40, 50, 60]);
    let path = fix.write("models/strip.ppm", &ppm);

    let options = DecodeOptions {
        flip_vertical: true,
        ..DecodeOptions::default()
    };
    let image = asset::decode_ppm_from_path(&path, &options).expect("decode");
    assert_eq!(image.pixel(0, 0), [40, 50, 60]);
    assert_eq!(image.pixel(0, 1), [10, 20, 30]);
}
