//! Veles3D model inspector: loads an OBJ model and its texture and
//! reports what a renderer would receive. Stands in for the rendering
//! side, which takes the flattened stream and pixel buffer from here.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use asset::{ChannelOrder, DecodeOptions, IndexPolicy, ObjConfig, Vertex};

fn parse_flip_v_arg() -> bool {
    // --flip-v[=on|off], default on: store vt as (s, 1 - t).
    for arg in std::env::args() {
        if let Some(val) = arg.strip_prefix("--flip-v=") {
            return matches!(
                val.to_ascii_lowercase().as_str(),
                "1" | "true" | "on" | "yes"
            );
        }
    }
    true
}

fn parse_index_policy_arg() -> IndexPolicy {
    // --index-policy=strict|clamp
    for arg in std::env::args() {
        if let Some(val) = arg.strip_prefix("--index-policy=") {
            return match val.to_ascii_lowercase().as_str() {
                "strict" => IndexPolicy::Strict,
                "clamp" => IndexPolicy::Clamp,
                other => {
                    eprintln!("[warn] Unknown index policy '{}', using strict.", other);
                    IndexPolicy::Strict
                }
            };
        }
    }
    IndexPolicy::Strict
}

fn parse_decode_options() -> DecodeOptions {
    let mut options = DecodeOptions::default();
    for arg in std::env::args() {
        match arg.as_str() {
            "--flip-image" => options.flip_vertical = true,
            "--bgr" => options.channel_order = ChannelOrder::Bgr,
            _ => {}
        }
    }
    options
}

fn parse_texture_override() -> Option<PathBuf> {
    // --texture=path beats the mtllib-resolved path.
    std::env::args()
        .find_map(|arg| arg.strip_prefix("--texture=").map(PathBuf::from))
}

fn parse_model_arg() -> Option<PathBuf> {
    std::env::args()
        .skip(1)
        .find(|arg| !arg.starts_with("--"))
        .map(PathBuf::from)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Some(model) = parse_model_arg() else {
        bail!("usage: app <model.obj> [--flip-v=on|off] [--index-policy=strict|clamp] [--texture=path] [--flip-image] [--bgr]");
    };

    let config = ObjConfig {
        flip_v: parse_flip_v_arg(),
        index_policy: parse_index_policy_arg(),
    };
    log::info!(
        "Loading {} (flip_v={}, index_policy={:?})",
        model.display(),
        config.flip_v,
        config.index_policy
    );

    // A missing model is fatal; a missing texture is not.
    let mesh = asset::load_obj_with(&model, &config)
        .with_context(|| format!("failed to load model {}", model.display()))?;

    let stream = asset::flatten(&mesh);
    log::info!(
        "Mesh ready: {} triangles, {} floats ({} per vertex)",
        mesh.triangle_count(),
        stream.len(),
        Vertex::STRIDE
    );

    let texture_path = parse_texture_override().or_else(|| {
        mesh.material
            .as_ref()
            .and_then(|m| m.diffuse_texture.clone())
    });

    match texture_path {
        Some(path) => {
            let options = parse_decode_options();
            match asset::decode_ppm_from_path(&path, &options) {
                Ok(image) => log::info!(
                    "Texture ready: {}x{}, {} bytes, order {:?}",
                    image.width,
                    image.height,
                    image.pixels.len(),
                    options.channel_order
                ),
                Err(err) => log::warn!("continuing untextured: {err}"),
            }
        }
        None => log::info!("No texture referenced; mesh is untextured."),
    }

    if let Some(material) = &mesh.material {
        log::info!("Material: '{}'", material.name);
    }

    Ok(())
}
