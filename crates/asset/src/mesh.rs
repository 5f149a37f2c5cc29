//! CPU-side triangle-soup mesh produced by the OBJ loader.

use bytemuck::{Pod, Zeroable};

use crate::mtl::Material;

/// Shade applied to every vertex; OBJ carries no per-vertex color.
pub const DEFAULT_COLOR: [f32; 3] = [0.7, 0.7, 0.7];

/// Interleaved vertex in the upload layout: position, color, normal, uv.
/// `#[repr(C)]` with no padding, so a triangle list casts straight to a
/// float stream.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    /// Floats per vertex in the flattened stream.
    pub const STRIDE: usize = 11;

    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            color: DEFAULT_COLOR,
            normal,
            uv,
        }
    }
}

/// Exactly three vertices; the loader rejects any other face arity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

/// Triangle soup plus the material resolved from `mtllib`, if any.
/// Shared vertices across faces are duplicated, not indexed.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
    pub material: Option<Material>,
}

impl Mesh {
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Flatten into the interleaved float stream handed to the GPU
    /// uploader: 11 floats per vertex, 3 vertices per triangle, in
    /// triangle order. No deduplication.
    pub fn flatten(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.triangles.len() * 3 * Vertex::STRIDE);
        for triangle in &self.triangles {
            out.extend_from_slice(bytemuck::cast_slice(&triangle.vertices));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri(seed: f32) -> Triangle {
        Triangle {
            vertices: [
                Vertex::new([seed, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0]),
                Vertex::new([seed, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0]),
                Vertex::new([seed, 0.0, 1.0], [0.0, 0.0, 1.0], [0.0, 1.0]),
            ],
        }
    }

    #[test]
    fn vertex_stride_matches_layout() {
        assert_eq!(std::mem::size_of::<Vertex>(), Vertex::STRIDE * 4);
    }

    #[test]
    fn flatten_emits_eleven_floats_per_vertex() {
        let mesh = Mesh {
            triangles: vec![tri(0.0), tri(1.0)],
            material: None,
        };
        let stream = mesh.flatten();
        assert_eq!(stream.len(), 11 * 3 * mesh.triangle_count());
    }

    #[test]
    fn flatten_preserves_interleaved_order() {
        let mesh = Mesh {
            triangles: vec![tri(7.0)],
            material: None,
        };
        let stream = mesh.flatten();
        // First vertex: position, then color, then normal, then uv.
        assert_eq!(&stream[0..3], &[7.0, 0.0, 0.0]);
        assert_eq!(&stream[3..6], &DEFAULT_COLOR);
        assert_eq!(&stream[6..9], &[0.0, 0.0, 1.0]);
        assert_eq!(&stream[9..11], &[0.0, 0.0]);
        // Second vertex starts one stride later.
        assert_eq!(&stream[11..14], &[7.0, 1.0, 0.0]);
    }
}
