use glam::Mat4;

use crate::scene::cmd::{CommandHeader, CommandPayload, RenderCommand};
use crate::scene::{MaterialId, Vertex};

/// Batchable triangle list in model space.
///
/// Indices refer to `vertices` (0-based). The batcher rebases them when the
/// command is merged with its neighbours.
#[derive(Debug, Clone, PartialEq)]
pub struct TrianglesCmd {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
    /// Model-to-world transform applied on the CPU before upload.
    pub transform: Mat4,
}

impl TrianglesCmd {
    #[inline]
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u16>, transform: Mat4) -> Self {
        Self { vertices, indices, transform }
    }

    /// Two triangles covering an axis-aligned quad in the z = 0 plane.
    pub fn quad(origin: [f32; 2], size: [f32; 2], color: [u8; 4], transform: Mat4) -> Self {
        let [x, y] = origin;
        let [w, h] = size;
        let vertices = vec![
            Vertex::new([x, y, 0.0], color, [0.0, 0.0]),
            Vertex::new([x + w, y, 0.0], color, [1.0, 0.0]),
            Vertex::new([x + w, y + h, 0.0], color, [1.0, 1.0]),
            Vertex::new([x, y + h, 0.0], color, [0.0, 1.0]),
        ];
        Self::new(vertices, vec![0, 1, 2, 0, 2, 3], transform)
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }
}

impl RenderCommand {
    #[inline]
    pub fn triangles(global_order: f32, material: MaterialId, cmd: TrianglesCmd) -> Self {
        Self::from_parts(
            CommandHeader::new(global_order, material),
            CommandPayload::Triangles(cmd),
        )
    }
}
