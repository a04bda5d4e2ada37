use glam::Mat4;

use crate::render::{DrawCall, GpuBackend, IndexFormat, Topology, VertexBinding};
use crate::scene::cmd::{CommandHeader, CommandPayload, RenderCommand};
use crate::scene::MaterialId;

/// Pre-built triangle list living in caller-owned GPU buffers
/// (e.g. a sprite atlas baked once).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BatchCmd {
    pub binding: VertexBinding,
    pub index_count: u32,
    pub transform: Mat4,
}

impl BatchCmd {
    #[inline]
    pub fn new(binding: VertexBinding, index_count: u32, transform: Mat4) -> Self {
        Self { binding, index_count, transform }
    }

    pub fn execute(&self, material: MaterialId, gpu: &mut dyn GpuBackend) {
        gpu.bind_material(material);
        gpu.set_model_transform(self.transform);
        gpu.bind_vertex_layout(Some(self.binding));
        gpu.draw(DrawCall {
            topology: Topology::TriangleList,
            index_count: self.index_count,
            index_format: IndexFormat::Uint16,
            base_offset: 0,
        });
        gpu.bind_vertex_layout(None);
    }
}

impl RenderCommand {
    #[inline]
    pub fn batch(global_order: f32, material: MaterialId, cmd: BatchCmd) -> Self {
        Self::from_parts(CommandHeader::new(global_order, material), CommandPayload::Batch(cmd))
    }
}
