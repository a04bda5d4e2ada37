use glam::Mat4;

use crate::render::{DrawCall, GpuBackend, IndexFormat, Topology, VertexBinding};
use crate::scene::cmd::{CommandHeader, CommandPayload, RenderCommand};
use crate::scene::MaterialId;

/// Indexed draw of any topology from caller-owned buffers.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PrimitiveCmd {
    pub binding: VertexBinding,
    pub topology: Topology,
    pub index_format: IndexFormat,
    /// First index to draw (in indices, not bytes).
    pub first_index: u32,
    pub index_count: u32,
    pub transform: Mat4,
}

impl PrimitiveCmd {
    pub fn execute(&self, material: MaterialId, gpu: &mut dyn GpuBackend) {
        if self.index_count == 0 {
            return;
        }
        gpu.bind_material(material);
        gpu.set_model_transform(self.transform);
        gpu.bind_vertex_layout(Some(self.binding));
        gpu.draw(DrawCall {
            topology: self.topology,
            index_count: self.index_count,
            index_format: self.index_format,
            base_offset: self.first_index,
        });
        gpu.bind_vertex_layout(None);
    }
}

impl RenderCommand {
    #[inline]
    pub fn primitive(global_order: f32, material: MaterialId, cmd: PrimitiveCmd) -> Self {
        Self::from_parts(
            CommandHeader::new(global_order, material),
            CommandPayload::Primitive(cmd),
        )
    }
}
