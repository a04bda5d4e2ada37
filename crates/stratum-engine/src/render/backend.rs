use glam::Mat4;

use crate::paint::Color;
use crate::render::AmbientState;
use crate::scene::MaterialId;

/// Backend-issued buffer handle.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BufferId(pub u32);

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BufferUsage {
    Vertex,
    Index,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BufferDesc {
    pub label: &'static str,
    pub usage: BufferUsage,
    /// Initial size in bytes. May be zero; storage is then allocated on resize.
    pub size: u64,
}

/// A vertex buffer paired with the index buffer drawn from it.
///
/// Binding one is the equivalent of binding a vertex-array object.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct VertexBinding {
    pub vertex: BufferId,
    pub index: BufferId,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum Topology {
    PointList,
    LineList,
    LineStrip,
    #[default]
    TriangleList,
    TriangleStrip,
}

impl Topology {
    #[inline]
    pub const fn is_strip(self) -> bool {
        matches!(self, Topology::LineStrip | Topology::TriangleStrip)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum IndexFormat {
    #[default]
    Uint16,
    Uint32,
}

impl IndexFormat {
    #[inline]
    pub const fn size_bytes(self) -> u64 {
        match self {
            IndexFormat::Uint16 => 2,
            IndexFormat::Uint32 => 4,
        }
    }
}

/// One indexed draw from the currently bound vertex layout.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct DrawCall {
    pub topology: Topology,
    pub index_count: u32,
    pub index_format: IndexFormat,
    /// First index to read, counted in indices.
    pub base_offset: u32,
}

/// Optional backend features the batcher adapts to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct Capabilities {
    /// Vertex layouts can be bound once and reused across uploads.
    pub shareable_vertex_layout: bool,
    /// Buffers can be written in place without reallocating storage.
    pub map_buffer: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct ClearRequest {
    pub color: Option<Color>,
    pub depth: Option<f32>,
}

/// Narrow GPU interface consumed by the renderer.
///
/// Object safe: custom commands receive `&mut dyn GpuBackend`.
pub trait GpuBackend {
    fn capabilities(&self) -> Capabilities;

    fn create_buffer(&mut self, desc: &BufferDesc) -> BufferId;

    /// Reallocates storage to `size` bytes. Previous contents are discarded;
    /// draws already issued against the old storage are unaffected.
    fn resize_buffer(&mut self, id: BufferId, size: u64);

    fn update_buffer(&mut self, id: BufferId, offset: u64, data: &[u8]);

    fn destroy_buffer(&mut self, id: BufferId);

    /// Binds (`Some`) or unbinds (`None`) the vertex/index buffer pair.
    fn bind_vertex_layout(&mut self, binding: Option<VertexBinding>);

    fn bind_material(&mut self, material: MaterialId);

    fn set_model_transform(&mut self, transform: Mat4);

    fn draw(&mut self, call: DrawCall);

    fn ambient_state(&self) -> AmbientState;

    fn set_ambient_state(&mut self, state: AmbientState);

    fn clear(&mut self, request: ClearRequest);
}
