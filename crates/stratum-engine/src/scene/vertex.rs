use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Vertex record shared by every batched triangle command.
///
/// Position (3 × f32), color (4 × u8, normalized), texture coords (2 × f32).
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [u8; 4],
    pub tex_coords: [f32; 2],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Unorm8x4,  // color
        2 => Float32x2  // tex_coords
    ];

    #[inline]
    pub const fn new(position: [f32; 3], color: [u8; 4], tex_coords: [f32; 2]) -> Self {
        Self { position, color, tex_coords }
    }

    /// Returns a copy with the position mapped through `transform`.
    #[inline]
    pub fn transformed(self, transform: &Mat4) -> Self {
        let p = transform.transform_point3(Vec3::from_array(self.position));
        Self { position: p.to_array(), ..self }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}
