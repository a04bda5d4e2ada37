use std::collections::HashMap;
use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::paint::Color;
use crate::render::{
    AmbientState, BufferDesc, BufferId, Capabilities, ClearRequest, DrawCall, GpuBackend,
    VertexBinding,
};
use crate::scene::MaterialId;

use super::buffers::BufferPool;
use super::pipeline::{self, PipelineCache, PipelineKey};
use super::{Gpu, RenderTarget};

/// Per-draw uniform, addressed with a dynamic offset.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct DrawUniform {
    mvp: [[f32; 4]; 4],
    tint: [f32; 4],
}

struct RecordedDraw {
    key: PipelineKey,
    vertex: wgpu::Buffer,
    index: wgpu::Buffer,
    index_format: wgpu::IndexFormat,
    indices: Range<u32>,
    uniform_slot: u32,
}

enum PassOp {
    Clear(ClearRequest),
    Draw(RecordedDraw),
}

/// One render pass: an optional clear followed by the draws in `ops`.
#[derive(Debug, Clone, PartialEq)]
struct PassPlan {
    clear: Option<ClearRequest>,
    ops: Range<usize>,
}

/// [`GpuBackend`] on top of wgpu.
///
/// Calls made during `Renderer::render` are recorded; [`encode`](Self::encode)
/// replays them into an encoder. Buffer uploads go through `Queue::write_buffer`
/// immediately, so they land before the next submit.
///
/// Materials are tints looked up by id (`set_material_tint`); unknown ids draw
/// untinted.
pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,

    buffers: BufferPool,
    pipelines: PipelineCache,

    bind_group_layout: wgpu::BindGroupLayout,
    uniform_stride: u64,
    uniform_buffer: Option<wgpu::Buffer>,
    uniform_capacity: usize,
    bind_group: Option<wgpu::BindGroup>,

    state: AmbientState,
    binding: Option<VertexBinding>,
    material: MaterialId,
    model: Mat4,
    view_projection: Mat4,
    tints: HashMap<MaterialId, Color>,

    ops: Vec<PassOp>,
    uniforms: Vec<DrawUniform>,

    warned_unbound: bool,
}

impl WgpuBackend {
    pub fn new(gpu: &Gpu, color_format: wgpu::TextureFormat) -> Self {
        let device = gpu.device().clone();
        let queue = gpu.queue().clone();

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("stratum draw bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<DrawUniform>() as u64
                    ),
                },
                count: None,
            }],
        });

        let pipelines = PipelineCache::new(
            &device,
            &bind_group_layout,
            color_format,
            RenderTarget::DEPTH_FORMAT,
        );

        let uniform_stride =
            uniform_stride(u64::from(device.limits().min_uniform_buffer_offset_alignment));

        Self {
            device,
            queue,
            buffers: BufferPool::new(),
            pipelines,
            bind_group_layout,
            uniform_stride,
            uniform_buffer: None,
            uniform_capacity: 0,
            bind_group: None,
            state: AmbientState::default(),
            binding: None,
            material: MaterialId::default(),
            model: Mat4::IDENTITY,
            view_projection: Mat4::IDENTITY,
            tints: HashMap::new(),
            ops: Vec::new(),
            uniforms: Vec::new(),
            warned_unbound: false,
        }
    }

    /// Camera transform applied after every model transform.
    #[inline]
    pub fn set_view_projection(&mut self, view_projection: Mat4) {
        self.view_projection = view_projection;
    }

    #[inline]
    pub fn view_projection(&self) -> Mat4 {
        self.view_projection
    }

    /// Registers the premultiplied tint drawn for `material`.
    pub fn set_material_tint(&mut self, material: MaterialId, tint: Color) {
        tint.debug_assert_premul();
        self.tints.insert(material, tint);
    }

    /// Draws recorded since the last `encode`.
    pub fn pending_draws(&self) -> usize {
        self.uniforms.len()
    }

    pub fn pipeline_count(&self) -> usize {
        self.pipelines.len()
    }

    pub fn live_buffers(&self) -> usize {
        self.buffers.live()
    }

    /// Replays everything recorded since the last call into `encoder`.
    ///
    /// A clear starts a new render pass; draws before the first clear load the
    /// existing target contents.
    pub fn encode(&mut self, encoder: &mut wgpu::CommandEncoder, target: &RenderTarget) {
        if self.ops.is_empty() {
            return;
        }

        self.upload_uniforms();
        for op in &self.ops {
            if let PassOp::Draw(draw) = op {
                self.pipelines.prepare(&self.device, draw.key);
            }
        }

        let ops = std::mem::take(&mut self.ops);
        let clears: Vec<Option<ClearRequest>> = ops
            .iter()
            .map(|op| match op {
                PassOp::Clear(c) => Some(*c),
                PassOp::Draw(_) => None,
            })
            .collect();
        let plans = plan_passes(&clears);

        for plan in &plans {
            encode_pass(
                encoder,
                target,
                plan,
                &ops,
                &self.pipelines,
                self.bind_group.as_ref(),
                self.uniform_stride,
            );
        }

        log::trace!("encoded {} draws in {} passes", self.uniforms.len(), plans.len());
        self.uniforms.clear();
    }

    fn tint(&self) -> Color {
        self.tints.get(&self.material).copied().unwrap_or(Color::white())
    }

    fn upload_uniforms(&mut self) {
        if self.uniforms.is_empty() {
            return;
        }
        self.ensure_uniform_capacity(self.uniforms.len());
        let Some(buffer) = self.uniform_buffer.as_ref() else { return };

        let stride = self.uniform_stride as usize;
        let size = std::mem::size_of::<DrawUniform>();
        let mut bytes = vec![0u8; stride * self.uniforms.len()];
        for (i, u) in self.uniforms.iter().enumerate() {
            bytes[i * stride..i * stride + size].copy_from_slice(bytemuck::bytes_of(u));
        }
        self.queue.write_buffer(buffer, 0, &bytes);
    }

    fn ensure_uniform_capacity(&mut self, required_slots: usize) {
        if required_slots <= self.uniform_capacity && self.uniform_buffer.is_some() {
            return;
        }

        let new_cap = required_slots.next_power_of_two().max(64);
        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("stratum draw uniforms"),
            size: new_cap as u64 * self.uniform_stride,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("stratum draw bind group"),
            layout: &self.bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<DrawUniform>() as u64),
                }),
            }],
        });

        log::debug!("draw uniform slots grown: {} -> {}", self.uniform_capacity, new_cap);
        self.uniform_buffer = Some(buffer);
        self.bind_group = Some(bind_group);
        self.uniform_capacity = new_cap;
    }
}

impl GpuBackend for WgpuBackend {
    /// Buffers are never written in place while recorded draws reference them,
    /// so uploads always orphan.
    fn capabilities(&self) -> Capabilities {
        Capabilities { shareable_vertex_layout: true, map_buffer: false }
    }

    fn create_buffer(&mut self, desc: &BufferDesc) -> BufferId {
        self.buffers.create(&self.device, desc)
    }

    fn resize_buffer(&mut self, id: BufferId, size: u64) {
        self.buffers.resize(&self.device, id, size);
    }

    fn update_buffer(&mut self, id: BufferId, offset: u64, data: &[u8]) {
        self.buffers.write(&self.queue, id, offset, data);
    }

    fn destroy_buffer(&mut self, id: BufferId) {
        self.buffers.destroy(id);
    }

    fn bind_vertex_layout(&mut self, binding: Option<VertexBinding>) {
        self.binding = binding;
    }

    fn bind_material(&mut self, material: MaterialId) {
        self.material = material;
    }

    fn set_model_transform(&mut self, transform: Mat4) {
        self.model = transform;
    }

    fn draw(&mut self, call: DrawCall) {
        if call.index_count == 0 {
            return;
        }
        let Some(binding) = self.binding else {
            if !self.warned_unbound {
                log::warn!("draw without a bound vertex layout; ignored");
                self.warned_unbound = true;
            }
            return;
        };
        let (Some(vertex), Some(index)) =
            (self.buffers.get(binding.vertex), self.buffers.get(binding.index))
        else {
            log::error!("draw from buffers without storage ({binding:?}); ignored");
            return;
        };
        let (vertex, index) = (vertex.clone(), index.clone());

        let uniform_slot = self.uniforms.len() as u32;
        let tint = self.tint();
        self.uniforms.push(DrawUniform {
            mvp: (self.view_projection * self.model).to_cols_array_2d(),
            tint: [tint.r, tint.g, tint.b, tint.a],
        });

        self.ops.push(PassOp::Draw(RecordedDraw {
            key: PipelineKey::new(self.state, call.topology, call.index_format),
            vertex,
            index,
            index_format: pipeline::index_format(call.index_format),
            indices: call.base_offset..call.base_offset + call.index_count,
            uniform_slot,
        }));
    }

    fn ambient_state(&self) -> AmbientState {
        self.state
    }

    fn set_ambient_state(&mut self, state: AmbientState) {
        self.state = state;
    }

    fn clear(&mut self, request: ClearRequest) {
        self.ops.push(PassOp::Clear(request));
    }
}

fn encode_pass(
    encoder: &mut wgpu::CommandEncoder,
    target: &RenderTarget,
    plan: &PassPlan,
    ops: &[PassOp],
    pipelines: &PipelineCache,
    bind_group: Option<&wgpu::BindGroup>,
    uniform_stride: u64,
) {
    let color_load = match plan.clear.and_then(|c| c.color) {
        Some(c) => wgpu::LoadOp::Clear(c.into()),
        None => wgpu::LoadOp::Load,
    };
    let depth_load = match plan.clear.and_then(|c| c.depth) {
        Some(d) => wgpu::LoadOp::Clear(d),
        None => wgpu::LoadOp::Load,
    };

    let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("stratum pass"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target.color_view(),
            resolve_target: None,
            ops: wgpu::Operations { load: color_load, store: wgpu::StoreOp::Store },
            depth_slice: None,
        })],
        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
            view: target.depth_view(),
            depth_ops: Some(wgpu::Operations { load: depth_load, store: wgpu::StoreOp::Store }),
            stencil_ops: None,
        }),
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    });

    let Some(bind_group) = bind_group else { return };

    for op in &ops[plan.ops.clone()] {
        let PassOp::Draw(draw) = op else { continue };
        let Some(pipeline) = pipelines.get(&draw.key) else { continue };

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[(u64::from(draw.uniform_slot) * uniform_stride) as u32]);
        rpass.set_vertex_buffer(0, draw.vertex.slice(..));
        rpass.set_index_buffer(draw.index.slice(..), draw.index_format);
        rpass.draw_indexed(draw.indices.clone(), 0, 0..1);
    }
}

/// Splits recorded operations into passes. `clears[i]` is `Some` for clear ops.
fn plan_passes(clears: &[Option<ClearRequest>]) -> Vec<PassPlan> {
    let mut plans = Vec::new();
    let mut current = PassPlan { clear: None, ops: 0..0 };

    for (i, clear) in clears.iter().enumerate() {
        match clear {
            Some(request) => {
                if current.clear.is_some() || !current.ops.is_empty() {
                    plans.push(current);
                }
                current = PassPlan { clear: Some(*request), ops: i + 1..i + 1 };
            }
            None => current.ops.end = i + 1,
        }
    }
    if current.clear.is_some() || !current.ops.is_empty() {
        plans.push(current);
    }
    plans
}

#[inline]
fn uniform_stride(min_alignment: u64) -> u64 {
    wgpu::util::align_to(std::mem::size_of::<DrawUniform>() as u64, min_alignment.max(1))
}
