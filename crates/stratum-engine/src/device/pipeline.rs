use std::collections::HashMap;

use crate::render::{AmbientState, IndexFormat, Topology};
use crate::scene::Vertex;

/// Everything that selects a distinct `wgpu::RenderPipeline`.
///
/// Color and depth formats are fixed per backend and not part of the key.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct PipelineKey {
    pub state: AmbientState,
    pub topology: Topology,
    /// Only set for strip topologies, where wgpu needs it to detect restarts.
    pub strip_index_format: Option<IndexFormat>,
}

impl PipelineKey {
    pub fn new(state: AmbientState, topology: Topology, index_format: IndexFormat) -> Self {
        Self {
            state,
            topology,
            strip_index_format: topology.is_strip().then_some(index_format),
        }
    }
}

/// Lazily built pipelines, one per distinct [`PipelineKey`].
pub struct PipelineCache {
    shader: wgpu::ShaderModule,
    layout: wgpu::PipelineLayout,
    color_format: wgpu::TextureFormat,
    depth_format: wgpu::TextureFormat,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
}

impl PipelineCache {
    pub fn new(
        device: &wgpu::Device,
        bind_group_layout: &wgpu::BindGroupLayout,
        color_format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("stratum shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/stratum.wgsl").into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("stratum pipeline layout"),
            bind_group_layouts: &[bind_group_layout],
            immediate_size: 0,
        });

        Self { shader, layout, color_format, depth_format, pipelines: HashMap::new() }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }

    /// Builds the pipeline for `key` if it does not exist yet.
    pub fn prepare(&mut self, device: &wgpu::Device, key: PipelineKey) {
        if self.pipelines.contains_key(&key) {
            return;
        }
        let pipeline = self.build(device, key);
        log::debug!("pipeline created for {key:?} ({} cached)", self.pipelines.len() + 1);
        self.pipelines.insert(key, pipeline);
    }

    /// Returns the pipeline for `key`, or `None` if it was never prepared.
    #[inline]
    pub fn get(&self, key: &PipelineKey) -> Option<&wgpu::RenderPipeline> {
        self.pipelines.get(key)
    }

    fn build(&self, device: &wgpu::Device, key: PipelineKey) -> wgpu::RenderPipeline {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("stratum pipeline"),
            layout: Some(&self.layout),

            vertex: wgpu::VertexState {
                module: &self.shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &self.shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.color_format,
                    blend: key.state.blend.then(premul_alpha_blend),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: primitive_topology(key.topology),
                strip_index_format: key.strip_index_format.map(index_format),
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: cull_mode(key.state),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: Some(depth_stencil(key.state, self.depth_format)),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        })
    }
}

pub(crate) fn premul_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

/// Depth state for `state`.
///
/// The depth attachment is always bound, so a disabled test maps to `Always`
/// with writes off: draws never touch depth unless the test is on.
pub(crate) fn depth_stencil(
    state: AmbientState,
    format: wgpu::TextureFormat,
) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format,
        depth_write_enabled: state.depth_test && state.depth_write,
        depth_compare: if state.depth_test {
            wgpu::CompareFunction::LessEqual
        } else {
            wgpu::CompareFunction::Always
        },
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

#[inline]
pub(crate) fn cull_mode(state: AmbientState) -> Option<wgpu::Face> {
    state.cull.then_some(wgpu::Face::Back)
}

pub(crate) fn primitive_topology(topology: Topology) -> wgpu::PrimitiveTopology {
    match topology {
        Topology::PointList => wgpu::PrimitiveTopology::PointList,
        Topology::LineList => wgpu::PrimitiveTopology::LineList,
        Topology::LineStrip => wgpu::PrimitiveTopology::LineStrip,
        Topology::TriangleList => wgpu::PrimitiveTopology::TriangleList,
        Topology::TriangleStrip => wgpu::PrimitiveTopology::TriangleStrip,
    }
}

pub(crate) fn index_format(format: IndexFormat) -> wgpu::IndexFormat {
    match format {
        IndexFormat::Uint16 => wgpu::IndexFormat::Uint16,
        IndexFormat::Uint32 => wgpu::IndexFormat::Uint32,
    }
}
