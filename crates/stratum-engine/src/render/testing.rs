//! In-memory backend that records every call, for unit tests.

use glam::Mat4;

use crate::render::{
    AmbientState, BufferDesc, BufferId, BufferUsage, Capabilities, ClearRequest, DrawCall,
    GpuBackend, VertexBinding,
};
use crate::scene::MaterialId;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Op {
    CreateBuffer { id: BufferId, usage: BufferUsage, size: u64 },
    ResizeBuffer { id: BufferId, size: u64 },
    UpdateBuffer { id: BufferId, offset: u64, len: usize },
    DestroyBuffer(BufferId),
    BindLayout(Option<VertexBinding>),
    BindMaterial(MaterialId),
    SetTransform(Mat4),
    Draw(DrawCall),
    SetState(AmbientState),
    Clear(ClearRequest),
}

/// A draw together with the pipeline inputs in effect when it was issued.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedDraw {
    pub call: DrawCall,
    pub material: Option<MaterialId>,
    pub binding: Option<VertexBinding>,
    pub transform: Mat4,
    pub state: AmbientState,
}

#[derive(Debug, Default)]
pub(crate) struct RecordingBackend {
    pub caps: Capabilities,
    pub ops: Vec<Op>,

    state: AmbientState,
    buffers: Vec<Option<Vec<u8>>>,
    draws: Vec<RecordedDraw>,

    binding: Option<VertexBinding>,
    material: Option<MaterialId>,
    transform: Mat4,
}

impl RecordingBackend {
    /// Backend without optional capabilities (orphaning uploads).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capabilities(caps: Capabilities) -> Self {
        Self { caps, ..Self::default() }
    }

    pub fn draws(&self) -> &[RecordedDraw] {
        &self.draws
    }

    /// Every state applied with `set_ambient_state`, in order.
    pub fn states(&self) -> Vec<AmbientState> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::SetState(s) => Some(*s),
                _ => None,
            })
            .collect()
    }

    pub fn buffer_data(&self, id: BufferId) -> &[u8] {
        match self.buffers.get(id.0 as usize) {
            Some(Some(bytes)) => bytes,
            _ => panic!("buffer {} does not exist", id.0),
        }
    }

    pub fn index_data(&self, id: BufferId) -> Vec<u16> {
        self.buffer_data(id)
            .chunks_exact(2)
            .map(|c| u16::from_ne_bytes([c[0], c[1]]))
            .collect()
    }

    fn storage(&mut self, id: BufferId) -> &mut Vec<u8> {
        match self.buffers.get_mut(id.0 as usize) {
            Some(Some(bytes)) => bytes,
            _ => panic!("buffer {} does not exist", id.0),
        }
    }
}

impl GpuBackend for RecordingBackend {
    fn capabilities(&self) -> Capabilities {
        self.caps
    }

    fn create_buffer(&mut self, desc: &BufferDesc) -> BufferId {
        let id = BufferId(self.buffers.len() as u32);
        self.buffers.push(Some(vec![0; desc.size as usize]));
        self.ops.push(Op::CreateBuffer { id, usage: desc.usage, size: desc.size });
        id
    }

    fn resize_buffer(&mut self, id: BufferId, size: u64) {
        *self.storage(id) = vec![0; size as usize];
        self.ops.push(Op::ResizeBuffer { id, size });
    }

    fn update_buffer(&mut self, id: BufferId, offset: u64, data: &[u8]) {
        let storage = self.storage(id);
        let start = offset as usize;
        assert!(
            start + data.len() <= storage.len(),
            "update of {} bytes at {start} overruns buffer of {} bytes",
            data.len(),
            storage.len()
        );
        storage[start..start + data.len()].copy_from_slice(data);
        self.ops.push(Op::UpdateBuffer { id, offset, len: data.len() });
    }

    fn destroy_buffer(&mut self, id: BufferId) {
        if let Some(slot) = self.buffers.get_mut(id.0 as usize) {
            *slot = None;
        }
        self.ops.push(Op::DestroyBuffer(id));
    }

    fn bind_vertex_layout(&mut self, binding: Option<VertexBinding>) {
        self.binding = binding;
        self.ops.push(Op::BindLayout(binding));
    }

    fn bind_material(&mut self, material: MaterialId) {
        self.material = Some(material);
        self.ops.push(Op::BindMaterial(material));
    }

    fn set_model_transform(&mut self, transform: Mat4) {
        self.transform = transform;
        self.ops.push(Op::SetTransform(transform));
    }

    fn draw(&mut self, call: DrawCall) {
        self.draws.push(RecordedDraw {
            call,
            material: self.material,
            binding: self.binding,
            transform: self.transform,
            state: self.state,
        });
        self.ops.push(Op::Draw(call));
    }

    fn ambient_state(&self) -> AmbientState {
        self.state
    }

    fn set_ambient_state(&mut self, state: AmbientState) {
        self.state = state;
        self.ops.push(Op::SetState(state));
    }

    fn clear(&mut self, request: ClearRequest) {
        self.ops.push(Op::Clear(request));
    }
}
