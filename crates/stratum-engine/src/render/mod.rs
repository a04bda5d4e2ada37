//! Frame orchestration.
//!
//! Responsibilities:
//! - sweep render queues in layer order (`Renderer`)
//! - merge adjacent triangle commands into few draw calls (`TriangleBatcher`)
//! - define the narrow GPU surface both talk to (`GpuBackend`)
//!
//! Nothing here depends on wgpu; `device::WgpuBackend` is one implementation.

mod backend;
mod batcher;
mod config;
mod renderer;
mod state;
mod stats;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::{
    BufferDesc, BufferId, BufferUsage, Capabilities, ClearRequest, DrawCall, GpuBackend,
    IndexFormat, Topology, VertexBinding,
};
pub use batcher::{BatchBuffer, BatchDescriptor, TriangleBatcher, UploadStrategy};
pub use config::{
    RendererConfig, DEFAULT_BATCH_CAPACITY, DEFAULT_INDEX_CAPACITY, DEFAULT_VERTEX_CAPACITY,
};
pub use renderer::{FramePhase, Renderer};
pub use state::{AmbientSnapshot, AmbientState};
pub use stats::FrameStats;
