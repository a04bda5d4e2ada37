//! wgpu implementation of the render backend.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue (headless)
//! - offscreen color + depth targets
//! - mapping `GpuBackend` calls onto buffers, cached pipelines and render passes

mod backend;
mod buffers;
mod gpu;
mod init;
mod pipeline;
mod target;

pub use backend::WgpuBackend;
pub use buffers::BufferPool;
pub use gpu::Gpu;
pub use init::GpuInit;
pub use pipeline::{PipelineCache, PipelineKey};
pub use target::RenderTarget;
