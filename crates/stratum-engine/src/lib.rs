//! Stratum engine crate.
//!
//! A layered render-command queue: callers submit commands tagged with a
//! global order, and [`render::Renderer`] replays them sorted into five
//! buckets, batching adjacent same-material triangles into single draws.
//!
//! The queueing core (`scene`, `render`) talks to the GPU only through
//! [`render::GpuBackend`]; [`device::WgpuBackend`] implements it on wgpu.

pub mod device;
pub mod logging;
pub mod paint;
pub mod render;
pub mod scene;
