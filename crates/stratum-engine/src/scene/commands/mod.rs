//! Per-kind command payloads and their constructors.

pub mod batch;
pub mod custom;
pub mod group;
pub mod primitive;
pub mod triangles;
