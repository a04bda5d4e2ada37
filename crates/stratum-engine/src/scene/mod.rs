//! Scene-facing command types.
//!
//! Responsibilities:
//! - describe one frame's drawing requests as immutable commands
//! - partition them into ordered buckets (`RenderQueue`)
//! - route them into nested queues (`QueueTable` + group stack)
//! - keep kind-specific payloads isolated per file under `scene::commands`

mod cmd;
mod material;
mod order;
mod queue;
mod table;
mod vertex;

pub mod commands;

pub use cmd::{CommandHeader, CommandKind, CommandPayload, CommandRef, RenderCommand};
pub use commands::batch::BatchCmd;
pub use commands::custom::CustomCmd;
pub use commands::group::GroupCmd;
pub use commands::primitive::PrimitiveCmd;
pub use commands::triangles::TrianglesCmd;
pub use material::MaterialId;
pub use order::Bucket;
pub use queue::RenderQueue;
pub use table::{QueueId, QueueTable};
pub use vertex::Vertex;
