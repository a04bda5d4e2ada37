use std::rc::Rc;

use crate::scene::commands::batch::BatchCmd;
use crate::scene::commands::custom::CustomCmd;
use crate::scene::commands::group::GroupCmd;
use crate::scene::commands::primitive::PrimitiveCmd;
use crate::scene::commands::triangles::TrianglesCmd;
use crate::scene::MaterialId;

/// Shared handle to a command.
///
/// The producing node keeps its own handle; queues hold theirs only until the
/// end of the frame.
pub type CommandRef = Rc<RenderCommand>;

/// Discriminant of a [`RenderCommand`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CommandKind {
    /// Never initialized. Rejected at submission, skipped at dispatch.
    Unknown,
    Triangles,
    Group,
    Custom,
    Batch,
    Primitive,
}

/// Fields shared by every command kind.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CommandHeader {
    /// Global order. Picks the 2D bucket by sign and sorts within it.
    pub global_order: f32,
    pub material: MaterialId,
    /// Opts a triangle command out of merging with its neighbours.
    pub skip_batching: bool,
}

impl CommandHeader {
    #[inline]
    pub const fn new(global_order: f32, material: MaterialId) -> Self {
        Self { global_order, material, skip_batching: false }
    }
}

/// Kind-specific payload.
///
/// Extending the command set:
/// - add a payload module under `scene::commands::*`
/// - add a variant here and in [`CommandKind`]
/// - handle it in the renderer's dispatch `match`
#[derive(Debug, Default)]
pub enum CommandPayload {
    #[default]
    Unknown,
    Triangles(TrianglesCmd),
    Group(GroupCmd),
    Custom(CustomCmd),
    Batch(BatchCmd),
    Primitive(PrimitiveCmd),
}

/// One drawing or control action recorded for the current frame.
///
/// Immutable once built. Constructors live next to each payload type
/// (`RenderCommand::triangles`, `RenderCommand::group`, ...).
#[derive(Debug)]
pub struct RenderCommand {
    header: CommandHeader,
    payload: CommandPayload,
}

impl Default for RenderCommand {
    fn default() -> Self {
        Self {
            header: CommandHeader::new(0.0, MaterialId::default()),
            payload: CommandPayload::Unknown,
        }
    }
}

impl RenderCommand {
    #[inline]
    pub fn from_parts(header: CommandHeader, payload: CommandPayload) -> Self {
        Self { header, payload }
    }

    /// Marks the command as non-batchable.
    #[inline]
    pub fn with_skip_batching(mut self, skip: bool) -> Self {
        self.header.skip_batching = skip;
        self
    }

    #[inline]
    pub fn header(&self) -> &CommandHeader {
        &self.header
    }

    #[inline]
    pub fn payload(&self) -> &CommandPayload {
        &self.payload
    }

    #[inline]
    pub fn global_order(&self) -> f32 {
        self.header.global_order
    }

    #[inline]
    pub fn material(&self) -> MaterialId {
        self.header.material
    }

    #[inline]
    pub fn is_skip_batching(&self) -> bool {
        self.header.skip_batching
    }

    pub fn kind(&self) -> CommandKind {
        match &self.payload {
            CommandPayload::Unknown => CommandKind::Unknown,
            CommandPayload::Triangles(_) => CommandKind::Triangles,
            CommandPayload::Group(_) => CommandKind::Group,
            CommandPayload::Custom(_) => CommandKind::Custom,
            CommandPayload::Batch(_) => CommandKind::Batch,
            CommandPayload::Primitive(_) => CommandKind::Primitive,
        }
    }

    #[inline]
    pub fn as_triangles(&self) -> Option<&TrianglesCmd> {
        match &self.payload {
            CommandPayload::Triangles(t) => Some(t),
            _ => None,
        }
    }
}
