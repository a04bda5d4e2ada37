use crate::scene::cmd::{CommandHeader, CommandPayload, RenderCommand};
use crate::scene::{MaterialId, QueueId};

/// Runs another render queue at this point of the sweep.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct GroupCmd {
    pub queue: QueueId,
}

impl RenderCommand {
    /// Builds a command that sweeps `queue` in place.
    #[inline]
    pub fn group(global_order: f32, queue: QueueId) -> Self {
        Self::from_parts(
            CommandHeader::new(global_order, MaterialId::default()),
            CommandPayload::Group(GroupCmd { queue }),
        )
    }
}
