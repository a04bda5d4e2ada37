use core::fmt;

use crate::render::GpuBackend;
use crate::scene::cmd::{CommandHeader, CommandPayload, RenderCommand};
use crate::scene::MaterialId;

/// Callback that submits its own GPU work.
pub type CustomFn = dyn Fn(&mut dyn GpuBackend);

/// Free-form command; never batched.
pub struct CustomCmd {
    func: Box<CustomFn>,
}

impl CustomCmd {
    #[inline]
    pub fn new(func: impl Fn(&mut dyn GpuBackend) + 'static) -> Self {
        Self { func: Box::new(func) }
    }

    #[inline]
    pub fn execute(&self, gpu: &mut dyn GpuBackend) {
        (self.func)(gpu);
    }
}

impl fmt::Debug for CustomCmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomCmd").finish_non_exhaustive()
    }
}

impl RenderCommand {
    /// Builds a command that runs `func` when the sweep reaches it.
    #[inline]
    pub fn custom(global_order: f32, func: impl Fn(&mut dyn GpuBackend) + 'static) -> Self {
        Self::from_parts(
            CommandHeader::new(global_order, MaterialId::default()),
            CommandPayload::Custom(CustomCmd::new(func)),
        )
    }
}
