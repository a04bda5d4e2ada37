/// Counters for the most recent `Renderer::render` call.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct FrameStats {
    /// Draw calls issued for merged triangle batches.
    pub drawn_batches: u32,
    /// Indices drawn by those calls.
    pub drawn_indices: u32,
    /// Vertices uploaded by the flushes that issued those calls.
    pub drawn_vertices: u32,
    /// Non-empty batch flushes.
    pub flushes: u32,
}

impl FrameStats {
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
