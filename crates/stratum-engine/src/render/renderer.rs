use std::rc::Rc;

use crate::paint::Color;
use crate::render::{
    AmbientState, ClearRequest, FrameStats, GpuBackend, RendererConfig, TriangleBatcher,
    DEFAULT_VERTEX_CAPACITY,
};
use crate::scene::{
    Bucket, CommandKind, CommandPayload, CommandRef, QueueId, QueueTable, RenderQueue,
};

/// Where the renderer is in its frame cycle.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FramePhase {
    /// Nothing submitted since the last render or reset.
    Idle,
    /// Commands are being submitted.
    Recording,
    /// `render` is sweeping the queues; submission is rejected.
    Sweeping,
}

/// Collects one frame of render commands and replays them in layer order.
///
/// Usage:
/// - `add_command*` / `push_group` / `pop_group` while building the frame
/// - `render(gpu)` once: sorts, sweeps from the root queue, then empties every queue
///
/// Commands are held by shared handle and dropped at the end of `render`.
#[derive(Debug)]
pub struct Renderer {
    queues: QueueTable,
    batcher: TriangleBatcher,
    phase: FramePhase,

    depth_test_2d: bool,
    clear_color: Color,
    queue_reserve: usize,

    /// Queues on the current sweep path, innermost last.
    sweep_path: Vec<QueueId>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self::with_config(RendererConfig::default())
    }

    /// # Panics
    /// Panics if `vertex_capacity` exceeds what 16-bit indices can address.
    pub fn with_config(config: RendererConfig) -> Self {
        assert!(
            config.vertex_capacity <= DEFAULT_VERTEX_CAPACITY,
            "vertex_capacity {} exceeds the 16-bit index range",
            config.vertex_capacity
        );

        let mut queues = QueueTable::new();
        if config.queue_reserve > 0 {
            for q in queues.iter_mut() {
                q.reserve(config.queue_reserve);
            }
        }

        log::debug!(
            "renderer created (vertices={}, indices={}, batches={})",
            config.vertex_capacity,
            config.index_capacity,
            config.batch_capacity
        );

        Self {
            batcher: TriangleBatcher::new(&config),
            queues,
            phase: FramePhase::Idle,
            depth_test_2d: config.depth_test_2d,
            clear_color: config.clear_color,
            queue_reserve: config.queue_reserve,
            sweep_path: Vec::new(),
        }
    }

    #[inline]
    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    /// Counters of the most recent `render`.
    #[inline]
    pub fn stats(&self) -> FrameStats {
        self.batcher.stats()
    }

    #[inline]
    pub fn queue(&self, id: QueueId) -> Option<&RenderQueue> {
        self.queues.get(id)
    }

    #[inline]
    pub fn queue_count(&self) -> usize {
        self.queues.len()
    }

    /// Queue that `add_command` currently routes to.
    #[inline]
    pub fn current_queue(&self) -> QueueId {
        self.queues.current()
    }

    // ── queues and groups ─────────────────────────────────────────────────

    /// Creates an empty queue. Ids are never reused for the renderer's lifetime.
    pub fn create_queue(&mut self) -> QueueId {
        let id = self.queues.create_queue();
        if self.queue_reserve > 0 {
            if let Some(q) = self.queues.get_mut(id) {
                q.reserve(self.queue_reserve);
            }
        }
        log::trace!("render queue {} created", id.index());
        id
    }

    /// Routes subsequent `add_command` calls to `id`.
    ///
    /// # Panics
    /// Panics during `render` or if `id` is unknown.
    pub fn push_group(&mut self, id: QueueId) {
        self.assert_not_sweeping("push_group");
        self.queues.push_group(id);
    }

    /// # Panics
    /// Panics during `render` or without a matching `push_group`.
    pub fn pop_group(&mut self) {
        self.assert_not_sweeping("pop_group");
        self.queues.pop_group();
    }

    // ── submission ────────────────────────────────────────────────────────

    /// Submits a 2D command to the current group's queue.
    pub fn add_command(&mut self, cmd: impl Into<CommandRef>) {
        let id = self.queues.current();
        self.add_command_to(cmd, id);
    }

    /// Submits a 2D command to the queue `id`.
    ///
    /// # Panics
    /// Panics during `render`, if `id` is unknown, or if the command kind is `Unknown`.
    pub fn add_command_to(&mut self, cmd: impl Into<CommandRef>, id: QueueId) {
        let cmd = cmd.into();
        self.target_queue(&cmd, id, "add_command").push(cmd);
    }

    /// Submits a 3D command to the current group's opaque or transparent bucket.
    pub fn add_3d_command(&mut self, cmd: impl Into<CommandRef>, transparent: bool) {
        let cmd = cmd.into();
        let id = self.queues.current();
        let bucket = if transparent { Bucket::Transparent3D } else { Bucket::Opaque3D };
        self.target_queue(&cmd, id, "add_3d_command").push_to(bucket, cmd);
    }

    fn target_queue(&mut self, cmd: &CommandRef, id: QueueId, op: &str) -> &mut RenderQueue {
        self.assert_not_sweeping(op);
        assert!(cmd.kind() != CommandKind::Unknown, "{op}: invalid command kind");

        self.phase = FramePhase::Recording;
        match self.queues.get_mut(id) {
            Some(q) => q,
            None => panic!("{op}: unknown render queue {}", id.index()),
        }
    }

    fn assert_not_sweeping(&self, op: &str) {
        assert!(self.phase != FramePhase::Sweeping, "{op}: cannot add command while rendering");
    }

    // ── frame ─────────────────────────────────────────────────────────────

    /// Draws every submitted command, then empties all queues.
    ///
    /// Order: all queues are sorted, then the root queue is swept bucket by
    /// bucket; group commands recurse into their queue at the point they sit.
    pub fn render(&mut self, gpu: &mut dyn GpuBackend) {
        self.assert_not_sweeping("render");
        self.phase = FramePhase::Sweeping;
        self.batcher.reset_stats();

        for q in self.queues.iter_mut() {
            q.sort();
        }

        self.visit_queue(QueueId::ROOT, gpu);
        self.clean();

        let stats = self.batcher.stats();
        log::trace!(
            "frame rendered: {} batches, {} indices, {} flushes",
            stats.drawn_batches,
            stats.drawn_indices,
            stats.flushes
        );
    }

    /// Drops everything submitted since the last `render` without drawing it.
    pub fn reset_frame(&mut self) {
        self.assert_not_sweeping("reset_frame");
        self.clean();
    }

    /// Clears color and depth. Depth writes are enabled for the clear and left off after.
    pub fn clear(&self, gpu: &mut dyn GpuBackend) {
        let mut state = gpu.ambient_state();
        state.depth_write = true;
        gpu.set_ambient_state(state);

        gpu.clear(ClearRequest { color: Some(self.clear_color), depth: Some(1.0) });

        state.depth_write = false;
        gpu.set_ambient_state(state);
    }

    /// Enables depth testing (and depth writes) for the 2D buckets.
    #[inline]
    pub fn set_depth_test_mode(&mut self, enabled: bool) {
        self.depth_test_2d = enabled;
    }

    #[inline]
    pub fn depth_test_mode(&self) -> bool {
        self.depth_test_2d
    }

    #[inline]
    pub fn set_clear_color(&mut self, color: Color) {
        debug_assert!(color.is_finite(), "clear color must be finite");
        color.debug_assert_premul();
        self.clear_color = color;
    }

    #[inline]
    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    /// Destroys backend resources owned by the renderer.
    pub fn release(&mut self, gpu: &mut dyn GpuBackend) {
        self.batcher.release(gpu);
    }

    fn clean(&mut self) {
        self.queues.clear_all();
        self.batcher.reset();
        self.sweep_path.clear();
        self.phase = FramePhase::Idle;
    }

    // ── sweep ─────────────────────────────────────────────────────────────

    fn visit_queue(&mut self, id: QueueId, gpu: &mut dyn GpuBackend) {
        if self.sweep_path.contains(&id) {
            log::error!("render queue {} is already being drawn; group command skipped", id.index());
            return;
        }
        let Some(queue) = self.queues.get_mut(id) else {
            log::error!("group command targets unknown render queue {}", id.index());
            return;
        };

        queue.save_state(&*gpu);
        self.sweep_path.push(id);

        for bucket in Bucket::ALL {
            self.visit_bucket(id, bucket, gpu);
        }

        self.sweep_path.pop();
        if let Some(queue) = self.queues.get_mut(id) {
            queue.restore_state(gpu);
        }
    }

    fn visit_bucket(&mut self, id: QueueId, bucket: Bucket, gpu: &mut dyn GpuBackend) {
        let len = self.queues.get(id).map_or(0, |q| q.bucket(bucket).len());
        if len == 0 {
            return;
        }

        gpu.set_ambient_state(AmbientState::for_bucket(bucket, self.depth_test_2d));

        for i in 0..len {
            // Cloned so the queue is not borrowed while nested queues are visited.
            let Some(cmd) = self.queues.get(id).map(|q| Rc::clone(&q.bucket(bucket)[i])) else {
                break;
            };
            self.process_command(cmd, gpu);
        }

        self.batcher.flush(gpu);
    }

    fn process_command(&mut self, cmd: CommandRef, gpu: &mut dyn GpuBackend) {
        match cmd.payload() {
            CommandPayload::Triangles(_) => self.batcher.queue(Rc::clone(&cmd), gpu),
            CommandPayload::Group(group) => {
                self.batcher.flush(gpu);
                self.visit_queue(group.queue, gpu);
            }
            CommandPayload::Custom(custom) => {
                self.batcher.flush(gpu);
                custom.execute(gpu);
            }
            CommandPayload::Batch(batch) => {
                self.batcher.flush(gpu);
                batch.execute(cmd.material(), gpu);
            }
            CommandPayload::Primitive(primitive) => {
                self.batcher.flush(gpu);
                primitive.execute(cmd.material(), gpu);
            }
            CommandPayload::Unknown => {
                log::error!("unknown render command (order {}); skipped", cmd.global_order());
            }
        }
    }
}
