use std::rc::Rc;

use bytemuck::Zeroable;
use glam::Mat4;

use crate::render::{
    BufferDesc, BufferUsage, DrawCall, FrameStats, GpuBackend, IndexFormat, RendererConfig,
    Topology, VertexBinding,
};
use crate::scene::{CommandRef, MaterialId, TrianglesCmd, Vertex};

/// One contiguous run of merged indices drawn with a single call.
#[derive(Debug, Clone)]
pub struct BatchDescriptor {
    /// First index of the run inside the index staging array.
    pub offset: u32,
    pub index_count: u32,
    /// Last command merged into the run; its material is bound for the draw.
    pub cmd: CommandRef,
}

impl BatchDescriptor {
    #[inline]
    pub fn material(&self) -> MaterialId {
        self.cmd.material()
    }
}

/// Growable descriptor storage with an explicit capacity.
///
/// Capacity grows by 1.4× (integer math, at least +1) when a push finds it full.
/// `clear()` keeps the grown capacity for the next frame.
#[derive(Debug)]
pub struct BatchBuffer {
    items: Vec<BatchDescriptor>,
    capacity: usize,
}

impl BatchBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { items: Vec::with_capacity(capacity), capacity }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn as_slice(&self) -> &[BatchDescriptor] {
        &self.items
    }

    #[inline]
    pub fn last_mut(&mut self) -> Option<&mut BatchDescriptor> {
        self.items.last_mut()
    }

    pub fn push(&mut self, batch: BatchDescriptor) {
        if self.items.len() == self.capacity {
            self.grow();
        }
        self.items.push(batch);
    }

    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn grow(&mut self) {
        let new_capacity = (self.capacity * 7 / 5).max(self.capacity + 1);
        self.items.reserve_exact(new_capacity - self.items.len());
        log::debug!("batch descriptors grown: {} -> {}", self.capacity, new_capacity);
        self.capacity = new_capacity;
    }
}

/// How staged geometry reaches the backend buffers.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum UploadStrategy {
    /// Full-capacity buffers allocated once; each flush overwrites the filled prefix.
    Persistent,
    /// Storage reallocated to the exact filled size on every flush.
    Orphan,
}

#[derive(Debug, Copy, Clone)]
struct DeviceBuffers {
    binding: VertexBinding,
    strategy: UploadStrategy,
}

/// Fixed-capacity CPU staging arrays.
#[derive(Debug)]
struct Staging {
    vertices: Box<[Vertex]>,
    indices: Box<[u16]>,
    filled_vertices: usize,
    filled_indices: usize,
}

impl Staging {
    fn new(vertex_capacity: usize, index_capacity: usize) -> Self {
        Self {
            vertices: vec![Vertex::zeroed(); vertex_capacity].into_boxed_slice(),
            indices: vec![0u16; index_capacity].into_boxed_slice(),
            filled_vertices: 0,
            filled_indices: 0,
        }
    }

    /// Appends `tris` in world space, rebasing its indices onto the running vertex count.
    fn fill(&mut self, tris: &TrianglesCmd) {
        let v0 = self.filled_vertices;
        let i0 = self.filled_indices;
        let vertex_count = tris.vertices.len();
        let index_count = tris.indices.len();

        let dst = &mut self.vertices[v0..v0 + vertex_count];
        if tris.transform == Mat4::IDENTITY {
            dst.copy_from_slice(&tris.vertices);
        } else {
            for (d, s) in dst.iter_mut().zip(&tris.vertices) {
                *d = s.transformed(&tris.transform);
            }
        }

        let base = v0 as u32;
        for (d, &s) in self.indices[i0..i0 + index_count].iter_mut().zip(&tris.indices) {
            debug_assert!(
                usize::from(s) < vertex_count,
                "triangle index {s} out of range for {vertex_count} vertices"
            );
            *d = (base + u32::from(s)) as u16;
        }

        self.filled_vertices += vertex_count;
        self.filled_indices += index_count;
    }

    #[inline]
    fn reset(&mut self) {
        self.filled_vertices = 0;
        self.filled_indices = 0;
    }
}

/// Merges adjacent same-material triangle commands into as few draw calls as possible.
///
/// Commands are queued as the sweep reaches them and drawn on `flush`, which the
/// renderer calls at every barrier (non-triangle command, bucket end) and
/// whenever the next command would overflow staging.
#[derive(Debug)]
pub struct TriangleBatcher {
    vertex_capacity: usize,
    index_capacity: usize,
    staging: Staging,

    queued: Vec<CommandRef>,
    queued_vertices: usize,
    queued_indices: usize,

    batches: BatchBuffer,
    buffers: Option<DeviceBuffers>,
    stats: FrameStats,
}

impl TriangleBatcher {
    pub fn new(config: &RendererConfig) -> Self {
        Self {
            vertex_capacity: config.vertex_capacity,
            index_capacity: config.index_capacity,
            staging: Staging::new(config.vertex_capacity, config.index_capacity),
            queued: Vec::new(),
            queued_vertices: 0,
            queued_indices: 0,
            batches: BatchBuffer::with_capacity(config.batch_capacity),
            buffers: None,
            stats: FrameStats::default(),
        }
    }

    #[inline]
    pub fn has_pending(&self) -> bool {
        !self.queued.is_empty()
    }

    #[inline]
    pub fn pending_len(&self) -> usize {
        self.queued.len()
    }

    #[inline]
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    #[inline]
    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    #[inline]
    pub fn batch_capacity(&self) -> usize {
        self.batches.capacity()
    }

    /// Queues a triangle command, flushing first if it would overflow staging.
    ///
    /// # Panics
    /// Panics if the command alone exceeds the vertex or index capacity.
    pub fn queue(&mut self, cmd: CommandRef, gpu: &mut dyn GpuBackend) {
        let Some(tris) = cmd.as_triangles() else {
            log::error!("non-triangle command ({:?}) queued for batching; skipped", cmd.kind());
            return;
        };
        let vertex_count = tris.vertex_count();
        let index_count = tris.index_count();

        assert!(
            vertex_count <= self.vertex_capacity,
            "triangle command has {vertex_count} vertices but staging holds {}; split it or use a custom command",
            self.vertex_capacity
        );
        assert!(
            index_count <= self.index_capacity,
            "triangle command has {index_count} indices but staging holds {}; split it or use a custom command",
            self.index_capacity
        );

        if self.queued_vertices + vertex_count > self.vertex_capacity
            || self.queued_indices + index_count > self.index_capacity
        {
            self.flush(gpu);
        }

        self.queued.push(cmd);
        self.queued_vertices += vertex_count;
        self.queued_indices += index_count;
    }

    /// Draws everything queued since the last flush. No-op when nothing is queued.
    pub fn flush(&mut self, gpu: &mut dyn GpuBackend) {
        if self.queued.is_empty() {
            return;
        }

        self.build_batches();
        if self.staging.filled_indices > 0 {
            self.submit(gpu);
        }
        self.reset();
    }

    /// Drops queued commands without drawing them. Keeps all capacity.
    pub fn reset(&mut self) {
        self.queued.clear();
        self.queued_vertices = 0;
        self.queued_indices = 0;
        self.staging.reset();
        self.batches.clear();
    }

    /// Destroys the backend buffers. They are recreated on the next flush.
    pub fn release(&mut self, gpu: &mut dyn GpuBackend) {
        if let Some(buffers) = self.buffers.take() {
            gpu.destroy_buffer(buffers.binding.vertex);
            gpu.destroy_buffer(buffers.binding.index);
        }
    }

    /// Fills staging from the queued commands and splits them into descriptors.
    fn build_batches(&mut self) {
        self.staging.reset();
        self.batches.clear();

        // `None` after a skip-batching command, so nothing merges into it.
        let mut prev_material: Option<MaterialId> = None;

        for cmd in &self.queued {
            let Some(tris) = cmd.as_triangles() else { continue };

            let offset = self.staging.filled_indices as u32;
            self.staging.fill(tris);

            let index_count = tris.indices.len() as u32;
            let material = cmd.material();
            let batchable = !cmd.is_skip_batching();

            let extend = batchable && prev_material == Some(material);
            if let Some(batch) = self.batches.last_mut().filter(|_| extend) {
                debug_assert_eq!(batch.material(), material);
                batch.index_count += index_count;
                batch.cmd = Rc::clone(cmd);
            } else {
                self.batches.push(BatchDescriptor { offset, index_count, cmd: Rc::clone(cmd) });
            }

            prev_material = batchable.then_some(material);
        }
    }

    fn submit(&mut self, gpu: &mut dyn GpuBackend) {
        let buffers = self.ensure_buffers(gpu);
        let binding = buffers.binding;

        let vertices = &self.staging.vertices[..self.staging.filled_vertices];
        let indices = &self.staging.indices[..self.staging.filled_indices];
        upload(gpu, buffers.strategy, binding.vertex, bytemuck::cast_slice(vertices));
        upload(gpu, buffers.strategy, binding.index, bytemuck::cast_slice(indices));

        gpu.bind_vertex_layout(Some(binding));
        // Staged vertices are already in world space.
        gpu.set_model_transform(Mat4::IDENTITY);

        for batch in self.batches.as_slice() {
            gpu.bind_material(batch.material());
            gpu.draw(DrawCall {
                topology: Topology::TriangleList,
                index_count: batch.index_count,
                index_format: IndexFormat::Uint16,
                base_offset: batch.offset,
            });
            self.stats.drawn_batches += 1;
            self.stats.drawn_indices += batch.index_count;
        }

        gpu.bind_vertex_layout(None);
        self.stats.drawn_vertices += self.staging.filled_vertices as u32;
        self.stats.flushes += 1;

        log::trace!(
            "flushed {} triangle commands as {} batches ({} vertices, {} indices)",
            self.queued.len(),
            self.batches.len(),
            self.staging.filled_vertices,
            self.staging.filled_indices
        );
    }

    fn ensure_buffers(&mut self, gpu: &mut dyn GpuBackend) -> DeviceBuffers {
        if let Some(buffers) = self.buffers {
            return buffers;
        }

        let caps = gpu.capabilities();
        let strategy = if caps.shareable_vertex_layout && caps.map_buffer {
            UploadStrategy::Persistent
        } else {
            UploadStrategy::Orphan
        };

        // Orphaning buffers start empty: allocating full capacity up front makes
        // some drivers copy the whole allocation on every later upload.
        let (vertex_size, index_size) = match strategy {
            UploadStrategy::Persistent => (
                (self.vertex_capacity * std::mem::size_of::<Vertex>()) as u64,
                (self.index_capacity * std::mem::size_of::<u16>()) as u64,
            ),
            UploadStrategy::Orphan => (0, 0),
        };

        let vertex = gpu.create_buffer(&BufferDesc {
            label: "stratum batch vertices",
            usage: BufferUsage::Vertex,
            size: vertex_size,
        });
        let index = gpu.create_buffer(&BufferDesc {
            label: "stratum batch indices",
            usage: BufferUsage::Index,
            size: index_size,
        });
        log::debug!("batch buffers created ({strategy:?}, {vertex_size} + {index_size} bytes)");

        let buffers = DeviceBuffers { binding: VertexBinding { vertex, index }, strategy };
        self.buffers = Some(buffers);
        buffers
    }
}

fn upload(
    gpu: &mut dyn GpuBackend,
    strategy: UploadStrategy,
    id: crate::render::BufferId,
    bytes: &[u8],
) {
    if strategy == UploadStrategy::Orphan {
        gpu.resize_buffer(id, bytes.len() as u64);
    }
    gpu.update_buffer(id, 0, bytes);
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::render::testing::{Op, RecordingBackend};
    use crate::render::Capabilities;
    use crate::scene::RenderCommand;

    fn config() -> RendererConfig {
        RendererConfig::default()
    }

    /// Triangle command with `vertices` vertices and `indices` indices (all 0).
    fn tris(vertices: usize, indices: usize, material: u32) -> CommandRef {
        let cmd = TrianglesCmd::new(
            vec![Vertex::default(); vertices],
            vec![0; indices],
            Mat4::IDENTITY,
        );
        Rc::new(RenderCommand::triangles(0.0, MaterialId(material), cmd))
    }

    fn quad(material: u32) -> CommandRef {
        let cmd = TrianglesCmd::quad([0.0, 0.0], [1.0, 1.0], [255; 4], Mat4::IDENTITY);
        Rc::new(RenderCommand::triangles(0.0, MaterialId(material), cmd))
    }

    fn summary(b: &TriangleBatcher) -> Vec<(u32, u32, u32)> {
        b.batches.as_slice().iter().map(|d| (d.offset, d.index_count, d.material().0)).collect()
    }

    fn queue_all(b: &mut TriangleBatcher, gpu: &mut RecordingBackend, cmds: &[CommandRef]) {
        for c in cmds {
            b.queue(Rc::clone(c), gpu);
        }
    }

    // ── batch boundaries ──────────────────────────────────────────────────

    #[test]
    fn materials_1_1_2_make_two_batches() {
        let mut gpu = RecordingBackend::new();
        let mut b = TriangleBatcher::new(&config());
        queue_all(&mut b, &mut gpu, &[tris(4, 6, 1), tris(4, 6, 1), tris(4, 6, 2)]);

        b.build_batches();

        assert_eq!(summary(&b), vec![(0, 12, 1), (12, 6, 2)]);
        assert_eq!(b.staging.filled_indices, 18);
        assert_eq!(b.staging.filled_vertices, 12);
    }

    #[test]
    fn same_material_run_is_one_batch() {
        let mut gpu = RecordingBackend::new();
        let mut b = TriangleBatcher::new(&config());
        let run: Vec<CommandRef> = (0..10).map(|_| quad(3)).collect();
        queue_all(&mut b, &mut gpu, &run);

        b.build_batches();
        assert_eq!(summary(&b), vec![(0, 60, 3)]);

        // Representative is the last merged command.
        assert!(Rc::ptr_eq(&b.batches.as_slice()[0].cmd, &run[9]));
    }

    #[test]
    fn alternating_materials_split() {
        let mut gpu = RecordingBackend::new();
        let mut b = TriangleBatcher::new(&config());
        queue_all(&mut b, &mut gpu, &[quad(1), quad(2), quad(1)]);

        b.build_batches();
        assert_eq!(summary(&b), vec![(0, 6, 1), (6, 6, 2), (12, 6, 1)]);
    }

    #[test]
    fn skip_batching_never_merges_either_side() {
        let mut gpu = RecordingBackend::new();
        let mut b = TriangleBatcher::new(&config());
        let skip = Rc::new(
            RenderCommand::triangles(
                0.0,
                MaterialId(1),
                TrianglesCmd::quad([0.0, 0.0], [1.0, 1.0], [255; 4], Mat4::IDENTITY),
            )
            .with_skip_batching(true),
        );
        queue_all(&mut b, &mut gpu, &[quad(1), skip, quad(1)]);

        b.build_batches();
        assert_eq!(summary(&b), vec![(0, 6, 1), (6, 6, 1), (12, 6, 1)]);
    }

    #[test]
    fn leading_skip_batching_command_stands_alone() {
        let mut gpu = RecordingBackend::new();
        let mut b = TriangleBatcher::new(&config());
        let skip = Rc::new(
            RenderCommand::triangles(
                0.0,
                MaterialId(4),
                TrianglesCmd::new(vec![Vertex::default(); 3], vec![0, 1, 2], Mat4::IDENTITY),
            )
            .with_skip_batching(true),
        );
        queue_all(&mut b, &mut gpu, &[skip, quad(4), quad(4)]);

        b.build_batches();
        assert_eq!(summary(&b), vec![(0, 3, 4), (3, 12, 4)]);
    }

    // ── staging contents ──────────────────────────────────────────────────

    #[test]
    fn indices_are_rebased_onto_running_vertex_count() {
        let mut gpu = RecordingBackend::new();
        let mut b = TriangleBatcher::new(&config());
        queue_all(&mut b, &mut gpu, &[quad(1), quad(1)]);

        b.build_batches();
        assert_eq!(&b.staging.indices[..12], &[0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7]);
    }

    #[test]
    fn vertices_are_moved_to_world_space() {
        let mut gpu = RecordingBackend::new();
        let mut b = TriangleBatcher::new(&config());
        let t = Mat4::from_translation(Vec3::new(10.0, 20.0, 0.0));
        let cmd = Rc::new(RenderCommand::triangles(
            0.0,
            MaterialId(1),
            TrianglesCmd::quad([0.0, 0.0], [2.0, 2.0], [255; 4], t),
        ));
        b.queue(cmd, &mut gpu);

        b.build_batches();
        assert_eq!(b.staging.vertices[0].position, [10.0, 20.0, 0.0]);
        assert_eq!(b.staging.vertices[2].position, [12.0, 22.0, 0.0]);
    }

    // ── descriptor growth ─────────────────────────────────────────────────

    #[test]
    fn batch_buffer_grows_by_1_4() {
        let cmd = quad(1);
        let mut buf = BatchBuffer::with_capacity(500);
        for i in 0..501 {
            buf.push(BatchDescriptor { offset: i, index_count: 6, cmd: Rc::clone(&cmd) });
        }
        assert_eq!(buf.capacity(), 700);
        assert_eq!(buf.len(), 501);

        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), 700);
    }

    #[test]
    fn tiny_batch_buffer_still_grows() {
        let cmd = quad(1);
        let mut buf = BatchBuffer::with_capacity(1);
        for i in 0..3 {
            buf.push(BatchDescriptor { offset: i, index_count: 6, cmd: Rc::clone(&cmd) });
        }
        assert_eq!(buf.len(), 3);
        assert!(buf.capacity() >= 3);
    }

    #[test]
    fn many_material_changes_grow_descriptors() {
        let mut gpu = RecordingBackend::new();
        let mut b = TriangleBatcher::new(&RendererConfig { batch_capacity: 4, ..config() });
        let cmds: Vec<CommandRef> = (0..10).map(|i| quad(i % 2)).collect();
        queue_all(&mut b, &mut gpu, &cmds);

        b.flush(&mut gpu);
        assert_eq!(gpu.draws().len(), 10);
        assert!(b.batch_capacity() >= 10);
    }

    // ── flush / submit ────────────────────────────────────────────────────

    #[test]
    fn flush_issues_one_draw_per_batch_in_order() {
        let mut gpu = RecordingBackend::new();
        let mut b = TriangleBatcher::new(&config());
        queue_all(&mut b, &mut gpu, &[tris(4, 6, 1), tris(4, 6, 1), tris(4, 6, 2)]);

        b.flush(&mut gpu);

        let draws = gpu.draws();
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].material, Some(MaterialId(1)));
        assert_eq!(draws[0].call.base_offset, 0);
        assert_eq!(draws[0].call.index_count, 12);
        assert_eq!(draws[1].material, Some(MaterialId(2)));
        assert_eq!(draws[1].call.base_offset, 12);
        assert_eq!(draws[1].call.index_count, 6);
        assert!(draws.iter().all(|d| d.transform == Mat4::IDENTITY));

        assert_eq!(b.stats(), FrameStats { drawn_batches: 2, drawn_indices: 18, drawn_vertices: 12, flushes: 1 });
        assert!(!b.has_pending());
        assert!(b.batches.is_empty());
        assert_eq!(b.staging.filled_indices, 0);
    }

    #[test]
    fn flush_binds_layout_and_unbinds_after() {
        let mut gpu = RecordingBackend::new();
        let mut b = TriangleBatcher::new(&config());
        b.queue(quad(1), &mut gpu);
        b.flush(&mut gpu);

        let binds: Vec<&Op> =
            gpu.ops.iter().filter(|op| matches!(op, Op::BindLayout(_))).collect();
        assert_eq!(binds.len(), 2);
        assert!(matches!(binds[0], Op::BindLayout(Some(_))));
        assert!(matches!(binds[1], Op::BindLayout(None)));
        assert_eq!(gpu.draws()[0].binding, binds_binding(binds[0]));
    }

    fn binds_binding(op: &Op) -> Option<VertexBinding> {
        match op {
            Op::BindLayout(b) => *b,
            _ => None,
        }
    }

    #[test]
    fn flush_without_pending_is_noop() {
        let mut gpu = RecordingBackend::new();
        let mut b = TriangleBatcher::new(&config());
        b.flush(&mut gpu);
        assert!(gpu.ops.is_empty());
    }

    #[test]
    fn uploaded_indices_match_staging() {
        let mut gpu = RecordingBackend::new();
        let mut b = TriangleBatcher::new(&config());
        queue_all(&mut b, &mut gpu, &[quad(1), quad(2)]);
        b.flush(&mut gpu);

        let binding = gpu.draws()[0].binding.unwrap();
        assert_eq!(gpu.index_data(binding.index), vec![0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7]);
        assert_eq!(gpu.buffer_data(binding.vertex).len(), 8 * std::mem::size_of::<Vertex>());
    }

    // ── staging capacity ──────────────────────────────────────────────────

    #[test]
    fn overflow_flushes_before_queueing() {
        let mut gpu = RecordingBackend::new();
        let cfg = RendererConfig { vertex_capacity: 8, index_capacity: 12, ..config() };
        let mut b = TriangleBatcher::new(&cfg);

        queue_all(&mut b, &mut gpu, &[quad(1), quad(1)]);
        assert!(gpu.draws().is_empty());

        // Third quad does not fit: the first two are drawn as one batch.
        b.queue(quad(1), &mut gpu);
        assert_eq!(gpu.draws().len(), 1);
        assert_eq!(gpu.draws()[0].call.index_count, 12);
        assert_eq!(b.pending_len(), 1);

        b.flush(&mut gpu);
        assert_eq!(gpu.draws().len(), 2);
        assert_eq!(gpu.draws()[1].call.base_offset, 0);
        assert_eq!(b.stats().flushes, 2);
    }

    #[test]
    fn command_filling_capacity_exactly_is_accepted() {
        let mut gpu = RecordingBackend::new();
        let cfg = RendererConfig { vertex_capacity: 4, index_capacity: 6, ..config() };
        let mut b = TriangleBatcher::new(&cfg);
        b.queue(quad(1), &mut gpu);
        b.flush(&mut gpu);
        assert_eq!(gpu.draws().len(), 1);
    }

    #[test]
    #[should_panic(expected = "split it")]
    fn oversized_command_panics() {
        let mut gpu = RecordingBackend::new();
        let cfg = RendererConfig { vertex_capacity: 4, index_capacity: 6, ..config() };
        let mut b = TriangleBatcher::new(&cfg);
        b.queue(tris(5, 6, 1), &mut gpu);
    }

    // ── upload strategy ───────────────────────────────────────────────────

    #[test]
    fn persistent_strategy_allocates_once_and_never_resizes() {
        let caps = Capabilities { shareable_vertex_layout: true, map_buffer: true };
        let mut gpu = RecordingBackend::with_capabilities(caps);
        let cfg = RendererConfig { vertex_capacity: 16, index_capacity: 24, ..config() };
        let mut b = TriangleBatcher::new(&cfg);

        for _ in 0..2 {
            b.queue(quad(1), &mut gpu);
            b.flush(&mut gpu);
        }

        let creates: Vec<u64> = gpu
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::CreateBuffer { size, .. } => Some(*size),
                _ => None,
            })
            .collect();
        assert_eq!(creates, vec![16 * 24, 24 * 2]);
        assert!(!gpu.ops.iter().any(|op| matches!(op, Op::ResizeBuffer { .. })));
    }

    #[test]
    fn orphan_strategy_resizes_to_filled_size_each_flush() {
        let mut gpu = RecordingBackend::new();
        let mut b = TriangleBatcher::new(&config());

        b.queue(quad(1), &mut gpu);
        b.flush(&mut gpu);
        queue_all(&mut b, &mut gpu, &[quad(1), quad(2)]);
        b.flush(&mut gpu);

        let resizes: Vec<u64> = gpu
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::ResizeBuffer { size, .. } => Some(*size),
                _ => None,
            })
            .collect();
        assert_eq!(resizes, vec![4 * 24, 6 * 2, 8 * 24, 12 * 2]);
    }

    #[test]
    fn release_destroys_buffers() {
        let mut gpu = RecordingBackend::new();
        let mut b = TriangleBatcher::new(&config());
        b.queue(quad(1), &mut gpu);
        b.flush(&mut gpu);
        b.release(&mut gpu);

        let destroyed = gpu.ops.iter().filter(|op| matches!(op, Op::DestroyBuffer(_))).count();
        assert_eq!(destroyed, 2);
    }

    #[test]
    fn reset_drops_pending_without_drawing() {
        let mut gpu = RecordingBackend::new();
        let mut b = TriangleBatcher::new(&config());
        let cmd = quad(1);
        b.queue(Rc::clone(&cmd), &mut gpu);
        assert_eq!(Rc::strong_count(&cmd), 2);

        b.reset();
        b.flush(&mut gpu);
        assert!(gpu.draws().is_empty());
        assert_eq!(Rc::strong_count(&cmd), 1);
    }
}
