use core::ops::Index;

use crate::render::{AmbientSnapshot, GpuBackend};

use super::{Bucket, CommandRef};

/// Commands of one render queue, partitioned into five ordering buckets.
///
/// Performance characteristics:
/// - `push()` is O(1)
/// - `clear()` keeps bucket capacity, so a warmed queue does not allocate
#[derive(Debug, Default)]
pub struct RenderQueue {
    buckets: [Vec<CommandRef>; Bucket::COUNT],

    /// Ambient state captured by `save_state`, consumed by `restore_state`.
    saved: Option<AmbientSnapshot>,
}

impl RenderQueue {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a command to the 2D bucket picked by the sign of its global order.
    #[inline]
    pub fn push(&mut self, cmd: CommandRef) {
        let bucket = Bucket::classify(cmd.global_order());
        self.buckets[bucket.index()].push(cmd);
    }

    /// Appends a command to `bucket` directly, bypassing classification.
    #[inline]
    pub fn push_to(&mut self, bucket: Bucket, cmd: CommandRef) {
        self.buckets[bucket.index()].push(cmd);
    }

    /// Total number of commands across all buckets.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }

    #[inline]
    pub fn bucket(&self, bucket: Bucket) -> &[CommandRef] {
        &self.buckets[bucket.index()]
    }

    /// Orders `NegativeZ` and `PositiveZ` by ascending global order.
    ///
    /// The sort is stable: equal keys keep submission order. `ZeroZ` and both 3D
    /// buckets are left untouched; 2D content at z == 0 relies on paint order.
    pub fn sort(&mut self) {
        for bucket in Bucket::ALL {
            if bucket.is_sorted_by_order() {
                self.buckets[bucket.index()]
                    .sort_by(|a, b| a.global_order().total_cmp(&b.global_order()));
            }
        }
    }

    /// Returns the command at `index` counting across buckets in visitation order.
    pub fn get(&self, mut index: usize) -> Option<&CommandRef> {
        for cmds in &self.buckets {
            if index < cmds.len() {
                return Some(&cmds[index]);
            }
            index -= cmds.len();
        }
        None
    }

    /// Drops all commands. Keeps allocated capacity for reuse.
    pub fn clear(&mut self) {
        for cmds in &mut self.buckets {
            cmds.clear();
        }
    }

    /// Ensures every bucket can hold `additional` more commands without reallocating.
    pub fn reserve(&mut self, additional: usize) {
        for cmds in &mut self.buckets {
            cmds.reserve(additional);
        }
    }

    /// Captures the ambient state before this queue is swept.
    pub fn save_state(&mut self, gpu: &dyn GpuBackend) {
        debug_assert!(self.saved.is_none(), "save_state called twice without restore_state");
        self.saved = Some(AmbientSnapshot::capture(gpu.ambient_state()));
    }

    /// Reinstates the state captured by [`save_state`](Self::save_state).
    ///
    /// # Panics
    /// Panics (debug only) if called without a matching `save_state`.
    pub fn restore_state(&mut self, gpu: &mut dyn GpuBackend) {
        let saved = self.saved.take();
        debug_assert!(saved.is_some(), "restore_state called without matching save_state");
        if let Some(snapshot) = saved {
            gpu.set_ambient_state(snapshot.state());
        }
    }
}

impl Index<usize> for RenderQueue {
    type Output = CommandRef;

    /// # Panics
    /// Panics if `index >= self.len()`.
    fn index(&self, index: usize) -> &CommandRef {
        match self.get(index) {
            Some(cmd) => cmd,
            None => panic!("invalid render queue index {index} (len {})", self.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::render::testing::RecordingBackend;
    use crate::render::AmbientState;
    use crate::scene::{QueueId, RenderCommand};

    fn cmd(z: f32) -> CommandRef {
        Rc::new(RenderCommand::group(z, QueueId::ROOT))
    }

    fn orders(q: &RenderQueue, b: Bucket) -> Vec<f32> {
        q.bucket(b).iter().map(|c| c.global_order()).collect()
    }

    // ── push / classification ─────────────────────────────────────────────

    #[test]
    fn push_classifies_by_sign() {
        let mut q = RenderQueue::new();
        q.push(cmd(-1.0));
        q.push(cmd(0.0));
        q.push(cmd(2.0));
        q.push(cmd(-3.0));

        assert_eq!(orders(&q, Bucket::NegativeZ), vec![-1.0, -3.0]);
        assert_eq!(orders(&q, Bucket::ZeroZ), vec![0.0]);
        assert_eq!(orders(&q, Bucket::PositiveZ), vec![2.0]);
        assert!(q.bucket(Bucket::Opaque3D).is_empty());
        assert!(q.bucket(Bucket::Transparent3D).is_empty());
        assert_eq!(q.len(), 4);
    }

    #[test]
    fn push_to_bypasses_classification() {
        let mut q = RenderQueue::new();
        q.push_to(Bucket::Opaque3D, cmd(5.0));
        q.push_to(Bucket::Transparent3D, cmd(-5.0));
        assert_eq!(orders(&q, Bucket::Opaque3D), vec![5.0]);
        assert_eq!(orders(&q, Bucket::Transparent3D), vec![-5.0]);
        assert!(q.bucket(Bucket::PositiveZ).is_empty());
    }

    // ── sort ──────────────────────────────────────────────────────────────

    #[test]
    fn sort_orders_signed_buckets_ascending() {
        let mut q = RenderQueue::new();
        for z in [3.0, -1.0, 1.0, -7.0, 2.0, -4.0, 0.0] {
            q.push(cmd(z));
        }
        q.sort();

        assert_eq!(orders(&q, Bucket::NegativeZ), vec![-7.0, -4.0, -1.0]);
        assert_eq!(orders(&q, Bucket::PositiveZ), vec![1.0, 2.0, 3.0]);

        // Flattened order: all negatives, then zero, then positives.
        let flat: Vec<f32> = (0..q.len()).map(|i| q[i].global_order()).collect();
        assert_eq!(flat, vec![-7.0, -4.0, -1.0, 0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let mut q = RenderQueue::new();
        let a = cmd(1.0);
        let b = cmd(1.0);
        let c = cmd(0.5);
        q.push(Rc::clone(&a));
        q.push(Rc::clone(&b));
        q.push(Rc::clone(&c));
        q.sort();

        let pos = q.bucket(Bucket::PositiveZ);
        assert!(Rc::ptr_eq(&pos[0], &c));
        assert!(Rc::ptr_eq(&pos[1], &a));
        assert!(Rc::ptr_eq(&pos[2], &b));
    }

    #[test]
    fn sort_keeps_zero_and_3d_submission_order() {
        let mut q = RenderQueue::new();
        let zeros: Vec<CommandRef> = (0..4).map(|_| cmd(0.0)).collect();
        for c in &zeros {
            q.push(Rc::clone(c));
        }
        let opaque = [cmd(9.0), cmd(-9.0), cmd(1.0)];
        for c in &opaque {
            q.push_to(Bucket::Opaque3D, Rc::clone(c));
        }
        let trans = [cmd(4.0), cmd(2.0)];
        for c in &trans {
            q.push_to(Bucket::Transparent3D, Rc::clone(c));
        }

        q.sort();

        for (got, want) in q.bucket(Bucket::ZeroZ).iter().zip(&zeros) {
            assert!(Rc::ptr_eq(got, want));
        }
        assert_eq!(orders(&q, Bucket::Opaque3D), vec![9.0, -9.0, 1.0]);
        assert_eq!(orders(&q, Bucket::Transparent3D), vec![4.0, 2.0]);
    }

    // ── indexed access ────────────────────────────────────────────────────

    #[test]
    fn get_walks_buckets_in_visitation_order() {
        let mut q = RenderQueue::new();
        q.push(cmd(1.0));
        q.push_to(Bucket::Transparent3D, cmd(30.0));
        q.push(cmd(0.0));
        q.push_to(Bucket::Opaque3D, cmd(20.0));
        q.push(cmd(-1.0));

        let flat: Vec<f32> = (0..q.len()).map(|i| q[i].global_order()).collect();
        assert_eq!(flat, vec![-1.0, 20.0, 30.0, 0.0, 1.0]);
        assert!(q.get(5).is_none());
    }

    #[test]
    #[should_panic(expected = "invalid render queue index")]
    fn index_out_of_range_panics() {
        let mut q = RenderQueue::new();
        q.push(cmd(0.0));
        let _ = &q[1];
    }

    // ── clear / reserve ───────────────────────────────────────────────────

    #[test]
    fn clear_keeps_capacity() {
        let mut q = RenderQueue::new();
        q.reserve(16);
        for _ in 0..10 {
            q.push(cmd(-1.0));
        }
        let cap = q.buckets[Bucket::NegativeZ.index()].capacity();
        q.clear();
        assert!(q.is_empty());
        assert_eq!(q.len(), 0);
        assert_eq!(q.buckets[Bucket::NegativeZ.index()].capacity(), cap);
        assert!(q.buckets[Bucket::Opaque3D.index()].capacity() >= 16);
    }

    #[test]
    fn clear_releases_command_handles() {
        let mut q = RenderQueue::new();
        let c = Rc::new(RenderCommand::group(0.0, QueueId::ROOT));
        q.push(Rc::clone(&c));
        assert_eq!(Rc::strong_count(&c), 2);
        q.clear();
        assert_eq!(Rc::strong_count(&c), 1);
    }

    // ── save / restore ────────────────────────────────────────────────────

    #[test]
    fn restore_reinstates_saved_state() {
        let mut gpu = RecordingBackend::new();
        let before = AmbientState { depth_test: true, depth_write: false, blend: false, cull: true };
        gpu.set_ambient_state(before);

        let mut q = RenderQueue::new();
        q.save_state(&gpu);
        gpu.set_ambient_state(AmbientState { depth_test: false, depth_write: true, blend: true, cull: false });
        q.restore_state(&mut gpu);

        assert_eq!(gpu.ambient_state(), before);
    }
}
