use super::RenderQueue;

/// Index of a render queue inside a [`QueueTable`].
///
/// Ids are handed out by [`QueueTable::create_queue`] and never reused.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct QueueId(usize);

impl QueueId {
    /// The default queue every renderer starts with.
    pub const ROOT: QueueId = QueueId(0);

    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Append-only set of render queues plus the group stack that routes new commands.
#[derive(Debug)]
pub struct QueueTable {
    queues: Vec<RenderQueue>,

    /// Routing targets. The top receives newly submitted commands; the root
    /// entry is never popped.
    groups: Vec<QueueId>,
}

impl Default for QueueTable {
    fn default() -> Self {
        Self::new()
    }
}

impl QueueTable {
    pub fn new() -> Self {
        Self { queues: vec![RenderQueue::new()], groups: vec![QueueId::ROOT] }
    }

    /// Appends an empty queue and returns its id.
    pub fn create_queue(&mut self) -> QueueId {
        self.queues.push(RenderQueue::new());
        QueueId(self.queues.len() - 1)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.queues.len()
    }

    /// Always false: the root queue exists from construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: QueueId) -> bool {
        id.0 < self.queues.len()
    }

    #[inline]
    pub fn get(&self, id: QueueId) -> Option<&RenderQueue> {
        self.queues.get(id.0)
    }

    #[inline]
    pub fn get_mut(&mut self, id: QueueId) -> Option<&mut RenderQueue> {
        self.queues.get_mut(id.0)
    }

    /// Queue that newly submitted commands are routed to.
    #[inline]
    pub fn current(&self) -> QueueId {
        self.groups.last().copied().unwrap_or(QueueId::ROOT)
    }

    /// Number of entries on the group stack, root included.
    #[inline]
    pub fn group_depth(&self) -> usize {
        self.groups.len()
    }

    /// Routes subsequent commands to `id` until the matching [`pop_group`](Self::pop_group).
    ///
    /// # Panics
    /// Panics if `id` does not name a queue of this table.
    pub fn push_group(&mut self, id: QueueId) {
        assert!(self.contains(id), "push_group: unknown render queue {}", id.0);
        self.groups.push(id);
    }

    /// # Panics
    /// Panics if only the root entry is left.
    pub fn pop_group(&mut self) {
        assert!(self.groups.len() > 1, "pop_group called without matching push_group");
        self.groups.pop();
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut RenderQueue> {
        self.queues.iter_mut()
    }

    /// Clears every queue. Ids and capacity survive.
    pub fn clear_all(&mut self) {
        for q in &mut self.queues {
            q.clear();
        }
    }
}
