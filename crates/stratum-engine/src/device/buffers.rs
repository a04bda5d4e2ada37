use crate::render::{BufferDesc, BufferId, BufferUsage};

/// Buffer handles issued to the renderer, mapped onto `wgpu::Buffer`s.
///
/// Invariants:
/// - ids are never reused, even after `destroy`
/// - every allocation is padded to `wgpu::COPY_BUFFER_ALIGNMENT`
/// - `resize` always allocates new storage; draws recorded against the old
///   buffer keep their own handle and still see the old contents
#[derive(Debug, Default)]
pub struct BufferPool {
    slots: Vec<Option<PooledBuffer>>,
}

#[derive(Debug)]
struct PooledBuffer {
    label: &'static str,
    usage: wgpu::BufferUsages,
    /// Allocated size in bytes (padded). Zero while no storage exists.
    size: u64,
    buffer: Option<wgpu::Buffer>,
}

impl BufferPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live buffers.
    pub fn live(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn create(&mut self, device: &wgpu::Device, desc: &BufferDesc) -> BufferId {
        let usage = match desc.usage {
            BufferUsage::Vertex => wgpu::BufferUsages::VERTEX,
            BufferUsage::Index => wgpu::BufferUsages::INDEX,
        } | wgpu::BufferUsages::COPY_DST;

        let mut pooled = PooledBuffer { label: desc.label, usage, size: 0, buffer: None };
        if desc.size > 0 {
            pooled.allocate(device, desc.size);
        }

        let id = BufferId(self.slots.len() as u32);
        self.slots.push(Some(pooled));
        id
    }

    pub fn resize(&mut self, device: &wgpu::Device, id: BufferId, size: u64) {
        let Some(pooled) = self.slot_mut(id) else {
            log::error!("resize of unknown buffer {}", id.0);
            return;
        };
        if size == 0 {
            pooled.buffer = None;
            pooled.size = 0;
        } else {
            pooled.allocate(device, size);
        }
    }

    /// Writes `data` at `offset`. Odd-length tails are zero-padded to the copy alignment.
    pub fn write(&self, queue: &wgpu::Queue, id: BufferId, offset: u64, data: &[u8]) {
        if data.is_empty() {
            return;
        }
        let Some(pooled) = self.slot(id) else {
            log::error!("write to unknown buffer {}", id.0);
            return;
        };
        let Some(buffer) = pooled.buffer.as_ref() else {
            log::error!("write to buffer {} ({}) without storage", id.0, pooled.label);
            return;
        };

        debug_assert!(
            offset % wgpu::COPY_BUFFER_ALIGNMENT == 0,
            "buffer write offset {offset} is not 4-byte aligned"
        );

        let padded_len = padded(data.len() as u64);
        if offset + padded_len > pooled.size {
            log::error!(
                "write of {} bytes at {offset} overruns buffer {} ({}, {} bytes)",
                data.len(),
                id.0,
                pooled.label,
                pooled.size
            );
            return;
        }

        if padded_len == data.len() as u64 {
            queue.write_buffer(buffer, offset, data);
        } else {
            let mut tail = data.to_vec();
            tail.resize(padded_len as usize, 0);
            queue.write_buffer(buffer, offset, &tail);
        }
    }

    pub fn destroy(&mut self, id: BufferId) {
        match self.slots.get_mut(id.0 as usize) {
            Some(slot @ Some(_)) => *slot = None,
            _ => log::warn!("destroy of unknown buffer {}", id.0),
        }
    }

    /// Current storage for `id`, if it has any.
    pub fn get(&self, id: BufferId) -> Option<&wgpu::Buffer> {
        self.slot(id).and_then(|p| p.buffer.as_ref())
    }

    fn slot(&self, id: BufferId) -> Option<&PooledBuffer> {
        self.slots.get(id.0 as usize).and_then(Option::as_ref)
    }

    fn slot_mut(&mut self, id: BufferId) -> Option<&mut PooledBuffer> {
        self.slots.get_mut(id.0 as usize).and_then(Option::as_mut)
    }
}

impl PooledBuffer {
    fn allocate(&mut self, device: &wgpu::Device, size: u64) {
        let size = padded(size);
        self.buffer = Some(device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(self.label),
            size,
            usage: self.usage,
            mapped_at_creation: false,
        }));
        self.size = size;
    }
}

/// Rounds `size` up to the copy alignment.
#[inline]
pub(crate) fn padded(size: u64) -> u64 {
    wgpu::util::align_to(size, wgpu::COPY_BUFFER_ALIGNMENT)
}
