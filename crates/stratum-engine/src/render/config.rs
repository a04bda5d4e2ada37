use crate::paint::Color;

/// Default vertex staging capacity. Indices are 16-bit, so this is also the
/// upper bound.
pub const DEFAULT_VERTEX_CAPACITY: usize = 65536;

/// Default index staging capacity: six indices per four vertices (quads).
pub const DEFAULT_INDEX_CAPACITY: usize = DEFAULT_VERTEX_CAPACITY * 6 / 4;

/// Initial number of batch descriptors before the first growth.
pub const DEFAULT_BATCH_CAPACITY: usize = 500;

/// Renderer construction parameters.
///
/// Capacities are fixed for the renderer's lifetime; a single triangle command
/// larger than them must be split by its producer.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Vertex staging capacity, in vertices. At most 65536.
    pub vertex_capacity: usize,

    /// Index staging capacity, in indices.
    pub index_capacity: usize,

    /// Initial batch descriptor capacity. Grows by 1.4× when exhausted.
    pub batch_capacity: usize,

    /// Commands reserved per bucket for every queue up front.
    pub queue_reserve: usize,

    /// Depth test (and depth writes) for the three 2D buckets.
    pub depth_test_2d: bool,

    /// Color used by `Renderer::clear`.
    pub clear_color: Color,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            vertex_capacity: DEFAULT_VERTEX_CAPACITY,
            index_capacity: DEFAULT_INDEX_CAPACITY,
            batch_capacity: DEFAULT_BATCH_CAPACITY,
            queue_reserve: 0,
            depth_test_2d: false,
            clear_color: Color::from_premul(0.0, 0.0, 0.0, 1.0),
        }
    }
}
