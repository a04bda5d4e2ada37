/// Ordering class of a render queue.
///
/// Buckets are visited in declaration order; flattened queue indexing follows
/// the same order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Bucket {
    /// Global order < 0. Sorted by global order.
    NegativeZ,
    /// Opaque 3D content. Submission order, depth-tested.
    Opaque3D,
    /// Transparent 3D content. Submission order, depth-tested, no depth writes.
    Transparent3D,
    /// Global order == 0. Submission (paint) order.
    ZeroZ,
    /// Global order > 0. Sorted by global order.
    PositiveZ,
}

impl Bucket {
    pub const COUNT: usize = 5;

    /// All buckets in visitation order.
    pub const ALL: [Bucket; Bucket::COUNT] = [
        Bucket::NegativeZ,
        Bucket::Opaque3D,
        Bucket::Transparent3D,
        Bucket::ZeroZ,
        Bucket::PositiveZ,
    ];

    /// Classifies a 2D command by the sign of its global order.
    ///
    /// NaN has no sign and lands in `ZeroZ`.
    #[inline]
    pub fn classify(global_order: f32) -> Self {
        if global_order < 0.0 {
            Bucket::NegativeZ
        } else if global_order > 0.0 {
            Bucket::PositiveZ
        } else {
            Bucket::ZeroZ
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Whether `sort()` reorders this bucket.
    #[inline]
    pub const fn is_sorted_by_order(self) -> bool {
        matches!(self, Bucket::NegativeZ | Bucket::PositiveZ)
    }

    /// Whether this bucket holds 2D content.
    #[inline]
    pub const fn is_2d(self) -> bool {
        matches!(self, Bucket::NegativeZ | Bucket::ZeroZ | Bucket::PositiveZ)
    }
}
