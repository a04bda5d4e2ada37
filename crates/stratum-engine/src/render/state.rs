use crate::scene::Bucket;

/// Fixed-function state shared by every draw until changed.
///
/// Only the renderer's sweep changes it, and always inside a save/restore
/// bracket (see [`AmbientSnapshot`]).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct AmbientState {
    pub depth_test: bool,
    pub depth_write: bool,
    pub blend: bool,
    pub cull: bool,
}

impl Default for AmbientState {
    /// Fresh-context defaults: depth test off, depth writes on, blend and cull off.
    fn default() -> Self {
        Self { depth_test: false, depth_write: true, blend: false, cull: false }
    }
}

impl AmbientState {
    pub const OPAQUE_3D: Self =
        Self { depth_test: true, depth_write: true, blend: false, cull: true };

    pub const TRANSPARENT_3D: Self =
        Self { depth_test: true, depth_write: false, blend: true, cull: true };

    /// 2D buckets: depth test and depth writes follow the 2D depth mode,
    /// blending on, culling off.
    #[inline]
    pub const fn for_2d(depth_test: bool) -> Self {
        Self { depth_test, depth_write: depth_test, blend: true, cull: false }
    }

    /// State applied before a non-empty bucket is dispatched.
    #[inline]
    pub const fn for_bucket(bucket: Bucket, depth_test_2d: bool) -> Self {
        match bucket {
            Bucket::NegativeZ | Bucket::ZeroZ | Bucket::PositiveZ => Self::for_2d(depth_test_2d),
            Bucket::Opaque3D => Self::OPAQUE_3D,
            Bucket::Transparent3D => Self::TRANSPARENT_3D,
        }
    }
}

/// [`AmbientState`] captured by a queue before its sweep and reinstated after.
///
/// Covers every flag, blend included, so a nested sweep cannot leak state
/// into the rest of its parent's bucket.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct AmbientSnapshot(AmbientState);

impl AmbientSnapshot {
    #[inline]
    pub fn capture(state: AmbientState) -> Self {
        Self(state)
    }

    #[inline]
    pub fn state(self) -> AmbientState {
        self.0
    }
}
