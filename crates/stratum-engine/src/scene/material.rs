/// Opaque material key (shader + textures + blend state).
///
/// Two triangle commands with equal ids may share one draw call. The value
/// itself carries no meaning for the queueing core.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Default)]
pub struct MaterialId(pub u32);

impl MaterialId {
    #[inline]
    pub const fn new(v: u32) -> Self {
        Self(v)
    }
}
