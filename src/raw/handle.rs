use core::num::NonZero;

/// Identifies a node slot inside an [`Arena`](super::arena::Arena).
///
/// Stored as `index + 1` so that `Option<NodeId>` costs nothing extra.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub(crate) struct NodeId(NonZero<u32>);

impl NodeId {
    pub(crate) const MAX_INDEX: usize = (u32::MAX - 1) as usize;

    #[inline]
    pub(crate) const fn from_index(index: usize) -> Self {
        assert!(index <= Self::MAX_INDEX, "`NodeId::from_index()` - `index` > `NodeId::MAX_INDEX`!");
        #[allow(clippy::cast_possible_truncation)]
        let raw = (index + 1) as u32;
        match NonZero::new(raw) {
            Some(raw) => Self(raw),
            None => unreachable!(),
        }
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}
