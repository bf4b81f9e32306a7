//! Error types for `arbolb`.

/// Convenient `Result` alias for operations that can fail with [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

/// Everything a [`BTree`](crate::BTree) can report to its caller.
///
/// Only [`Error::InvalidMinDegree`] prevents a tree from being built. The other two
/// variants describe lookup outcomes and are returned by the `try_*`/[`find`](crate::BTree::find)
/// forms; they never indicate a damaged tree.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    /// The requested minimum degree is below 2.
    #[error("minimum degree must be at least 2, got {0}")]
    InvalidMinDegree(usize),

    /// The key is not stored in the tree.
    #[error("key not found")]
    NotFound,

    /// The tree holds no keys at all.
    #[error("tree is empty")]
    EmptyTree,
}
