//! A classic in-memory B-tree of configurable minimum degree.
//!
//! [`BTree`] keeps keys in every node (not just the leaves, as a B+tree would) and
//! enforces the textbook occupancy rules for a minimum degree `t >= 2`:
//!
//! - every node holds at most `2t - 1` keys and every non-root node at least `t - 1`;
//! - an internal node with `n` keys owns exactly `n + 1` children, its keys separating
//!   the key ranges of those children;
//! - all leaves sit at the same depth.
//!
//! Insertion splits any full node it is about to descend into, and removal makes sure
//! any node it descends into can spare a key (borrowing from a sibling or merging with
//! one), so both run in a single top-down pass of `O(t · log_t n)`.
//!
//! # Example
//!
//! ```
//! use arbolb::BTree;
//!
//! let mut tree = BTree::new(3).unwrap();
//! for key in 1..=5 {
//!     tree.insert(key);
//! }
//! assert_eq!(tree.height(), 1);
//!
//! // The root leaf is full (2t - 1 = 5 keys); the sixth key splits it.
//! tree.insert(6);
//! let root = tree.shape().unwrap();
//! assert_eq!(root.keys, [3]);
//! assert_eq!(root.children.len(), 2);
//!
//! assert!(tree.contains(&4));
//! assert!(tree.remove(&4));
//! assert_eq!(tree.to_sorted_vec(), [1, 2, 3, 5, 6]);
//! ```
//!
//! # Implementation
//!
//! Nodes live in an arena and refer to their children by index, so splitting, merging and
//! borrowing are index rewrites and a merged-away node simply returns its slot to the
//! arena. The algorithms recurse on node indices, never on borrowed nodes.
//!
//! The crate is `no_std` and only needs `alloc`. Structural events (splits, merges, root
//! changes) are reported through the [`log`] facade at trace level; every outcome is
//! returned to the caller as a value.

#![no_std]
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod btree;
mod error;
mod min_degree;
mod raw;
mod shape;

pub use btree::BTree;
pub use error::{Error, Result};
pub use min_degree::MinDegree;
pub use shape::NodeShape;
