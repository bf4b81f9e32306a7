use core::borrow::Borrow;
use core::fmt;

use alloc::vec::Vec;

use log::debug;

use crate::error::{Error, Result};
use crate::min_degree::MinDegree;
use crate::raw::{NodeId, RawBTree};
use crate::shape::NodeShape;

/// An ordered set of keys stored in a B-tree of fixed minimum degree `t`.
///
/// Every node other than the root holds between `t - 1` and `2t - 1` keys and all leaves
/// sit at the same depth. Insertion splits full nodes on the way down; removal tops up
/// thin nodes on the way down by borrowing from or merging with a sibling, so neither
/// operation ever has to walk back up.
///
/// Keys are unique: inserting a key that is already present is rejected.
///
/// # Examples
///
/// ```
/// use arbolb::BTree;
///
/// let mut tree = BTree::new(2).unwrap();
/// for key in [10, 20, 5, 6, 12, 30, 7, 17] {
///     tree.insert(key);
/// }
/// assert_eq!(tree.to_sorted_vec(), [5, 6, 7, 10, 12, 17, 20, 30]);
///
/// assert!(tree.remove(&6));
/// assert!(!tree.remove(&13));
/// assert_eq!(tree.to_sorted_vec(), [5, 7, 10, 12, 17, 20, 30]);
/// ```
pub struct BTree<K> {
    raw: RawBTree<K>,
}

impl<K> BTree<K> {
    /// Creates an empty tree with minimum degree `min_degree`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMinDegree`] if `min_degree < 2`.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbolb::{BTree, Error};
    ///
    /// let tree: BTree<u32> = BTree::new(3).unwrap();
    /// assert!(tree.is_empty());
    ///
    /// assert_eq!(BTree::<u32>::new(1).err(), Some(Error::InvalidMinDegree(1)));
    /// ```
    pub fn new(min_degree: usize) -> Result<Self> {
        MinDegree::new(min_degree).map(Self::with_degree)
    }

    /// Creates an empty tree from an already validated degree.
    #[must_use]
    pub const fn with_degree(degree: MinDegree) -> Self {
        Self {
            raw: RawBTree::new(degree),
        }
    }

    /// Returns the minimum degree `t` the tree was built with.
    #[must_use]
    pub const fn min_degree(&self) -> MinDegree {
        self.raw.degree()
    }

    /// Returns the number of keys in the tree.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the tree holds no keys.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the number of levels: 0 when empty, 1 while the root is a leaf.
    #[must_use]
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Returns the smallest key.
    #[must_use]
    pub fn first(&self) -> Option<&K> {
        self.raw.first()
    }

    /// Returns the largest key.
    #[must_use]
    pub fn last(&self) -> Option<&K> {
        self.raw.last()
    }

    /// Removes every key. The degree is kept.
    pub fn clear(&mut self) {
        self.raw.clear();
    }
}

impl<K: Ord + Clone> BTree<K> {
    /// Builds a tree by inserting `keys` one after another, in order.
    ///
    /// Duplicates after the first occurrence are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMinDegree`] if `min_degree < 2`.
    pub fn from_keys<I>(min_degree: usize, keys: I) -> Result<Self>
    where
        I: IntoIterator<Item = K>,
    {
        let mut tree = Self::new(min_degree)?;
        let mut replayed = 0usize;
        for key in keys {
            tree.insert(key);
            replayed += 1;
        }
        debug!("replayed {replayed} insertions into {} keys, t = {}", tree.len(), tree.min_degree());
        Ok(tree)
    }

    /// Adds `key` to the tree.
    ///
    /// Returns `false` and leaves the set of keys unchanged if `key` is already present.
    pub fn insert(&mut self, key: K) -> bool {
        self.raw.insert(key)
    }

    /// Removes `key` from the tree. Returns whether it was present.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.remove(key)
    }

    /// Removes `key`, telling an empty tree apart from a missing key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyTree`] if the tree holds no keys, or [`Error::NotFound`] if
    /// `key` is not one of them. The tree is still usable after either.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbolb::{BTree, Error};
    ///
    /// let mut tree = BTree::new(2).unwrap();
    /// assert_eq!(tree.try_remove(&1), Err(Error::EmptyTree));
    ///
    /// tree.insert(1);
    /// assert_eq!(tree.try_remove(&2), Err(Error::NotFound));
    /// assert_eq!(tree.try_remove(&1), Ok(()));
    /// ```
    pub fn try_remove<Q>(&mut self, key: &Q) -> Result<()>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        if self.is_empty() {
            return Err(Error::EmptyTree);
        }
        if self.raw.remove(key) { Ok(()) } else { Err(Error::NotFound) }
    }

    /// Returns `true` if `key` is in the tree.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.search(key).is_some()
    }

    /// Returns the stored key equal to `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get(key)
    }

    /// Looks `key` up, telling an empty tree apart from a missing key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyTree`] if the tree holds no keys, or [`Error::NotFound`] if
    /// `key` is not one of them.
    pub fn find<Q>(&self, key: &Q) -> Result<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        if self.is_empty() {
            return Err(Error::EmptyTree);
        }
        self.raw.get(key).ok_or(Error::NotFound)
    }

    /// Returns every key in ascending order.
    ///
    /// The whole sequence is materialized by one in-order walk.
    #[must_use]
    pub fn to_sorted_vec(&self) -> Vec<K> {
        self.raw.to_sorted_vec()
    }

    /// Takes a snapshot of the current node layout, or `None` for an empty tree.
    #[must_use]
    pub fn shape(&self) -> Option<NodeShape<K>> {
        self.raw.root().map(|root| NodeShape::capture(&self.raw, root))
    }
}

impl<K: fmt::Debug> fmt::Debug for BTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut set = f.debug_set();
        self.raw.for_each_in_order(|key| {
            set.entry(key);
        });
        set.finish()
    }
}

/// Renders the tree one level per line, each node as `|k0|k1|...|`, indented four spaces
/// per level.
///
/// ```
/// use arbolb::BTree;
///
/// let tree = BTree::from_keys(2, [1, 2, 3, 4]).unwrap();
/// assert_eq!(tree.to_string(), "|2|\n    |1|    |3|4|\n");
/// ```
impl<K: fmt::Display> fmt::Display for BTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(root) = self.raw.root() else {
            return writeln!(f, "(empty)");
        };

        let mut level: Vec<NodeId> = Vec::from([root]);
        let mut depth = 0;
        while !level.is_empty() {
            let mut next = Vec::new();
            for &id in &level {
                let node = self.raw.node(id);
                write!(f, "{:indent$}|", "", indent = depth * 4)?;
                for key in node.keys() {
                    write!(f, "{key}|")?;
                }
                next.extend_from_slice(node.children());
            }
            writeln!(f)?;
            level = next;
            depth += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::string::ToString;
    use alloc::vec;

    #[test]
    fn empty_tree_reports_empty() {
        let mut tree: BTree<i32> = BTree::new(4).unwrap();
        assert_eq!(tree.min_degree().get(), 4);
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.find(&1), Err(Error::EmptyTree));
        assert_eq!(tree.try_remove(&1), Err(Error::EmptyTree));
        assert!(!tree.remove(&1));
        assert!(!tree.contains(&1));
        assert_eq!(tree.to_sorted_vec(), Vec::<i32>::new());
        assert_eq!(tree.shape(), None);
        assert_eq!(tree.to_string(), "(empty)\n");
    }

    #[test]
    fn find_and_get_return_stored_key() {
        let tree = BTree::from_keys(2, ["pear", "apple", "fig"]).unwrap();
        assert_eq!(tree.get("fig"), Some(&"fig"));
        assert_eq!(tree.find("kiwi"), Err(Error::NotFound));
        assert_eq!(tree.first(), Some(&"apple"));
        assert_eq!(tree.last(), Some(&"pear"));
    }

    #[test]
    fn from_keys_skips_repeats() {
        let tree = BTree::from_keys(3, [4, 1, 4, 2, 1]).unwrap();
        assert_eq!(tree.len(), 3);
        assert_eq!(format!("{tree:?}"), "{1, 2, 4}");
    }

    #[test]
    fn clear_keeps_degree() {
        let mut tree = BTree::from_keys(5, 0..100).unwrap();
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.min_degree().get(), 5);
        assert!(tree.insert(7));
        assert_eq!(tree.to_sorted_vec(), vec![7]);
    }

    #[test]
    fn display_prints_each_level() {
        let tree = BTree::from_keys(2, [10, 20, 5, 6, 12, 30, 7, 17]).unwrap();
        let rendered = tree.to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), tree.height());
        assert!(lines[0].starts_with('|'));
        assert!(lines[1].starts_with("    |"));
    }
}
