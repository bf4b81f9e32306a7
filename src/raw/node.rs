use core::borrow::Borrow;

use smallvec::SmallVec;

use super::handle::NodeId;

/// Keys stored inline before a node spills to the heap (covers `t <= 4`).
pub(crate) const INLINE_KEYS: usize = 7;
pub(crate) const INLINE_CHILDREN: usize = INLINE_KEYS + 1;

pub(crate) type Keys<K> = SmallVec<[K; INLINE_KEYS]>;
pub(crate) type Children = SmallVec<[NodeId; INLINE_CHILDREN]>;

// Classic B-tree node: keys live in every node, not only in leaves.
// `keys[i]` separates `children[i]` (smaller keys) from `children[i + 1]` (larger keys).
pub(crate) struct Node<K> {
    keys: Keys<K>,
    // Empty for leaves, `keys.len() + 1` entries otherwise.
    children: Children,
}

/// Result of looking a key up in a single node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Probe {
    /// The key sits at this index of the node.
    Found(usize),
    /// The key is absent here; it belongs in (or under) child slot `index`, `0..=key_count`.
    Descend(usize),
}

impl<K> Node<K> {
    /// Creates a leaf holding a single key.
    pub(crate) fn leaf_with(key: K) -> Self {
        let mut keys = Keys::new();
        keys.push(key);
        Self {
            keys,
            children: Children::new(),
        }
    }

    /// Creates a key-less internal node over a single child. Only valid until the
    /// following split of that child gives it a separator.
    pub(crate) fn above(child: NodeId) -> Self {
        let mut children = Children::new();
        children.push(child);
        Self {
            keys: Keys::new(),
            children,
        }
    }

    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn key_count(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub(crate) fn key(&self, index: usize) -> &K {
        &self.keys[index]
    }

    pub(crate) fn keys(&self) -> &[K] {
        &self.keys
    }

    #[inline]
    pub(crate) fn child(&self, index: usize) -> NodeId {
        self.children[index]
    }

    pub(crate) fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub(crate) fn first_key(&self) -> Option<&K> {
        self.keys.first()
    }

    pub(crate) fn last_key(&self) -> Option<&K> {
        self.keys.last()
    }

    /// Finds `key` among the populated keys.
    ///
    /// Binary search only ever inspects `keys[..key_count]`, so a key greater than every
    /// key in the node yields `Descend(key_count)` without reading past the populated range.
    #[inline]
    pub(crate) fn probe<Q>(&self, key: &Q) -> Probe
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        match self.keys.binary_search_by(|k| k.borrow().cmp(key)) {
            Ok(index) => Probe::Found(index),
            Err(index) => Probe::Descend(index),
        }
    }

    pub(crate) fn insert_key(&mut self, index: usize, key: K) {
        self.keys.insert(index, key);
    }

    pub(crate) fn remove_key(&mut self, index: usize) -> K {
        self.keys.remove(index)
    }

    /// Overwrites the key at `index`, returning the previous one.
    pub(crate) fn replace_key(&mut self, index: usize, key: K) -> K {
        core::mem::replace(&mut self.keys[index], key)
    }

    /// Adds `key` as separator `index` and `child` as its right-hand subtree.
    pub(crate) fn insert_separator(&mut self, index: usize, key: K, child: NodeId) {
        self.keys.insert(index, key);
        self.children.insert(index + 1, child);
    }

    /// Removes separator `index` together with its right-hand subtree.
    pub(crate) fn remove_separator(&mut self, index: usize) -> (K, NodeId) {
        let key = self.keys.remove(index);
        let child = self.children.remove(index + 1);
        (key, child)
    }

    /// Detaches the last key and, for internal nodes, the last child.
    pub(crate) fn pop_back(&mut self) -> (K, Option<NodeId>) {
        let key = self.keys.pop().expect("`Node::pop_back()` - node has no keys!");
        (key, self.children.pop())
    }

    /// Detaches the first key and, for internal nodes, the first child.
    pub(crate) fn pop_front(&mut self) -> (K, Option<NodeId>) {
        assert!(!self.keys.is_empty(), "`Node::pop_front()` - node has no keys!");
        let key = self.keys.remove(0);
        let child = (!self.children.is_empty()).then(|| self.children.remove(0));
        (key, child)
    }

    pub(crate) fn push_front(&mut self, key: K, child: Option<NodeId>) {
        self.keys.insert(0, key);
        if let Some(child) = child {
            self.children.insert(0, child);
        }
    }

    pub(crate) fn push_back(&mut self, key: K, child: Option<NodeId>) {
        self.keys.push(key);
        if let Some(child) = child {
            self.children.push(child);
        }
    }

    /// Splits a full node (`2t - 1` keys) around its median.
    ///
    /// `self` keeps the lower `t - 1` keys (and lower `t` children); the returned sibling
    /// gets the upper `t - 1` keys (and upper `t` children). The median is returned for
    /// promotion into the parent.
    pub(crate) fn split_off(&mut self, t: usize) -> (K, Node<K>) {
        debug_assert_eq!(self.keys.len(), 2 * t - 1, "only full nodes are split");

        let upper_keys: Keys<K> = self.keys.drain(t..).collect();
        let upper_children: Children = if self.is_leaf() {
            Children::new()
        } else {
            self.children.drain(t..).collect()
        };
        let median = self.keys.pop().expect("`Node::split_off()` - node lost its median!");

        let sibling = Node {
            keys: upper_keys,
            children: upper_children,
        };
        (median, sibling)
    }

    /// Appends `separator` and then everything `right` owns.
    pub(crate) fn absorb(&mut self, separator: K, right: Node<K>) {
        self.keys.push(separator);
        self.keys.extend(right.keys);
        self.children.extend(right.children);
    }
}
