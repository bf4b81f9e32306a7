use core::borrow::Borrow;
use core::cmp::Ordering;

use alloc::vec::Vec;

use log::trace;

use super::arena::Arena;
use super::handle::NodeId;
use super::node::{Node, Probe};
use crate::min_degree::MinDegree;

/// The classic (CLRS-style) B-tree engine backing [`BTree`](crate::BTree).
///
/// All algorithms take [`NodeId`]s rather than node references, so a parent and the
/// children it is rebalancing can be touched one after the other without aliasing.
pub(crate) struct RawBTree<K> {
    /// Arena storing every live node.
    nodes: Arena<Node<K>>,
    /// Root node; `None` exactly when the tree holds no keys.
    root: Option<NodeId>,
    /// Minimum degree shared by all nodes.
    degree: MinDegree,
    /// Number of keys in the tree.
    len: usize,
}

impl<K> RawBTree<K> {
    pub(crate) const fn new(degree: MinDegree) -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            degree,
            len: 0,
        }
    }

    pub(crate) const fn degree(&self) -> MinDegree {
        self.degree
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) const fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node<K> {
        self.nodes.get(id)
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    /// Number of levels; every leaf sits at this depth.
    pub(crate) fn height(&self) -> usize {
        let mut height = 0;
        let mut current = self.root;
        while let Some(id) = current {
            height += 1;
            current = self.nodes.get(id).children().first().copied();
        }
        height
    }

    /// Smallest key under `id`: follow first children down to a leaf.
    fn min_key(&self, id: NodeId) -> &K {
        let mut node = self.nodes.get(id);
        while !node.is_leaf() {
            node = self.nodes.get(node.child(0));
        }
        node.first_key().expect("`RawBTree::min_key()` - reached an empty leaf!")
    }

    /// Largest key under `id`: follow last children down to a leaf.
    fn max_key(&self, id: NodeId) -> &K {
        let mut node = self.nodes.get(id);
        while !node.is_leaf() {
            node = self.nodes.get(node.child(node.key_count()));
        }
        node.last_key().expect("`RawBTree::max_key()` - reached an empty leaf!")
    }

    pub(crate) fn first(&self) -> Option<&K> {
        self.root.map(|root| self.min_key(root))
    }

    pub(crate) fn last(&self) -> Option<&K> {
        self.root.map(|root| self.max_key(root))
    }

    /// Visits every key in ascending order.
    pub(crate) fn for_each_in_order<'a, F>(&'a self, mut visit: F)
    where
        F: FnMut(&'a K),
    {
        if let Some(root) = self.root {
            self.walk_in_order(root, &mut visit);
        }
    }

    fn walk_in_order<'a, F>(&'a self, id: NodeId, visit: &mut F)
    where
        F: FnMut(&'a K),
    {
        let node = self.nodes.get(id);
        for (index, key) in node.keys().iter().enumerate() {
            if !node.is_leaf() {
                self.walk_in_order(node.child(index), visit);
            }
            visit(key);
        }
        if !node.is_leaf() {
            self.walk_in_order(node.child(node.key_count()), visit);
        }
    }
}

impl<K: Ord + Clone> RawBTree<K> {
    /// Returns the node holding `key` and the key's index within it.
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<(NodeId, usize)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.search_from(self.root?, key)
    }

    fn search_from<Q>(&self, id: NodeId, key: &Q) -> Option<(NodeId, usize)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let node = self.nodes.get(id);
        match node.probe(key) {
            Probe::Found(index) => Some((id, index)),
            Probe::Descend(_) if node.is_leaf() => None,
            Probe::Descend(index) => self.search_from(node.child(index), key),
        }
    }

    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let (id, index) = self.search(key)?;
        Some(self.nodes.get(id).key(index))
    }

    /// Inserts `key`, splitting full nodes on the way down.
    /// Returns `false`, leaving the key set untouched, if `key` is already present.
    pub(crate) fn insert(&mut self, key: K) -> bool {
        let Some(root) = self.root else {
            self.root = Some(self.nodes.alloc(Node::leaf_with(key)));
            self.len = 1;
            trace!("planted root leaf");
            return true;
        };

        let inserted = if self.nodes.get(root).key_count() == self.degree.max_keys() {
            let new_root = self.nodes.alloc(Node::above(root));
            self.split_child(new_root, 0);
            self.root = Some(new_root);
            trace!("root split, height is now {}", self.height());

            match key.cmp(self.nodes.get(new_root).key(0)) {
                Ordering::Less => self.insert_non_full(self.nodes.get(new_root).child(0), key),
                Ordering::Greater => self.insert_non_full(self.nodes.get(new_root).child(1), key),
                Ordering::Equal => false,
            }
        } else {
            self.insert_non_full(root, key)
        };

        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// Inserts into the subtree at `id`, whose node must not be full.
    fn insert_non_full(&mut self, id: NodeId, key: K) -> bool {
        let node = self.nodes.get(id);
        let mut index = match node.probe(&key) {
            Probe::Found(_) => return false,
            Probe::Descend(index) => index,
        };

        if node.is_leaf() {
            self.nodes.get_mut(id).insert_key(index, key);
            return true;
        }

        let child = node.child(index);
        if self.nodes.get(child).key_count() == self.degree.max_keys() {
            self.split_child(id, index);
            match key.cmp(self.nodes.get(id).key(index)) {
                Ordering::Less => {}
                Ordering::Greater => index += 1,
                Ordering::Equal => return false,
            }
        }

        let child = self.nodes.get(id).child(index);
        self.insert_non_full(child, key)
    }

    /// Splits the full child at slot `index` of `parent`, promoting its median into
    /// `parent` at `index` and linking the new sibling at `index + 1`.
    fn split_child(&mut self, parent: NodeId, index: usize) {
        let child = self.nodes.get(parent).child(index);
        let (median, sibling) = self.nodes.get_mut(child).split_off(self.degree.get());
        let sibling = self.nodes.alloc(sibling);
        self.nodes.get_mut(parent).insert_separator(index, median, sibling);
        trace!("split {child:?}, upper half moved to {sibling:?}");
    }

    /// Removes `key`. Returns `false` if it was not present.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let Some(root) = self.root else {
            return false;
        };

        let removed = self.remove_from(root, key);

        // Merges during the descent may have pulled the root's last separator down,
        // even when the key itself was absent.
        if self.nodes.get(root).key_count() == 0 {
            let old_root = self.nodes.take(root);
            self.root = old_root.children().first().copied();
            trace!("root collapsed, height is now {}", self.height());
        }
        debug_assert!(self.root.is_some() || self.nodes.is_empty(), "empty tree still owns nodes");

        if removed {
            self.len -= 1;
        }
        removed
    }

    /// Removes `key` from the subtree at `id`.
    ///
    /// Every node this is called on, apart from the root, holds at least `t` keys, so a
    /// key can always be taken out of it without underflow.
    fn remove_from<Q>(&mut self, id: NodeId, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let node = self.nodes.get(id);
        match node.probe(key) {
            Probe::Found(index) if node.is_leaf() => {
                self.remove_from_leaf(id, index);
                true
            }
            Probe::Found(index) => {
                self.remove_from_non_leaf(id, index);
                true
            }
            Probe::Descend(_) if node.is_leaf() => false,
            Probe::Descend(index) => {
                let target = if self.nodes.get(node.child(index)).key_count() < self.degree.get() {
                    self.fill(id, index)
                } else {
                    node.child(index)
                };
                self.remove_from(target, key)
            }
        }
    }

    fn remove_from_leaf(&mut self, id: NodeId, index: usize) {
        self.nodes.get_mut(id).remove_key(index);
    }

    /// Removes separator `index` of internal node `id`.
    fn remove_from_non_leaf(&mut self, id: NodeId, index: usize) {
        let t = self.degree.get();
        let node = self.nodes.get(id);
        let (left, right) = (node.child(index), node.child(index + 1));

        if self.nodes.get(left).key_count() >= t {
            let predecessor = self.max_key(left).clone();
            self.nodes.get_mut(id).replace_key(index, predecessor.clone());
            self.remove_from(left, &predecessor);
        } else if self.nodes.get(right).key_count() >= t {
            let successor = self.min_key(right).clone();
            self.nodes.get_mut(id).replace_key(index, successor.clone());
            self.remove_from(right, &successor);
        } else {
            let key = node.key(index).clone();
            self.merge(id, index);
            self.remove_from(left, &key);
        }
    }

    /// Brings child `index` of `id` up to at least `t` keys and returns the node that now
    /// covers that child's key range. After a merge with the left sibling that is the
    /// sibling, not whatever sits at `index` afterwards.
    fn fill(&mut self, id: NodeId, index: usize) -> NodeId {
        let t = self.degree.get();
        let node = self.nodes.get(id);
        let last = node.key_count();

        if index > 0 && self.nodes.get(node.child(index - 1)).key_count() >= t {
            self.borrow_from_prev(id, index);
            self.nodes.get(id).child(index)
        } else if index < last && self.nodes.get(node.child(index + 1)).key_count() >= t {
            self.borrow_from_next(id, index);
            self.nodes.get(id).child(index)
        } else if index < last {
            self.merge(id, index);
            self.nodes.get(id).child(index)
        } else {
            self.merge(id, index - 1);
            self.nodes.get(id).child(index - 1)
        }
    }

    /// Rotates the left sibling's last key up into separator `index - 1` and the old
    /// separator down to the front of child `index`.
    fn borrow_from_prev(&mut self, id: NodeId, index: usize) {
        let node = self.nodes.get(id);
        let (sibling, child) = (node.child(index - 1), node.child(index));

        let (key, grandchild) = self.nodes.get_mut(sibling).pop_back();
        let separator = self.nodes.get_mut(id).replace_key(index - 1, key);
        self.nodes.get_mut(child).push_front(separator, grandchild);
    }

    /// Rotates the right sibling's first key up into separator `index` and the old
    /// separator down to the back of child `index`.
    fn borrow_from_next(&mut self, id: NodeId, index: usize) {
        let node = self.nodes.get(id);
        let (child, sibling) = (node.child(index), node.child(index + 1));

        let (key, grandchild) = self.nodes.get_mut(sibling).pop_front();
        let separator = self.nodes.get_mut(id).replace_key(index, key);
        self.nodes.get_mut(child).push_back(separator, grandchild);
    }

    /// Folds separator `index` and child `index + 1` into child `index`, releasing the
    /// right child's slot.
    fn merge(&mut self, id: NodeId, index: usize) {
        let (separator, right) = self.nodes.get_mut(id).remove_separator(index);
        let left = self.nodes.get(id).child(index);
        let right_node = self.nodes.take(right);
        self.nodes.get_mut(left).absorb(separator, right_node);
        trace!("merged {right:?} into {left:?}");
    }

    /// Collects every key in ascending order.
    pub(crate) fn to_sorted_vec(&self) -> Vec<K> {
        let mut keys = Vec::with_capacity(self.len);
        self.for_each_in_order(|key| keys.push(key.clone()));
        keys
    }
}
