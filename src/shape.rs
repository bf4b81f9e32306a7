use alloc::vec::Vec;

use serde::Serialize;

use crate::raw::{NodeId, RawBTree};

/// An owned snapshot of one node and everything below it.
///
/// Produced by [`BTree::shape`](crate::BTree::shape) for inspection and for the
/// tree-shape document written by the command-line front end. It is a picture of the
/// current layout only; rebuilding a tree always goes through insertion.
///
/// Serializes as `{"keys": [...], "leaf": bool, "children": [...]}`, with `children`
/// omitted for leaves.
///
/// # Examples
///
/// ```
/// use arbolb::BTree;
///
/// let tree = BTree::from_keys(2, [1, 2, 3, 4]).unwrap();
/// let root = tree.shape().unwrap();
/// assert_eq!(root.keys, [2]);
/// assert!(!root.leaf);
/// assert_eq!(root.children[1].keys, [3, 4]);
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize)]
pub struct NodeShape<K> {
    /// The node's keys in ascending order.
    pub keys: Vec<K>,
    /// Whether the node has no children.
    pub leaf: bool,
    /// Child subtrees, `keys.len() + 1` of them for internal nodes.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeShape<K>>,
}

impl<K: Clone> NodeShape<K> {
    pub(crate) fn capture(raw: &RawBTree<K>, id: NodeId) -> Self {
        let node = raw.node(id);
        Self {
            keys: node.keys().to_vec(),
            leaf: node.is_leaf(),
            children: node.children().iter().map(|&child| Self::capture(raw, child)).collect(),
        }
    }
}

impl<K> NodeShape<K> {
    /// Number of levels from this node down to its leaves (1 for a leaf).
    #[must_use]
    pub fn height(&self) -> usize {
        1 + self.children.first().map_or(0, NodeShape::height)
    }

    /// Total number of keys in this subtree.
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.keys.len() + self.children.iter().map(NodeShape::key_count).sum::<usize>()
    }

    /// Number of nodes in this subtree, including this one.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(NodeShape::node_count).sum::<usize>()
    }

    /// Calls `visit` with every node and its depth below this one, parents first.
    pub fn walk<F>(&self, mut visit: F)
    where
        F: FnMut(&NodeShape<K>, usize),
    {
        self.walk_at(0, &mut visit);
    }

    fn walk_at<F>(&self, depth: usize, visit: &mut F)
    where
        F: FnMut(&NodeShape<K>, usize),
    {
        visit(self, depth);
        for child in &self.children {
            child.walk_at(depth + 1, visit);
        }
    }
}
