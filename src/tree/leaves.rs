//! Depth-first leaf traversal
//!
//! An explicit stack replaces recursion; children are pushed in descending
//! slot order so they pop in ascending order. Each entry carries the node's
//! centre key and depth, so coordinates come for free.

use crate::config::TreeConfig;
use crate::key::{key_to_coord_axis, OctreeKey};
use crate::node::OctreeNode;

/// One leaf yielded by [`Leaves`].
#[derive(Debug)]
pub struct LeafRef<'a, N> {
    /// Centre key of the leaf.
    pub key: OctreeKey,
    /// Depth of the leaf (the finest level unless collapsed).
    pub depth: u8,
    /// The leaf node itself.
    pub node: &'a N,
}

impl<N> LeafRef<'_, N> {
    /// Metric centre of the leaf.
    pub fn coordinate(&self, config: &TreeConfig) -> [f64; 3] {
        self.key.0.map(|k| key_to_coord_axis(k, self.depth, config))
    }

    /// Edge length of the leaf.
    pub fn size(&self, config: &TreeConfig) -> f64 {
        config.node_size(self.depth)
    }
}

/// Iterator over every leaf of a tree.
#[derive(Debug)]
pub struct Leaves<'a, N> {
    stack: Vec<(&'a N, OctreeKey, u8)>,
    config: &'a TreeConfig,
}

impl<'a, N: OctreeNode> Leaves<'a, N> {
    pub(crate) fn new(root: Option<&'a N>, config: &'a TreeConfig) -> Self {
        let stack = root
            .map(|node| vec![(node, OctreeKey::root(config), 0)])
            .unwrap_or_default();
        Self { stack, config }
    }
}

impl<'a, N: OctreeNode> Iterator for Leaves<'a, N> {
    type Item = LeafRef<'a, N>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, key, depth)) = self.stack.pop() {
            if node.is_leaf() {
                return Some(LeafRef { key, depth, node });
            }
            for (slot, child) in node.children().iter().rev() {
                let child_key = key.child_key(slot, depth, self.config);
                self.stack.push((child, child_key, depth + 1));
            }
        }
        None
    }
}
