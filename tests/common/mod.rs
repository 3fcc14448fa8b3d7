//! Shared builders for integration tests.

#![allow(dead_code)]

use augmented_octree::{AugmentedNode, AugmentedOctree, OctreeKey, OctreeNode, TreeConfig};

/// Shallow configuration keeping trees small and keys readable.
pub fn config(max_depth: u8) -> TreeConfig {
    TreeConfig::new(0.1)
        .expect("valid resolution")
        .with_max_depth(max_depth)
        .expect("valid depth")
}

/// Leaf with the given log-odds and optional auxiliary value.
pub fn leaf(log_odds: f32, auxiliary: Option<f64>) -> AugmentedNode {
    let node = AugmentedNode::new(log_odds);
    match auxiliary {
        Some(v) => node.with_auxiliary(v),
        None => node,
    }
}

/// Interior node whose eight slots hold the given leaves.
pub fn parent_of(children: [AugmentedNode; 8]) -> AugmentedNode {
    let mut parent = AugmentedNode::default();
    for (slot, child) in children.into_iter().enumerate() {
        parent.children_mut().insert(slot, child);
    }
    parent
}

/// Tree with one finest-level leaf per value, at keys (i, 0, 0).
pub fn tree_with_leaves(values: &[f64]) -> AugmentedOctree {
    let mut tree = AugmentedOctree::new(config(8));
    for (i, &value) in values.iter().enumerate() {
        let key = OctreeKey::new(i as u16, 0, 0);
        tree.update_node(key, true);
        tree.set_auxiliary(key, value).expect("leaf was just created");
    }
    tree
}

/// Leaf auxiliary values in traversal order.
pub fn leaf_values(tree: &AugmentedOctree) -> Vec<f64> {
    tree.leaves().map(|leaf| leaf.node.auxiliary()).collect()
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {} but got {}",
        expected,
        actual
    );
}
