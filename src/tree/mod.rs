//! Octree container
//!
//! `Octree<N>` owns a single optional root and the tree-wide configuration.
//! Structural edits (`update_node`, `set_node_log_odds`) only touch the path
//! to the edited leaf. Interior aggregates go stale until
//! [`Octree::recompute_aggregates_bottom_up`] runs, so a batch of edits costs
//! one O(n) pass instead of O(depth) per edit.

mod augmented;
mod leaves;

pub use leaves::{LeafRef, Leaves};

use std::mem;

use tracing::{debug, trace};

use crate::config::TreeConfig;
use crate::error::{OctreeError, Result};
use crate::key::{coord_to_key_axis, key_to_coord_axis, OctreeKey};
use crate::node::{AugmentedNode, OccupancyNode, OctreeNode, NUM_CHILDREN};

/// Tree of plain occupancy nodes.
pub type OccupancyOctree = Octree<OccupancyNode>;

/// Tree whose nodes carry an auxiliary scalar next to occupancy.
pub type AugmentedOctree = Octree<AugmentedNode>;

/// Sparse octree over a bounded cubic volume.
#[derive(Debug, Clone)]
pub struct Octree<N: OctreeNode> {
    config: TreeConfig,
    root: Option<Box<N>>,
}

impl<N: OctreeNode> Octree<N> {
    /// Create an empty tree.
    pub fn new(config: TreeConfig) -> Self {
        Self { config, root: None }
    }

    /// Create an empty full-depth tree with the given voxel size.
    pub fn with_resolution(resolution: f64) -> Result<Self> {
        Ok(Self::new(TreeConfig::new(resolution)?))
    }

    /// Registry name of this tree type.
    pub fn tree_type(&self) -> &'static str {
        N::TREE_TYPE
    }

    /// Tree configuration.
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Finest voxel edge length.
    pub fn resolution(&self) -> f64 {
        self.config.resolution
    }

    /// Depth of the finest level.
    pub fn max_depth(&self) -> u8 {
        self.config.max_depth
    }

    /// Edge length of a node at `depth`.
    pub fn node_size(&self, depth: u8) -> f64 {
        self.config.node_size(depth)
    }

    /// Root node, `None` for an empty tree.
    pub fn root(&self) -> Option<&N> {
        self.root.as_deref()
    }

    /// Whether the tree holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Drop every node.
    pub fn clear(&mut self) {
        self.root = None;
    }

    /// Key of the voxel containing `point`, `None` outside the volume.
    pub fn coord_to_key(&self, point: [f64; 3]) -> Option<OctreeKey> {
        Some(OctreeKey([
            coord_to_key_axis(point[0], &self.config)?,
            coord_to_key_axis(point[1], &self.config)?,
            coord_to_key_axis(point[2], &self.config)?,
        ]))
    }

    /// Like [`Octree::coord_to_key`] but reports the offending point.
    pub fn coord_to_key_checked(&self, point: [f64; 3]) -> Result<OctreeKey> {
        self.coord_to_key(point)
            .ok_or(OctreeError::CoordinateOutOfBounds {
                x: point[0],
                y: point[1],
                z: point[2],
            })
    }

    /// Metric centre of the node at `depth` containing `key`.
    pub fn key_to_coord(&self, key: OctreeKey, depth: u8) -> [f64; 3] {
        key.0.map(|k| key_to_coord_axis(k, depth, &self.config))
    }

    /// Deepest existing node on the path to `key`.
    ///
    /// A leaf above the finest level (a collapsed subtree) answers for every
    /// key it covers. Returns `None` when the path leaves the tree at an
    /// interior node.
    pub fn search(&self, key: OctreeKey) -> Option<&N> {
        let max_depth = self.config.max_depth;
        let mut node = self.root.as_deref()?;
        for depth in 0..max_depth {
            let slot = key.child_index(depth, max_depth);
            match node.child(slot) {
                Some(child) => node = child,
                None if node.is_leaf() => return Some(node),
                None => return None,
            }
        }
        Some(node)
    }

    /// Mutable variant of [`Octree::search`].
    pub fn search_mut(&mut self, key: OctreeKey) -> Option<&mut N> {
        let max_depth = self.config.max_depth;
        let mut node = self.root.as_deref_mut()?;
        for depth in 0..max_depth {
            let slot = key.child_index(depth, max_depth);
            if node.children().contains(slot) {
                node = node.children_mut().get_mut(slot)?;
            } else if node.is_leaf() {
                return Some(node);
            } else {
                return None;
            }
        }
        Some(node)
    }

    /// Whether `node` is at or above the configured occupancy threshold.
    pub fn is_node_occupied(&self, node: &N) -> bool {
        node.log_odds() >= self.config.occupancy.occupancy_threshold_logodds()
    }

    /// Integrate one occupied/free measurement at `key`, creating the path
    /// as needed. Only the finest-level leaf changes.
    pub fn update_node(&mut self, key: OctreeKey, occupied: bool) -> &mut N {
        let params = self.config.occupancy;
        let delta = if occupied {
            params.hit_logodds()
        } else {
            params.miss_logodds()
        };
        let leaf = self.locate_or_create(key);
        let value = params.integrate(leaf.log_odds(), delta);
        leaf.set_log_odds(value);
        leaf
    }

    /// Overwrite the log-odds at `key`, creating the path as needed.
    pub fn set_node_log_odds(&mut self, key: OctreeKey, log_odds: f32) -> &mut N {
        let leaf = self.locate_or_create(key);
        leaf.set_log_odds(log_odds);
        leaf
    }

    /// Walk to the finest-level node for `key`. Missing nodes are created;
    /// a collapsed leaf on the path is expanded back into eight copies.
    fn locate_or_create(&mut self, key: OctreeKey) -> &mut N {
        let max_depth = self.config.max_depth;
        let mut created = self.root.is_none();
        let mut node: &mut N = self.root.get_or_insert_with(Box::default);
        for depth in 0..max_depth {
            let slot = key.child_index(depth, max_depth);
            if !created && node.is_leaf() {
                expand(node);
            }
            created = !node.children().contains(slot);
            node = node.children_mut().get_or_insert_with(slot, N::default);
        }
        node
    }

    /// Recompute every interior aggregate from its children, post-order.
    ///
    /// Must run after a batch of edits before interior values are read.
    /// Returns the number of interior nodes refreshed.
    pub fn recompute_aggregates_bottom_up(&mut self) -> usize {
        let max_depth = self.config.max_depth;
        let updated = match self.root.as_deref_mut() {
            Some(root) => recompute_node(root, 0, max_depth),
            None => 0,
        };
        debug!(tree = N::TREE_TYPE, updated, "recomputed interior aggregates");
        updated
    }

    /// Collapse every collapsible subtree, deepest first.
    /// Returns the number of nodes that were collapsed.
    pub fn prune(&mut self) -> usize {
        let pruned = match self.root.as_deref_mut() {
            Some(root) => prune_node(root),
            None => 0,
        };
        debug!(tree = N::TREE_TYPE, pruned, "pruned tree");
        pruned
    }

    /// Total number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.root.as_deref().map_or(0, count_nodes)
    }

    /// Number of leaves.
    pub fn num_leaves(&self) -> usize {
        self.leaves().count()
    }

    /// Approximate heap footprint in bytes.
    pub fn memory_usage(&self) -> usize {
        let nodes = self.num_nodes();
        let leaves = self.num_leaves();
        let interior = nodes - leaves;
        mem::size_of::<Self>()
            + nodes * mem::size_of::<N>()
            + interior * NUM_CHILDREN * mem::size_of::<Option<Box<N>>>()
    }

    /// All leaves in depth-first, ascending-slot order.
    pub fn leaves(&self) -> Leaves<'_, N> {
        Leaves::new(self.root.as_deref(), &self.config)
    }

    /// Apply `f` to every leaf, in the same order as [`Octree::leaves`].
    pub fn for_each_leaf_mut(&mut self, mut f: impl FnMut(&mut N)) {
        if let Some(root) = self.root.as_deref_mut() {
            visit_leaves_mut(root, &mut f);
        }
    }
}

/// Give a leaf eight children carrying its attributes.
fn expand<N: OctreeNode>(node: &mut N) {
    trace!("expanding collapsed leaf");
    for slot in 0..NUM_CHILDREN {
        let mut child = N::default();
        child.copy_attributes_from(node);
        node.children_mut().insert(slot, child);
    }
}

fn recompute_node<N: OctreeNode>(node: &mut N, depth: u8, max_depth: u8) -> usize {
    if node.is_leaf() {
        return 0;
    }
    let mut updated = 0;
    if depth < max_depth {
        for (_, child) in node.children_mut().iter_mut() {
            updated += recompute_node(child, depth + 1, max_depth);
        }
    }
    node.update_aggregates();
    updated + 1
}

fn prune_node<N: OctreeNode>(node: &mut N) -> usize {
    let mut pruned = 0;
    for (_, child) in node.children_mut().iter_mut() {
        pruned += prune_node(child);
    }
    if node.prune() {
        pruned += 1;
    }
    pruned
}

fn count_nodes<N: OctreeNode>(node: &N) -> usize {
    1 + node
        .children()
        .iter()
        .map(|(_, child)| count_nodes(child))
        .sum::<usize>()
}

fn visit_leaves_mut<N: OctreeNode>(node: &mut N, f: &mut impl FnMut(&mut N)) {
    if node.is_leaf() {
        f(node);
        return;
    }
    for (_, child) in node.children_mut().iter_mut() {
        visit_leaves_mut(child, f);
    }
}
