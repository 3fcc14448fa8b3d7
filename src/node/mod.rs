//! Tree nodes
//!
//! Every node variant owns an occupancy estimate (log-odds) and eight child
//! slots. Variants differ in which extra attributes they carry, how those
//! attributes merge when a subtree collapses, and how they are encoded.
//! The shared behaviour lives on [`OctreeNode`]; variants override only the
//! hooks whose policy differs.

mod augmented;
mod base;
mod children;

pub use augmented::AugmentedNode;
pub use base::OccupancyNode;
pub use children::{ChildSlots, NUM_CHILDREN};

use std::fmt;
use std::io::{self, Read, Write};

use crate::occupancy::probability;

/// Capability set shared by every node variant.
pub trait OctreeNode: Default + fmt::Debug + Sized {
    /// Registry name of trees built from this node variant.
    const TREE_TYPE: &'static str;

    /// Occupancy in log-odds.
    fn log_odds(&self) -> f32;

    /// Overwrite the occupancy log-odds.
    fn set_log_odds(&mut self, value: f32);

    /// Child slots.
    fn children(&self) -> &ChildSlots<Self>;

    /// Mutable child slots.
    fn children_mut(&mut self) -> &mut ChildSlots<Self>;

    /// Overwrite every attribute (not the children) from `other`.
    fn copy_attributes_from(&mut self, other: &Self);

    /// Encode this node's attributes as one fixed-width binary record.
    fn write_data<W: Write>(&self, writer: &mut W) -> io::Result<()>;

    /// Decode attributes written by [`OctreeNode::write_data`].
    fn read_data<R: Read>(&mut self, reader: &mut R) -> io::Result<()>;

    /// Occupancy as a probability.
    fn occupancy(&self) -> f64 {
        probability(self.log_odds())
    }

    /// Whether any child slot is occupied.
    fn has_children(&self) -> bool {
        self.children().has_any()
    }

    /// Whether this node has no children.
    fn is_leaf(&self) -> bool {
        !self.has_children()
    }

    /// Child in `slot`, if present.
    fn child(&self, slot: usize) -> Option<&Self> {
        self.children().get(slot)
    }

    /// Largest log-odds among existing children (`f32::MIN` without children).
    fn max_child_log_odds(&self) -> f32 {
        self.children()
            .iter()
            .map(|(_, child)| child.log_odds())
            .fold(f32::MIN, f32::max)
    }

    /// Set own occupancy to the most occupied child.
    fn update_occupancy_children(&mut self) {
        let max = self.max_child_log_odds();
        self.set_log_odds(max);
    }

    /// Recompute every aggregate of an interior node from its children.
    fn update_aggregates(&mut self) {
        self.update_occupancy_children();
    }

    /// Whether the subtree may be replaced by this node alone: all eight
    /// children exist, none has children, and all share slot 0's occupancy.
    /// Other attributes do not take part.
    fn is_collapsible(&self) -> bool {
        if !self.children().is_full() {
            return false;
        }
        let Some(first) = self.child(0) else {
            return false;
        };
        if first.has_children() {
            return false;
        }
        let reference = first.log_odds();
        (1..NUM_CHILDREN).all(|slot| {
            matches!(self.child(slot), Some(c) if !c.has_children() && c.log_odds() == reference)
        })
    }

    /// Collapse a collapsible subtree into this node, dropping all children.
    /// Returns `false` and leaves the node untouched otherwise.
    fn prune(&mut self) -> bool {
        if !self.is_collapsible() {
            return false;
        }
        if let Some(first) = self.children_mut().remove(0) {
            self.copy_attributes_from(&first);
        }
        self.children_mut().clear();
        true
    }
}
