//! Occupancy node augmented with an auxiliary scalar
//!
//! The auxiliary value is tracked as an explicit set/unset state rather than
//! overloading zero. Reading an unset value yields `0.0`, and only set values
//! take part in averaging, so unset children never drag a mean toward zero.
//!
//! Binary record (native byte order, no framing):
//!   [log-odds: f32][auxiliary: f64]
//! The record has no set flag; an unset value is written as `0.0` and a
//! decoded `0.0` is read back as unset.

use std::io::{self, Read, Write};

use super::{ChildSlots, OctreeNode};

/// Tree node carrying occupancy plus an auxiliary per-voxel scalar.
#[derive(Debug, Clone, Default)]
pub struct AugmentedNode {
    log_odds: f32,
    auxiliary: Option<f64>,
    children: ChildSlots<AugmentedNode>,
}

impl AugmentedNode {
    /// Create a leaf with the given log-odds and an unset auxiliary value.
    pub fn new(log_odds: f32) -> Self {
        Self {
            log_odds,
            ..Self::default()
        }
    }

    /// Builder-style variant of [`AugmentedNode::set_auxiliary`].
    pub fn with_auxiliary(mut self, value: f64) -> Self {
        self.set_auxiliary(value);
        self
    }

    /// Current auxiliary value (`0.0` when unset).
    #[inline]
    pub fn auxiliary(&self) -> f64 {
        self.auxiliary.unwrap_or(0.0)
    }

    /// Current auxiliary value, `None` when unset.
    #[inline]
    pub fn auxiliary_value(&self) -> Option<f64> {
        self.auxiliary
    }

    /// Overwrite the auxiliary value and mark it set, zero included.
    #[inline]
    pub fn set_auxiliary(&mut self, value: f64) {
        self.auxiliary = Some(value);
    }

    /// Return the auxiliary value to the unset state.
    #[inline]
    pub fn clear_auxiliary(&mut self) {
        self.auxiliary = None;
    }

    /// Add `delta` to the auxiliary value (an unset value counts as zero).
    #[inline]
    pub fn accumulate_auxiliary(&mut self, delta: f64) {
        self.auxiliary = Some(self.auxiliary() + delta);
    }

    /// Whether the auxiliary value has been set.
    #[inline]
    pub fn is_auxiliary_set(&self) -> bool {
        self.auxiliary.is_some()
    }

    /// Mean auxiliary value over immediate children whose value is set.
    /// `None` when no child has one. Does not recurse.
    pub fn average_child_auxiliary(&self) -> Option<f64> {
        let (sum, count) = self
            .children
            .iter()
            .filter_map(|(_, child)| child.auxiliary)
            .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
        if count > 0 {
            Some(sum / count as f64)
        } else {
            None
        }
    }

    /// Set own auxiliary value to [`AugmentedNode::average_child_auxiliary`],
    /// becoming unset when no child is set.
    pub fn recompute_auxiliary_from_children(&mut self) {
        self.auxiliary = self.average_child_auxiliary();
    }
}

/// Equal when occupancy and auxiliary value match; children are ignored.
/// An unset value compares as `0.0`, the same way it is encoded.
impl PartialEq for AugmentedNode {
    fn eq(&self, other: &Self) -> bool {
        self.log_odds == other.log_odds && self.auxiliary() == other.auxiliary()
    }
}

impl OctreeNode for AugmentedNode {
    const TREE_TYPE: &'static str = "AugmentedOctree";

    fn log_odds(&self) -> f32 {
        self.log_odds
    }

    fn set_log_odds(&mut self, value: f32) {
        self.log_odds = value;
    }

    fn children(&self) -> &ChildSlots<Self> {
        &self.children
    }

    fn children_mut(&mut self) -> &mut ChildSlots<Self> {
        &mut self.children
    }

    fn copy_attributes_from(&mut self, other: &Self) {
        self.log_odds = other.log_odds;
        self.auxiliary = other.auxiliary;
    }

    fn write_data<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.log_odds.to_ne_bytes())?;
        writer.write_all(&self.auxiliary().to_ne_bytes())
    }

    fn read_data<R: Read>(&mut self, reader: &mut R) -> io::Result<()> {
        let mut occupancy = [0u8; 4];
        let mut auxiliary = [0u8; 8];
        reader.read_exact(&mut occupancy)?;
        reader.read_exact(&mut auxiliary)?;
        self.log_odds = f32::from_ne_bytes(occupancy);
        let value = f64::from_ne_bytes(auxiliary);
        self.auxiliary = (value != 0.0).then_some(value);
        Ok(())
    }

    fn update_aggregates(&mut self) {
        self.update_occupancy_children();
        self.recompute_auxiliary_from_children();
    }

    // The merged leaf takes slot 0's occupancy and the mean of the set
    // children's auxiliary values.
    fn prune(&mut self) -> bool {
        if !self.is_collapsible() {
            return false;
        }
        let mean = self.average_child_auxiliary();
        if let Some(first) = self.children.remove(0) {
            self.copy_attributes_from(&first);
        }
        self.auxiliary = mean;
        self.children.clear();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unset() {
        let node = AugmentedNode::default();
        assert!(!node.is_auxiliary_set());
        assert_eq!(node.auxiliary(), 0.0);
        assert_eq!(node.auxiliary_value(), None);
    }

    #[test]
    fn explicit_zero_is_set() {
        let mut node = AugmentedNode::default();
        node.set_auxiliary(0.0);
        assert!(node.is_auxiliary_set());
        node.clear_auxiliary();
        assert!(!node.is_auxiliary_set());
    }

    #[test]
    fn accumulate_adds() {
        let mut node = AugmentedNode::default();
        node.accumulate_auxiliary(1.5);
        node.accumulate_auxiliary(-0.25);
        assert_eq!(node.auxiliary(), 1.25);
    }

    #[test]
    fn average_skips_unset_children() {
        let mut parent = AugmentedNode::default();
        parent.children_mut().insert(0, AugmentedNode::new(0.0).with_auxiliary(4.0));
        parent.children_mut().insert(3, AugmentedNode::new(0.0));
        parent.children_mut().insert(5, AugmentedNode::new(0.0).with_auxiliary(2.0));
        assert_eq!(parent.average_child_auxiliary(), Some(3.0));

        parent.recompute_auxiliary_from_children();
        assert_eq!(parent.auxiliary(), 3.0);
    }

    #[test]
    fn average_without_set_children_is_none() {
        let mut parent = AugmentedNode::new(0.0).with_auxiliary(9.0);
        parent.children_mut().insert(1, AugmentedNode::default());
        assert_eq!(parent.average_child_auxiliary(), None);
        parent.recompute_auxiliary_from_children();
        assert!(!parent.is_auxiliary_set());
        assert_eq!(parent.auxiliary(), 0.0);
    }

    #[test]
    fn equality_ignores_children() {
        let mut a = AugmentedNode::new(0.5).with_auxiliary(1.0);
        let b = AugmentedNode::new(0.5).with_auxiliary(1.0);
        a.children_mut().insert(2, AugmentedNode::default());
        assert_eq!(a, b);
        assert_ne!(a, AugmentedNode::new(0.5).with_auxiliary(2.0));
        assert_ne!(a, AugmentedNode::new(0.6).with_auxiliary(1.0));
    }

    #[test]
    fn equality_reads_unset_as_zero() {
        let unset = AugmentedNode::new(0.5);
        let zero = AugmentedNode::new(0.5).with_auxiliary(0.0);
        assert_eq!(unset, zero);
        assert!(zero.is_auxiliary_set());
    }

    #[test]
    fn copy_takes_both_attributes() {
        let mut target = AugmentedNode::new(-2.0);
        target.copy_attributes_from(&AugmentedNode::new(1.0).with_auxiliary(0.3));
        assert_eq!(target.log_odds(), 1.0);
        assert_eq!(target.auxiliary_value(), Some(0.3));
    }
}
