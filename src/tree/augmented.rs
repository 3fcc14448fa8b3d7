//! Auxiliary-value operations on [`AugmentedOctree`]
//!
//! Reductions walk leaves only; interior aggregates are ignored and must be
//! refreshed with `recompute_aggregates_bottom_up` after a rescale if they
//! are needed.
//!
//! `min`/`max` seed their running extreme at `0.0`: a tree whose leaves are
//! all positive reports a minimum of `0.0`, all negative a maximum of `0.0`.
//! [`AugmentedOctree::auxiliary_range`] seeds from the first set leaf instead.

use tracing::warn;

use super::AugmentedOctree;
use crate::key::OctreeKey;
use crate::node::AugmentedNode;

impl AugmentedOctree {
    /// Set the auxiliary value of the node at `key`.
    /// Returns `None` without creating anything when the key is absent.
    pub fn set_auxiliary(&mut self, key: OctreeKey, value: f64) -> Option<&mut AugmentedNode> {
        let node = self.search_mut(key)?;
        node.set_auxiliary(value);
        Some(node)
    }

    /// Coordinate variant of [`AugmentedOctree::set_auxiliary`]; `None` also
    /// when `point` is outside the volume.
    pub fn set_auxiliary_at(&mut self, point: [f64; 3], value: f64) -> Option<&mut AugmentedNode> {
        let key = self.coord_to_key(point)?;
        self.set_auxiliary(key, value)
    }

    /// Add `delta` to the auxiliary value of the node at `key`, if present.
    pub fn accumulate_auxiliary(&mut self, key: OctreeKey, delta: f64) -> Option<&mut AugmentedNode> {
        let node = self.search_mut(key)?;
        node.accumulate_auxiliary(delta);
        Some(node)
    }

    /// Sum of leaf auxiliary values (unset leaves add nothing).
    pub fn sum(&self) -> f64 {
        self.leaves().map(|leaf| leaf.node.auxiliary()).sum()
    }

    /// Largest leaf auxiliary value, seeded at `0.0`.
    pub fn max(&self) -> f64 {
        self.leaves()
            .map(|leaf| leaf.node.auxiliary())
            .fold(0.0, f64::max)
    }

    /// Smallest leaf auxiliary value, seeded at `0.0`.
    pub fn min(&self) -> f64 {
        self.leaves()
            .map(|leaf| leaf.node.auxiliary())
            .fold(0.0, f64::min)
    }

    /// `(min, max)` over set leaves, `None` when no leaf is set.
    pub fn auxiliary_range(&self) -> Option<(f64, f64)> {
        self.leaves()
            .filter_map(|leaf| leaf.node.auxiliary_value())
            .fold(None, |range, v| match range {
                None => Some((v, v)),
                Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
            })
    }

    /// Multiply every set leaf's auxiliary value by `factor`.
    pub fn scale(&mut self, factor: f64) {
        self.for_each_leaf_mut(|leaf| {
            if let Some(v) = leaf.auxiliary_value() {
                leaf.set_auxiliary(v * factor);
            }
        });
    }

    /// Divide every set leaf's auxiliary value by the leaf sum.
    ///
    /// A zero sum is not guarded: set leaves become NaN or infinite.
    pub fn normalize(&mut self) {
        let total = self.sum();
        if total == 0.0 {
            warn!("normalizing auxiliary values with a zero total");
        }
        self.for_each_leaf_mut(|leaf| {
            if let Some(v) = leaf.auxiliary_value() {
                leaf.set_auxiliary(v / total);
            }
        });
    }
}
