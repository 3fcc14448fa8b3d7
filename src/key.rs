//! Discrete voxel addressing
//!
//! A key holds one 16-bit index per axis at the finest level. Bit
//! `max_depth - 1 - depth` of each axis selects the child slot when
//! descending from a node at `depth`:
//!   slot = x_bit | y_bit << 1 | z_bit << 2

use std::fmt;

use crate::config::TreeConfig;

/// Address of a voxel at the finest tree level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OctreeKey(pub [u16; 3]);

impl OctreeKey {
    /// Create a key from per-axis indices.
    pub fn new(x: u16, y: u16, z: u16) -> Self {
        Self([x, y, z])
    }

    /// Key of the root node (the volume centre).
    pub fn root(config: &TreeConfig) -> Self {
        let c = config.center_key() as u16;
        Self([c, c, c])
    }

    /// Child slot (0..8) to follow from a node at `depth`.
    #[inline]
    pub fn child_index(&self, depth: u8, max_depth: u8) -> usize {
        debug_assert!(depth < max_depth, "leaf level has no child slots");
        let bit = max_depth - 1 - depth;
        let mut slot = 0;
        for (axis, &k) in self.0.iter().enumerate() {
            if k & (1 << bit) != 0 {
                slot |= 1 << axis;
            }
        }
        slot
    }

    /// Centre key of the child in `slot` of the node at `parent_depth`
    /// whose centre key is `self`.
    pub fn child_key(&self, slot: usize, parent_depth: u8, config: &TreeConfig) -> Self {
        let offset = config.center_key() >> (parent_depth + 1);
        let mut out = self.0;
        for (axis, k) in out.iter_mut().enumerate() {
            let kv = u32::from(*k);
            *k = if slot & (1 << axis) != 0 {
                (kv + offset) as u16
            } else if offset == 0 {
                (kv - 1) as u16
            } else {
                (kv - offset) as u16
            };
        }
        Self(out)
    }
}

impl fmt::Display for OctreeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.0[0], self.0[1], self.0[2])
    }
}

/// Map one metric coordinate to a key index, `None` outside the volume.
pub fn coord_to_key_axis(coord: f64, config: &TreeConfig) -> Option<u16> {
    let center = i64::from(config.center_key());
    let scaled = (coord / config.resolution).floor();
    if !scaled.is_finite() {
        return None;
    }
    let index = scaled as i64 + center;
    if index >= 0 && index < 2 * center {
        Some(index as u16)
    } else {
        None
    }
}

/// Metric centre of the node containing `key` at `depth`.
pub fn key_to_coord_axis(key: u16, depth: u8, config: &TreeConfig) -> f64 {
    let center = i64::from(config.center_key());
    let offset = i64::from(key) - center;
    if depth == 0 {
        return 0.0;
    }
    if depth >= config.max_depth {
        return (offset as f64 + 0.5) * config.resolution;
    }
    let span = 1i64 << (config.max_depth - depth);
    (offset.div_euclid(span) as f64 + 0.5) * config.node_size(depth)
}
