//! Tree-wide parameters
//!
//! Resolution and depth fix the addressable volume; the occupancy
//! parameters fix how hit/miss measurements move a voxel's log-odds.

use crate::error::{OctreeError, Result};
use crate::occupancy::{logodds, probability};

/// Deepest tree supported by 16-bit keys.
pub const MAX_TREE_DEPTH: u8 = 16;

/// Sensor-model and clamping parameters, stored as log-odds.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OccupancyParams {
    hit: f32,
    miss: f32,
    clamping_min: f32,
    clamping_max: f32,
    occupancy_threshold: f32,
}

impl Default for OccupancyParams {
    fn default() -> Self {
        Self {
            hit: logodds(0.7),
            miss: logodds(0.4),
            clamping_min: logodds(0.1192),
            clamping_max: logodds(0.971),
            occupancy_threshold: logodds(0.5),
        }
    }
}

impl OccupancyParams {
    /// Build parameters from probabilities.
    pub fn from_probabilities(
        prob_hit: f64,
        prob_miss: f64,
        clamping_min: f64,
        clamping_max: f64,
        occupancy_threshold: f64,
    ) -> Result<Self> {
        for (name, p) in [
            ("prob_hit", prob_hit),
            ("prob_miss", prob_miss),
            ("clamping_min", clamping_min),
            ("clamping_max", clamping_max),
            ("occupancy_threshold", occupancy_threshold),
        ] {
            if !(p > 0.0 && p < 1.0) {
                return Err(OctreeError::invalid_config(format!(
                    "{} must be a probability in (0, 1), got {}",
                    name, p
                )));
            }
        }
        if clamping_min > clamping_max {
            return Err(OctreeError::invalid_config(format!(
                "clamping_min {} exceeds clamping_max {}",
                clamping_min, clamping_max
            )));
        }
        Ok(Self {
            hit: logodds(prob_hit),
            miss: logodds(prob_miss),
            clamping_min: logodds(clamping_min),
            clamping_max: logodds(clamping_max),
            occupancy_threshold: logodds(occupancy_threshold),
        })
    }

    /// Log-odds added for an occupied measurement.
    pub fn hit_logodds(&self) -> f32 {
        self.hit
    }

    /// Log-odds added for a free measurement.
    pub fn miss_logodds(&self) -> f32 {
        self.miss
    }

    /// Lower clamping bound in log-odds.
    pub fn clamping_min_logodds(&self) -> f32 {
        self.clamping_min
    }

    /// Upper clamping bound in log-odds.
    pub fn clamping_max_logodds(&self) -> f32 {
        self.clamping_max
    }

    /// Threshold above which a node counts as occupied, in log-odds.
    pub fn occupancy_threshold_logodds(&self) -> f32 {
        self.occupancy_threshold
    }

    /// Threshold above which a node counts as occupied, as a probability.
    pub fn occupancy_threshold(&self) -> f64 {
        probability(self.occupancy_threshold)
    }

    /// Apply a log-odds update and clamp the result.
    pub fn integrate(&self, current: f32, delta: f32) -> f32 {
        (current + delta).clamp(self.clamping_min, self.clamping_max)
    }
}

/// Configuration parameters shared by every node of a tree.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeConfig {
    /// Edge length of a voxel at the finest level.
    pub resolution: f64,
    /// Number of levels below the root (1..=16).
    pub max_depth: u8,
    /// Measurement-integration parameters.
    pub occupancy: OccupancyParams,
}

impl TreeConfig {
    /// Construct a full-depth configuration for the given resolution.
    pub fn new(resolution: f64) -> Result<Self> {
        if !resolution.is_finite() || resolution <= 0.0 {
            return Err(OctreeError::invalid_config(format!(
                "resolution must be finite and > 0, got {}",
                resolution
            )));
        }
        Ok(Self {
            resolution,
            max_depth: MAX_TREE_DEPTH,
            occupancy: OccupancyParams::default(),
        })
    }

    /// Limit the tree depth (smaller volume, shallower recursion).
    pub fn with_max_depth(mut self, max_depth: u8) -> Result<Self> {
        if max_depth == 0 || max_depth > MAX_TREE_DEPTH {
            return Err(OctreeError::invalid_config(format!(
                "max depth must be in 1..={}, got {}",
                MAX_TREE_DEPTH, max_depth
            )));
        }
        self.max_depth = max_depth;
        Ok(self)
    }

    /// Replace the occupancy parameters.
    pub fn with_occupancy(mut self, occupancy: OccupancyParams) -> Self {
        self.occupancy = occupancy;
        self
    }

    /// Key of the volume centre along each axis (`2^(max_depth - 1)`).
    pub fn center_key(&self) -> u32 {
        1u32 << (self.max_depth - 1)
    }

    /// Edge length of a node at `depth` (root = 0).
    pub fn node_size(&self, depth: u8) -> f64 {
        self.resolution * f64::from(1u32 << (self.max_depth - depth.min(self.max_depth)))
    }
}
