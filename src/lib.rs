//! # Augmented probabilistic octree
//!
//! A sparse 8-ary tree over a bounded cubic volume. Every voxel carries an
//! occupancy estimate (log-odds) and, in the augmented variant, a second
//! independent scalar ("auxiliary value").
//!
//! ## Core Model
//!
//! 1. **Lazy aggregates**: edits touch leaves only; interior occupancy and
//!    auxiliary aggregates are refreshed by one bottom-up pass per batch
//! 2. **Occupancy-driven pruning**: eight leaf children with equal occupancy
//!    collapse into their parent; auxiliary values are averaged, never compared
//! 3. **Explicit unset state**: an auxiliary value is either set or unset;
//!    unset values are skipped when averaging
//! 4. **Leaf reductions**: sum / min / max / scale / normalize over leaves
//!
//! ## Usage Example
//!
//! ```
//! use augmented_octree::{AugmentedOctree, TreeConfig};
//!
//! let mut tree = AugmentedOctree::new(TreeConfig::new(0.1)?);
//! let key = tree.coord_to_key_checked([0.25, -1.0, 0.5])?;
//! tree.update_node(key, true);
//! tree.set_auxiliary(key, 0.8);
//! tree.recompute_aggregates_bottom_up();
//!
//! assert_eq!(tree.sum(), 0.8);
//! assert_eq!(tree.root().map(|root| root.auxiliary()), Some(0.8));
//! # Ok::<(), augmented_octree::OctreeError>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod config;     // Resolution, depth and sensor-model parameters
pub mod error;      // Shared error type
pub mod key;        // Discrete voxel addressing
pub mod node;       // Node variants and their capability trait
pub mod occupancy;  // Log-odds arithmetic
pub mod registry;   // Tree-type registry
pub mod tree;       // Octree container and reductions

// Re-exports for convenience
pub use config::{OccupancyParams, TreeConfig, MAX_TREE_DEPTH};
pub use error::{OctreeError, Result};
pub use key::OctreeKey;
pub use node::{AugmentedNode, ChildSlots, OccupancyNode, OctreeNode, NUM_CHILDREN};
pub use registry::{global_registry, register_builtin_types, AbstractOctree, TreeRegistry};
pub use tree::{AugmentedOctree, LeafRef, Leaves, OccupancyOctree, Octree};
