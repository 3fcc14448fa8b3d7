//! Error types shared by the tree and registry.

use thiserror::Error;

/// Errors that can occur while building or using an octree.
#[derive(Debug, Error)]
pub enum OctreeError {
    /// Configuration invalid (e.g., non-positive resolution).
    #[error("invalid tree configuration: {0}")]
    InvalidConfiguration(String),

    /// A metric coordinate lies outside the volume addressable by the tree.
    #[error("coordinate ({x}, {y}, {z}) is outside the tree volume")]
    CoordinateOutOfBounds {
        /// X coordinate that was requested.
        x: f64,
        /// Y coordinate that was requested.
        y: f64,
        /// Z coordinate that was requested.
        z: f64,
    },

    /// No factory is registered under the requested tree type name.
    #[error("unknown tree type '{0}'")]
    UnknownTreeType(String),
}

impl OctreeError {
    /// Helper for constructing configuration errors.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        OctreeError::InvalidConfiguration(msg.into())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, OctreeError>;
