//! Tree-type registry
//!
//! Maps a tree type name to a factory so a generic loader can build the
//! right tree for a name it reads from a file header. Registration is an
//! explicit call made once at start-up (see [`register_builtin_types`]).

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use tracing::debug;

use crate::config::TreeConfig;
use crate::error::{OctreeError, Result};
use crate::node::{AugmentedNode, OccupancyNode, OctreeNode};
use crate::tree::Octree;

/// Object-safe view of any tree, independent of its node type.
pub trait AbstractOctree: fmt::Debug + Send + Sync {
    /// Registry name of the tree type.
    fn tree_type(&self) -> &'static str;

    /// Tree configuration.
    fn config(&self) -> &TreeConfig;

    /// Total number of nodes.
    fn num_nodes(&self) -> usize;

    /// Number of leaves.
    fn num_leaves(&self) -> usize;

    /// Drop every node.
    fn clear(&mut self);

    /// Upcast for downcasting to the concrete tree.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting to the concrete tree.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<N> AbstractOctree for Octree<N>
where
    N: OctreeNode + Send + Sync + 'static,
{
    fn tree_type(&self) -> &'static str {
        N::TREE_TYPE
    }

    fn config(&self) -> &TreeConfig {
        Octree::config(self)
    }

    fn num_nodes(&self) -> usize {
        Octree::num_nodes(self)
    }

    fn num_leaves(&self) -> usize {
        Octree::num_leaves(self)
    }

    fn clear(&mut self) {
        Octree::clear(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Builds an empty tree for a configuration.
pub type TreeFactory = fn(&TreeConfig) -> Box<dyn AbstractOctree>;

/// Metadata describing a registered tree type.
#[derive(Debug, Clone)]
pub struct TreeTypeInfo {
    /// Registered name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
}

#[derive(Debug)]
struct TreeEntry {
    factory: TreeFactory,
    description: String,
}

/// Registry of constructible tree types.
#[derive(Debug, Default)]
pub struct TreeRegistry {
    entries: HashMap<String, TreeEntry>,
}

impl TreeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Create a registry holding the built-in tree types.
    pub fn with_builtin_types() -> Self {
        let mut registry = Self::new();
        register_builtin_types(&mut registry);
        registry
    }

    /// Register `factory` under `name`. An existing registration is kept
    /// and `false` returned, so repeated start-up calls are harmless.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        factory: TreeFactory,
    ) -> bool {
        let name = name.into();
        if self.entries.contains_key(&name) {
            debug!(tree_type = %name, "tree type already registered");
            return false;
        }
        debug!(tree_type = %name, "registered tree type");
        self.entries.insert(
            name,
            TreeEntry {
                factory,
                description: description.into(),
            },
        );
        true
    }

    /// Register a tree type under its node's [`OctreeNode::TREE_TYPE`] name.
    pub fn register_node_type<N>(&mut self, description: impl Into<String>) -> bool
    where
        N: OctreeNode + Send + Sync + 'static,
    {
        self.register(N::TREE_TYPE, description, build_tree::<N>)
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Build an empty tree of the named type.
    pub fn create(&self, name: &str, config: &TreeConfig) -> Result<Box<dyn AbstractOctree>> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| OctreeError::UnknownTreeType(name.to_string()))?;
        Ok((entry.factory)(config))
    }

    /// List all registered types, sorted by name.
    pub fn list(&self) -> Vec<TreeTypeInfo> {
        let mut infos: Vec<_> = self
            .entries
            .iter()
            .map(|(name, entry)| TreeTypeInfo {
                name: name.clone(),
                description: entry.description.clone(),
            })
            .collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        infos
    }
}

/// Register the tree types this crate provides.
pub fn register_builtin_types(registry: &mut TreeRegistry) {
    registry.register_node_type::<OccupancyNode>("Occupancy-only octree.");
    registry.register_node_type::<AugmentedNode>(
        "Octree whose voxels carry an auxiliary scalar next to occupancy.",
    );
}

/// Process-wide registry holding the built-in types, filled on first use.
pub fn global_registry() -> &'static TreeRegistry {
    static REGISTRY: OnceLock<TreeRegistry> = OnceLock::new();
    REGISTRY.get_or_init(TreeRegistry::with_builtin_types)
}

fn build_tree<N>(config: &TreeConfig) -> Box<dyn AbstractOctree>
where
    N: OctreeNode + Send + Sync + 'static,
{
    Box::new(Octree::<N>::new(config.clone()))
}
