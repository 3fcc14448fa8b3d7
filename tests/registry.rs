//! Type-name dispatch

use augmented_octree::{
    global_registry, AugmentedOctree, OccupancyOctree, OctreeError, OctreeKey,
    TreeConfig, TreeRegistry,
};

#[test]
fn create_dispatches_by_name() {
    let registry = TreeRegistry::with_builtin_types();
    let config = TreeConfig::new(0.2).unwrap();

    let tree = registry.create("AugmentedOctree", &config).unwrap();
    assert_eq!(tree.tree_type(), "AugmentedOctree");
    assert_eq!(tree.config(), &config);
    assert!(tree.as_any().downcast_ref::<AugmentedOctree>().is_some());
    assert!(tree.as_any().downcast_ref::<OccupancyOctree>().is_none());

    let plain = registry.create("OccupancyOctree", &config).unwrap();
    assert!(plain.as_any().downcast_ref::<OccupancyOctree>().is_some());
}

#[test]
fn created_tree_is_usable_after_downcast() {
    let mut tree = global_registry()
        .create("AugmentedOctree", &TreeConfig::new(0.1).unwrap())
        .unwrap();
    {
        let augmented = tree
            .as_any_mut()
            .downcast_mut::<AugmentedOctree>()
            .expect("registry built an augmented tree");
        let key = OctreeKey::new(10, 20, 30);
        augmented.update_node(key, true);
        augmented.set_auxiliary(key, 0.5);
    }
    assert_eq!(tree.num_nodes(), 17);
    assert_eq!(tree.num_leaves(), 1);
    tree.clear();
    assert_eq!(tree.num_nodes(), 0);
}

#[test]
fn unknown_name_is_an_error() {
    let registry = TreeRegistry::with_builtin_types();
    let config = TreeConfig::new(0.1).unwrap();
    match registry.create("ColorOctree", &config) {
        Err(OctreeError::UnknownTreeType(name)) => assert_eq!(name, "ColorOctree"),
        other => panic!("expected UnknownTreeType, got {:?}", other),
    }
}

#[test]
fn empty_registry_knows_nothing() {
    let registry = TreeRegistry::new();
    assert!(registry.list().is_empty());
    assert!(!registry.contains("AugmentedOctree"));
}
