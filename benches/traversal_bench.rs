//! Recompute, prune and reduction benchmarks

use augmented_octree::{AugmentedOctree, OctreeKey, TreeConfig};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

fn filled_tree(side: u16) -> AugmentedOctree {
    let config = TreeConfig::new(0.1).unwrap().with_max_depth(10).unwrap();
    let mut tree = AugmentedOctree::new(config);
    for x in 0..side {
        for y in 0..side {
            for z in 0..side {
                let key = OctreeKey::new(x, y, z);
                tree.update_node(key, true);
                tree.set_auxiliary(key, f64::from(x + y + z) + 1.0);
            }
        }
    }
    tree
}

fn benchmark_tree_passes(c: &mut Criterion) {
    let tree = filled_tree(32);

    c.bench_function("recompute_32^3", |b| {
        b.iter_batched(
            || tree.clone(),
            |mut t| black_box(t.recompute_aggregates_bottom_up()),
            BatchSize::LargeInput,
        );
    });

    c.bench_function("prune_32^3", |b| {
        b.iter_batched(
            || tree.clone(),
            |mut t| black_box(t.prune()),
            BatchSize::LargeInput,
        );
    });

    c.bench_function("sum_32^3", |b| b.iter(|| black_box(tree.sum())));

    c.bench_function("normalize_32^3", |b| {
        b.iter_batched(
            || tree.clone(),
            |mut t| {
                t.normalize();
                t
            },
            BatchSize::LargeInput,
        );
    });
}

criterion_group!(benches, benchmark_tree_passes);
criterion_main!(benches);
