use avl_join::avl_tree::AvlTree;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::Rng;
use std::collections::BTreeSet;

const NUM_OF_OPERATIONS: usize = 1000;

fn random_values() -> Vec<u32> {
    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
    (0..NUM_OF_OPERATIONS).map(|_| rng.next_u32()).collect()
}

fn bench_btreeset_insert(c: &mut Criterion) {
    let values = random_values();
    c.bench_function("bench btreeset insert", move |b| {
        b.iter(|| {
            let mut set = BTreeSet::new();
            for value in &values {
                set.insert(*value);
            }
        })
    });
}

fn bench_btreeset_contains(c: &mut Criterion) {
    let values = random_values();
    let set: BTreeSet<u32> = values.iter().cloned().collect();
    c.bench_function("bench btreeset contains", move |b| {
        b.iter(|| {
            for value in &values {
                black_box(set.contains(value));
            }
        })
    });
}

fn bench_btreeset_remove(c: &mut Criterion) {
    let values = random_values();
    c.bench_function("bench btreeset remove", move |b| {
        b.iter_with_setup(
            || values.iter().cloned().collect::<BTreeSet<u32>>(),
            |mut set| {
                for value in &values {
                    set.remove(value);
                }
            },
        )
    });
}

fn bench_avl_tree_insert(c: &mut Criterion) {
    let values = random_values();
    c.bench_function("bench avl_tree insert", move |b| {
        b.iter(|| {
            let mut tree = AvlTree::new();
            for value in &values {
                tree.insert(*value);
            }
        })
    });
}

fn bench_avl_tree_contains(c: &mut Criterion) {
    let values = random_values();
    let tree: AvlTree<u32> = values.iter().cloned().collect();
    c.bench_function("bench avl_tree contains", move |b| {
        b.iter(|| {
            for value in &values {
                black_box(tree.contains(value));
            }
        })
    });
}

fn bench_avl_tree_remove(c: &mut Criterion) {
    let values = random_values();
    c.bench_function("bench avl_tree remove", move |b| {
        b.iter_with_setup(
            || values.iter().cloned().collect::<AvlTree<u32>>(),
            |mut tree| {
                for value in &values {
                    tree.remove(value);
                }
            },
        )
    });
}

fn bench_avl_tree_split_join(c: &mut Criterion) {
    let tree: AvlTree<u32> = (0..NUM_OF_OPERATIONS as u32 * 2).map(|i| i * 2).collect();
    c.bench_function("bench avl_tree split join", move |b| {
        b.iter_with_setup(
            || tree.clone(),
            |tree| {
                let (_, left, right) = AvlTree::split(tree, &1001);
                black_box(AvlTree::join(left, right, 1001).is_ok());
            },
        )
    });
}

fn bench_avl_tree_union(c: &mut Criterion) {
    let values = random_values();
    let first: AvlTree<u32> = values[..NUM_OF_OPERATIONS / 2].iter().cloned().collect();
    let second: AvlTree<u32> = values[NUM_OF_OPERATIONS / 2..].iter().cloned().collect();
    c.bench_function("bench avl_tree union", move |b| {
        b.iter_with_setup(
            || (first.clone(), second.clone()),
            |(first, second)| black_box(AvlTree::union(first, second).len()),
        )
    });
}

criterion_group!(
    benches,
    bench_btreeset_insert,
    bench_btreeset_contains,
    bench_btreeset_remove,
    bench_avl_tree_insert,
    bench_avl_tree_contains,
    bench_avl_tree_remove,
    bench_avl_tree_split_join,
    bench_avl_tree_union,
);
criterion_main!(benches);
