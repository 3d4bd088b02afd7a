use avl_join::avl_tree::AvlTree;
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::ops::Range;

const FUZZ_RANGE: Range<usize> = 0..500;

#[derive(Copy, Clone, Debug)]
enum Op {
    Insert(u32),
    Remove(u32),
    Take(u32),
    Search(u32),
    Successor(u32),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    proptest::prop_oneof![
        (0u32..200).prop_map(Op::Insert),
        (0u32..200).prop_map(Op::Remove),
        (0u32..200).prop_map(Op::Take),
        (0u32..200).prop_map(Op::Search),
        (0u32..200).prop_map(Op::Successor),
    ]
}

fn assert_valid(tree: &AvlTree<u32>) -> Result<(), TestCaseError> {
    if let Err(violation) = tree.check() {
        return Err(TestCaseError::fail(format!("{}\n{}", violation, tree)));
    }
    Ok(())
}

proptest::proptest! {
    #![proptest_config(ProptestConfig {
        max_shrink_iters: 65536,
        .. ProptestConfig::default()
    })]

    #[test]
    fn btreeset_equivalence(ops in proptest::collection::vec(op_strategy(), FUZZ_RANGE)) {
        let mut tree = AvlTree::new();
        let mut expected = BTreeSet::new();
        for op in ops {
            match op {
                Op::Insert(value) => prop_assert_eq!(tree.insert(value), expected.insert(value)),
                Op::Remove(value) => prop_assert_eq!(tree.remove(&value), expected.remove(&value)),
                Op::Take(value) => prop_assert_eq!(tree.take(&value), expected.take(&value)),
                Op::Search(value) => {
                    let found = tree.search(&value).map(|value| *value);
                    prop_assert_eq!(found, expected.get(&value).cloned());
                },
                Op::Successor(value) => {
                    let successor = if expected.contains(&value) {
                        expected.range(value + 1..).next().cloned()
                    } else {
                        None
                    };
                    prop_assert_eq!(tree.successor(&value).map(|value| *value), successor);
                },
            }
            assert_valid(&tree)?;
            prop_assert_eq!(tree.len(), expected.len());
        }
        prop_assert_eq!(tree.min().map(|value| *value), expected.iter().next().cloned());
        prop_assert_eq!(tree.max().map(|value| *value), expected.iter().next_back().cloned());
        prop_assert!(tree.iter().map(|value| *value).eq(expected.iter().cloned()));
    }

    #[test]
    fn insert_then_remove_all(values in proptest::collection::vec(any::<u32>(), FUZZ_RANGE)) {
        let mut tree = AvlTree::new();
        for value in &values {
            tree.insert(*value);
            assert_valid(&tree)?;
        }
        for value in values.iter().rev() {
            tree.remove(value);
            assert_valid(&tree)?;
        }
        prop_assert!(tree.is_empty());
        prop_assert_eq!(tree.height(), -1);
    }

    #[test]
    fn height_is_logarithmic(values in proptest::collection::btree_set(any::<u32>(), 1..1000)) {
        let tree: AvlTree<u32> = values.iter().cloned().collect();
        let bound = 1.44 * ((values.len() + 2) as f64).log2();
        prop_assert!(f64::from(tree.height()) < bound);
    }

    #[test]
    fn split_then_join(
        values in proptest::collection::btree_set(0u32..10_000, 2..300),
        wedge in 0u32..10_000,
    ) {
        let tree: AvlTree<u32> = values.iter().cloned().collect();
        let (found, left, right) = AvlTree::split(tree, &wedge);
        prop_assert_eq!(found, values.contains(&wedge));
        assert_valid(&left)?;
        assert_valid(&right)?;
        prop_assert!(left.shares_storage_with(&right));
        prop_assert!(left.iter().map(|value| *value).eq(values.range(..wedge).cloned()));
        prop_assert!(right.iter().map(|value| *value).eq(values.range(wedge + 1..).cloned()));

        if !left.is_empty() && !right.is_empty() {
            let joined = AvlTree::join(left, right, wedge).unwrap();
            assert_valid(&joined)?;
            let mut expected = values.clone();
            expected.insert(wedge);
            prop_assert!(joined.iter().map(|value| *value).eq(expected.iter().cloned()));
        }
    }

    #[test]
    fn union_is_set_union(
        first in proptest::collection::btree_set(0u32..2000, FUZZ_RANGE),
        second in proptest::collection::btree_set(0u32..2000, FUZZ_RANGE),
    ) {
        let first_tree: AvlTree<u32> = first.iter().cloned().collect();
        let second_tree: AvlTree<u32> = second.iter().cloned().collect();
        let union = AvlTree::union(first_tree, second_tree);
        assert_valid(&union)?;
        prop_assert!(union.iter().map(|value| *value).eq(first.union(&second).cloned()));
        prop_assert_eq!(union.len(), first.union(&second).count());
    }
}
