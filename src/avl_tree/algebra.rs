//! Join-based tree algebra. Every function here works on subtrees that share one arena and
//! threads subtree heights through explicitly, so no step has to measure a tree.

use crate::arena::Handle;
use crate::avl_tree::node::{attach, child_height, height_from_child, Arena, Node, Side};
use crate::avl_tree::rotation::{rotate, rotate_twice, Rebalance};
use crate::avl_tree::tree::{child_heights, Tree};
use log::trace;
use std::cmp::Ordering;

/// A subtree root paired with its height.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Subtree {
    pub tree: Tree,
    pub height: i32,
}

impl Subtree {
    pub fn new(tree: Tree, height: i32) -> Self {
        Subtree { tree, height }
    }

    pub fn empty() -> Self {
        Subtree::new(None, -1)
    }
}

/// The result of splitting a tree around a wedge.
pub struct Split {
    pub left: Subtree,
    pub found: Option<Handle>,
    pub right: Subtree,
}

/// Detaches both children of `node` and returns them with their heights.
fn expose<T>(arena: &mut Arena<T>, node: Handle, height: i32) -> (Subtree, Subtree) {
    let (left_height, right_height) = child_heights(arena, node, height);
    let left = arena[node].left.take();
    let right = arena[node].right.take();
    for child in left.iter().chain(right.iter()) {
        arena[*child].parent = None;
    }
    arena[node].balance_factor = 0;
    (Subtree::new(left, left_height), Subtree::new(right, right_height))
}

/// Joins `left`, the detached node `pivot`, and `right` into one balanced tree.
///
/// Every value in `left` must be smaller than `pivot`'s and every value in `right` larger. The
/// work done is proportional to the difference in height between `left` and `right`.
pub fn join<T>(arena: &mut Arena<T>, left: Subtree, pivot: Handle, right: Subtree) -> Subtree {
    let joined = if left.height > right.height + 1 {
        match left.tree {
            Some(tall) => join_spine(arena, tall, left.height, pivot, right, Side::Right),
            None => unreachable!(),
        }
    } else if right.height > left.height + 1 {
        match right.tree {
            Some(tall) => join_spine(arena, tall, right.height, pivot, left, Side::Left),
            None => unreachable!(),
        }
    } else {
        attach(arena, pivot, left.tree, left.height, right.tree, right.height);
        (pivot, 1 + left.height.max(right.height))
    };
    let (root, height) = joined;
    arena[root].parent = None;
    Subtree::new(Some(root), height)
}

/// Walks down the `spine` side of the taller tree until the height of the remaining subtree is
/// within one of `short`, hangs `pivot` there, and rebalances on the way back up.
fn join_spine<T>(
    arena: &mut Arena<T>,
    tall: Handle,
    tall_height: i32,
    pivot: Handle,
    short: Subtree,
    spine: Side,
) -> (Handle, i32) {
    let balance_factor = arena[tall].balance_factor;
    let outer_height = child_height(tall_height, balance_factor, !spine);
    let inner = arena[tall].child(spine);
    let inner_height = child_height(tall_height, balance_factor, spine);

    let (sub, sub_height) = if inner_height <= short.height + 1 {
        let (left, right) = match spine {
            Side::Right => (Subtree::new(inner, inner_height), short),
            Side::Left => (short, Subtree::new(inner, inner_height)),
        };
        attach(arena, pivot, left.tree, left.height, right.tree, right.height);
        (pivot, 1 + inner_height.max(short.height))
    } else {
        match inner {
            Some(inner) => join_spine(arena, inner, inner_height, pivot, short, spine),
            None => unreachable!(),
        }
    };

    arena[tall].set_child(spine, Some(sub));
    arena[sub].parent = Some(tall);
    let difference = sub_height - outer_height;
    arena[tall].balance_factor = (difference as i8) * spine.sign();
    if difference <= 1 {
        return (tall, 1 + outer_height.max(sub_height));
    }

    trace!("join rebalancing along the {:?} spine", spine);
    let root = if arena[sub].balance_factor * spine.sign() < 0 {
        rotate_twice(arena, tall, spine, Rebalance::Recompute)
    } else {
        rotate(arena, tall, spine, Rebalance::Recompute)
    };
    // `tall` ends up as the root's child away from the spine, still over its outer subtree
    let tall_height = height_from_child(outer_height, !spine, arena[tall].balance_factor);
    let root_height = height_from_child(tall_height, !spine, arena[root].balance_factor);
    (root, root_height)
}

/// Splits `tree` into the values ordered before and after the wedge described by `compare`.
///
/// `compare` orders the wedge against the value of a node. A node equal to the wedge is
/// detached and returned in `found`; it is in neither half.
pub fn split<T, F>(arena: &mut Arena<T>, tree: Subtree, compare: &F) -> Split
where
    F: Fn(&Arena<T>, Handle) -> Ordering,
{
    let node = match tree.tree {
        Some(node) => node,
        None => {
            return Split {
                left: Subtree::empty(),
                found: None,
                right: Subtree::empty(),
            }
        },
    };
    let ordering = compare(&*arena, node);
    let (left, right) = expose(arena, node, tree.height);
    match ordering {
        Ordering::Equal => Split {
            left,
            found: Some(node),
            right,
        },
        Ordering::Less => {
            let below = split(arena, left, compare);
            Split {
                left: below.left,
                found: below.found,
                right: join(arena, below.right, node, right),
            }
        },
        Ordering::Greater => {
            let below = split(arena, right, compare);
            Split {
                left: join(arena, left, node, below.left),
                found: below.found,
                right: below.right,
            }
        },
    }
}

/// Merges the value sets of two trees. When both trees hold a value, the node from `first` is
/// kept and the duplicate from `second` is freed. Returns the merged tree and the number of
/// duplicates freed.
pub fn union<T>(arena: &mut Arena<T>, first: Subtree, second: Subtree) -> (Subtree, usize)
where
    T: Ord,
{
    let root = match (first.tree, second.tree) {
        (None, _) => return (second, 0),
        (_, None) => return (first, 0),
        (Some(root), Some(_)) => root,
    };
    let (first_left, first_right) = expose(arena, root, first.height);
    let parts = split(arena, second, &|arena: &Arena<T>, node: Handle| {
        arena[root].value.cmp(&arena[node].value)
    });
    let mut duplicates = 0;
    if let Some(duplicate) = parts.found {
        arena[duplicate].dispose();
        arena.free(duplicate);
        duplicates += 1;
    }
    let (left, left_duplicates) = union(arena, first_left, parts.left);
    let (right, right_duplicates) = union(arena, first_right, parts.right);
    (
        join(arena, left, root, right),
        duplicates + left_duplicates + right_duplicates,
    )
}

/// Moves every node of `tree` from `source` into `target`, preserving shape and balance factors.
/// Returns the new root and the number of nodes moved.
pub fn transplant<T>(source: &mut Arena<T>, target: &mut Arena<T>, tree: Tree) -> (Tree, usize) {
    match tree {
        None => (None, 0),
        Some(node) => {
            let Node {
                value,
                left,
                right,
                balance_factor,
                ..
            } = source.free(node);
            let (left, left_len) = transplant(source, target, left);
            let (right, right_len) = transplant(source, target, right);
            let moved = target.allocate(Node {
                value,
                left,
                right,
                parent: None,
                balance_factor,
            });
            for child in left.iter().chain(right.iter()) {
                target[*child].parent = Some(moved);
            }
            (Some(moved), left_len + right_len + 1)
        },
    }
}

/// Copies every node of `tree` from `source` into `target`, preserving shape and balance factors.
pub fn duplicate<T>(source: &Arena<T>, target: &mut Arena<T>, tree: Tree) -> Tree
where
    T: Clone,
{
    let node = tree?;
    let left = duplicate(source, target, source[node].left);
    let right = duplicate(source, target, source[node].right);
    let copy = target.allocate(Node {
        value: source[node].value.clone(),
        left,
        right,
        parent: None,
        balance_factor: source[node].balance_factor,
    });
    for child in left.iter().chain(right.iter()) {
        target[*child].parent = Some(copy);
    }
    Some(copy)
}

#[cfg(test)]
mod tests {
    use super::{duplicate, join, split, transplant, union, Subtree};
    use crate::arena::Handle;
    use crate::avl_tree::node::{Arena, Node};
    use crate::avl_tree::tree::{height, insert, min, successor, Tree};

    fn build(arena: &mut Arena<u32>, values: &[u32]) -> Subtree {
        let mut tree = None;
        for &value in values {
            insert(arena, &mut tree, value);
        }
        Subtree::new(tree, height(arena, tree))
    }

    fn values(arena: &Arena<u32>, tree: Tree) -> Vec<u32> {
        let mut ret = Vec::new();
        let mut curr = tree.map(|root| min(arena, root));
        while let Some(node) = curr {
            ret.push(arena[node].value);
            curr = successor(arena, node);
        }
        ret
    }

    // recomputes heights from scratch and checks every stored factor along the way
    fn checked_height(arena: &Arena<u32>, tree: Tree) -> i32 {
        match tree {
            None => -1,
            Some(node) => {
                for child in arena[node].left.iter().chain(arena[node].right.iter()) {
                    assert_eq!(arena[*child].parent, Some(node));
                }
                let left = checked_height(arena, arena[node].left);
                let right = checked_height(arena, arena[node].right);
                assert_eq!(i32::from(arena[node].balance_factor), right - left);
                assert!((right - left).abs() <= 1);
                1 + left.max(right)
            },
        }
    }

    fn pivot(arena: &mut Arena<u32>, value: u32) -> Handle {
        arena.allocate(Node::new(value, None))
    }

    #[test]
    fn test_join_left_taller() {
        let mut arena = Arena::new();
        let left = build(&mut arena, &(0..128).collect::<Vec<u32>>());
        let right = build(&mut arena, &[129]);
        let pivot = pivot(&mut arena, 128);

        let joined = join(&mut arena, left, pivot, right);
        assert_eq!(checked_height(&arena, joined.tree), joined.height);
        assert_eq!(arena[joined.tree.unwrap()].parent, None);
        assert_eq!(values(&arena, joined.tree), (0..130).collect::<Vec<u32>>());
    }

    #[test]
    fn test_join_right_taller() {
        let mut arena = Arena::new();
        let left = build(&mut arena, &[0, 1]);
        let right = build(&mut arena, &(3..300).collect::<Vec<u32>>());
        let pivot = pivot(&mut arena, 2);

        let joined = join(&mut arena, left, pivot, right);
        assert_eq!(checked_height(&arena, joined.tree), joined.height);
        assert_eq!(values(&arena, joined.tree), (0..300).collect::<Vec<u32>>());
    }

    #[test]
    fn test_join_empty_sides() {
        let mut arena = Arena::new();
        let right = build(&mut arena, &[1, 2, 3, 4, 5, 6, 7]);
        let pivot = pivot(&mut arena, 0);

        let joined = join(&mut arena, Subtree::empty(), pivot, right);
        assert_eq!(checked_height(&arena, joined.tree), joined.height);
        assert_eq!(values(&arena, joined.tree), vec![0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_split() {
        let mut arena = Arena::new();
        let tree = build(&mut arena, &(0..100).collect::<Vec<u32>>());

        let parts = split(&mut arena, tree, &|arena: &Arena<u32>, node: Handle| 37.cmp(&arena[node].value));
        let found = parts.found.unwrap();
        assert_eq!(arena[found].value, 37);
        assert_eq!(checked_height(&arena, parts.left.tree), parts.left.height);
        assert_eq!(checked_height(&arena, parts.right.tree), parts.right.height);
        assert_eq!(values(&arena, parts.left.tree), (0..37).collect::<Vec<u32>>());
        assert_eq!(values(&arena, parts.right.tree), (38..100).collect::<Vec<u32>>());
    }

    #[test]
    fn test_split_missing_wedge() {
        let mut arena = Arena::new();
        let tree = build(&mut arena, &[10, 20, 30]);

        let parts = split(&mut arena, tree, &|arena: &Arena<u32>, node: Handle| 25.cmp(&arena[node].value));
        assert_eq!(parts.found, None);
        assert_eq!(values(&arena, parts.left.tree), vec![10, 20]);
        assert_eq!(values(&arena, parts.right.tree), vec![30]);
    }

    #[test]
    fn test_union_frees_duplicates() {
        let mut arena = Arena::new();
        let first = build(&mut arena, &[1, 3, 5, 7, 9, 11]);
        let second = build(&mut arena, &[0, 3, 6, 9, 12]);

        let (merged, duplicates) = union(&mut arena, first, second);
        assert_eq!(duplicates, 2);
        assert_eq!(checked_height(&arena, merged.tree), merged.height);
        assert_eq!(values(&arena, merged.tree), vec![0, 1, 3, 5, 6, 7, 9, 11, 12]);
        assert_eq!(arena.len(), 9);
    }

    #[test]
    fn test_transplant() {
        let mut source = Arena::new();
        let mut target = Arena::new();
        target.allocate(Node::new(100, None));
        let tree = build(&mut source, &[4, 2, 6, 1, 3, 5, 7, 8]);

        let (moved, len) = transplant(&mut source, &mut target, tree.tree);
        assert_eq!(len, 8);
        assert!(source.is_empty());
        assert_eq!(checked_height(&target, moved), tree.height);
        assert_eq!(values(&target, moved), vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_duplicate() {
        let mut source = Arena::new();
        let mut target = Arena::new();
        let tree = build(&mut source, &[4, 2, 6, 1, 3, 5, 7, 8]);

        let copy = duplicate(&source, &mut target, tree.tree);
        assert_eq!(source.len(), 8);
        assert_eq!(target.len(), 8);
        assert_eq!(checked_height(&target, copy), tree.height);
        assert_eq!(values(&target, copy), values(&source, tree.tree));
    }
}
