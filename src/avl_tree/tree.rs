use crate::arena::Handle;
use crate::avl_tree::node::{child_height, replace_child, Arena, Node, Side};
use crate::avl_tree::rotation::{rotate, rotate_twice, Rebalance};
use crate::stack::Stack;
use std::cmp::Ordering;
use std::mem;

pub type Tree = Option<Handle>;

pub fn search<T>(arena: &Arena<T>, tree: Tree, value: &T) -> Option<Handle>
where
    T: Ord,
{
    let mut curr = tree;
    while let Some(node) = curr {
        curr = match value.cmp(&arena[node].value) {
            Ordering::Less => arena[node].left,
            Ordering::Greater => arena[node].right,
            Ordering::Equal => return Some(node),
        };
    }
    None
}

pub fn min<T>(arena: &Arena<T>, node: Handle) -> Handle {
    let mut curr = node;
    while let Some(left) = arena[curr].left {
        curr = left;
    }
    curr
}

pub fn max<T>(arena: &Arena<T>, node: Handle) -> Handle {
    let mut curr = node;
    while let Some(right) = arena[curr].right {
        curr = right;
    }
    curr
}

/// Returns the node holding the smallest value greater than `node`'s.
pub fn successor<T>(arena: &Arena<T>, node: Handle) -> Option<Handle> {
    if let Some(right) = arena[node].right {
        return Some(min(arena, right));
    }
    let mut curr = node;
    let mut parent = arena[node].parent;
    while let Some(ancestor) = parent {
        if arena[ancestor].right != Some(curr) {
            break;
        }
        curr = ancestor;
        parent = arena[ancestor].parent;
    }
    parent
}

/// Height of `tree`, where an empty tree has height -1.
///
/// Follows the taller child at every level, so this is logarithmic rather than a full walk.
pub fn height<T>(arena: &Arena<T>, tree: Tree) -> i32 {
    let mut height = -1;
    let mut curr = tree;
    while let Some(node) = curr {
        height += 1;
        let balance_factor = arena[node].balance_factor;
        curr = arena[node].child(Side::of_balance(balance_factor));
    }
    height
}

/// Heights of both children of `node`, given the height of `node` itself.
pub fn child_heights<T>(arena: &Arena<T>, node: Handle, height: i32) -> (i32, i32) {
    let balance_factor = arena[node].balance_factor;
    (
        child_height(height, balance_factor, Side::Left),
        child_height(height, balance_factor, Side::Right),
    )
}

/// Number of nodes in `tree`.
pub fn count<T>(arena: &Arena<T>, tree: Tree) -> usize {
    let mut pending = Stack::new();
    let mut count = 0;
    if let Some(root) = tree {
        pending.push(root);
    }
    while let Some(node) = pending.pop() {
        count += 1;
        for child in arena[node].left.iter().chain(arena[node].right.iter()) {
            pending.push(*child);
        }
    }
    count
}

/// Disposes and frees every node of `tree`, leaving the rest of the arena untouched.
pub fn release<T>(arena: &mut Arena<T>, tree: Tree) {
    let mut pending = Stack::new();
    if let Some(root) = tree {
        pending.push(root);
    }
    while let Some(node) = pending.pop() {
        if let Some(left) = arena[node].left {
            pending.push(left);
        }
        if let Some(right) = arena[node].right {
            pending.push(right);
        }
        arena[node].dispose();
        arena.free(node);
    }
}

/// Inserts `value` and restores balance. Returns `false` and leaves the tree untouched if the
/// value is already present.
pub fn insert<T>(arena: &mut Arena<T>, tree: &mut Tree, value: T) -> bool
where
    T: Ord,
{
    let mut parent = None;
    let mut side = Side::Left;
    let mut curr = *tree;
    while let Some(node) = curr {
        side = match value.cmp(&arena[node].value) {
            Ordering::Less => Side::Left,
            Ordering::Greater => Side::Right,
            Ordering::Equal => return false,
        };
        parent = Some(node);
        curr = arena[node].child(side);
    }

    let new_node = arena.allocate(Node::new(value, parent));
    match parent {
        Some(parent) => arena[parent].set_child(side, Some(new_node)),
        None => {
            *tree = Some(new_node);
            return true;
        },
    }

    retrace_insert(arena, tree, new_node);
    true
}

fn retrace_insert<T>(arena: &mut Arena<T>, tree: &mut Tree, inserted: Handle) {
    let mut child = inserted;
    while let Some(parent) = arena[child].parent {
        let grown = arena[parent].side_of(child);
        let balance_factor = arena[parent].balance_factor + grown.sign();
        arena[parent].balance_factor = balance_factor;
        match balance_factor {
            // the shorter side caught up
            0 => break,
            -1 | 1 => child = parent,
            _ => {
                let pivot = if arena[child].balance_factor * grown.sign() < 0 {
                    rotate_twice(arena, parent, grown, Rebalance::Canonical)
                } else {
                    rotate(arena, parent, grown, Rebalance::Canonical)
                };
                if arena[pivot].parent.is_none() {
                    *tree = Some(pivot);
                }
                break;
            },
        }
    }
}

/// Removes `value` and restores balance, returning the removed value.
///
/// Descent and retrace are both iterative: the path from the root is recorded on an explicit
/// stack and unwound afterwards, so deep trees never exhaust the call stack.
pub fn remove<T>(arena: &mut Arena<T>, tree: &mut Tree, value: &T) -> Option<T>
where
    T: Ord,
{
    let mut path = Stack::new();
    let mut curr = *tree;
    let target = loop {
        let node = curr?;
        curr = match value.cmp(&arena[node].value) {
            Ordering::Less => arena[node].left,
            Ordering::Greater => arena[node].right,
            Ordering::Equal => break node,
        };
        path.push(node);
    };

    // a node with two children trades places with its in-order successor, which has no left child
    let victim = match (arena[target].left, arena[target].right) {
        (Some(_), Some(right)) => {
            path.push(target);
            let mut successor = right;
            while let Some(left) = arena[successor].left {
                path.push(successor);
                successor = left;
            }
            successor
        },
        _ => target,
    };

    let parent = arena[victim].parent;
    let child = arena[victim].left.or(arena[victim].right);
    let shrunk = parent.map(|parent| arena[parent].side_of(victim));
    replace_child(arena, tree, parent, victim, child);

    arena[victim].dispose();
    let victim_value = arena.free(victim).value;
    let removed = if victim == target {
        victim_value
    } else {
        mem::replace(&mut arena[target].value, victim_value)
    };

    if let Some(shrunk) = shrunk {
        retrace_remove(arena, tree, path, shrunk);
    }
    Some(removed)
}

fn retrace_remove<T>(arena: &mut Arena<T>, tree: &mut Tree, mut path: Stack<Handle>, shrunk: Side) {
    let mut shrunk = shrunk;
    while let Some(node) = path.pop() {
        let balance_factor = arena[node].balance_factor - shrunk.sign();
        arena[node].balance_factor = balance_factor;
        let subtree = match balance_factor {
            // the taller side lost a level, so this subtree did too
            0 => node,
            -1 | 1 => break,
            _ => {
                let heavy = Side::of_balance(balance_factor);
                let child = match arena[node].child(heavy) {
                    Some(child) => child,
                    None => unreachable!(),
                };
                let child_factor = arena[child].balance_factor * heavy.sign();
                let pivot = if child_factor < 0 {
                    rotate_twice(arena, node, heavy, Rebalance::Canonical)
                } else {
                    rotate(arena, node, heavy, Rebalance::Canonical)
                };
                if arena[pivot].parent.is_none() {
                    *tree = Some(pivot);
                }
                // a balanced heavy child keeps the subtree at its old height
                if child_factor == 0 {
                    break;
                }
                pivot
            },
        };
        match arena[subtree].parent {
            Some(parent) => shrunk = arena[parent].side_of(subtree),
            None => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{count, height, insert, max, min, release, remove, search, successor, Tree};
    use crate::avl_tree::node::Arena;

    fn build(values: &[u32]) -> (Arena<u32>, Tree) {
        let mut arena = Arena::new();
        let mut tree = None;
        for &value in values {
            insert(&mut arena, &mut tree, value);
        }
        (arena, tree)
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

    #[test]
    fn test_insert_ascending_rotates() {
        let (arena, tree) = build(&[1, 2, 3]);
        let root = tree.unwrap();
        assert_eq!(arena[root].value, 2);
        assert_eq!(arena[root].parent, None);
        assert_eq!(arena[root].balance_factor, 0);
        assert_eq!(height(&arena, tree), 1);
    }

    #[test]
    fn test_insert_double_rotation() {
        let (arena, tree) = build(&[3, 1, 2]);
        let root = tree.unwrap();
        assert_eq!(arena[root].value, 2);
        assert_eq!(values(&arena, tree), vec![1, 2, 3]);
    }

    #[test]
    fn test_insert_duplicate() {
        let (mut arena, mut tree) = build(&[1, 2]);
        assert!(!insert(&mut arena, &mut tree, 2));
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn test_search_min_max() {
        let (arena, tree) = build(&[5, 3, 8, 1, 4, 7, 9]);
        let root = tree.unwrap();
        assert_eq!(arena[min(&arena, root)].value, 1);
        assert_eq!(arena[max(&arena, root)].value, 9);
        assert_eq!(search(&arena, tree, &6), None);
        let found = search(&arena, tree, &7).unwrap();
        assert_eq!(arena[found].value, 7);
        assert_eq!(successor(&arena, max(&arena, root)), None);
    }

    #[test]
    fn test_successor_ascends() {
        let (arena, tree) = build(&[5, 3, 8, 1, 4, 7, 9]);
        let four = search(&arena, tree, &4).unwrap();
        assert_eq!(arena[successor(&arena, four).unwrap()].value, 5);
    }

    #[test]
    fn test_height_empty() {
        let arena: Arena<u32> = Arena::new();
        assert_eq!(height(&arena, None), -1);
    }

    #[test]
    fn test_remove_leaf_and_root() {
        let (mut arena, mut tree) = build(&[2, 1, 3]);
        assert_eq!(remove(&mut arena, &mut tree, &1), Some(1));
        assert_eq!(remove(&mut arena, &mut tree, &2), Some(2));
        assert_eq!(arena[tree.unwrap()].value, 3);
        assert_eq!(arena[tree.unwrap()].parent, None);
        assert_eq!(remove(&mut arena, &mut tree, &3), Some(3));
        assert_eq!(tree, None);
        assert!(arena.is_empty());
    }

    #[test]
    fn test_remove_two_children_keeps_order() {
        let (mut arena, mut tree) = build(&[5, 3, 8, 1, 4, 7, 9]);
        assert_eq!(remove(&mut arena, &mut tree, &5), Some(5));
        assert_eq!(arena[tree.unwrap()].value, 7);
        assert_eq!(values(&arena, tree), vec![1, 3, 4, 7, 8, 9]);
    }

    #[test]
    fn test_remove_rotates() {
        let (mut arena, mut tree) = build(&[2, 1, 3, 4]);
        assert_eq!(remove(&mut arena, &mut tree, &1), Some(1));
        let root = tree.unwrap();
        assert_eq!(arena[root].value, 3);
        assert_eq!(arena[root].balance_factor, 0);
        assert_eq!(values(&arena, tree), vec![2, 3, 4]);
    }

    #[test]
    fn test_count_and_release() {
        let (mut arena, tree) = build(&[5, 3, 8, 1, 4, 7, 9]);
        let mut other = None;
        insert(&mut arena, &mut other, 100);
        insert(&mut arena, &mut other, 101);
        assert_eq!(count(&arena, tree), 7);
        assert_eq!(count(&arena, None), 0);

        release(&mut arena, tree);
        assert_eq!(arena.len(), 2);
        assert_eq!(values(&arena, other), vec![100, 101]);
    }

    #[test]
    fn test_remove_absent() {
        let (mut arena, mut tree) = build(&[2, 1, 3]);
        assert_eq!(remove(&mut arena, &mut tree, &4), None);
        let mut empty = None;
        assert_eq!(remove(&mut arena, &mut empty, &4), None);
        assert_eq!(values(&arena, tree), vec![1, 2, 3]);
    }
}
