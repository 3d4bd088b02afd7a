use crate::arena::Handle;
use crate::avl_tree::node::{Arena, Side};
use log::trace;

/// How balance factors are restored after a rotation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Rebalance {
    /// Factors come from the fixed case tables that hold when the rotated node is off balance by
    /// exactly two after a single insert or delete.
    Canonical,
    /// Factors are derived arithmetically from the factors before the rotation. Valid for any
    /// input, which is what join assembly needs.
    Recompute,
}

/// Moves `node`'s child on `heavy` up into `node`'s place and returns it.
///
/// The inner grandchild of the promoted child becomes `node`'s child on `heavy`. The parent of
/// `node`, if any, is relinked to the promoted child; updating the tree root is the caller's job.
fn restructure<T>(arena: &mut Arena<T>, node: Handle, heavy: Side) -> Handle {
    let pivot = match arena[node].child(heavy) {
        Some(pivot) => pivot,
        None => unreachable!(),
    };
    let parent = arena[node].parent;
    let inner = arena[pivot].child(!heavy);

    arena[node].set_child(heavy, inner);
    if let Some(inner) = inner {
        arena[inner].parent = Some(node);
    }

    arena[pivot].set_child(!heavy, Some(node));
    arena[pivot].parent = parent;
    arena[node].parent = Some(pivot);

    if let Some(parent) = parent {
        let side = arena[parent].side_of(node);
        arena[parent].set_child(side, Some(pivot));
    }
    pivot
}

/// Balance factors after a single rotation, both expressed in the frame where `heavy` is the
/// positive direction.
fn oriented_single(node: i8, pivot: i8, rebalance: Rebalance) -> (i8, i8) {
    match rebalance {
        Rebalance::Canonical => {
            if pivot == 0 {
                (1, -1)
            } else {
                (0, 0)
            }
        },
        Rebalance::Recompute => {
            let node = node - 1 - pivot.max(0);
            let pivot = pivot - 1 + node.min(0);
            (node, pivot)
        },
    }
}

/// Rotates `node` away from its `heavy` side and returns the new subtree root.
///
/// Rotating away from the right side is a left rotation and vice versa.
pub fn rotate<T>(arena: &mut Arena<T>, node: Handle, heavy: Side, rebalance: Rebalance) -> Handle {
    trace!("single rotation away from {:?} ({:?})", heavy, rebalance);
    let sign = heavy.sign();
    let pivot = restructure(arena, node, heavy);
    let (node_factor, pivot_factor) = oriented_single(
        arena[node].balance_factor * sign,
        arena[pivot].balance_factor * sign,
        rebalance,
    );
    arena[node].balance_factor = node_factor * sign;
    arena[pivot].balance_factor = pivot_factor * sign;
    pivot
}

/// Performs a double rotation on `node`, whose child on `heavy` leans the other way, and returns
/// the new subtree root: the grandchild between them.
///
/// A `heavy` side of `Left` is a left-right rotation and `Right` is a right-left rotation.
pub fn rotate_twice<T>(
    arena: &mut Arena<T>,
    node: Handle,
    heavy: Side,
    rebalance: Rebalance,
) -> Handle {
    let child = match arena[node].child(heavy) {
        Some(child) => child,
        None => unreachable!(),
    };
    match rebalance {
        Rebalance::Recompute => {
            rotate(arena, child, !heavy, Rebalance::Recompute);
            rotate(arena, node, heavy, Rebalance::Recompute)
        },
        Rebalance::Canonical => {
            trace!("double rotation away from {:?} (Canonical)", heavy);
            let sign = heavy.sign();
            let middle = restructure(arena, child, !heavy);
            restructure(arena, node, heavy);
            let (node_factor, child_factor) = match arena[middle].balance_factor * sign {
                0 => (0, 0),
                factor if factor > 0 => (-1, 0),
                _ => (0, 1),
            };
            arena[node].balance_factor = node_factor * sign;
            arena[child].balance_factor = child_factor * sign;
            arena[middle].balance_factor = 0;
            middle
        },
    }
}
