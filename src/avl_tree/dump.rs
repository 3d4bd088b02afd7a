//! Diagnostics for inspecting tree shape: an indented dump and an invariant checker.

use crate::arena::Handle;
use crate::avl_tree::error::InvariantViolation;
use crate::avl_tree::node::Arena;
use crate::avl_tree::tree::Tree;
use crate::stack::Stack;
use std::fmt;

/// Writes one line per node in pre-order: a side marker (`M` for the root, `L` or `R` for
/// children), the value, the parent's value and the balance factor, indented two spaces per
/// level of depth.
pub fn write_tree<T, W>(arena: &Arena<T>, tree: Tree, out: &mut W) -> fmt::Result
where
    T: fmt::Display,
    W: fmt::Write,
{
    let mut pending = Stack::new();
    if let Some(root) = tree {
        pending.push((root, 0, 'M'));
    }
    while let Some((node, depth, marker)) = pending.pop() {
        let node_ref = &arena[node];
        write!(out, "{:indent$}{}:{} \t\tP:", "", marker, node_ref.value, indent = depth * 2)?;
        match node_ref.parent {
            Some(parent) => write!(out, "{}", arena[parent].value)?,
            None => write!(out, "nil")?,
        }
        writeln!(out, "\tBF:{}", node_ref.balance_factor)?;

        if let Some(right) = node_ref.right {
            pending.push((right, depth + 1, 'R'));
        }
        if let Some(left) = node_ref.left {
            pending.push((left, depth + 1, 'L'));
        }
    }
    Ok(())
}

/// Measures the height of `tree` from scratch, checking parent links and balance factors on the
/// way.
fn measure<T>(arena: &Arena<T>, tree: Tree) -> Result<i32, InvariantViolation<T>>
where
    T: Clone,
{
    let node = match tree {
        Some(node) => node,
        None => return Ok(-1),
    };
    let node_ref = &arena[node];
    for &child in node_ref.left.iter().chain(node_ref.right.iter()) {
        if arena[child].parent != Some(node) {
            return Err(InvariantViolation::BrokenParentLink {
                child: arena[child].value.clone(),
            });
        }
    }

    let left_height = measure(arena, node_ref.left)?;
    let right_height = measure(arena, node_ref.right)?;
    let balance_factor = right_height - left_height;
    if i32::from(node_ref.balance_factor) != balance_factor {
        return Err(InvariantViolation::WrongBalanceFactor {
            value: node_ref.value.clone(),
            stored: node_ref.balance_factor,
            measured: balance_factor,
        });
    }
    if balance_factor.abs() > 1 {
        return Err(InvariantViolation::Unbalanced {
            value: node_ref.value.clone(),
            balance_factor,
        });
    }
    Ok(1 + left_height.max(right_height))
}

/// Verifies root and parent links, balance factors, ordering and, when `len` is known, the node
/// count.
pub fn check<T>(
    arena: &Arena<T>,
    tree: Tree,
    len: Option<usize>,
) -> Result<(), InvariantViolation<T>>
where
    T: Clone + Ord,
{
    if let Some(root) = tree {
        if arena[root].parent.is_some() {
            return Err(InvariantViolation::RootHasParent {
                root: arena[root].value.clone(),
            });
        }
    }
    measure(arena, tree)?;

    // ordering is checked without trusting parent links
    let mut pending: Stack<Handle> = Stack::new();
    let mut curr = tree;
    let mut previous: Option<&T> = None;
    let mut count = 0;
    loop {
        while let Some(node) = curr {
            pending.push(node);
            curr = arena[node].left;
        }
        let node = match pending.pop() {
            Some(node) => node,
            None => break,
        };
        let value = &arena[node].value;
        if let Some(previous) = previous {
            if previous >= value {
                return Err(InvariantViolation::Unordered {
                    previous: previous.clone(),
                    next: value.clone(),
                });
            }
        }
        previous = Some(value);
        count += 1;
        curr = arena[node].right;
    }

    match len {
        Some(expected) if expected != count => Err(InvariantViolation::LengthMismatch {
            expected,
            actual: count,
        }),
        _ => Ok(()),
    }
}
