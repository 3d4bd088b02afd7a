use crate::arena::{Handle, TypedArena};
use std::ops::Not;

pub type Arena<T> = TypedArena<Node<T>>;

/// Which child of a node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// The sign a taller subtree on this side contributes to a balance factor.
    pub fn sign(self) -> i8 {
        match self {
            Side::Left => -1,
            Side::Right => 1,
        }
    }

    /// The side a node leans toward, given a non-zero balance factor.
    pub fn of_balance(balance_factor: i8) -> Self {
        if balance_factor > 0 {
            Side::Right
        } else {
            Side::Left
        }
    }
}

impl Not for Side {
    type Output = Side;

    fn not(self) -> Self::Output {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// A struct representing an internal node of an avl tree.
///
/// `left` and `right` own their subtrees; `parent` is a lookup aid only.
#[derive(Clone, Debug)]
pub struct Node<T> {
    pub value: T,
    pub left: Option<Handle>,
    pub right: Option<Handle>,
    pub parent: Option<Handle>,
    /// Height of the right subtree minus height of the left subtree.
    pub balance_factor: i8,
}

impl<T> Node<T> {
    pub fn new(value: T, parent: Option<Handle>) -> Self {
        Node {
            value,
            left: None,
            right: None,
            parent,
            balance_factor: 0,
        }
    }

    pub fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn set_child(&mut self, side: Side, child: Option<Handle>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    /// Returns the side of this node that `child` hangs from.
    pub fn side_of(&self, child: Handle) -> Side {
        if self.left == Some(child) {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Severs every link so a freed node cannot be mistaken for part of a tree.
    pub fn dispose(&mut self) {
        self.parent = None;
        self.left = None;
        self.right = None;
    }
}

/// Points `parent`'s link that currently holds `old` at `new`, or makes `new` the root when there
/// is no parent. `new`'s parent link is updated to match.
pub fn replace_child<T>(
    arena: &mut Arena<T>,
    root: &mut Option<Handle>,
    parent: Option<Handle>,
    old: Handle,
    new: Option<Handle>,
) {
    match parent {
        Some(parent) => {
            let side = arena[parent].side_of(old);
            arena[parent].set_child(side, new);
        },
        None => *root = new,
    }
    if let Some(new) = new {
        arena[new].parent = parent;
    }
}

/// Hangs `left` and `right` below `node` and sets its balance factor from the given heights.
pub fn attach<T>(
    arena: &mut Arena<T>,
    node: Handle,
    left: Option<Handle>,
    left_height: i32,
    right: Option<Handle>,
    right_height: i32,
) {
    {
        let node = &mut arena[node];
        node.left = left;
        node.right = right;
        node.balance_factor = (right_height - left_height) as i8;
    }
    for child in left.iter().chain(right.iter()) {
        arena[*child].parent = Some(node);
    }
}

/// Height of the child on `side` of a node with the given height and balance factor.
pub fn child_height(height: i32, balance_factor: i8, side: Side) -> i32 {
    if balance_factor * side.sign() >= 0 {
        height - 1
    } else {
        height - 2
    }
}

/// Height of a node given the height of its child on `side` and the node's balance factor.
pub fn height_from_child(child_height: i32, side: Side, balance_factor: i8) -> i32 {
    let other = child_height - i32::from(side.sign() * balance_factor);
    1 + child_height.max(other)
}
