//! Self-balancing binary search tree where the heights of the two child subtrees of any node
//! differ by at most one.
//!
//! Nodes carry a link to their parent, so deletion and in-order traversal walk back up without
//! recursion. Whole trees can be joined around a pivot, split around a wedge, and unioned.

mod algebra;
mod dump;
mod error;
mod node;
mod rotation;
mod serialize;
mod set;
mod tree;

pub use self::error::{InvariantViolation, JoinError, JoinErrorKind};
pub use self::set::{AvlTree, AvlTreeIntoIter, AvlTreeIter};
