use crate::avl_tree::AvlTree;
use std::error::Error;
use std::fmt;

/// Why two trees could not be joined.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum JoinErrorKind {
    /// One of the trees has no values.
    EmptyTree,
    /// Some value in the left tree is not smaller than the pivot, or some value in the right tree
    /// is not larger than it.
    Unordered,
}

/// The error returned by `AvlTree::join`. It hands the untouched inputs back to the caller.
pub struct JoinError<T> {
    kind: JoinErrorKind,
    left: AvlTree<T>,
    right: AvlTree<T>,
    pivot: T,
}

impl<T> JoinError<T> {
    pub(crate) fn new(kind: JoinErrorKind, left: AvlTree<T>, right: AvlTree<T>, pivot: T) -> Self {
        JoinError {
            kind,
            left,
            right,
            pivot,
        }
    }

    /// Returns the reason the join was rejected.
    pub fn kind(&self) -> JoinErrorKind {
        self.kind
    }

    /// Returns the left tree, the right tree and the pivot that were passed to `join`.
    ///
    /// # Examples
    /// ```
    /// use avl_join::avl_tree::AvlTree;
    ///
    /// let left: AvlTree<u32> = vec![5, 6].into_iter().collect();
    /// let right: AvlTree<u32> = vec![1, 2].into_iter().collect();
    ///
    /// let error = AvlTree::join(left, right, 3).unwrap_err();
    /// let (left, right, pivot) = error.into_parts();
    /// assert_eq!(left.len(), 2);
    /// assert_eq!(right.len(), 2);
    /// assert_eq!(pivot, 3);
    /// ```
    pub fn into_parts(self) -> (AvlTree<T>, AvlTree<T>, T) {
        (self.left, self.right, self.pivot)
    }
}

impl<T> fmt::Debug for JoinError<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("JoinError")
            .field("kind", &self.kind)
            .field("left_len", &self.left.len())
            .field("right_len", &self.right.len())
            .finish()
    }
}

impl<T> fmt::Display for JoinError<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            JoinErrorKind::EmptyTree => write!(f, "cannot join an empty tree"),
            JoinErrorKind::Unordered => {
                write!(f, "pivot does not separate the values of the two trees")
            },
        }
    }
}

impl<T> Error for JoinError<T> {}

/// A broken tree invariant, as reported by `AvlTree::check`. Carries copies of the offending
/// values.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum InvariantViolation<T> {
    /// The root node has a parent link.
    RootHasParent { root: T },
    /// A child's parent link does not point at the node that owns it.
    BrokenParentLink { child: T },
    /// A stored balance factor disagrees with the measured subtree heights.
    WrongBalanceFactor {
        value: T,
        stored: i8,
        measured: i32,
    },
    /// The subtree heights below a node differ by more than one.
    Unbalanced { value: T, balance_factor: i32 },
    /// An in-order traversal produced `next` right after `previous`, which is not smaller.
    Unordered { previous: T, next: T },
    /// The tree holds a different number of nodes than it claims.
    LengthMismatch { expected: usize, actual: usize },
}

impl<T> fmt::Display for InvariantViolation<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InvariantViolation::RootHasParent { root } => {
                write!(f, "root {:?} has a parent", root)
            },
            InvariantViolation::BrokenParentLink { child } => {
                write!(f, "{:?} does not link back to its parent", child)
            },
            InvariantViolation::WrongBalanceFactor {
                value,
                stored,
                measured,
            } => write!(
                f,
                "{:?} stores balance factor {} but measures {}",
                value, stored, measured,
            ),
            InvariantViolation::Unbalanced {
                value,
                balance_factor,
            } => write!(f, "{:?} is unbalanced ({})", value, balance_factor),
            InvariantViolation::Unordered { previous, next } => {
                write!(f, "{:?} follows {:?} in order", next, previous)
            },
            InvariantViolation::LengthMismatch { expected, actual } => {
                write!(f, "expected {} nodes but found {}", expected, actual)
            },
        }
    }
}

impl<T> Error for InvariantViolation<T> where T: fmt::Debug {}

#[cfg(test)]
mod tests {
    use super::{InvariantViolation, JoinErrorKind};
    use crate::avl_tree::AvlTree;

    #[test]
    fn test_join_error_display() {
        let error = AvlTree::join(AvlTree::new(), AvlTree::new(), 0u32).unwrap_err();
        assert_eq!(error.kind(), JoinErrorKind::EmptyTree);
        assert_eq!(error.to_string(), "cannot join an empty tree");
    }

    #[test]
    fn test_violation_display() {
        let violation: InvariantViolation<u32> = InvariantViolation::Unordered {
            previous: 3,
            next: 2,
        };
        assert_eq!(violation.to_string(), "2 follows 3 in order");
    }
}
