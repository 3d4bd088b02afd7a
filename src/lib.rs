//! An arena-backed AVL tree with parent links, iterative deletion, and whole-tree algebra.
//!
//! ```
//! use avl_join::avl_tree::AvlTree;
//!
//! let evens: AvlTree<u32> = (0..20).filter(|i| i % 2 == 0).collect();
//! let (found, low, high) = AvlTree::split(evens, &10);
//! assert!(found);
//!
//! let joined = AvlTree::join(low, high, 11).unwrap();
//! assert_eq!(joined.successor(&8).as_deref(), Some(&11));
//! assert!(joined.check().is_ok());
//! ```

pub mod arena;
pub mod avl_tree;
pub mod stack;
