use crate::arena::Handle;
use crate::avl_tree::algebra::{self, Subtree};
use crate::avl_tree::dump;
use crate::avl_tree::error::{InvariantViolation, JoinError, JoinErrorKind};
use crate::avl_tree::node::{Arena, Node};
use crate::avl_tree::tree::{self, Tree};
use log::{debug, trace};
use std::cell::{Cell, Ref, RefCell};
use std::fmt;
use std::iter::FromIterator;
use std::rc::Rc;
use std::vec;

type SharedArena<T> = Rc<RefCell<Arena<T>>>;

/// An ordered set implemented using an avl tree.
///
/// An avl tree is a self-balancing binary search tree that maintains the invariant that the
/// heights of two child subtrees of any node differ by at most one. Nodes live in an arena and
/// refer to their children and parent by handle, so walking up from a node is as cheap as walking
/// down.
///
/// Besides point operations the tree supports `join`, `split` and `union`, which combine and
/// partition whole trees without rebuilding them. The trees produced by a split share their
/// parent's arena, so splitting and joining them again never copies nodes. Only trees that were
/// built separately have the nodes of the shorter one moved when they are joined or unioned.
///
/// Values are borrowed out of the shared arena, so lookups return `Ref` guards. Mutating a tree
/// while a guard from a tree sharing its arena is alive panics.
///
/// # Examples
/// ```
/// use avl_join::avl_tree::AvlTree;
///
/// let mut tree = AvlTree::new();
/// tree.insert(0);
/// tree.insert(3);
///
/// assert_eq!(tree.len(), 2);
///
/// assert_eq!(tree.min().as_deref(), Some(&0));
/// assert_eq!(tree.successor(&0).as_deref(), Some(&3));
///
/// assert!(tree.remove(&0));
/// assert!(!tree.remove(&1));
/// ```
pub struct AvlTree<T> {
    arena: SharedArena<T>,
    root: Tree,
    // unknown after a split until first asked for
    len: Cell<Option<usize>>,
}

impl<T> AvlTree<T> {
    /// Constructs a new, empty `AvlTree<T>`.
    ///
    /// # Examples
    /// ```
    /// use avl_join::avl_tree::AvlTree;
    ///
    /// let tree: AvlTree<u32> = AvlTree::new();
    /// ```
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Constructs a new, empty `AvlTree<T>` with room for `capacity` values before its node
    /// storage reallocates.
    ///
    /// # Examples
    /// ```
    /// use avl_join::avl_tree::AvlTree;
    ///
    /// let tree: AvlTree<u32> = AvlTree::with_capacity(64);
    /// assert!(tree.is_empty());
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        AvlTree::from_parts(Rc::new(RefCell::new(Arena::with_capacity(capacity))), None, Some(0))
    }

    fn from_parts(arena: SharedArena<T>, root: Tree, len: Option<usize>) -> Self {
        let len = if root.is_none() { Some(0) } else { len };
        AvlTree {
            arena,
            root,
            len: Cell::new(len),
        }
    }

    fn value(&self, node: Handle) -> Ref<T> {
        Ref::map(self.arena.borrow(), |arena| &arena[node].value)
    }

    /// Returns the number of values in the tree.
    ///
    /// Constant time, except for the first call on a tree produced by `split` or `union`, which
    /// counts the nodes once.
    ///
    /// # Examples
    /// ```
    /// use avl_join::avl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(1);
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        match self.len.get() {
            Some(len) => len,
            None => {
                let len = tree::count(&self.arena.borrow(), self.root);
                self.len.set(Some(len));
                len
            },
        }
    }

    /// Returns `true` if the tree is empty.
    ///
    /// # Examples
    /// ```
    /// use avl_join::avl_tree::AvlTree;
    ///
    /// let tree: AvlTree<u32> = AvlTree::new();
    /// assert!(tree.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns `true` if this tree and `other` keep their nodes in the same arena, in which case
    /// `join` and `union` of the two move no nodes.
    ///
    /// # Examples
    /// ```
    /// use avl_join::avl_tree::AvlTree;
    ///
    /// let tree: AvlTree<u32> = (0..10).collect();
    /// let (_, left, right) = AvlTree::split(tree, &5);
    /// assert!(left.shares_storage_with(&right));
    /// assert!(!left.shares_storage_with(&AvlTree::new()));
    /// ```
    pub fn shares_storage_with(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.arena, &other.arena)
    }

    /// Clears the tree, removing all values.
    ///
    /// # Examples
    /// ```
    /// use avl_join::avl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(1);
    /// tree.insert(2);
    /// tree.clear();
    /// assert_eq!(tree.is_empty(), true);
    /// ```
    pub fn clear(&mut self) {
        let root = self.root.take();
        if Rc::strong_count(&self.arena) == 1 {
            self.arena.borrow_mut().clear();
        } else {
            tree::release(&mut self.arena.borrow_mut(), root);
        }
        self.len.set(Some(0));
    }

    /// Returns the height of the tree: the number of edges on the longest path from the root to a
    /// leaf. A tree with one value has height 0 and an empty tree has height -1.
    ///
    /// # Examples
    /// ```
    /// use avl_join::avl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// assert_eq!(tree.height(), -1);
    ///
    /// tree.extend(vec![1, 2, 3]);
    /// assert_eq!(tree.height(), 1);
    /// ```
    pub fn height(&self) -> i32 {
        tree::height(&self.arena.borrow(), self.root)
    }

    /// Returns the minimum value of the tree. Returns `None` if the tree is empty.
    ///
    /// # Examples
    /// ```
    /// use avl_join::avl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(1);
    /// tree.insert(3);
    /// assert_eq!(tree.min().as_deref(), Some(&1));
    /// ```
    pub fn min(&self) -> Option<Ref<T>> {
        let root = self.root?;
        let node = tree::min(&self.arena.borrow(), root);
        Some(self.value(node))
    }

    /// Returns the maximum value of the tree. Returns `None` if the tree is empty.
    ///
    /// # Examples
    /// ```
    /// use avl_join::avl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(1);
    /// tree.insert(3);
    /// assert_eq!(tree.max().as_deref(), Some(&3));
    /// ```
    pub fn max(&self) -> Option<Ref<T>> {
        let root = self.root?;
        let node = tree::max(&self.arena.borrow(), root);
        Some(self.value(node))
    }

    /// Returns an iterator over the tree. The iterator will yield values using in-order
    /// traversal.
    ///
    /// # Examples
    /// ```
    /// use avl_join::avl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(1);
    /// tree.insert(3);
    ///
    /// let mut iterator = tree.iter();
    /// assert_eq!(iterator.next().as_deref(), Some(&1));
    /// assert_eq!(iterator.next().as_deref(), Some(&3));
    /// assert!(iterator.next().is_none());
    /// ```
    pub fn iter(&self) -> AvlTreeIter<T> {
        let next = self.root.map(|root| tree::min(&self.arena.borrow(), root));
        AvlTreeIter {
            arena: &*self.arena,
            next,
            remaining: self.len(),
        }
    }

    /// Takes the root out of `self`, leaving an empty tree whose drop frees nothing.
    fn detach(mut self) -> (SharedArena<T>, Tree) {
        let root = self.root.take();
        (Rc::clone(&self.arena), root)
    }

    /// Brings `first` and `second` into one arena. Nodes move only when the two trees do not
    /// already share storage, and then only those of the shorter tree.
    fn share(first: Self, second: Self) -> (SharedArena<T>, Subtree, Subtree) {
        let (first_arena, first_root) = first.detach();
        let (second_arena, second_root) = second.detach();
        let first_height = tree::height(&first_arena.borrow(), first_root);
        let second_height = tree::height(&second_arena.borrow(), second_root);
        if Rc::ptr_eq(&first_arena, &second_arena) {
            return (
                first_arena,
                Subtree::new(first_root, first_height),
                Subtree::new(second_root, second_height),
            );
        }

        if first_height < second_height {
            let (moved, count) = algebra::transplant(
                &mut first_arena.borrow_mut(),
                &mut second_arena.borrow_mut(),
                first_root,
            );
            trace!("moved {} nodes into a shared arena", count);
            (
                second_arena,
                Subtree::new(moved, first_height),
                Subtree::new(second_root, second_height),
            )
        } else {
            let (moved, count) = algebra::transplant(
                &mut second_arena.borrow_mut(),
                &mut first_arena.borrow_mut(),
                second_root,
            );
            trace!("moved {} nodes into a shared arena", count);
            (
                first_arena,
                Subtree::new(first_root, first_height),
                Subtree::new(moved, second_height),
            )
        }
    }
}

impl<T> AvlTree<T>
where
    T: Ord,
{
    /// Inserts a value into the tree. Returns `false` and leaves the tree unchanged if the value
    /// is already present.
    ///
    /// # Examples
    /// ```
    /// use avl_join::avl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// assert!(tree.insert(1));
    /// assert!(tree.contains(&1));
    /// assert!(!tree.insert(1));
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        let inserted = tree::insert(&mut self.arena.borrow_mut(), &mut self.root, value);
        if inserted {
            self.len.set(self.len.get().map(|len| len + 1));
        }
        inserted
    }

    /// Removes a value from the tree. Returns `false` if the value was not present.
    ///
    /// # Examples
    /// ```
    /// use avl_join::avl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(1);
    /// assert!(tree.remove(&1));
    /// assert!(!tree.remove(&1));
    /// ```
    pub fn remove(&mut self, value: &T) -> bool {
        self.take(value).is_some()
    }

    /// Removes a value from the tree and returns it. Returns `None` if the value was not present.
    ///
    /// # Examples
    /// ```
    /// use avl_join::avl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(1);
    /// assert_eq!(tree.take(&1), Some(1));
    /// assert_eq!(tree.take(&1), None);
    /// ```
    pub fn take(&mut self, value: &T) -> Option<T> {
        let removed = tree::remove(&mut self.arena.borrow_mut(), &mut self.root, value);
        if removed.is_some() {
            self.len.set(self.len.get().map(|len| len - 1));
        }
        removed
    }

    /// Returns a reference to the value in the tree equal to `value`, if there is one.
    ///
    /// # Examples
    /// ```
    /// use avl_join::avl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(1);
    /// assert_eq!(tree.search(&1).as_deref(), Some(&1));
    /// assert!(tree.search(&2).is_none());
    /// ```
    pub fn search(&self, value: &T) -> Option<Ref<T>> {
        let node = tree::search(&self.arena.borrow(), self.root, value)?;
        Some(self.value(node))
    }

    /// Checks if a value exists in the tree.
    ///
    /// # Examples
    /// ```
    /// use avl_join::avl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(1);
    /// assert!(!tree.contains(&0));
    /// assert!(tree.contains(&1));
    /// ```
    pub fn contains(&self, value: &T) -> bool {
        tree::search(&self.arena.borrow(), self.root, value).is_some()
    }

    /// Returns the smallest value in the tree that is greater than `value`. Returns `None` if
    /// `value` is not in the tree or is its maximum.
    ///
    /// # Examples
    /// ```
    /// use avl_join::avl_tree::AvlTree;
    ///
    /// let tree: AvlTree<u32> = vec![1, 3, 5].into_iter().collect();
    /// assert_eq!(tree.successor(&1).as_deref(), Some(&3));
    /// assert!(tree.successor(&5).is_none());
    /// assert!(tree.successor(&2).is_none());
    /// ```
    pub fn successor(&self, value: &T) -> Option<Ref<T>> {
        let node = {
            let arena = self.arena.borrow();
            let node = tree::search(&arena, self.root, value)?;
            tree::successor(&arena, node)?
        };
        Some(self.value(node))
    }

    /// Verifies every structural invariant of the tree: values strictly increase in order, every
    /// child links back to its parent, the root has no parent, and every stored balance factor
    /// matches the measured subtree heights and is at most one in magnitude.
    ///
    /// # Examples
    /// ```
    /// use avl_join::avl_tree::AvlTree;
    ///
    /// let tree: AvlTree<u32> = (0..100).collect();
    /// assert!(tree.check().is_ok());
    /// ```
    pub fn check(&self) -> Result<(), InvariantViolation<T>>
    where
        T: Clone,
    {
        dump::check(&self.arena.borrow(), self.root, self.len.get())
    }

    /// Joins two trees around a pivot value. Every value in `left` must be smaller than `pivot`
    /// and every value in `right` must be larger.
    ///
    /// Returns an error holding the untouched inputs if either tree is empty or the pivot does
    /// not separate them. Rebalancing is proportional to the difference in height of the two
    /// trees. Trees that share storage, such as the halves of a split, are joined in place;
    /// otherwise the nodes of the shorter tree are first moved into the taller tree's storage.
    ///
    /// # Examples
    /// ```
    /// use avl_join::avl_tree::AvlTree;
    ///
    /// let left: AvlTree<u32> = (0..128).collect();
    /// let right: AvlTree<u32> = vec![129].into_iter().collect();
    ///
    /// let joined = AvlTree::join(left, right, 128).unwrap();
    /// assert_eq!(
    ///     joined.into_iter().collect::<Vec<u32>>(),
    ///     (0..130).collect::<Vec<u32>>(),
    /// );
    /// ```
    pub fn join(left: Self, right: Self, pivot: T) -> Result<Self, JoinError<T>> {
        if left.is_empty() || right.is_empty() {
            debug!("rejected join of an empty tree");
            return Err(JoinError::new(JoinErrorKind::EmptyTree, left, right, pivot));
        }
        let ordered = match (left.max(), right.min()) {
            (Some(max), Some(min)) => *max < pivot && pivot < *min,
            _ => false,
        };
        if !ordered {
            debug!("rejected join with a pivot that does not separate the trees");
            return Err(JoinError::new(JoinErrorKind::Unordered, left, right, pivot));
        }

        let len = match (left.len.get(), right.len.get()) {
            (Some(left_len), Some(right_len)) => Some(left_len + right_len + 1),
            _ => None,
        };
        let (arena, left, right) = Self::share(left, right);
        let joined = {
            let mut arena = arena.borrow_mut();
            let pivot = arena.allocate(Node::new(pivot, None));
            algebra::join(&mut arena, left, pivot, right)
        };
        Ok(AvlTree::from_parts(arena, joined.tree, len))
    }

    /// Splits a tree around `wedge`. Returns whether `wedge` was in the tree, a tree of the
    /// values smaller than `wedge`, and a tree of the values larger than `wedge`.
    ///
    /// Both halves keep the storage of the input tree, so no node is copied.
    ///
    /// # Examples
    /// ```
    /// use avl_join::avl_tree::AvlTree;
    ///
    /// let tree: AvlTree<u32> = (0..10).collect();
    ///
    /// let (found, left, right) = AvlTree::split(tree, &4);
    /// assert!(found);
    /// assert_eq!(left.into_iter().collect::<Vec<u32>>(), vec![0, 1, 2, 3]);
    /// assert_eq!(right.into_iter().collect::<Vec<u32>>(), vec![5, 6, 7, 8, 9]);
    /// ```
    pub fn split(tree: Self, wedge: &T) -> (bool, Self, Self) {
        let (arena, root) = tree.detach();
        let parts = {
            let mut arena = arena.borrow_mut();
            let whole = Subtree::new(root, tree::height(&arena, root));
            let parts = algebra::split(&mut arena, whole, &|arena: &Arena<T>, node: Handle| {
                wedge.cmp(&arena[node].value)
            });
            if let Some(node) = parts.found {
                arena[node].dispose();
                arena.free(node);
            }
            parts
        };
        trace!("split into heights {} and {}", parts.left.height, parts.right.height);
        (
            parts.found.is_some(),
            AvlTree::from_parts(Rc::clone(&arena), parts.left.tree, None),
            AvlTree::from_parts(arena, parts.right.tree, None),
        )
    }

    /// Returns a tree holding every value of `first` and `second`.
    ///
    /// # Examples
    /// ```
    /// use avl_join::avl_tree::AvlTree;
    ///
    /// let n: AvlTree<u32> = vec![1, 2].into_iter().collect();
    /// let m: AvlTree<u32> = vec![2, 3].into_iter().collect();
    ///
    /// let union = AvlTree::union(n, m);
    /// assert_eq!(union.into_iter().collect::<Vec<u32>>(), vec![1, 2, 3]);
    /// ```
    pub fn union(first: Self, second: Self) -> Self {
        if first.is_empty() {
            return second;
        }
        if second.is_empty() {
            return first;
        }
        let lens = (first.len.get(), second.len.get());
        let (arena, first, second) = Self::share(first, second);
        let (merged, duplicates) = algebra::union(&mut arena.borrow_mut(), first, second);
        let len = match lens {
            (Some(first_len), Some(second_len)) => Some(first_len + second_len - duplicates),
            _ => None,
        };
        AvlTree::from_parts(arena, merged.tree, len)
    }
}

impl<T> Drop for AvlTree<T> {
    fn drop(&mut self) {
        // a sole owner drops the whole arena instead
        if self.root.is_none() || Rc::strong_count(&self.arena) == 1 {
            return;
        }
        if let Ok(mut arena) = self.arena.try_borrow_mut() {
            tree::release(&mut arena, self.root.take());
        }
    }
}

impl<T> IntoIterator for AvlTree<T> {
    type Item = T;
    type IntoIter = AvlTreeIntoIter<T>;

    fn into_iter(mut self) -> Self::IntoIter {
        let root = self.root.take();
        let mut arena = self.arena.borrow_mut();
        let mut order = Vec::new();
        let mut curr = root.map(|root| tree::min(&arena, root));
        while let Some(node) = curr {
            order.push(node);
            curr = tree::successor(&arena, node);
        }
        let values: Vec<T> = order
            .into_iter()
            .map(|node| {
                arena[node].dispose();
                arena.free(node).value
            })
            .collect();
        AvlTreeIntoIter {
            values: values.into_iter(),
        }
    }
}

impl<'a, T> IntoIterator for &'a AvlTree<T>
where
    T: 'a,
{
    type Item = Ref<'a, T>;
    type IntoIter = AvlTreeIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `AvlTree<T>`.
///
/// This iterator traverses the elements of the tree in-order and yields owned values.
pub struct AvlTreeIntoIter<T> {
    values: vec::IntoIter<T>,
}

impl<T> Iterator for AvlTreeIntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.values.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.values.size_hint()
    }
}

/// An iterator for `AvlTree<T>`.
///
/// This iterator traverses the elements of the tree in-order by following successor links and
/// yields borrowed values.
pub struct AvlTreeIter<'a, T>
where
    T: 'a,
{
    arena: &'a RefCell<Arena<T>>,
    next: Option<Handle>,
    remaining: usize,
}

impl<'a, T> Iterator for AvlTreeIter<'a, T>
where
    T: 'a,
{
    type Item = Ref<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        let arena = self.arena;
        let node = self.next?;
        self.next = tree::successor(&arena.borrow(), node);
        self.remaining -= 1;
        Some(Ref::map(arena.borrow(), |arena| &arena[node].value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> FromIterator<T> for AvlTree<T>
where
    T: Ord,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut tree = AvlTree::new();
        tree.extend(iter);
        tree
    }
}

impl<T> Extend<T> for AvlTree<T>
where
    T: Ord,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        for value in iter {
            self.insert(value);
        }
    }
}

/// Copies the tree's own nodes into fresh storage, even if its arena is shared.
impl<T> Clone for AvlTree<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        let source = self.arena.borrow();
        let mut arena = Arena::with_capacity(self.len.get().unwrap_or(0));
        let root = algebra::duplicate(&source, &mut arena, self.root);
        AvlTree::from_parts(Rc::new(RefCell::new(arena)), root, self.len.get())
    }
}

impl<T> PartialEq for AvlTree<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| *a == *b)
    }
}

impl<T> Eq for AvlTree<T> where T: Eq {}

impl<T> fmt::Debug for AvlTree<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Dumps the tree one node per line, indented by depth, with each node's parent and balance
/// factor. Meant for reading failures, not for parsing.
impl<T> fmt::Display for AvlTree<T>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        dump::write_tree(&self.arena.borrow(), self.root, f)
    }
}

impl<T> Default for AvlTree<T> {
    fn default() -> Self {
        Self::new()
    }
}
