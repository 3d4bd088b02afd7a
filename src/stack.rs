/// A last-in, first-out stack.
///
/// Used to record explicit paths through trees so that walks back up a path never recurse.
///
/// # Examples
///
/// ```
/// use avl_join::stack::Stack;
///
/// let mut s = Stack::new();
///
/// s.push(0);
/// s.push(1);
/// assert_eq!(s.len(), 2);
/// assert_eq!(s.peek(), Some(&1));
///
/// assert_eq!(s.pop(), Some(1));
/// assert_eq!(s.pop(), Some(0));
/// assert!(s.is_empty());
/// ```
#[derive(Clone, Debug)]
pub struct Stack<T> {
    items: Vec<T>,
}

impl<T> Stack<T> {
    /// Constructs a new, empty `Stack<T>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_join::stack::Stack;
    ///
    /// let s: Stack<u32> = Stack::new();
    /// ```
    pub fn new() -> Self {
        Stack { items: Vec::new() }
    }

    /// Constructs a new, empty `Stack<T>` that can hold `capacity` items before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Stack {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Pushes an item onto the stack.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_join::stack::Stack;
    ///
    /// let mut s = Stack::new();
    /// s.push(0);
    /// ```
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Removes and returns the top item of the stack. Returns `None` if the stack is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_join::stack::Stack;
    ///
    /// let mut s = Stack::new();
    /// s.push(0);
    ///
    /// assert_eq!(s.pop(), Some(0));
    /// assert_eq!(s.pop(), None);
    /// ```
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// Returns a reference to the top item of the stack without removing it.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_join::stack::Stack;
    ///
    /// let mut s = Stack::new();
    /// assert_eq!(s.peek(), None);
    ///
    /// s.push(0);
    /// assert_eq!(s.peek(), Some(&0));
    /// ```
    pub fn peek(&self) -> Option<&T> {
        self.items.last()
    }

    /// Returns the number of items in the stack.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the stack holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}
