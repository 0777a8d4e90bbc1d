//! `AtomicDeque<T>` — a lock-guarded double-ended queue.

use crate::cell::AtomicCell;
use crate::lock::SharedLock;
use std::collections::VecDeque;
use std::fmt;
use std::mem;

/// A lock-guarded `VecDeque<T>`.
///
/// Head/tail pushes and pops are O(1) amortized. Bulk removal returns the
/// evicted contents so callers can drop them — or run their destructors —
/// outside whatever lock the caller itself may hold.
///
/// # Examples
///
/// ```rust
/// use kilit::AtomicDeque;
///
/// let queue = AtomicDeque::new();
/// queue.push_tail(1);
/// queue.push_tail(2);
/// queue.push_head(0);
///
/// assert_eq!(queue.pop_head(), Some(0));
/// assert_eq!(queue.pop_tail(), Some(2));
/// assert_eq!(queue.len(), 1);
/// ```
pub struct AtomicDeque<T> {
    inner: AtomicCell<VecDeque<T>>,
}

impl<T> AtomicDeque<T> {
    /// Creates an empty deque with a fresh private lock.
    pub fn new() -> Self {
        Self {
            inner: AtomicCell::new(VecDeque::new()),
        }
    }

    /// Creates an empty deque guarded by a clone of `lock`.
    pub fn with_lock(lock: &SharedLock) -> Self {
        Self {
            inner: AtomicCell::with_lock(VecDeque::new(), lock),
        }
    }

    /// Prepends an element.
    pub fn push_head(&self, value: T) {
        self.inner.update(|d| d.push_front(value))
    }

    /// Appends an element.
    pub fn push_tail(&self, value: T) {
        self.inner.update(|d| d.push_back(value))
    }

    /// Removes and returns the first element.
    pub fn pop_head(&self) -> Option<T> {
        self.inner.update(|d| d.pop_front())
    }

    /// Removes and returns the last element.
    pub fn pop_tail(&self) -> Option<T> {
        self.inner.update(|d| d.pop_back())
    }

    /// Appends every element of `values`, in order.
    pub fn append(&self, values: impl IntoIterator<Item = T>) {
        let mut incoming: VecDeque<T> = values.into_iter().collect();
        self.inner.update(|d| d.append(&mut incoming))
    }

    /// Empties the deque and returns the removed contents.
    pub fn drain_all(&self) -> VecDeque<T> {
        self.inner.update(mem::take)
    }

    /// Returns a snapshot copy of the contents, head first.
    pub fn snapshot(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.inner.update(|d| d.iter().cloned().collect())
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.inner.update(|d| d.len())
    }

    /// Returns `true` if the deque holds no elements.
    pub fn is_empty(&self) -> bool {
        self.inner.update(|d| d.is_empty())
    }
}

impl<T> Default for AtomicDeque<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for AtomicDeque<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.snapshot()).finish()
    }
}
