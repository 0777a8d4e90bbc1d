//! `AtomicSet<T>` — a lock-guarded hash set.

use crate::cell::AtomicCell;
use crate::lock::SharedLock;
use foldhash::fast::FixedState;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::mem;

/// A lock-guarded `HashSet<T>` using the foldhash fast hasher.
///
/// # Examples
///
/// ```rust
/// use kilit::AtomicSet;
///
/// let seen: AtomicSet<u64> = AtomicSet::new();
/// assert!(seen.insert(7));
/// assert!(!seen.insert(7)); // already present
/// assert!(seen.contains(&7));
/// assert!(seen.remove(&7));
/// assert!(seen.is_empty());
/// ```
pub struct AtomicSet<T> {
    inner: AtomicCell<HashSet<T, FixedState>>,
}

impl<T: Eq + Hash> AtomicSet<T> {
    /// Creates an empty set with a fresh private lock.
    pub fn new() -> Self {
        Self {
            inner: AtomicCell::new(HashSet::default()),
        }
    }

    /// Creates an empty set guarded by a clone of `lock`.
    pub fn with_lock(lock: &SharedLock) -> Self {
        Self {
            inner: AtomicCell::with_lock(HashSet::default(), lock),
        }
    }

    /// Inserts a value. Returns `true` iff it was not already present.
    pub fn insert(&self, value: T) -> bool {
        self.inner.update(|s| s.insert(value))
    }

    /// Removes a value. Returns `true` iff it was present.
    pub fn remove(&self, value: &T) -> bool {
        self.inner.update(|s| s.remove(value))
    }

    /// Returns `true` if `value` is present.
    pub fn contains(&self, value: &T) -> bool {
        self.inner.update(|s| s.contains(value))
    }

    /// Empties the set and returns the removed contents.
    pub fn drain_all(&self) -> HashSet<T, FixedState> {
        self.inner.update(mem::take)
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.inner.update(|s| s.len())
    }

    /// Returns `true` if the set holds no elements.
    pub fn is_empty(&self) -> bool {
        self.inner.update(|s| s.is_empty())
    }
}

impl<T: Eq + Hash> Default for AtomicSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for AtomicSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AtomicSet")
    }
}
