//! `AtomicMap<K, V>` — a lock-guarded hash map.

use crate::cell::AtomicCell;
use crate::lock::SharedLock;
use foldhash::fast::FixedState;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::mem;

/// A lock-guarded `HashMap<K, V>` using the foldhash fast hasher.
///
/// Point operations are O(1) average; bulk eviction returns the removed
/// contents so callers can release them outside any lock they hold.
///
/// # Examples
///
/// ```rust
/// use kilit::AtomicMap;
///
/// let by_id: AtomicMap<u64, String> = AtomicMap::new();
/// by_id.insert(1, "alpha".to_owned());
/// by_id.insert(2, "beta".to_owned());
///
/// assert_eq!(by_id.get(&1).as_deref(), Some("alpha"));
/// assert_eq!(by_id.remove(&2).as_deref(), Some("beta"));
/// assert_eq!(by_id.len(), 1);
/// ```
pub struct AtomicMap<K, V> {
    inner: AtomicCell<HashMap<K, V, FixedState>>,
}

impl<K: Eq + Hash, V> AtomicMap<K, V> {
    /// Creates an empty map with a fresh private lock.
    pub fn new() -> Self {
        Self {
            inner: AtomicCell::new(HashMap::default()),
        }
    }

    /// Creates an empty map guarded by a clone of `lock`.
    pub fn with_lock(lock: &SharedLock) -> Self {
        Self {
            inner: AtomicCell::with_lock(HashMap::default(), lock),
        }
    }

    /// Inserts a value, returning the displaced one if any.
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.inner.update(|m| m.insert(key, value))
    }

    /// Returns a snapshot copy of the value for `key`.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.update(|m| m.get(key).cloned())
    }

    /// Removes and returns the value for `key`.
    pub fn remove(&self, key: &K) -> Option<V> {
        self.inner.update(|m| m.remove(key))
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.update(|m| m.contains_key(key))
    }

    /// Returns a snapshot copy of all values, in arbitrary order.
    pub fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.inner.update(|m| m.values().cloned().collect())
    }

    /// Empties the map and returns the removed contents.
    pub fn drain_all(&self) -> HashMap<K, V, FixedState> {
        self.inner.update(mem::take)
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.inner.update(|m| m.len())
    }

    /// Returns `true` if the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.update(|m| m.is_empty())
    }
}

impl<K: Eq + Hash, V> Default for AtomicMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for AtomicMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AtomicMap")
    }
}
