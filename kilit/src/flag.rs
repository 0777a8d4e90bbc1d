//! `AtomicFlag` — a lock-guarded boolean with race-deciding transitions.

use crate::cell::AtomicCell;
use crate::lock::SharedLock;
use std::fmt;

/// A lock-guarded boolean flag.
///
/// [`try_set`](AtomicFlag::try_set) and [`try_clear`](AtomicFlag::try_clear)
/// are conditional transitions: when several threads race to flip the
/// flag, exactly one of them observes `true`. This is the primitive used
/// for "first caller wins" decisions.
///
/// # Examples
///
/// ```rust
/// use kilit::AtomicFlag;
///
/// let started = AtomicFlag::new(false);
/// assert!(started.try_set());   // this caller won the race
/// assert!(!started.try_set());  // already set — lost
/// assert!(started.get());
/// ```
pub struct AtomicFlag {
    inner: AtomicCell<bool>,
}

impl AtomicFlag {
    /// Creates a flag with a fresh private lock.
    pub fn new(initial: bool) -> Self {
        Self {
            inner: AtomicCell::new(initial),
        }
    }

    /// Creates a flag guarded by a clone of `lock`.
    pub fn with_lock(initial: bool, lock: &SharedLock) -> Self {
        Self {
            inner: AtomicCell::with_lock(initial, lock),
        }
    }

    /// Returns the current value.
    #[inline]
    pub fn get(&self) -> bool {
        self.inner.get()
    }

    /// Unconditionally sets the value.
    #[inline]
    pub fn set(&self, value: bool) {
        self.inner.set(value)
    }

    /// Attempts the `false → true` transition. Returns `true` iff this
    /// caller performed it.
    #[inline]
    pub fn try_set(&self) -> bool {
        self.inner.transition(false, true).is_ok()
    }

    /// Attempts the `true → false` transition. Returns `true` iff this
    /// caller performed it.
    #[inline]
    pub fn try_clear(&self) -> bool {
        self.inner.transition(true, false).is_ok()
    }
}

impl Default for AtomicFlag {
    /// Creates an unset flag.
    fn default() -> Self {
        Self::new(false)
    }
}

impl fmt::Debug for AtomicFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AtomicFlag").field(&self.get()).finish()
    }
}
