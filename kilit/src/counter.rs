//! `AtomicCounter` — a lock-guarded saturating counter.

use crate::cell::AtomicCell;
use crate::lock::SharedLock;
use std::fmt;

/// A lock-guarded `u64` counter.
///
/// Increments are monotonic; [`decrement_or_zero`](AtomicCounter::decrement_or_zero)
/// saturates at zero instead of underflowing.
///
/// # Examples
///
/// ```rust
/// use kilit::AtomicCounter;
///
/// let in_flight = AtomicCounter::new(0);
/// assert_eq!(in_flight.increment(), 1);
/// assert_eq!(in_flight.decrement_or_zero(), 0);
/// assert_eq!(in_flight.decrement_or_zero(), 0); // saturates, no underflow
/// ```
pub struct AtomicCounter {
    inner: AtomicCell<u64>,
}

impl AtomicCounter {
    /// Creates a counter with a fresh private lock.
    pub fn new(initial: u64) -> Self {
        Self {
            inner: AtomicCell::new(initial),
        }
    }

    /// Creates a counter guarded by a clone of `lock`.
    pub fn with_lock(initial: u64, lock: &SharedLock) -> Self {
        Self {
            inner: AtomicCell::with_lock(initial, lock),
        }
    }

    /// Returns the current value.
    #[inline]
    pub fn get(&self) -> u64 {
        self.inner.get()
    }

    /// Replaces the current value.
    #[inline]
    pub fn set(&self, value: u64) {
        self.inner.set(value)
    }

    /// Adds one and returns the new value.
    #[inline]
    pub fn increment(&self) -> u64 {
        self.add(1)
    }

    /// Adds `amount` and returns the new value. Saturates at `u64::MAX`.
    pub fn add(&self, amount: u64) -> u64 {
        self.inner.update(|v| {
            *v = v.saturating_add(amount);
            *v
        })
    }

    /// Subtracts one and returns the new value, saturating at zero.
    pub fn decrement_or_zero(&self) -> u64 {
        self.inner.update(|v| {
            *v = v.saturating_sub(1);
            *v
        })
    }
}

impl Default for AtomicCounter {
    /// Creates a counter at zero.
    fn default() -> Self {
        Self::new(0)
    }
}

impl fmt::Debug for AtomicCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AtomicCounter").field(&self.get()).finish()
    }
}
