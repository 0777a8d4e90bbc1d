//! `AtomicCell<T>` — a single mutable value guarded by one exclusive lock.
//!
//! This is the base primitive for every other container in the crate.
//! Every read and write of the value happens while the lock is held, so a
//! concurrent observer always sees a complete prior or complete new value,
//! never a torn one.
//!
//! # Example
//!
//! ```rust
//! use kilit::AtomicCell;
//!
//! let cell = AtomicCell::new(vec![1, 2, 3]);
//!
//! // Snapshot copy.
//! assert_eq!(cell.get(), vec![1, 2, 3]);
//!
//! // In-place mutation under the lock, returning an arbitrary result.
//! let popped = cell.update(|v| v.pop());
//! assert_eq!(popped, Some(3));
//! ```

use crate::lock::SharedLock;
use std::cell::UnsafeCell;
use std::fmt;
use std::mem;

/// The error returned by a lost [`AtomicCell::transition`] race.
///
/// This is an expected outcome, not a fault: some other thread moved the
/// value away from the expected state first. The cell is left unchanged.
/// Callers that need to retry must loop explicitly; the cell provides no
/// retry or backoff of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionError;

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transition rejected: current value differs from the expected prior value")
    }
}

impl std::error::Error for TransitionError {}

/// A single mutable value guarded by one exclusive blocking lock.
///
/// Constructed with either a fresh private lock ([`AtomicCell::new`]) or a
/// caller-supplied shared one ([`AtomicCell::with_lock`]).
///
/// # Re-entrancy hazard
///
/// [`map`](AtomicCell::map), [`update`](AtomicCell::update), and
/// [`transition`](AtomicCell::transition) run caller-supplied code while
/// the lock is held. A closure that re-enters the same cell — directly or
/// through anything sharing its [`SharedLock`] — deadlocks. This is the
/// documented contract that makes compound read-modify-write atomic; do
/// not work around it by copying the value out first.
pub struct AtomicCell<T> {
    lock: SharedLock,
    value: UnsafeCell<T>,
}

// SAFETY: the value is only ever touched while the lock is held, and no
// reference into it escapes a critical section; same sharing story as
// `Mutex<T>`.
unsafe impl<T: Send> Send for AtomicCell<T> {}
unsafe impl<T: Send> Sync for AtomicCell<T> {}

impl<T> AtomicCell<T> {
    /// Creates a cell with a fresh private lock.
    pub fn new(value: T) -> Self {
        Self::with_lock(value, &SharedLock::new())
    }

    /// Creates a cell guarded by a clone of `lock`.
    ///
    /// Containers built from clones of one [`SharedLock`] serialize
    /// against each other; use this for groups of low-traffic values that
    /// do not warrant a lock each.
    pub fn with_lock(value: T, lock: &SharedLock) -> Self {
        Self {
            lock: lock.clone(),
            value: UnsafeCell::new(value),
        }
    }

    /// Returns a locked snapshot copy of the value.
    #[inline]
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        let _guard = self.lock.acquire();
        // SAFETY: lock held.
        unsafe { (*self.value.get()).clone() }
    }

    /// Replaces the value.
    #[inline]
    pub fn set(&self, value: T) {
        let _guard = self.lock.acquire();
        // SAFETY: lock held.
        unsafe { *self.value.get() = value }
    }

    /// Replaces the value and returns the prior one.
    #[inline]
    pub fn swap(&self, value: T) -> T {
        let _guard = self.lock.acquire();
        // SAFETY: lock held.
        unsafe { mem::replace(&mut *self.value.get(), value) }
    }

    /// Atomically replaces the value with `f(current)` and returns the new
    /// value.
    ///
    /// `f` executes **while the lock is held** — see the type-level
    /// re-entrancy hazard.
    pub fn map(&self, f: impl FnOnce(&T) -> T) -> T
    where
        T: Clone,
    {
        let _guard = self.lock.acquire();
        // SAFETY: lock held.
        let slot = unsafe { &mut *self.value.get() };
        let next = f(slot);
        *slot = next.clone();
        next
    }

    /// Atomically mutates the value in place and returns `f`'s result.
    ///
    /// `f` executes **while the lock is held** — see the type-level
    /// re-entrancy hazard.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let _guard = self.lock.acquire();
        // SAFETY: lock held.
        f(unsafe { &mut *self.value.get() })
    }

    /// Conditional update: sets the value to `to` iff it currently equals
    /// `from`.
    ///
    /// This is the toolkit's sole compare-and-swap primitive; the `try_*`
    /// conveniences on the derived containers are sugar over it. A lost
    /// race returns [`TransitionError`] and leaves the cell unchanged.
    pub fn transition(&self, from: T, to: T) -> Result<(), TransitionError>
    where
        T: PartialEq,
    {
        let _guard = self.lock.acquire();
        // SAFETY: lock held.
        let slot = unsafe { &mut *self.value.get() };
        if *slot == from {
            *slot = to;
            Ok(())
        } else {
            Err(TransitionError)
        }
    }

    /// Consumes the cell and returns the inner value.
    pub fn into_inner(self) -> T {
        // Exclusive ownership: no lock needed.
        self.value.into_inner()
    }
}

impl<T: Default> Default for AtomicCell<T> {
    /// Creates a cell containing `T::default()` with a private lock.
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> From<T> for AtomicCell<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for AtomicCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AtomicCell")
            .field("value", &self.get())
            .finish()
    }
}
