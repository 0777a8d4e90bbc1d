//! `SharedLock` — a clonable handle to one exclusive blocking lock.
//!
//! Every container in this crate owns a `SharedLock`. By default each
//! container gets a fresh private lock; callers that want several
//! low-traffic containers to share one mutex clone a single handle and
//! pass it to the `with_lock` constructors. Create the shared instance
//! once at the composition root and pass it down — it is ordinary data,
//! not ambient global state.

use parking_lot::lock_api::RawMutex as _;
use parking_lot::RawMutex;
use std::sync::Arc;

/// A clonable handle to one exclusive blocking lock.
///
/// Two clones of the same `SharedLock` guard the same mutex: containers
/// constructed from clones of one handle are mutually exclusive with each
/// other.
///
/// # Examples
///
/// ```rust
/// use kilit::{AtomicFlag, SharedLock};
///
/// let lock = SharedLock::new();
/// let a = AtomicFlag::with_lock(false, &lock);
/// let b = AtomicFlag::with_lock(true, &lock);
/// // `a` and `b` now serialize against the same mutex.
/// assert!(!a.get());
/// assert!(b.get());
/// ```
#[derive(Clone)]
pub struct SharedLock {
    raw: Arc<RawMutex>,
}

impl SharedLock {
    /// Creates a fresh, unlocked lock.
    pub fn new() -> Self {
        Self {
            raw: Arc::new(RawMutex::INIT),
        }
    }

    /// Acquires the lock, blocking until it is available.
    ///
    /// The returned guard releases the lock on drop. The lock is not
    /// re-entrant: acquiring it again on the same thread while a guard is
    /// live deadlocks.
    #[inline]
    pub fn acquire(&self) -> SharedLockGuard<'_> {
        self.raw.lock();
        SharedLockGuard { lock: self }
    }
}

impl Default for SharedLock {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SharedLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SharedLock")
    }
}

/// RAII guard returned by [`SharedLock::acquire`]. Releases the lock on
/// drop.
pub struct SharedLockGuard<'a> {
    lock: &'a SharedLock,
}

impl Drop for SharedLockGuard<'_> {
    #[inline]
    fn drop(&mut self) {
        // SAFETY: this guard is the unique witness that the lock is held;
        // it was acquired in `SharedLock::acquire` and released only here.
        unsafe { self.lock.raw.unlock() }
    }
}
