//! `AtomicOption<T>` — a lock-guarded optional slot with conditional
//! fill/clear.

use crate::cell::{AtomicCell, TransitionError};
use crate::lock::SharedLock;
use std::fmt;

/// A lock-guarded `Option<T>`.
///
/// Besides the plain get/set/swap family, the `*_if_none` / `*_if_eq`
/// operations are conditional transitions built on the cell's single CAS
/// primitive: when several threads race to fill or clear the slot, exactly
/// one wins.
///
/// # Examples
///
/// ```rust
/// use kilit::AtomicOption;
///
/// let session: AtomicOption<u32> = AtomicOption::new(None);
/// assert!(session.try_set_if_none(7));    // first writer wins
/// assert!(!session.try_set_if_none(8));   // slot already occupied
/// assert_eq!(session.get(), Some(7));
///
/// assert!(!session.try_clear_if_eq(8));   // not the current value
/// assert!(session.try_clear_if_eq(7));
/// assert!(session.is_none());
/// ```
pub struct AtomicOption<T> {
    inner: AtomicCell<Option<T>>,
}

impl<T> AtomicOption<T> {
    /// Creates a slot with a fresh private lock.
    pub fn new(initial: Option<T>) -> Self {
        Self {
            inner: AtomicCell::new(initial),
        }
    }

    /// Creates a slot guarded by a clone of `lock`.
    pub fn with_lock(initial: Option<T>, lock: &SharedLock) -> Self {
        Self {
            inner: AtomicCell::with_lock(initial, lock),
        }
    }

    /// Returns a snapshot copy of the contents.
    #[inline]
    pub fn get(&self) -> Option<T>
    where
        T: Clone,
    {
        self.inner.get()
    }

    /// Replaces the contents.
    #[inline]
    pub fn set(&self, value: Option<T>) {
        self.inner.set(value)
    }

    /// Replaces the contents and returns the prior ones.
    #[inline]
    pub fn swap(&self, value: Option<T>) -> Option<T> {
        self.inner.swap(value)
    }

    /// Empties the slot, returning what it held.
    #[inline]
    pub fn take(&self) -> Option<T> {
        self.inner.swap(None)
    }

    /// Returns `true` if the slot is empty.
    pub fn is_none(&self) -> bool {
        self.inner.update(|v| v.is_none())
    }

    /// Returns `true` if the slot holds a value.
    pub fn is_some(&self) -> bool {
        !self.is_none()
    }
}

impl<T: PartialEq> AtomicOption<T> {
    /// Fills the slot iff it is currently empty.
    pub fn set_if_none(&self, value: T) -> Result<(), TransitionError> {
        self.inner.transition(None, Some(value))
    }

    /// Fills the slot iff it is currently empty, reporting success as a
    /// boolean.
    pub fn try_set_if_none(&self, value: T) -> bool {
        self.set_if_none(value).is_ok()
    }

    /// Empties the slot iff it currently holds exactly `value`.
    pub fn clear_if_eq(&self, value: T) -> Result<(), TransitionError> {
        self.inner.transition(Some(value), None)
    }

    /// Empties the slot iff it currently holds exactly `value`, reporting
    /// success as a boolean.
    pub fn try_clear_if_eq(&self, value: T) -> bool {
        self.clear_if_eq(value).is_ok()
    }
}

impl<T> Default for AtomicOption<T> {
    /// Creates an empty slot.
    fn default() -> Self {
        Self::new(None)
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for AtomicOption<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(value) => f.debug_tuple("AtomicOption::Some").field(&value).finish(),
            None => f.write_str("AtomicOption::None"),
        }
    }
}
