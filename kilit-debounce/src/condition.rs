//! Observable boolean conditions.

use kilit::AtomicFlag;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// An externally-observed boolean condition.
///
/// A condition exposes exactly two things: its current value and a change
/// notification. [`RefreshScheduler`](crate::RefreshScheduler) needs
/// nothing more from its collaborators — readiness, foreground state,
/// registration, reachability and the like all reduce to this shape at
/// the boundary.
pub trait Condition: Send + Sync {
    /// The condition's current value.
    fn current(&self) -> bool;

    /// Registers an observer invoked after every value change.
    fn subscribe(&self, observer: Arc<dyn Fn() + Send + Sync>);
}

/// A hand-driven [`Condition`] for tests and for composition roots that
/// bridge foreign change signals into the toolkit.
///
/// # Examples
///
/// ```rust
/// use kilit_debounce::{Condition, ManualCondition};
///
/// let online = ManualCondition::new(false);
/// assert!(!online.current());
/// online.set(true);
/// assert!(online.current());
/// ```
pub struct ManualCondition {
    value: AtomicFlag,
    observers: Mutex<Vec<Arc<dyn Fn() + Send + Sync>>>,
}

impl ManualCondition {
    /// Creates a condition with the given initial value.
    pub fn new(initial: bool) -> Self {
        Self {
            value: AtomicFlag::new(initial),
            observers: Mutex::new(Vec::new()),
        }
    }

    /// Sets the value, notifying observers iff it actually changed.
    ///
    /// Observers run on the calling thread, outside the observer-list
    /// lock.
    pub fn set(&self, value: bool) {
        // The flag's transition decides the race: only the caller that
        // actually flips the value notifies.
        let changed = if value {
            self.value.try_set()
        } else {
            self.value.try_clear()
        };
        if !changed {
            return;
        }
        let observers = self.observers.lock().clone();
        for observer in observers {
            observer();
        }
    }
}

impl Condition for ManualCondition {
    fn current(&self) -> bool {
        self.value.get()
    }

    fn subscribe(&self, observer: Arc<dyn Fn() + Send + Sync>) {
        self.observers.lock().push(observer);
    }
}

impl fmt::Debug for ManualCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualCondition")
            .field("value", &self.value.get())
            .field("observers", &self.observers.lock().len())
            .finish()
    }
}
