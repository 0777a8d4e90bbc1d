//! `Completion` — a clonable one-shot signal.

use parking_lot::{Condvar, Mutex};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

struct CompletionInner {
    resolved: Mutex<bool>,
    condvar: Condvar,
}

/// A one-shot signal: starts pending, resolves once, wakes every waiter.
///
/// Clones share the same underlying state, so one side can hold a clone
/// to resolve while any number of others wait.
///
/// # Examples
///
/// ```rust
/// use kilit_drain::Completion;
/// use std::thread;
///
/// let signal = Completion::new();
/// let waiter = signal.clone();
///
/// let handle = thread::spawn(move || waiter.wait());
/// signal.resolve();
/// handle.join().unwrap();
/// assert!(signal.is_resolved());
/// ```
#[derive(Clone)]
pub struct Completion {
    inner: Arc<CompletionInner>,
}

impl Completion {
    /// Creates a pending signal.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(CompletionInner {
                resolved: Mutex::new(false),
                condvar: Condvar::new(),
            }),
        }
    }

    /// Resolves the signal, waking every waiter. Idempotent.
    pub fn resolve(&self) {
        let mut resolved = self.inner.resolved.lock();
        if !*resolved {
            *resolved = true;
            self.inner.condvar.notify_all();
        }
    }

    /// Returns `true` once the signal has resolved.
    pub fn is_resolved(&self) -> bool {
        *self.inner.resolved.lock()
    }

    /// Blocks until the signal resolves.
    pub fn wait(&self) {
        let mut resolved = self.inner.resolved.lock();
        while !*resolved {
            self.inner.condvar.wait(&mut resolved);
        }
    }

    /// Blocks until the signal resolves or `timeout` elapses. Returns
    /// `true` iff the signal resolved.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut resolved = self.inner.resolved.lock();
        while !*resolved {
            if self
                .inner
                .condvar
                .wait_until(&mut resolved, deadline)
                .timed_out()
            {
                return *resolved;
            }
        }
        true
    }
}

impl Default for Completion {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Completion")
            .field(&if self.is_resolved() {
                "resolved"
            } else {
                "pending"
            })
            .finish()
    }
}
