//! Kilit: lock-guarded atomic containers for multi-threaded coordination.
//!
//! Kilit provides a family of small containers that guard a single value
//! with one exclusive blocking lock, so that every read and write is a
//! consistent snapshot — no torn values, no data races, no unsafe at call
//! sites.
//!
//! # Key Features
//!
//! - **One lock per container**: every operation takes the container's own
//!   lock for a bounded critical section (field access or bulk copy, never
//!   I/O).
//! - **Shareable locks**: low-traffic containers can share a single
//!   [`SharedLock`] handed down from the composition root.
//! - **A single CAS primitive**: [`AtomicCell::transition`] is the one
//!   conditional update; every `try_*` convenience on the derived
//!   containers is sugar over it.
//! - **Typed derivatives**: boolean flag, saturating counter, optional
//!   slot, deque, map, and set — each wrapping exactly one cell.
//! - **Injectable time**: the [`Clock`] and [`Scheduler`] abstractions let
//!   downstream components run on real threads in production and on a
//!   manually-advanced [`VirtualScheduler`] in tests.
//!
//! # Example
//!
//! ```rust
//! use kilit::AtomicCell;
//!
//! let cell = AtomicCell::new(41u64);
//!
//! // Atomic read-modify-write; the closure runs while the lock is held.
//! let new = cell.map(|v| v + 1);
//! assert_eq!(new, 42);
//!
//! // Conditional update: succeeds only from the expected prior value.
//! assert!(cell.transition(42, 43).is_ok());
//! assert!(cell.transition(42, 44).is_err());
//! ```
//!
//! # Re-entrancy hazard
//!
//! [`AtomicCell::map`], [`AtomicCell::update`], and
//! [`AtomicCell::transition`] run caller-supplied code **while the lock is
//! held**. A closure that re-enters the same cell (or another container
//! sharing the same [`SharedLock`]) deadlocks. This is a deliberate
//! contract: it is what makes compound read-modify-write logic atomic.

#![warn(missing_docs)]

mod cell;
mod counter;
mod deque;
mod flag;
mod lock;
mod map;
mod option;
mod sched;
mod set;
mod time;

pub use cell::{AtomicCell, TransitionError};
pub use counter::AtomicCounter;
pub use deque::AtomicDeque;
pub use flag::AtomicFlag;
pub use lock::{SharedLock, SharedLockGuard};
pub use map::AtomicMap;
pub use option::AtomicOption;
pub use sched::{Job, Scheduler, ThreadScheduler, VirtualScheduler};
pub use set::AtomicSet;
pub use time::{Clock, SystemClock};
