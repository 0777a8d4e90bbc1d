//! Dynamic drain barrier for in-flight work.
//!
//! A [`PendingTasks`] tracker hands out [`PendingTask`] handles for units
//! of work in flight. At any point a caller can take a **snapshot**
//! barrier over the currently-registered tasks: the barrier resolves once
//! every task in the snapshot has completed, while tasks registered after
//! the snapshot never block it. This is the shape needed for "finish what
//! you started before suspending" checkpoints.
//!
//! # Key Features
//!
//! - **Exactly-once completion**: [`PendingTask::complete`] is idempotent;
//!   the first call wins, later calls are no-ops.
//! - **Deterministic safety net**: a handle dropped without an explicit
//!   `complete()` completes itself on scope exit (and logs a warning), so
//!   an abandoned task can never hang a barrier.
//! - **Snapshot semantics**: [`PendingTasks::pending_tasks_barrier`]
//!   captures the live set at call time; it is a drain barrier, not a
//!   live one.
//!
//! # Example
//!
//! ```rust
//! use kilit_drain::PendingTasks;
//!
//! let tracker = PendingTasks::new("message-pipeline");
//! let send = tracker.build("send");
//! let store = tracker.build("store");
//!
//! let barrier = tracker.pending_tasks_barrier();
//! assert!(!barrier.is_drained());
//!
//! send.complete();
//! store.complete();
//! barrier.wait(); // returns immediately: snapshot fully drained
//! ```

#![warn(missing_docs)]

mod completion;
mod tracker;

pub use completion::Completion;
pub use tracker::{DrainBarrier, PendingTask, PendingTasks};
