//! One-shot readiness gate with ordered deferred callbacks.
//!
//! A [`ReadinessGate`] tracks a single milestone: it starts not-ready,
//! becomes ready exactly once, and never goes back. Work registered before
//! the transition is queued; work registered after it runs immediately.
//! When the transition fires, the queued work runs in three strictly
//! ordered phases:
//!
//! 1. **will-become-ready** — synchronously, before anything else.
//! 2. **ready (sync)** — synchronously, after phase 1 completes.
//! 3. **ready (async, "polite")** — one callback at a time on the gate's
//!    scheduler, with a small fixed delay between callbacks so a burst of
//!    deferred work cannot starve the thread that opened the gate.
//!
//! Within each phase, callbacks run in ascending priority order, FIFO for
//! equal priorities. Each registered callback runs exactly once.
//!
//! # Example
//!
//! ```rust
//! use kilit::{ThreadScheduler, SystemClock};
//! use kilit_gate::ReadinessGate;
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicBool, Ordering};
//!
//! let gate = ReadinessGate::new(Arc::new(SystemClock), Arc::new(ThreadScheduler));
//!
//! let ran = Arc::new(AtomicBool::new(false));
//! let flag = ran.clone();
//! gate.run_now_or_when_ready_sync("warm-caches", 0, move || {
//!     flag.store(true, Ordering::SeqCst);
//! });
//! assert!(!ran.load(Ordering::SeqCst)); // still queued
//!
//! gate.set_ready();
//! assert!(ran.load(Ordering::SeqCst)); // drained synchronously
//! ```

#![warn(missing_docs)]

mod gate;

pub use gate::ReadinessGate;
