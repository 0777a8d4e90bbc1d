//! Deferred execution: the `Scheduler` trait and its two implementations.
//!
//! Coordination components never own threads or timers directly; they hand
//! closures to an opaque [`Scheduler`]. Production code uses
//! [`ThreadScheduler`] (a thread per job, sleeping out the delay). Tests
//! use [`VirtualScheduler`], which also implements [`Clock`] and runs jobs
//! deterministically as virtual time is advanced.

use crate::time::Clock;
use parking_lot::Mutex;
use std::thread;
use std::time::{Duration, Instant};

/// A deferred unit of work.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// An opaque deferred-execution context.
///
/// The only guarantee is that jobs run on the configured context; thread
/// identity is unspecified. Scheduled jobs cannot be cancelled through
/// this interface — components that need invalidation carry their own
/// generation checks inside the job.
pub trait Scheduler: Send + Sync {
    /// Runs `job` after at least `after` has elapsed.
    fn schedule(&self, after: Duration, job: Job);

    /// Runs `job` as soon as the context gets to it, never inline on the
    /// calling thread.
    fn schedule_now(&self, job: Job);
}

/// A scheduler that spawns one thread per job and sleeps out the delay.
///
/// # Examples
///
/// ```rust
/// use kilit::{Scheduler, ThreadScheduler};
/// use std::sync::mpsc;
/// use std::time::Duration;
///
/// let scheduler = ThreadScheduler;
/// let (tx, rx) = mpsc::channel();
/// scheduler.schedule(Duration::from_millis(10), Box::new(move || {
///     tx.send(()).unwrap();
/// }));
/// rx.recv_timeout(Duration::from_secs(5)).unwrap();
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadScheduler;

impl Scheduler for ThreadScheduler {
    fn schedule(&self, after: Duration, job: Job) {
        thread::spawn(move || {
            thread::sleep(after);
            job();
        });
    }

    fn schedule_now(&self, job: Job) {
        thread::spawn(job);
    }
}

struct VirtualEntry {
    due: Duration,
    seq: u64,
    job: Job,
}

struct VirtualState {
    elapsed: Duration,
    next_seq: u64,
    entries: Vec<VirtualEntry>,
}

/// A deterministic scheduler over manually-advanced virtual time.
///
/// Implements both [`Clock`] and [`Scheduler`], so one `Arc` can serve a
/// component as its time source and its execution context at once.
/// Nothing runs until [`advance`](VirtualScheduler::advance) (or
/// [`run_now_jobs`](VirtualScheduler::run_now_jobs)) is called; due jobs
/// then run on the calling thread, in deadline order with FIFO ties, each
/// observing `now()` at its own deadline. Jobs may schedule further jobs;
/// those run within the same `advance` call if they fall due inside it.
///
/// # Examples
///
/// ```rust
/// use kilit::{Clock, Scheduler, VirtualScheduler};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::time::Duration;
///
/// let timeline = VirtualScheduler::new();
/// let fired = Arc::new(AtomicBool::new(false));
/// let flag = fired.clone();
/// timeline.schedule(Duration::from_secs(5), Box::new(move || {
///     flag.store(true, Ordering::SeqCst);
/// }));
///
/// timeline.advance(Duration::from_secs(4));
/// assert!(!fired.load(Ordering::SeqCst));
/// timeline.advance(Duration::from_secs(1));
/// assert!(fired.load(Ordering::SeqCst));
/// ```
pub struct VirtualScheduler {
    base: Instant,
    state: Mutex<VirtualState>,
}

impl VirtualScheduler {
    /// Creates a scheduler at virtual time zero.
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            state: Mutex::new(VirtualState {
                elapsed: Duration::ZERO,
                next_seq: 0,
                entries: Vec::new(),
            }),
        }
    }

    /// Advances virtual time by `delta`, running every job that falls due.
    ///
    /// Jobs run outside the internal lock, so they are free to schedule
    /// more work or to call back into components that use this scheduler.
    pub fn advance(&self, delta: Duration) {
        let target = {
            let state = self.state.lock();
            state.elapsed + delta
        };
        loop {
            let job = {
                let mut state = self.state.lock();
                match Self::pop_due(&mut state, target) {
                    Some(job) => Some(job),
                    None => {
                        state.elapsed = target;
                        None
                    }
                }
            };
            match job {
                Some(job) => job(),
                None => break,
            }
        }
    }

    /// Runs every job already due at the current virtual time, without
    /// advancing it. Shorthand for `advance(Duration::ZERO)`.
    pub fn run_now_jobs(&self) {
        self.advance(Duration::ZERO)
    }

    /// Returns the number of jobs still waiting for their deadline.
    pub fn pending_jobs(&self) -> usize {
        self.state.lock().entries.len()
    }

    /// Removes the earliest-due entry at or before `target`, stepping
    /// `elapsed` to its deadline.
    fn pop_due(state: &mut VirtualState, target: Duration) -> Option<Job> {
        let idx = state
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= target)
            .min_by_key(|(_, e)| (e.due, e.seq))
            .map(|(idx, _)| idx)?;
        let entry = state.entries.swap_remove(idx);
        if entry.due > state.elapsed {
            state.elapsed = entry.due;
        }
        Some(entry.job)
    }
}

impl Default for VirtualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for VirtualScheduler {
    fn now(&self) -> Instant {
        self.base + self.state.lock().elapsed
    }
}

impl Scheduler for VirtualScheduler {
    fn schedule(&self, after: Duration, job: Job) {
        let mut state = self.state.lock();
        let due = state.elapsed + after;
        let seq = state.next_seq;
        state.next_seq += 1;
        state.entries.push(VirtualEntry { due, seq, job });
    }

    fn schedule_now(&self, job: Job) {
        self.schedule(Duration::ZERO, job)
    }
}
