//! The pending-task tracker and its owning task handles.

use crate::completion::Completion;
use kilit::{AtomicFlag, AtomicMap};
use portable_atomic::AtomicU64;
use std::fmt;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tracing::{trace, warn};

struct TrackerInner {
    label: &'static str,
    next_id: AtomicU64,
    tasks: AtomicMap<u64, Completion>,
}

/// Tracks units of in-flight work and hands out drain barriers over them.
///
/// Clones share the same underlying tracker. The map of live tasks grows
/// on [`build`](PendingTasks::build) and shrinks as tasks complete.
#[derive(Clone)]
pub struct PendingTasks {
    inner: Arc<TrackerInner>,
}

impl PendingTasks {
    /// Creates an empty tracker. `label` names it in diagnostics.
    pub fn new(label: &'static str) -> Self {
        Self {
            inner: Arc::new(TrackerInner {
                label,
                next_id: AtomicU64::new(1),
                tasks: AtomicMap::new(),
            }),
        }
    }

    /// Registers a new unit of in-flight work and returns its handle.
    ///
    /// The handle is the only way to complete the task: hold it for as
    /// long as the work is in flight. If it is dropped without an
    /// explicit [`complete`](PendingTask::complete), the task completes
    /// itself on scope exit — deterministically, with a logged warning —
    /// so an abandoned handle can never hang a barrier.
    pub fn build(&self, label: &'static str) -> PendingTask {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let completion = Completion::new();
        self.inner.tasks.insert(id, completion.clone());
        trace!(tracker = self.inner.label, task = label, id, "task registered");
        PendingTask {
            id,
            label,
            done: AtomicFlag::new(false),
            completion,
            tracker: Arc::clone(&self.inner),
        }
    }

    /// Takes a snapshot of the currently-registered tasks and returns a
    /// barrier that resolves once all of them have completed.
    ///
    /// Tasks built after this call do not block the returned barrier:
    /// this is a drain barrier over work already in flight, not a live
    /// one.
    pub fn pending_tasks_barrier(&self) -> DrainBarrier {
        DrainBarrier {
            signals: self.inner.tasks.values(),
        }
    }

    /// Returns the number of tasks currently in flight.
    pub fn pending_count(&self) -> usize {
        self.inner.tasks.len()
    }
}

impl fmt::Debug for PendingTasks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingTasks")
            .field("label", &self.inner.label)
            .field("pending", &self.pending_count())
            .finish()
    }
}

/// The owning handle for one unit of in-flight work.
///
/// Completion is exactly-once: the first [`complete`](PendingTask::complete)
/// (or the drop safety net) removes the task from its tracker and resolves
/// its signal; everything after that is a no-op.
pub struct PendingTask {
    id: u64,
    label: &'static str,
    done: AtomicFlag,
    completion: Completion,
    tracker: Arc<TrackerInner>,
}

impl PendingTask {
    /// Marks the work finished. Idempotent.
    pub fn complete(&self) {
        self.finish(false);
    }

    /// The task's unique id within its tracker.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The label given at [`PendingTasks::build`].
    pub fn label(&self) -> &'static str {
        self.label
    }

    fn finish(&self, abandoned: bool) {
        // First caller past this transition owns the teardown.
        if !self.done.try_set() {
            return;
        }
        self.tracker.tasks.remove(&self.id);
        self.completion.resolve();
        if abandoned {
            warn!(
                tracker = self.tracker.label,
                task = self.label,
                id = self.id,
                "task handle dropped without complete(); completing on scope exit"
            );
        } else {
            trace!(
                tracker = self.tracker.label,
                task = self.label,
                id = self.id,
                "task completed"
            );
        }
    }
}

impl Drop for PendingTask {
    fn drop(&mut self) {
        self.finish(true);
    }
}

impl fmt::Debug for PendingTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingTask")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("done", &self.done.get())
            .finish()
    }
}

/// A snapshot barrier over the tasks that were in flight when it was
/// taken.
pub struct DrainBarrier {
    signals: Vec<Completion>,
}

impl DrainBarrier {
    /// Blocks until every task in the snapshot has completed.
    pub fn wait(&self) {
        for signal in &self.signals {
            signal.wait();
        }
    }

    /// Blocks until the snapshot drains or `timeout` elapses. Returns
    /// `true` iff the snapshot fully drained.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = std::time::Instant::now() + timeout;
        for signal in &self.signals {
            let remaining = deadline.saturating_duration_since(std::time::Instant::now());
            if !signal.wait_timeout(remaining) {
                return false;
            }
        }
        true
    }

    /// Returns `true` if every task in the snapshot has already
    /// completed.
    pub fn is_drained(&self) -> bool {
        self.signals.iter().all(Completion::is_resolved)
    }

    /// The number of tasks captured in the snapshot.
    pub fn len(&self) -> usize {
        self.signals.len()
    }

    /// Returns `true` if the snapshot captured no tasks.
    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}

impl fmt::Debug for DrainBarrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrainBarrier")
            .field("snapshot", &self.len())
            .field("drained", &self.is_drained())
            .finish()
    }
}
