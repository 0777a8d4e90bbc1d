//! The readiness gate: a one-shot latch plus three callback queues.

use kilit::{AtomicFlag, Clock, Job, Scheduler};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::mem;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Spacing between consecutive polite-phase callbacks.
const POLITE_SPACING: Duration = Duration::from_millis(25);

/// A drained callback running longer than this is logged by label.
const SLOW_CALLBACK_THRESHOLD: Duration = Duration::from_millis(10);

/// Which of the three queues a registration targets.
#[derive(Clone, Copy)]
enum Phase {
    WillBecomeReady,
    ReadySync,
    ReadyAsync,
}

struct Registration {
    label: &'static str,
    priority: i32,
    block: Job,
}

#[derive(Default)]
struct Queues {
    will_become_ready: Vec<Registration>,
    ready_sync: Vec<Registration>,
    ready_async: Vec<Registration>,
}

/// A one-shot readiness latch with ordered deferred callbacks.
///
/// See the [crate docs](crate) for the phase ordering contract.
///
/// The readiness check and the queue append happen in a single critical
/// section, so no callback can fall through the gap between "not ready
/// yet" and "opened meanwhile": it is either queued before the drain or
/// runs immediately after it.
pub struct ReadinessGate {
    ready: AtomicFlag,
    queues: Mutex<Queues>,
    clock: Arc<dyn Clock>,
    scheduler: Arc<dyn Scheduler>,
}

impl ReadinessGate {
    /// Creates a closed gate.
    ///
    /// `scheduler` is where polite-phase callbacks (and post-readiness
    /// async registrations) are dispatched; `clock` times drained
    /// callbacks for the slow-callback diagnostics.
    pub fn new(clock: Arc<dyn Clock>, scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            ready: AtomicFlag::new(false),
            queues: Mutex::new(Queues::default()),
            clock,
            scheduler,
        }
    }

    /// Returns `true` once the gate has opened.
    pub fn is_ready(&self) -> bool {
        self.ready.get()
    }

    /// Queues `block` for the will-become-ready phase, or runs it
    /// synchronously right now if the gate is already open.
    ///
    /// Lower `priority` runs earlier; equal priorities run in
    /// registration order. `label` identifies the block in diagnostics.
    pub fn run_now_or_when_will_become_ready(
        &self,
        label: &'static str,
        priority: i32,
        block: impl FnOnce() + Send + 'static,
    ) {
        self.enqueue(Phase::WillBecomeReady, label, priority, Box::new(block));
    }

    /// Queues `block` for the synchronous ready phase, or runs it
    /// synchronously right now if the gate is already open.
    pub fn run_now_or_when_ready_sync(
        &self,
        label: &'static str,
        priority: i32,
        block: impl FnOnce() + Send + 'static,
    ) {
        self.enqueue(Phase::ReadySync, label, priority, Box::new(block));
    }

    /// Queues `block` for the polite asynchronous ready phase. If the
    /// gate is already open, the block is dispatched onto the gate's
    /// scheduler immediately — "run now" still means now, just never
    /// inline on the calling thread.
    pub fn run_now_or_when_ready_async(
        &self,
        label: &'static str,
        priority: i32,
        block: impl FnOnce() + Send + 'static,
    ) {
        self.enqueue(Phase::ReadyAsync, label, priority, Box::new(block));
    }

    /// Opens the gate.
    ///
    /// Exactly one caller wins the not-ready → ready transition and
    /// drains the queues; a redundant call is a no-op. The queues are
    /// copied out and cleared, and the coordination lock is released
    /// **before** any callback runs, so callbacks are free to register
    /// more work on this same gate.
    pub fn set_ready(&self) {
        let (will, sync, polite) = {
            let mut queues = self.queues.lock();
            if !self.ready.try_set() {
                warn!("redundant set_ready ignored; gate is already open");
                return;
            }
            (
                mem::take(&mut queues.will_become_ready),
                mem::take(&mut queues.ready_sync),
                mem::take(&mut queues.ready_async),
            )
        };
        debug!(
            will = will.len(),
            sync = sync.len(),
            polite = polite.len(),
            "gate opening"
        );

        for reg in in_phase_order(will) {
            run_timed(&*self.clock, reg.label, reg.block);
        }
        for reg in in_phase_order(sync) {
            run_timed(&*self.clock, reg.label, reg.block);
        }
        run_polite_chain(
            self.clock.clone(),
            self.scheduler.clone(),
            in_phase_order(polite).into(),
        );
    }

    fn enqueue(&self, phase: Phase, label: &'static str, priority: i32, block: Job) {
        {
            let mut queues = self.queues.lock();
            // Readiness is checked and the append performed under one
            // critical section; `set_ready` flips the flag under this
            // same lock, so a registration is either drained or runs
            // immediately — never lost between the two.
            if !self.ready.get() {
                let queue = match phase {
                    Phase::WillBecomeReady => &mut queues.will_become_ready,
                    Phase::ReadySync => &mut queues.ready_sync,
                    Phase::ReadyAsync => &mut queues.ready_async,
                };
                queue.push(Registration {
                    label,
                    priority,
                    block,
                });
                return;
            }
        }
        // Already open: run now, outside the lock.
        match phase {
            Phase::ReadyAsync => {
                debug!(label, "gate already open, dispatching");
                self.scheduler.schedule_now(block);
            }
            Phase::WillBecomeReady | Phase::ReadySync => {
                run_timed(&*self.clock, label, block);
            }
        }
    }
}

/// Ascending priority, FIFO within equal priority (the sort is stable and
/// the queue is in registration order).
fn in_phase_order(mut regs: Vec<Registration>) -> Vec<Registration> {
    regs.sort_by_key(|r| r.priority);
    regs
}

fn run_timed(clock: &dyn Clock, label: &'static str, block: Job) {
    let start = clock.now();
    block();
    let elapsed = clock.now() - start;
    if elapsed > SLOW_CALLBACK_THRESHOLD {
        warn!(label, ?elapsed, "readiness callback ran long");
    }
}

/// Runs the polite queue one callback at a time: dispatch the head now,
/// then re-schedule the tail after [`POLITE_SPACING`].
fn run_polite_chain(
    clock: Arc<dyn Clock>,
    scheduler: Arc<dyn Scheduler>,
    mut remaining: VecDeque<Registration>,
) {
    let Some(reg) = remaining.pop_front() else {
        return;
    };
    let job_clock = clock.clone();
    let job_scheduler = scheduler.clone();
    scheduler.schedule_now(Box::new(move || {
        run_timed(&*job_clock, reg.label, reg.block);
        if !remaining.is_empty() {
            let chain_clock = job_clock.clone();
            let chain_scheduler = job_scheduler.clone();
            job_scheduler.schedule(
                POLITE_SPACING,
                Box::new(move || run_polite_chain(chain_clock, chain_scheduler, remaining)),
            );
        }
    }));
}
