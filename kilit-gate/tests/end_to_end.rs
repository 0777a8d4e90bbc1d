//! End-to-end: a readiness gate draining a pending-task barrier.

use kilit::VirtualScheduler;
use kilit_drain::PendingTasks;
use kilit_gate::ReadinessGate;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[test]
fn ready_callback_observes_a_drained_barrier() {
    let timeline = Arc::new(VirtualScheduler::new());
    let gate = ReadinessGate::new(timeline.clone(), timeline.clone());
    let tracker = PendingTasks::new("startup");

    // Three units of work go in flight before the gate opens.
    let t1 = tracker.build("migrate");
    let t2 = tracker.build("warm-cache");
    let t3 = tracker.build("subscribe");

    // The callback snapshots the barrier at registration time and checks
    // it once the gate opens.
    let barrier = tracker.pending_tasks_barrier();
    let observed_drained = Arc::new(AtomicBool::new(false));
    let observed = observed_drained.clone();
    gate.run_now_or_when_ready_sync("await-startup-work", 0, move || {
        barrier.wait();
        observed.store(true, Ordering::SeqCst);
    });

    // All in-flight work finishes, then the milestone fires.
    t1.complete();
    t2.complete();
    t3.complete();
    gate.set_ready();

    // set_ready ran the callback synchronously, and the callback saw the
    // fully-drained barrier before returning.
    assert!(observed_drained.load(Ordering::SeqCst));
    assert_eq!(tracker.pending_count(), 0);
}

#[test]
fn late_tasks_do_not_delay_the_ready_callback() {
    let timeline = Arc::new(VirtualScheduler::new());
    let gate = ReadinessGate::new(timeline.clone(), timeline.clone());
    let tracker = PendingTasks::new("startup");

    let t1 = tracker.build("early");
    let barrier = tracker.pending_tasks_barrier();

    let observed_drained = Arc::new(AtomicBool::new(false));
    let observed = observed_drained.clone();
    gate.run_now_or_when_ready_sync("await-early-work", 0, move || {
        barrier.wait();
        observed.store(true, Ordering::SeqCst);
    });

    t1.complete();

    // Work registered after the snapshot stays in flight across the
    // transition without blocking it.
    let _late = tracker.build("late");

    gate.set_ready();
    assert!(observed_drained.load(Ordering::SeqCst));
    assert_eq!(tracker.pending_count(), 1);
}
