//! Integration tests for `RefreshScheduler` and `ManualCondition`.

use kilit::VirtualScheduler;
use kilit_debounce::{Condition, ManualCondition, RefreshScheduler};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const INTERVAL: Duration = Duration::from_secs(10);

struct Fixture {
    timeline: Arc<VirtualScheduler>,
    condition: Arc<ManualCondition>,
    scheduler: RefreshScheduler,
    fires: Arc<AtomicUsize>,
}

fn fixture(initially: bool) -> Fixture {
    let timeline = Arc::new(VirtualScheduler::new());
    let condition = Arc::new(ManualCondition::new(initially));
    let fires = Arc::new(AtomicUsize::new(0));

    let counter = fires.clone();
    let gate: Arc<dyn Condition> = condition.clone();
    let predicate_source = condition.clone();
    let scheduler = RefreshScheduler::new(
        &[gate],
        move || predicate_source.current(),
        INTERVAL,
        timeline.clone(),
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
        },
    );

    Fixture {
        timeline,
        condition,
        scheduler,
        fires,
    }
}

// ============================================================================
// ManualCondition
// ============================================================================

#[test]
fn manual_condition_notifies_only_on_change() {
    let condition = ManualCondition::new(false);
    let notified = Arc::new(AtomicUsize::new(0));

    let counter = notified.clone();
    condition.subscribe(Arc::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    }));

    condition.set(false); // no change
    assert_eq!(notified.load(Ordering::SeqCst), 0);
    condition.set(true);
    assert_eq!(notified.load(Ordering::SeqCst), 1);
    condition.set(true); // no change
    assert_eq!(notified.load(Ordering::SeqCst), 1);
    condition.set(false);
    assert_eq!(notified.load(Ordering::SeqCst), 2);
}

// ============================================================================
// RefreshScheduler — gating
// ============================================================================

#[test]
fn never_fires_while_predicate_is_false() {
    let f = fixture(false);
    assert!(!f.scheduler.is_active());

    f.timeline.advance(Duration::from_secs(600));
    assert_eq!(f.fires.load(Ordering::SeqCst), 0);
}

#[test]
fn true_at_construction_starts_the_cadence() {
    let f = fixture(true);
    assert!(f.scheduler.is_active());

    // Leading fire, then one per interval.
    f.timeline.run_now_jobs();
    assert_eq!(f.fires.load(Ordering::SeqCst), 1);
    f.timeline.advance(INTERVAL);
    assert_eq!(f.fires.load(Ordering::SeqCst), 2);
    f.timeline.advance(INTERVAL);
    assert_eq!(f.fires.load(Ordering::SeqCst), 3);
}

#[test]
fn false_to_true_fires_immediately_then_periodically() {
    let f = fixture(false);

    f.timeline.advance(Duration::from_secs(100));
    assert_eq!(f.fires.load(Ordering::SeqCst), 0);

    f.condition.set(true);
    assert!(f.scheduler.is_active());
    f.timeline.run_now_jobs();
    assert_eq!(f.fires.load(Ordering::SeqCst), 1);

    f.timeline.advance(INTERVAL);
    assert_eq!(f.fires.load(Ordering::SeqCst), 2);
}

#[test]
fn true_to_false_stops_firing() {
    let f = fixture(true);
    f.timeline.run_now_jobs();
    f.timeline.advance(INTERVAL);
    assert_eq!(f.fires.load(Ordering::SeqCst), 2);

    f.condition.set(false);
    assert!(!f.scheduler.is_active());

    f.timeline.advance(Duration::from_secs(600));
    assert_eq!(f.fires.load(Ordering::SeqCst), 2);
}

#[test]
fn reactivation_restarts_with_a_leading_fire() {
    let f = fixture(true);
    f.timeline.run_now_jobs();
    assert_eq!(f.fires.load(Ordering::SeqCst), 1);

    f.condition.set(false);
    f.timeline.advance(Duration::from_secs(100));
    assert_eq!(f.fires.load(Ordering::SeqCst), 1);

    f.condition.set(true);
    f.timeline.run_now_jobs();
    assert_eq!(f.fires.load(Ordering::SeqCst), 2);
    f.timeline.advance(INTERVAL);
    assert_eq!(f.fires.load(Ordering::SeqCst), 3);
}

#[test]
fn stale_ticks_from_a_cancelled_cadence_never_fire() {
    let f = fixture(true);
    f.timeline.run_now_jobs(); // leading fire at t=0
    assert_eq!(f.fires.load(Ordering::SeqCst), 1);

    // Stop and restart mid-interval: the original tick (due t=10) is now
    // stale; the new cadence ticks from t=2.5.
    f.timeline.advance(Duration::from_millis(2_500));
    f.condition.set(false);
    f.condition.set(true);
    f.timeline.run_now_jobs(); // new leading fire
    assert_eq!(f.fires.load(Ordering::SeqCst), 2);

    // t=10: only the stale tick is due — it must do nothing.
    f.timeline.advance(Duration::from_millis(7_500));
    assert_eq!(f.fires.load(Ordering::SeqCst), 2);

    // t=12.5: the live cadence's first tick.
    f.timeline.advance(Duration::from_millis(2_500));
    assert_eq!(f.fires.load(Ordering::SeqCst), 3);
}

#[test]
fn tick_recheck_catches_a_silent_predicate_flip() {
    // The predicate can go false without any condition signal (e.g. a
    // compound predicate over state the conditions do not cover). The
    // tick re-checks before firing and shuts the cadence down.
    let timeline = Arc::new(VirtualScheduler::new());
    let signal_condition = Arc::new(ManualCondition::new(true));
    let silent_veto = Arc::new(ManualCondition::new(false));
    let fires = Arc::new(AtomicUsize::new(0));

    let counter = fires.clone();
    let gate: Arc<dyn Condition> = signal_condition.clone();
    let signal = signal_condition.clone();
    let veto = silent_veto.clone();
    let scheduler = RefreshScheduler::new(
        &[gate],
        move || signal.current() && !veto.current(),
        INTERVAL,
        timeline.clone(),
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
        },
    );

    timeline.run_now_jobs();
    assert_eq!(fires.load(Ordering::SeqCst), 1);
    assert!(scheduler.is_active());

    // Flip the veto without a change signal. The next tick notices.
    // (ManualCondition only notifies subscribers, and nobody subscribed
    // to the veto.)
    silent_veto.set(true);
    timeline.advance(INTERVAL);
    assert_eq!(fires.load(Ordering::SeqCst), 1);
    assert!(!scheduler.is_active());
}

// ============================================================================
// RefreshScheduler — predicate over several conditions
// ============================================================================

#[test]
fn compound_predicate_requires_all_conditions() {
    let timeline = Arc::new(VirtualScheduler::new());
    let ready = Arc::new(ManualCondition::new(false));
    let online = Arc::new(ManualCondition::new(false));
    let fires = Arc::new(AtomicUsize::new(0));

    let counter = fires.clone();
    let conditions: Vec<Arc<dyn Condition>> = vec![ready.clone(), online.clone()];
    let p_ready = ready.clone();
    let p_online = online.clone();
    let scheduler = RefreshScheduler::new(
        &conditions,
        move || p_ready.current() && p_online.current(),
        INTERVAL,
        timeline.clone(),
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
        },
    );

    ready.set(true);
    assert!(!scheduler.is_active()); // still offline
    timeline.advance(Duration::from_secs(60));
    assert_eq!(fires.load(Ordering::SeqCst), 0);

    online.set(true);
    assert!(scheduler.is_active());
    timeline.run_now_jobs();
    assert_eq!(fires.load(Ordering::SeqCst), 1);

    // Either condition dropping stops the cadence.
    ready.set(false);
    assert!(!scheduler.is_active());
    timeline.advance(Duration::from_secs(60));
    assert_eq!(fires.load(Ordering::SeqCst), 1);
}
