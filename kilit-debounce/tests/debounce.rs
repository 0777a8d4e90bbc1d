//! Integration tests for `DebouncedEvent` under its three policies.
//!
//! All timelines run on the virtual scheduler, so the intervals below are
//! exact virtual seconds, not wall time.

use kilit::VirtualScheduler;
use kilit_debounce::{DebouncePolicy, DebouncedEvent};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const INTERVAL: Duration = Duration::from_secs(5);

fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

fn counting_event(
    timeline: &Arc<VirtualScheduler>,
    policy: DebouncePolicy,
) -> (DebouncedEvent, Arc<AtomicUsize>) {
    let fires = Arc::new(AtomicUsize::new(0));
    let counter = fires.clone();
    let event = DebouncedEvent::new(policy, INTERVAL, timeline.clone(), timeline.clone(), move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    (event, fires)
}

// ============================================================================
// Immediate
// ============================================================================

#[test]
fn immediate_fires_every_request() {
    let timeline = Arc::new(VirtualScheduler::new());
    let (event, fires) = counting_event(&timeline, DebouncePolicy::Immediate);

    event.request_notify();
    event.request_notify();
    event.request_notify();
    // Dispatched, never inline.
    assert_eq!(fires.load(Ordering::SeqCst), 0);

    timeline.run_now_jobs();
    assert_eq!(fires.load(Ordering::SeqCst), 3);
}

// ============================================================================
// LastOnly
// ============================================================================

#[test]
fn last_only_coalesces_a_burst_into_one_fire() {
    let timeline = Arc::new(VirtualScheduler::new());
    let (event, fires) = counting_event(&timeline, DebouncePolicy::LastOnly);

    // Requests at t=1, t=2, t=4; the t=1 request schedules the fire for
    // t=6 and the rest are absorbed.
    timeline.advance(secs(1));
    event.request_notify();
    timeline.advance(secs(1));
    event.request_notify();
    timeline.advance(secs(2));
    event.request_notify();

    timeline.advance(Duration::from_millis(1_500));
    assert_eq!(fires.load(Ordering::SeqCst), 0); // t=5.5: not yet

    timeline.advance(Duration::from_millis(500));
    assert_eq!(fires.load(Ordering::SeqCst), 1); // t=6: exactly one
}

#[test]
fn last_only_never_fires_without_a_request() {
    let timeline = Arc::new(VirtualScheduler::new());
    let (_event, fires) = counting_event(&timeline, DebouncePolicy::LastOnly);

    timeline.advance(secs(60));
    assert_eq!(fires.load(Ordering::SeqCst), 0);
}

#[test]
fn last_only_restarts_after_the_fire() {
    let timeline = Arc::new(VirtualScheduler::new());
    let (event, fires) = counting_event(&timeline, DebouncePolicy::LastOnly);

    event.request_notify();
    timeline.advance(INTERVAL);
    assert_eq!(fires.load(Ordering::SeqCst), 1);

    // A fresh quiescent period: the next request starts a new cycle.
    event.request_notify();
    timeline.advance(INTERVAL);
    assert_eq!(fires.load(Ordering::SeqCst), 2);
}

// ============================================================================
// FirstLast
// ============================================================================

#[test]
fn first_last_leading_and_trailing_edges() {
    let timeline = Arc::new(VirtualScheduler::new());
    let (event, fires) = counting_event(&timeline, DebouncePolicy::FirstLast);

    // t=1: leading edge fires right away.
    timeline.advance(secs(1));
    event.request_notify();
    timeline.run_now_jobs();
    assert_eq!(fires.load(Ordering::SeqCst), 1);

    // t=2 and t=4: inside the window — one trailing fire at t=6.
    timeline.advance(secs(1));
    event.request_notify();
    timeline.advance(secs(2));
    event.request_notify();

    timeline.advance(Duration::from_millis(1_999));
    assert_eq!(fires.load(Ordering::SeqCst), 1); // t<6

    timeline.advance(Duration::from_millis(1));
    assert_eq!(fires.load(Ordering::SeqCst), 2); // t=6: trailing edge

    // t=20: a full interval has passed since the trailing fire — leading
    // edge again.
    timeline.advance(secs(14));
    event.request_notify();
    timeline.run_now_jobs();
    assert_eq!(fires.load(Ordering::SeqCst), 3);
}

#[test]
fn first_last_single_request_fires_once() {
    let timeline = Arc::new(VirtualScheduler::new());
    let (event, fires) = counting_event(&timeline, DebouncePolicy::FirstLast);

    event.request_notify();
    timeline.advance(secs(60));
    assert_eq!(fires.load(Ordering::SeqCst), 1);
}

#[test]
fn first_last_requests_while_scheduled_are_absorbed() {
    let timeline = Arc::new(VirtualScheduler::new());
    let (event, fires) = counting_event(&timeline, DebouncePolicy::FirstLast);

    event.request_notify(); // leading
    timeline.run_now_jobs();

    // Many requests inside the window still produce one trailing fire.
    for _ in 0..10 {
        timeline.advance(Duration::from_millis(100));
        event.request_notify();
    }
    timeline.advance(secs(10));
    assert_eq!(fires.load(Ordering::SeqCst), 2);
}

// ============================================================================
// Cross-policy invariants
// ============================================================================

#[test]
fn at_most_one_scheduled_fire_exists() {
    let timeline = Arc::new(VirtualScheduler::new());
    let (event, _fires) = counting_event(&timeline, DebouncePolicy::LastOnly);

    for _ in 0..100 {
        event.request_notify();
    }
    // One scheduled fire, no matter how many requests.
    assert_eq!(timeline.pending_jobs(), 1);
}

#[test]
#[cfg_attr(miri, ignore)]
fn concurrent_requests_yield_one_scheduled_fire() {
    use std::thread;

    const THREADS: usize = 8;

    let timeline = Arc::new(VirtualScheduler::new());
    let (event, fires) = counting_event(&timeline, DebouncePolicy::LastOnly);
    let event = Arc::new(event);

    let mut handles = Vec::new();
    for _ in 0..THREADS {
        let event = event.clone();
        handles.push(thread::spawn(move || event.request_notify()));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(timeline.pending_jobs(), 1);
    timeline.advance(INTERVAL);
    assert_eq!(fires.load(Ordering::SeqCst), 1);
}
