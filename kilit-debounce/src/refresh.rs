//! The condition-gated periodic refresh scheduler.

use crate::condition::Condition;
use kilit::Scheduler;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

struct RefreshState {
    active: bool,
    // Bumped on every start/stop; an outstanding tick whose generation no
    // longer matches is stale and must do nothing.
    generation: u64,
}

struct Inner {
    predicate: Box<dyn Fn() -> bool + Send + Sync>,
    interval: Duration,
    scheduler: Arc<dyn Scheduler>,
    callback: Arc<dyn Fn() + Send + Sync>,
    state: Mutex<RefreshState>,
}

/// Fires a callback periodically while a predicate over external
/// conditions holds.
///
/// On construction and on every condition change the predicate is
/// re-evaluated. A false→true transition fires the callback immediately
/// and starts the periodic cadence; true→false invalidates the cadence.
/// The invariant "timer running ⟺ predicate currently true" holds across
/// concurrent condition signals because evaluation and timer start/stop
/// are serialized under one mutex.
///
/// The predicate runs while that mutex is held: it must not call back
/// into this scheduler (the same documented non-reentrancy contract as
/// [`AtomicCell::map`](kilit::AtomicCell::map)). Reading conditions is
/// fine; conditions carry their own locks.
pub struct RefreshScheduler {
    inner: Arc<Inner>,
}

impl RefreshScheduler {
    /// Creates a scheduler and performs the initial evaluation.
    ///
    /// `conditions` are the sources whose change signals drive
    /// re-evaluation; `predicate` combines whatever it wants to read from
    /// them into the single gating decision.
    pub fn new(
        conditions: &[Arc<dyn Condition>],
        predicate: impl Fn() -> bool + Send + Sync + 'static,
        interval: Duration,
        scheduler: Arc<dyn Scheduler>,
        callback: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        debug_assert!(interval > Duration::ZERO, "refresh interval must be non-zero");
        let inner = Arc::new(Inner {
            predicate: Box::new(predicate),
            interval,
            scheduler,
            callback: Arc::new(callback),
            state: Mutex::new(RefreshState {
                active: false,
                generation: 0,
            }),
        });
        for condition in conditions {
            let me = Arc::clone(&inner);
            condition.subscribe(Arc::new(move || Inner::reevaluate(&me)));
        }
        Inner::reevaluate(&inner);
        Self { inner }
    }

    /// Re-evaluates the predicate outside of a condition signal.
    ///
    /// Composition roots bridging change sources that cannot implement
    /// [`Condition`] call this instead.
    pub fn reevaluate(&self) {
        Inner::reevaluate(&self.inner);
    }

    /// Returns `true` while the periodic cadence is running.
    pub fn is_active(&self) -> bool {
        self.inner.state.lock().active
    }
}

impl fmt::Debug for RefreshScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshScheduler")
            .field("interval", &self.inner.interval)
            .field("active", &self.is_active())
            .finish()
    }
}

impl Inner {
    fn reevaluate(this: &Arc<Self>) {
        let fire_now = {
            let mut state = this.state.lock();
            let should_run = (this.predicate)();
            if should_run && !state.active {
                state.active = true;
                state.generation += 1;
                debug!(interval = ?this.interval, "refresh cadence starting");
                let me = Arc::clone(this);
                let generation = state.generation;
                this.scheduler
                    .schedule(this.interval, Box::new(move || Self::tick(&me, generation)));
                true
            } else if !should_run && state.active {
                state.active = false;
                state.generation += 1;
                debug!("refresh cadence stopped");
                false
            } else {
                false
            }
        };
        if fire_now {
            // The leading fire, dispatched outside the lock.
            let callback = this.callback.clone();
            this.scheduler.schedule_now(Box::new(move || callback()));
        }
    }

    fn tick(this: &Arc<Self>, generation: u64) {
        {
            let mut state = this.state.lock();
            if !state.active || state.generation != generation {
                // Invalidated while this tick was in flight.
                return;
            }
            // The predicate may have gone false without a change signal;
            // re-check before firing, serialized with reevaluate().
            if !(this.predicate)() {
                state.active = false;
                state.generation += 1;
                debug!("refresh cadence stopped at tick");
                return;
            }
            let me = Arc::clone(this);
            this.scheduler
                .schedule(this.interval, Box::new(move || Self::tick(&me, generation)));
        }
        (this.callback)();
    }
}
