//! The rate-limiting event coalescer.

use kilit::{Clock, Scheduler};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::trace;

/// Temporal policy for a [`DebouncedEvent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DebouncePolicy {
    /// No coalescing: every request dispatches the callback right away
    /// (asynchronously, never inline on the caller).
    Immediate,
    /// Pure de-bounce: the first request in a quiescent period schedules
    /// a fire one interval later; requests arriving while that fire is
    /// scheduled are dropped.
    LastOnly,
    /// Leading and trailing edge: the first request after a quiescent
    /// period fires right away; requests inside the interval after that
    /// fire coalesce into exactly one trailing fire at `last_fire +
    /// interval`; a request past the deadline fires right away again.
    FirstLast,
}

struct FireState {
    scheduled: bool,
    last_fire: Option<Instant>,
}

struct Inner {
    policy: DebouncePolicy,
    interval: Duration,
    clock: Arc<dyn Clock>,
    scheduler: Arc<dyn Scheduler>,
    callback: Arc<dyn Fn() + Send + Sync>,
    state: Mutex<FireState>,
}

/// Coalesces rapid notify requests into fewer callback firings.
///
/// All state lives under one mutex; at most one scheduled-but-unfired
/// callback exists per instance at any time; the callback itself always
/// runs outside the lock, on the configured scheduler.
pub struct DebouncedEvent {
    inner: Arc<Inner>,
}

impl DebouncedEvent {
    /// Creates a coalescer.
    ///
    /// `interval` is the quiescence window for the two coalescing
    /// policies (it is unused by [`DebouncePolicy::Immediate`]).
    pub fn new(
        policy: DebouncePolicy,
        interval: Duration,
        clock: Arc<dyn Clock>,
        scheduler: Arc<dyn Scheduler>,
        callback: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        debug_assert!(
            policy == DebouncePolicy::Immediate || interval > Duration::ZERO,
            "a coalescing policy needs a non-zero interval"
        );
        Self {
            inner: Arc::new(Inner {
                policy,
                interval,
                clock,
                scheduler,
                callback: Arc::new(callback),
                state: Mutex::new(FireState {
                    scheduled: false,
                    last_fire: None,
                }),
            }),
        }
    }

    /// Requests that the callback be notified.
    ///
    /// Depending on the policy this dispatches now, schedules a deferred
    /// fire, or is absorbed by an already-scheduled one.
    pub fn request_notify(&self) {
        Inner::request_notify(&self.inner);
    }
}

impl fmt::Debug for DebouncedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebouncedEvent")
            .field("policy", &self.inner.policy)
            .field("interval", &self.inner.interval)
            .finish()
    }
}

impl Inner {
    fn request_notify(this: &Arc<Self>) {
        match this.policy {
            DebouncePolicy::Immediate => {
                let callback = this.callback.clone();
                this.scheduler.schedule_now(Box::new(move || callback()));
            }
            DebouncePolicy::LastOnly => {
                {
                    let mut state = this.state.lock();
                    if state.scheduled {
                        trace!("request absorbed by scheduled fire");
                        return;
                    }
                    state.scheduled = true;
                }
                let me = Arc::clone(this);
                this.scheduler
                    .schedule(this.interval, Box::new(move || Self::fire(&me)));
            }
            DebouncePolicy::FirstLast => {
                enum Action {
                    FireNow,
                    ScheduleIn(Duration),
                    Absorbed,
                }
                let action = {
                    let mut state = this.state.lock();
                    if state.scheduled {
                        Action::Absorbed
                    } else {
                        let now = this.clock.now();
                        match state.last_fire {
                            // Still inside the window after the last
                            // fire: one trailing fire at its deadline.
                            Some(last) if now < last + this.interval => {
                                state.scheduled = true;
                                Action::ScheduleIn((last + this.interval) - now)
                            }
                            // Quiescent (or never fired): leading edge.
                            _ => {
                                state.last_fire = Some(now);
                                Action::FireNow
                            }
                        }
                    }
                };
                match action {
                    Action::Absorbed => trace!("request absorbed by scheduled fire"),
                    Action::FireNow => {
                        let callback = this.callback.clone();
                        this.scheduler.schedule_now(Box::new(move || callback()));
                    }
                    Action::ScheduleIn(delay) => {
                        let me = Arc::clone(this);
                        this.scheduler
                            .schedule(delay, Box::new(move || Self::fire(&me)));
                    }
                }
            }
        }
    }

    /// Runs a deferred fire: return to idle, stamp the fire time, then
    /// invoke the callback outside the lock.
    fn fire(this: &Arc<Self>) {
        {
            let mut state = this.state.lock();
            state.scheduled = false;
            state.last_fire = Some(this.clock.now());
        }
        (this.callback)();
    }
}
