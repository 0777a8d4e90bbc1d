//! Rate-limited event delivery and condition-gated refresh.
//!
//! Two components that turn noisy trigger streams into disciplined
//! callback firings:
//!
//! - [`DebouncedEvent`] coalesces rapid `request_notify()` bursts into
//!   fewer callback runs, under a selectable temporal policy
//!   ([`DebouncePolicy`]).
//! - [`RefreshScheduler`] fires a callback periodically, but only while a
//!   predicate over externally-observed [`Condition`]s holds, reacting
//!   immediately when the predicate flips.
//!
//! Both do their interval math on a monotonic [`Clock`](kilit::Clock), so
//! wall-clock adjustments never distort the cadence, and both run their
//! callbacks outside any internal lock.
//!
//! # Example
//!
//! ```rust
//! use kilit::VirtualScheduler;
//! use kilit_debounce::{DebouncedEvent, DebouncePolicy};
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::time::Duration;
//!
//! let timeline = Arc::new(VirtualScheduler::new());
//! let fires = Arc::new(AtomicUsize::new(0));
//!
//! let counter = fires.clone();
//! let event = DebouncedEvent::new(
//!     DebouncePolicy::LastOnly,
//!     Duration::from_secs(5),
//!     timeline.clone(),
//!     timeline.clone(),
//!     move || { counter.fetch_add(1, Ordering::SeqCst); },
//! );
//!
//! // A burst of requests collapses into a single deferred firing.
//! event.request_notify();
//! event.request_notify();
//! event.request_notify();
//! timeline.advance(Duration::from_secs(5));
//! assert_eq!(fires.load(Ordering::SeqCst), 1);
//! ```

#![warn(missing_docs)]

mod condition;
mod debounce;
mod refresh;

pub use condition::{Condition, ManualCondition};
pub use debounce::{DebouncePolicy, DebouncedEvent};
pub use refresh::RefreshScheduler;
