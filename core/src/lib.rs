//! Controllers for the Ora landing page.
//!
//! Everything here is single-threaded and clock-agnostic: controllers talk
//! to a [`Scheduler`] for time and a [`VisibilityNotifier`] for viewport
//! events, and release both through [`CancelGuard`]s when dropped.

mod counter;
mod guard;
mod intro;
mod scheduler;
mod visibility;

pub use counter::CounterAnimator;
pub use guard::CancelGuard;
pub use intro::{Callback, IntroSequencer};
pub use scheduler::{Scheduler, SharedScheduler, TickScheduler};
pub use visibility::{ElementId, Span, ViewportObserver, VisibilityNotifier};
