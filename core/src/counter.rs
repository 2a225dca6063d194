//! Animated statistic counter.
//!
//! A counter is mounted with its raw target and an element to watch. The
//! first time the element becomes visible it starts ticking from zero
//! towards the clamped target; later visibility changes do nothing.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, trace};

use ora_types::{CountRange, CounterPlan, CounterState};

use crate::guard::CancelGuard;
use crate::scheduler::SharedScheduler;
use crate::visibility::{ElementId, VisibilityNotifier};

struct CounterInner {
    element: ElementId,
    state: CounterState,
    scheduler: SharedScheduler,
    plan: Option<CounterPlan>,
    ticker: Option<CancelGuard>,
    observation: Option<CancelGuard>,
}

/// Mounted counter. Dropping it unmounts: the observation and the ticker
/// are both released and the displayed value stays where it was.
pub struct CounterAnimator {
    inner: Rc<RefCell<CounterInner>>,
}

impl CounterAnimator {
    /// Clamp `raw` into `range` and start watching `element`.
    ///
    /// The target is fixed here; nothing ticks until the element is seen.
    pub fn mount(
        raw: f64,
        range: CountRange,
        element: ElementId,
        scheduler: SharedScheduler,
        notifier: &dyn VisibilityNotifier,
    ) -> Self {
        let target = range.clamp(raw);
        trace!(element = element.get(), raw, target, "counter mounted");

        let inner = Rc::new(RefCell::new(CounterInner {
            element,
            state: CounterState::new(target),
            scheduler,
            plan: None,
            ticker: None,
            observation: None,
        }));

        let weak = Rc::downgrade(&inner);
        let observation = notifier.observe_once(element, Box::new(move || on_visible(&weak)));
        inner.borrow_mut().observation = Some(observation);

        Self { inner }
    }

    /// Value currently displayed.
    #[must_use]
    pub fn value(&self) -> u32 {
        self.inner.borrow().state.current()
    }

    #[must_use]
    pub fn target(&self) -> u32 {
        self.inner.borrow().state.target()
    }

    #[must_use]
    pub fn element(&self) -> ElementId {
        self.inner.borrow().element
    }

    #[must_use]
    pub fn has_started(&self) -> bool {
        self.inner.borrow().state.has_started()
    }

    /// Started and sitting on the target.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.inner.borrow().state.is_finished()
    }

    /// Tick plan, once counting has begun.
    #[must_use]
    pub fn plan(&self) -> Option<CounterPlan> {
        self.inner.borrow().plan
    }
}

fn on_visible(weak: &Weak<RefCell<CounterInner>>) {
    let Some(inner) = weak.upgrade() else { return };

    let released = {
        let mut counter = inner.borrow_mut();
        let observation = counter.observation.take();
        let Some(plan) = counter.state.start() else {
            // Zero target, or already running.
            return;
        };
        debug!(
            element = counter.element.get(),
            target = plan.target(),
            increment = plan.increment(),
            interval_ms = plan.interval().as_millis() as u64,
            "counter started"
        );
        counter.plan = Some(plan);

        let tick_weak = weak.clone();
        let ticker = counter
            .scheduler
            .schedule_repeating(plan.interval(), Box::new(move || tick(&tick_weak)));
        counter.ticker = Some(ticker);
        observation
    };
    drop(released);
}

fn tick(weak: &Weak<RefCell<CounterInner>>) {
    let Some(inner) = weak.upgrade() else { return };

    let finished = {
        let mut counter = inner.borrow_mut();
        let Some(plan) = counter.plan else { return };
        let reached = counter.state.step(&plan);
        trace!(element = counter.element.get(), value = counter.state.current(), "counter tick");
        if reached {
            debug!(element = counter.element.get(), "counter finished");
            counter.ticker.take()
        } else {
            None
        }
    };
    drop(finished);
}

impl Drop for CounterAnimator {
    fn drop(&mut self) {
        let released = {
            let mut counter = self.inner.borrow_mut();
            if counter.ticker.is_some() {
                debug!(
                    element = counter.element.get(),
                    value = counter.state.current(),
                    "counter unmounted mid-count"
                );
            }
            (counter.ticker.take(), counter.observation.take())
        };
        drop(released);
    }
}

impl fmt::Debug for CounterAnimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counter = self.inner.borrow();
        f.debug_struct("CounterAnimator")
            .field("element", &counter.element)
            .field("state", &counter.state)
            .field("ticking", &counter.ticker.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;
    use std::time::Duration;

    use ora_types::CountRange;

    use super::CounterAnimator;
    use crate::scheduler::TickScheduler;
    use crate::visibility::{ElementId, Span, ViewportObserver};

    const STAT: ElementId = ElementId::new(1);

    fn mount(raw: f64) -> (TickScheduler, ViewportObserver, CounterAnimator) {
        let clock = TickScheduler::new();
        let observer = ViewportObserver::new();
        let counter = CounterAnimator::mount(
            raw,
            CountRange::DEFAULT,
            STAT,
            Rc::new(clock.clone()),
            &observer,
        );
        (clock, observer, counter)
    }

    #[test]
    fn waits_for_visibility() {
        let (clock, _observer, counter) = mount(50.0);
        clock.advance(Duration::from_secs(5));
        assert!(!counter.has_started());
        assert_eq!(counter.value(), 0);
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn counts_up_to_exact_target() {
        let (clock, observer, counter) = mount(1_234.0);
        observer.notify(STAT);
        assert!(counter.has_started());

        let plan = counter.plan().expect("plan after start");
        assert_eq!(plan.increment(), 10);

        let mut last = 0;
        for _ in 0..plan.tick_count() {
            clock.advance(plan.interval());
            assert!(counter.value() >= last);
            last = counter.value();
        }
        assert_eq!(counter.value(), 1_234);
        assert!(counter.is_finished());
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn starts_when_scrolled_into_view() {
        let (clock, observer, counter) = mount(3.0);
        observer.set_layout(STAT, Span::new(50, 1));
        observer.set_viewport(Span::new(0, 40));
        assert!(!counter.has_started());

        observer.set_viewport(Span::new(20, 40));
        assert!(counter.has_started());
        clock.advance(Duration::from_secs(2));
        assert_eq!(counter.value(), 3);
    }

    #[test]
    fn zero_target_never_ticks() {
        let (clock, observer, counter) = mount(-40.0);
        assert_eq!(counter.target(), 0);
        observer.notify(STAT);

        assert!(counter.has_started());
        assert!(counter.is_finished());
        assert_eq!(clock.pending(), 0);
        assert_eq!(counter.value(), 0);
    }

    #[test]
    fn second_visibility_does_not_restart() {
        let (clock, observer, counter) = mount(240.0);
        observer.notify(STAT);
        clock.advance(Duration::from_millis(100));
        let midway = counter.value();
        assert!(midway > 0);

        observer.notify(STAT);
        assert_eq!(counter.value(), midway);
        assert_eq!(clock.pending(), 1);

        clock.advance(Duration::from_secs(10));
        assert_eq!(counter.value(), 240);
    }

    #[test]
    fn clamps_out_of_range_targets() {
        let (_, _, huge) = mount(5e9);
        assert_eq!(huge.target(), 1_000_000);

        let (_, _, nan) = mount(f64::NAN);
        assert_eq!(nan.target(), 0);

        let (_, _, fractional) = mount(99.9);
        assert_eq!(fractional.target(), 99);
    }

    #[test]
    fn unmount_cancels_ticker_and_observation() {
        let (clock, observer, counter) = mount(1_000.0);
        observer.notify(STAT);
        clock.advance(Duration::from_millis(50));
        assert!(counter.value() > 0);

        drop(counter);
        assert_eq!(clock.pending(), 0);
        clock.advance(Duration::from_secs(10));
        assert_eq!(observer.watching(), 0);
    }

    #[test]
    fn unmount_before_visible_releases_observation() {
        let (clock, observer, counter) = mount(10.0);
        assert_eq!(observer.watching(), 1);
        drop(counter);
        assert_eq!(observer.watching(), 0);
        observer.notify(STAT);
        assert_eq!(clock.pending(), 0);
    }
}
