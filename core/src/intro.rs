//! Intro overlay sequencer.
//!
//! Plays `Hold -> Spin -> Fade` once per mount. The phase timers drive the
//! handoff; the done signal comes from the animation driver reporting that
//! the visual fade finished, never from a timer.
//!
//! ```text
//! Hold --hold--> Spin --spin+fast--> Fade --fade reported--> removed
//!                                     |
//!                                 on_handoff           on_done
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use tracing::{debug, warn};

use ora_types::{IntroPhase, IntroTimingPlan};

use crate::guard::CancelGuard;
use crate::scheduler::SharedScheduler;

/// Zero-argument, fire-and-forget host callback.
pub type Callback = Box<dyn FnOnce()>;

/// One timer-driven edge of the phase graph.
struct Transition {
    from: IntroPhase,
    to: IntroPhase,
    /// Offset from activation at which the edge is taken.
    at: fn(&IntroTimingPlan) -> Duration,
    fires_handoff: bool,
}

fn spin_starts(plan: &IntroTimingPlan) -> Duration {
    plan.phase_start(IntroPhase::Spin)
}

const TRANSITIONS: [Transition; 2] = [
    Transition {
        from: IntroPhase::Hold,
        to: IntroPhase::Spin,
        at: spin_starts,
        fires_handoff: false,
    },
    Transition {
        from: IntroPhase::Spin,
        to: IntroPhase::Fade,
        at: IntroTimingPlan::handoff_at,
        fires_handoff: true,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Idle,
    Running {
        phase: IntroPhase,
        started_at: Duration,
    },
    Finished,
}

struct SequencerState {
    plan: IntroTimingPlan,
    scheduler: SharedScheduler,
    stage: Stage,
    on_handoff: Option<Callback>,
    on_done: Option<Callback>,
    timers: Vec<CancelGuard>,
}

/// Single-shot intro controller. Dropping it is unmounting it: pending
/// phase timers are cancelled and no callback fires afterwards.
pub struct IntroSequencer {
    state: Rc<RefCell<SequencerState>>,
}

impl IntroSequencer {
    pub fn new(
        plan: IntroTimingPlan,
        scheduler: SharedScheduler,
        on_handoff: Callback,
        on_done: Callback,
    ) -> Self {
        Self {
            state: Rc::new(RefCell::new(SequencerState {
                plan,
                scheduler,
                stage: Stage::Idle,
                on_handoff: Some(on_handoff),
                on_done: Some(on_done),
                timers: Vec::new(),
            })),
        }
    }

    /// Enter `Hold` and arm the phase timers. Only the first call counts.
    pub fn activate(&self) {
        let weak = Rc::downgrade(&self.state);
        let mut state = self.state.borrow_mut();
        if state.stage != Stage::Idle {
            warn!("intro sequencer activated twice; ignoring");
            return;
        }

        let started_at = state.scheduler.now();
        state.stage = Stage::Running {
            phase: IntroPhase::INITIAL,
            started_at,
        };
        debug!(
            total_ms = state.plan.total().as_millis() as u64,
            handoff_ms = state.plan.handoff_at().as_millis() as u64,
            "intro started"
        );

        for (index, transition) in TRANSITIONS.iter().enumerate() {
            let delay = (transition.at)(&state.plan);
            let weak = weak.clone();
            let guard = state
                .scheduler
                .schedule_once(delay, Box::new(move || take_transition(&weak, index)));
            state.timers.push(guard);
        }
    }

    /// The fade-out animation finished playing.
    ///
    /// Honoured only in `Fade`: fires `on_done` and marks the sequencer
    /// removable. Reports in any other phase are ignored.
    pub fn report_fade_finished(&self) {
        let (done, timers) = {
            let mut state = self.state.borrow_mut();
            match state.stage {
                Stage::Running {
                    phase: IntroPhase::Fade,
                    ..
                } => {
                    state.stage = Stage::Finished;
                    (state.on_done.take(), std::mem::take(&mut state.timers))
                }
                stage => {
                    debug!(?stage, "fade completion reported outside fade phase; ignoring");
                    return;
                }
            }
        };
        drop(timers);

        debug!("intro done");
        if let Some(done) = done {
            done();
        }
    }

    /// Active phase, or `None` before activation and after completion.
    #[must_use]
    pub fn phase(&self) -> Option<IntroPhase> {
        match self.state.borrow().stage {
            Stage::Running { phase, .. } => Some(phase),
            Stage::Idle | Stage::Finished => None,
        }
    }

    /// Done has fired; the host may remove the overlay.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state.borrow().stage == Stage::Finished
    }

    /// Time since activation on the scheduler clock.
    #[must_use]
    pub fn elapsed(&self) -> Option<Duration> {
        let state = self.state.borrow();
        match state.stage {
            Stage::Running { started_at, .. } => {
                Some(state.scheduler.now().saturating_sub(started_at))
            }
            Stage::Idle | Stage::Finished => None,
        }
    }

    #[must_use]
    pub fn plan(&self) -> IntroTimingPlan {
        self.state.borrow().plan.clone()
    }
}

fn take_transition(state: &Weak<RefCell<SequencerState>>, index: usize) {
    let Some(state) = state.upgrade() else { return };
    let transition = &TRANSITIONS[index];

    let handoff = {
        let mut state = state.borrow_mut();
        let Stage::Running { phase, started_at } = state.stage else {
            return;
        };
        if phase != transition.from {
            debug!(
                expected = transition.from.as_str(),
                actual = phase.as_str(),
                "stale intro transition; ignoring"
            );
            return;
        }
        state.stage = Stage::Running {
            phase: transition.to,
            started_at,
        };
        debug!(phase = transition.to.as_str(), "intro phase entered");
        if transition.fires_handoff {
            state.on_handoff.take()
        } else {
            None
        }
    };

    if let Some(handoff) = handoff {
        debug!("intro handoff");
        handoff();
    }
}

impl Drop for IntroSequencer {
    fn drop(&mut self) {
        let released = {
            let mut state = self.state.borrow_mut();
            if matches!(state.stage, Stage::Running { .. }) {
                debug!("intro unmounted before completion; cancelling timers");
            }
            (
                std::mem::take(&mut state.timers),
                state.on_handoff.take(),
                state.on_done.take(),
            )
        };
        drop(released);
    }
}

impl fmt::Debug for IntroSequencer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("IntroSequencer")
            .field("stage", &state.stage)
            .field("pending_timers", &state.timers.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use ora_types::{IntroPhase, IntroTimingPlan};

    use super::IntroSequencer;
    use crate::scheduler::{Scheduler, SharedScheduler, TickScheduler};

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    type Events = Rc<RefCell<Vec<(&'static str, Duration)>>>;

    fn plan(hold: u64, spin: u64, fast: u64, fade: u64) -> IntroTimingPlan {
        IntroTimingPlan::new(
            ms(hold),
            ms(spin),
            ms(fast),
            ms(fade),
            IntroTimingPlan::default_elements(),
        )
        .expect("valid plan")
    }

    fn setup(plan: IntroTimingPlan) -> (TickScheduler, IntroSequencer, Events) {
        let clock = TickScheduler::new();
        let shared: SharedScheduler = Rc::new(clock.clone());
        let events: Events = Rc::new(RefCell::new(Vec::new()));

        let (e, c) = (Rc::clone(&events), clock.clone());
        let on_handoff = Box::new(move || e.borrow_mut().push(("handoff", c.now())));
        let (e, c) = (Rc::clone(&events), clock.clone());
        let on_done = Box::new(move || e.borrow_mut().push(("done", c.now())));

        let sequencer = IntroSequencer::new(plan, shared, on_handoff, on_done);
        (clock, sequencer, events)
    }

    fn names(events: &Events) -> Vec<&'static str> {
        events.borrow().iter().map(|(name, _)| *name).collect()
    }

    #[test]
    fn walks_phases_in_order() {
        let (clock, seq, events) = setup(plan(100, 200, 50, 300));
        assert_eq!(seq.phase(), None);

        seq.activate();
        assert_eq!(seq.phase(), Some(IntroPhase::Hold));

        clock.advance(ms(99));
        assert_eq!(seq.phase(), Some(IntroPhase::Hold));
        clock.advance(ms(1));
        assert_eq!(seq.phase(), Some(IntroPhase::Spin));

        clock.advance(ms(249));
        assert_eq!(seq.phase(), Some(IntroPhase::Spin));
        assert!(events.borrow().is_empty());
        clock.advance(ms(1));
        assert_eq!(seq.phase(), Some(IntroPhase::Fade));
        assert_eq!(names(&events), vec!["handoff"]);
    }

    #[test]
    fn handoff_at_hold_spin_fast() {
        let (clock, seq, events) = setup(plan(700, 900, 400, 600));
        clock.advance(ms(123));
        seq.activate();
        clock.advance(ms(5_000));
        let recorded = events.borrow();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0], ("handoff", ms(123 + 700 + 900 + 400)));
    }

    #[test]
    fn done_waits_for_fade_report() {
        let (clock, seq, events) = setup(plan(10, 10, 10, 100));
        seq.activate();
        clock.advance(ms(10_000));
        assert_eq!(names(&events), vec!["handoff"]);
        assert!(!seq.is_finished());

        seq.report_fade_finished();
        assert_eq!(names(&events), vec!["handoff", "done"]);
        assert!(seq.is_finished());
        assert_eq!(seq.phase(), None);
    }

    #[test]
    fn early_fade_report_is_ignored() {
        let (clock, seq, events) = setup(plan(100, 100, 100, 100));
        seq.activate();
        seq.report_fade_finished();
        clock.advance(ms(150));
        seq.report_fade_finished();
        assert!(events.borrow().is_empty());

        clock.advance(ms(150));
        seq.report_fade_finished();
        assert_eq!(names(&events), vec!["handoff", "done"]);
    }

    #[test]
    fn callbacks_fire_exactly_once() {
        let (clock, seq, events) = setup(plan(5, 5, 5, 5));
        seq.activate();
        clock.advance(ms(100));
        seq.report_fade_finished();
        seq.report_fade_finished();
        clock.advance(ms(100));
        assert_eq!(names(&events), vec!["handoff", "done"]);
    }

    #[test]
    fn second_activation_is_ignored() {
        let (clock, seq, events) = setup(plan(100, 100, 100, 100));
        seq.activate();
        clock.advance(ms(50));
        seq.activate();
        clock.advance(ms(250));
        let recorded = events.borrow();
        assert_eq!(recorded.as_slice(), &[("handoff", ms(300))]);
    }

    #[test]
    fn unmount_cancels_pending_timers() {
        let (clock, seq, events) = setup(plan(100, 100, 100, 100));
        seq.activate();
        clock.advance(ms(150));
        assert_eq!(clock.pending(), 1);

        drop(seq);
        assert_eq!(clock.pending(), 0);
        clock.advance(ms(10_000));
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn zero_length_phases_still_pass_in_order() {
        let (clock, seq, events) = setup(plan(0, 0, 0, 0));
        seq.activate();
        assert_eq!(seq.phase(), Some(IntroPhase::Hold));
        clock.advance(Duration::ZERO);
        assert_eq!(seq.phase(), Some(IntroPhase::Fade));
        assert_eq!(names(&events), vec!["handoff"]);
    }

    #[test]
    fn elapsed_tracks_scheduler_clock() {
        let (clock, seq, _events) = setup(plan(100, 100, 100, 100));
        assert_eq!(seq.elapsed(), None);
        clock.advance(ms(40));
        seq.activate();
        clock.advance(ms(60));
        assert_eq!(seq.elapsed(), Some(ms(60)));
        assert_eq!(seq.plan().handoff_at(), ms(300));
    }
}
