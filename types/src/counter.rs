//! Counting arithmetic for animated statistics.
//!
//! A counter climbs from zero to its target in at most [`MAX_STEPS`]
//! increments, never faster than one tick per [`MIN_TICK_INTERVAL`], and
//! always lands exactly on the target.

use std::time::Duration;

/// Upper bound on the number of increments a counter is split into.
pub const MAX_STEPS: u32 = 120;

/// Lower bound on the delay between two ticks (one display refresh).
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(16);

/// Nominal duration of a full count.
pub const COUNT_DURATION: Duration = Duration::from_millis(1200);

/// Derived tick schedule for a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterPlan {
    target: u32,
    steps: u32,
    increment: u32,
    interval: Duration,
}

impl CounterPlan {
    /// Build the plan for `target`. A zero target needs no ticking, so there
    /// is no plan for it.
    #[must_use]
    pub fn new(target: u32) -> Option<Self> {
        if target == 0 {
            return None;
        }

        let steps = target.clamp(1, MAX_STEPS);
        let increment = (target / steps).max(1);
        let per_step_ms = COUNT_DURATION.as_millis() as u64 / u64::from(steps);
        let interval = Duration::from_millis(per_step_ms).max(MIN_TICK_INTERVAL);

        Some(Self {
            target,
            steps,
            increment,
            interval,
        })
    }

    #[must_use]
    pub fn target(&self) -> u32 {
        self.target
    }

    #[must_use]
    pub fn steps(&self) -> u32 {
        self.steps
    }

    #[must_use]
    pub fn increment(&self) -> u32 {
        self.increment
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Value after one tick from `current`, capped at the target.
    #[must_use]
    pub fn next_value(&self, current: u32) -> u32 {
        current.saturating_add(self.increment).min(self.target)
    }

    /// Number of ticks needed to go from zero to the target.
    #[must_use]
    pub fn tick_count(&self) -> u32 {
        self.target.div_ceil(self.increment)
    }
}

/// Per-instance counter state.
///
/// `current` only moves forward and never passes `target`; `has_started`
/// flips once and stays set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterState {
    target: u32,
    current: u32,
    has_started: bool,
}

impl CounterState {
    #[must_use]
    pub fn new(target: u32) -> Self {
        Self {
            target,
            current: 0,
            has_started: false,
        }
    }

    #[must_use]
    pub fn target(&self) -> u32 {
        self.target
    }

    #[must_use]
    pub fn current(&self) -> u32 {
        self.current
    }

    #[must_use]
    pub fn has_started(&self) -> bool {
        self.has_started
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.has_started && self.current == self.target
    }

    /// Mark the counter started.
    ///
    /// Returns the tick plan on the first call when there is something to
    /// count; `None` on any later call or for a zero target.
    pub fn start(&mut self) -> Option<CounterPlan> {
        if self.has_started {
            return None;
        }
        self.has_started = true;
        CounterPlan::new(self.target)
    }

    /// Apply one tick. Returns `true` once the target has been reached.
    pub fn step(&mut self, plan: &CounterPlan) -> bool {
        debug_assert_eq!(plan.target(), self.target);
        self.current = plan.next_value(self.current);
        self.current == self.target
    }
}
