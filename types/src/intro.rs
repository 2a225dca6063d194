//! Intro overlay timing: phases, timing plan and per-element keyframes.
//!
//! The intro plays `Hold -> Spin -> Fade`. The plan fixes how long each
//! stretch lasts and where every logo element starts; keyframe fractions
//! are normalized against the total so that all elements settle on the same
//! instant no matter how far they travel.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::ui::normalized_progress;

/// Named period of the intro animation. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IntroPhase {
    Hold,
    Spin,
    Fade,
}

impl IntroPhase {
    pub const INITIAL: Self = Self::Hold;

    /// The phase that follows this one, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Hold => Some(Self::Spin),
            Self::Spin => Some(Self::Fade),
            Self::Fade => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hold => "hold",
            Self::Spin => "spin",
            Self::Fade => "fade",
        }
    }
}

/// 2D displacement in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Offset {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
}

impl Offset {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    fn lerp(self, to: Self, t: f32) -> Self {
        Self {
            x: lerp(self.x, to.x, t),
            y: lerp(self.y, to.y, t),
        }
    }
}

/// A labeled visual element of the intro overlay.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IntroElement {
    pub label: String,
    #[serde(default)]
    pub offset: Offset,
}

impl IntroElement {
    pub fn new(label: impl Into<String>, offset: Offset) -> Self {
        Self {
            label: label.into(),
            offset,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimingPlanError {
    #[error("total intro duration overflows")]
    DurationOverflow,
    #[error("keyframe time {value} at index {index} is outside [0, 1]")]
    OutOfRange { index: usize, value: f32 },
    #[error("keyframe time at index {index} is smaller than the one before it")]
    Decreasing { index: usize },
}

/// Normalized keyframe times: start, end of hold, end of spin, end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframes([f32; 4]);

impl Keyframes {
    /// Validate explicit keyframe times.
    pub fn new(times: [f32; 4]) -> Result<Self, TimingPlanError> {
        for (index, &value) in times.iter().enumerate() {
            if !(0.0..=1.0).contains(&value) {
                return Err(TimingPlanError::OutOfRange { index, value });
            }
            if index > 0 && value < times[index - 1] {
                return Err(TimingPlanError::Decreasing { index });
            }
        }
        Ok(Self(times))
    }

    /// Derive times from phase boundaries. A zero total collapses every
    /// boundary onto the start.
    fn from_boundaries(hold_end: Duration, spin_end: Duration, total: Duration) -> Self {
        if total.is_zero() {
            return Self([0.0, 0.0, 0.0, 1.0]);
        }
        let total = total.as_secs_f64();
        let frac = |d: Duration| ((d.as_secs_f64() / total) as f32).clamp(0.0, 1.0);
        Self([0.0, frac(hold_end), frac(spin_end), 1.0])
    }

    #[must_use]
    pub fn times(&self) -> [f32; 4] {
        self.0
    }

    /// Segment index and local progress within it for normalized time `p`.
    fn locate(&self, p: f32) -> (usize, f32) {
        let p = p.clamp(0.0, 1.0);
        let times = self.0;
        let mut segment = 2;
        for i in 0..2 {
            if p <= times[i + 1] {
                segment = i;
                break;
            }
        }
        let start = times[segment];
        let width = times[segment + 1] - start;
        let local = if width <= 0.0 {
            1.0
        } else {
            ((p - start) / width).clamp(0.0, 1.0)
        };
        (segment, local)
    }

    fn sample(&self, p: f32, values: [f32; 4]) -> f32 {
        let (segment, t) = self.locate(p);
        lerp(values[segment], values[segment + 1], t)
    }

    fn sample_offset(&self, p: f32, values: [Offset; 4]) -> Offset {
        let (segment, t) = self.locate(p);
        values[segment].lerp(values[segment + 1], t)
    }
}

/// Where an element is drawn at a given instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementPose {
    pub offset: Offset,
    /// Rotation in full turns. Whole numbers are visually unrotated.
    pub rotation: f32,
    pub opacity: f32,
}

impl ElementPose {
    pub const SETTLED: Self = Self {
        offset: Offset::ZERO,
        rotation: ROTATION_FRAMES[3],
        opacity: 1.0,
    };

    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.offset == Offset::ZERO && self.rotation.fract() == 0.0 && self.opacity >= 1.0
    }
}

const ROTATION_FRAMES: [f32; 4] = [0.0, 0.0, 1.0, 2.0];
const OPACITY_FRAMES: [f32; 4] = [0.0, 1.0, 1.0, 1.0];

/// Immutable intro configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct IntroTimingPlan {
    hold: Duration,
    spin: Duration,
    fast: Duration,
    fade: Duration,
    total: Duration,
    keyframes: Keyframes,
    elements: Vec<IntroElement>,
}

impl IntroTimingPlan {
    pub const DEFAULT_HOLD: Duration = Duration::from_millis(700);
    pub const DEFAULT_SPIN: Duration = Duration::from_millis(900);
    pub const DEFAULT_FAST: Duration = Duration::from_millis(400);
    pub const DEFAULT_FADE: Duration = Duration::from_millis(600);

    pub fn new(
        hold: Duration,
        spin: Duration,
        fast: Duration,
        fade: Duration,
        elements: Vec<IntroElement>,
    ) -> Result<Self, TimingPlanError> {
        let total = hold
            .checked_add(spin)
            .and_then(|d| d.checked_add(fast))
            .and_then(|d| d.checked_add(fade))
            .ok_or(TimingPlanError::DurationOverflow)?;
        Ok(Self {
            hold,
            spin,
            fast,
            fade,
            total,
            keyframes: Keyframes::from_boundaries(hold, hold + spin, total),
            elements,
        })
    }

    /// The three letters of the Ora mark, fanned out around the center.
    #[must_use]
    pub fn default_elements() -> Vec<IntroElement> {
        vec![
            IntroElement::new("O", Offset::new(-14.0, -5.0)),
            IntroElement::new("R", Offset::new(0.0, 7.0)),
            IntroElement::new("A", Offset::new(14.0, -5.0)),
        ]
    }

    #[must_use]
    pub fn hold(&self) -> Duration {
        self.hold
    }

    #[must_use]
    pub fn spin(&self) -> Duration {
        self.spin
    }

    #[must_use]
    pub fn fast(&self) -> Duration {
        self.fast
    }

    #[must_use]
    pub fn fade(&self) -> Duration {
        self.fade
    }

    #[must_use]
    pub fn total(&self) -> Duration {
        self.total
    }

    #[must_use]
    pub fn elements(&self) -> &[IntroElement] {
        &self.elements
    }

    #[must_use]
    pub fn keyframes(&self) -> Keyframes {
        self.keyframes
    }

    /// Time from activation at which the content handoff happens.
    #[must_use]
    pub fn handoff_at(&self) -> Duration {
        self.hold + self.spin + self.fast
    }

    /// Time from activation at which `phase` is entered.
    #[must_use]
    pub fn phase_start(&self, phase: IntroPhase) -> Duration {
        match phase {
            IntroPhase::Hold => Duration::ZERO,
            IntroPhase::Spin => self.hold,
            IntroPhase::Fade => self.handoff_at(),
        }
    }

    /// Pose of element `index` after `elapsed`. Unknown indices are settled.
    #[must_use]
    pub fn pose(&self, index: usize, elapsed: Duration) -> ElementPose {
        let Some(element) = self.elements.get(index) else {
            return ElementPose::SETTLED;
        };
        let p = normalized_progress(elapsed, self.total);
        let start = element.offset;
        ElementPose {
            offset: self
                .keyframes
                .sample_offset(p, [start, start, start.scale(0.5), Offset::ZERO]),
            rotation: self.keyframes.sample(p, ROTATION_FRAMES),
            opacity: self.keyframes.sample(p, OPACITY_FRAMES),
        }
    }
}

impl Default for IntroTimingPlan {
    fn default() -> Self {
        let (hold, spin, fast, fade) = (
            Self::DEFAULT_HOLD,
            Self::DEFAULT_SPIN,
            Self::DEFAULT_FAST,
            Self::DEFAULT_FADE,
        );
        let total = hold + spin + fast + fade;
        Self {
            hold,
            spin,
            fast,
            fade,
            total,
            keyframes: Keyframes::from_boundaries(hold, hold + spin, total),
            elements: Self::default_elements(),
        }
    }
}

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}
