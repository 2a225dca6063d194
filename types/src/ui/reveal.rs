//! Reveal effects for the page shell: the intro overlay fading out and the
//! routed content rising in after the handoff.

use std::time::Duration;

use super::animation::{AnimPhase, EffectTimer, ease_out_cubic};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealEffectKind {
    FadeOut,
    RiseIn,
}

#[derive(Debug, Clone)]
pub struct RevealEffect {
    kind: RevealEffectKind,
    timer: EffectTimer,
}

impl RevealEffect {
    #[must_use]
    pub fn fade_out(duration: Duration) -> Self {
        Self {
            kind: RevealEffectKind::FadeOut,
            timer: EffectTimer::new(duration),
        }
    }

    #[must_use]
    pub fn rise_in(duration: Duration) -> Self {
        Self {
            kind: RevealEffectKind::RiseIn,
            timer: EffectTimer::new(duration),
        }
    }

    pub fn advance(&mut self, delta: Duration) {
        self.timer.advance(delta);
    }

    #[must_use]
    pub fn phase(&self) -> AnimPhase {
        self.timer.phase()
    }

    #[must_use]
    pub fn progress(&self) -> f32 {
        self.timer.progress()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.timer.is_finished()
    }

    #[must_use]
    pub fn kind(&self) -> RevealEffectKind {
        self.kind
    }

    /// Rows a rising effect still sits below its resting place when it
    /// travels `distance` rows in total. Always zero for a fade.
    #[must_use]
    pub fn rise_offset(&self, distance: u16) -> u16 {
        match self.kind {
            RevealEffectKind::RiseIn => {
                let remaining = 1.0 - ease_out_cubic(self.progress());
                (remaining * f32::from(distance)).round() as u16
            }
            RevealEffectKind::FadeOut => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AnimPhase, RevealEffect, RevealEffectKind};
    use std::time::Duration;

    #[test]
    fn fade_out_initial_state() {
        let effect = RevealEffect::fade_out(Duration::from_millis(600));
        assert_eq!(effect.kind(), RevealEffectKind::FadeOut);
        assert!(matches!(effect.phase(), AnimPhase::Running { progress } if progress < 0.1));
    }

    #[test]
    fn rise_in_initial_state() {
        let effect = RevealEffect::rise_in(Duration::from_millis(400));
        assert_eq!(effect.kind(), RevealEffectKind::RiseIn);
        assert!(matches!(effect.phase(), AnimPhase::Running { .. }));
    }

    #[test]
    fn completed_after_duration() {
        let mut effect = RevealEffect::fade_out(Duration::from_millis(100));
        effect.advance(Duration::from_millis(150));
        assert!(matches!(effect.phase(), AnimPhase::Completed));
        assert!(effect.is_finished());
    }

    #[test]
    fn rise_offset_shrinks_to_zero() {
        let mut effect = RevealEffect::rise_in(Duration::from_millis(500));
        assert_eq!(effect.rise_offset(3), 3);
        effect.advance(Duration::from_millis(100));
        assert_eq!(effect.rise_offset(3), 2);
        effect.advance(Duration::from_millis(100));
        assert_eq!(effect.rise_offset(3), 1);
        effect.advance(Duration::from_millis(100));
        assert_eq!(effect.rise_offset(3), 0);
        assert_eq!(RevealEffect::fade_out(Duration::from_millis(500)).rise_offset(3), 0);
    }

    #[test]
    fn zero_duration_immediately_completed() {
        let effect = RevealEffect::fade_out(Duration::ZERO);
        assert!(matches!(effect.phase(), AnimPhase::Completed));
    }
}
