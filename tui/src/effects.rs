//! Reveal effects for the intro overlay and routed content.

use ratatui::layout::Rect;
use ratatui::style::Color;

use ora_engine::CONTENT_RISE;
use ora_types::ui::{RevealEffect, RevealEffectKind, ease_out_cubic};

/// Apply a content reveal to the base rectangle.
#[must_use]
pub fn apply_reveal_effect(effect: &RevealEffect, base: Rect) -> Rect {
    match effect.kind() {
        RevealEffectKind::RiseIn => {
            let y_offset = effect.rise_offset(CONTENT_RISE.min(base.height.saturating_sub(1)));
            Rect {
                x: base.x,
                y: base.y.saturating_add(y_offset),
                width: base.width,
                height: base.height.saturating_sub(y_offset),
            }
        }
        RevealEffectKind::FadeOut => base,
    }
}

/// Opacity multiplier for content drawn under `effect`.
#[must_use]
pub fn reveal_opacity(effect: &RevealEffect) -> f32 {
    let t = ease_out_cubic(effect.progress());
    match effect.kind() {
        RevealEffectKind::FadeOut => 1.0 - t,
        RevealEffectKind::RiseIn => t,
    }
}

/// Mix `to` over `from` with weight `t`. Only RGB colors blend; anything
/// else switches at the halfway point.
#[must_use]
pub fn blend(from: Color, to: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    match (from, to) {
        (Color::Rgb(r1, g1, b1), Color::Rgb(r2, g2, b2)) => {
            let mix = |a: u8, b: u8| (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8;
            Color::Rgb(mix(r1, r2), mix(g1, g2), mix(b1, b2))
        }
        _ if t < 0.5 => from,
        _ => to,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ratatui::layout::Rect;
    use ratatui::style::Color;

    use ora_types::ui::RevealEffect;

    use super::{apply_reveal_effect, blend, reveal_opacity};

    #[test]
    fn rise_in_starts_low_and_settles() {
        let base = Rect::new(0, 2, 40, 20);
        let mut effect = RevealEffect::rise_in(Duration::from_millis(500));
        let start = apply_reveal_effect(&effect, base);
        assert_eq!(start.y, 5);
        assert_eq!(start.height, 17);

        effect.advance(Duration::from_millis(500));
        assert_eq!(apply_reveal_effect(&effect, base), base);
    }

    #[test]
    fn fade_out_opacity_goes_to_zero() {
        let mut effect = RevealEffect::fade_out(Duration::from_millis(600));
        assert!((reveal_opacity(&effect) - 1.0).abs() < f32::EPSILON);
        effect.advance(Duration::from_millis(600));
        assert!(reveal_opacity(&effect).abs() < f32::EPSILON);
    }

    #[test]
    fn blend_rgb_endpoints() {
        let a = Color::Rgb(0, 0, 0);
        let b = Color::Rgb(200, 100, 50);
        assert_eq!(blend(a, b, 0.0), a);
        assert_eq!(blend(a, b, 1.0), b);
        assert_eq!(blend(a, b, 0.5), Color::Rgb(100, 50, 25));
        assert_eq!(blend(Color::Black, Color::White, 0.7), Color::White);
    }
}
