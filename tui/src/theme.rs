//! Color theme and glyphs for the Ora TUI.
//!
//! Uses Kanagawa Wave palette by default with an optional high-contrast override.

use ratatui::style::{Color, Modifier, Style};

use ora_types::ui::UiOptions;

/// Kanagawa Wave color palette constants.
mod colors {
    use super::Color;

    // === Backgrounds (Sumi Ink) ===
    pub const BG_DARK: Color = Color::Rgb(22, 22, 29); // sumiInk0
    pub const BG_PANEL: Color = Color::Rgb(31, 31, 40); // sumiInk3
    pub const BG_BORDER: Color = Color::Rgb(84, 84, 109); // sumiInk6

    // === Foregrounds (Fuji) ===
    pub const TEXT_PRIMARY: Color = Color::Rgb(220, 215, 186); // fujiWhite
    pub const TEXT_SECONDARY: Color = Color::Rgb(200, 192, 147); // oldWhite
    pub const TEXT_MUTED: Color = Color::Rgb(114, 113, 105); // fujiGray

    // === Primary/Brand ===
    pub const PRIMARY: Color = Color::Rgb(149, 127, 184); // oniViolet
    pub const PRIMARY_DIM: Color = Color::Rgb(147, 138, 169); // springViolet1

    // === Accent Colors ===
    pub const CYAN: Color = Color::Rgb(127, 180, 202); // springBlue
    pub const YELLOW: Color = Color::Rgb(230, 195, 132); // carpYellow
    pub const ORANGE: Color = Color::Rgb(255, 160, 102); // surimiOrange

    // === Semantic Aliases ===
    pub const ACCENT: Color = CYAN;
    pub const PEACH: Color = ORANGE;
}

/// Resolved theme palette used by the UI.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg_dark: Color,
    pub bg_panel: Color,
    pub bg_border: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub primary: Color,
    pub primary_dim: Color,
    pub accent: Color,
    pub peach: Color,
    pub yellow: Color,
}

impl Palette {
    #[must_use]
    pub fn standard() -> Self {
        Self {
            bg_dark: colors::BG_DARK,
            bg_panel: colors::BG_PANEL,
            bg_border: colors::BG_BORDER,
            text_primary: colors::TEXT_PRIMARY,
            text_secondary: colors::TEXT_SECONDARY,
            text_muted: colors::TEXT_MUTED,
            primary: colors::PRIMARY,
            primary_dim: colors::PRIMARY_DIM,
            accent: colors::ACCENT,
            peach: colors::PEACH,
            yellow: colors::YELLOW,
        }
    }

    #[must_use]
    pub fn high_contrast() -> Self {
        Self {
            bg_dark: Color::Black,
            bg_panel: Color::Black,
            bg_border: Color::Gray,
            text_primary: Color::White,
            text_secondary: Color::Gray,
            text_muted: Color::DarkGray,
            primary: Color::White,
            primary_dim: Color::Gray,
            accent: Color::Cyan,
            peach: Color::Yellow,
            yellow: Color::Yellow,
        }
    }
}

#[must_use]
pub fn palette(options: UiOptions) -> Palette {
    if options.high_contrast {
        Palette::high_contrast()
    } else {
        Palette::standard()
    }
}

/// ASCII/Unicode glyphs for page chrome and the intro mark.
#[derive(Debug, Clone, Copy)]
pub struct Glyphs {
    pub bullet: &'static str,
    pub separator: &'static str,
    pub rule: &'static str,
    pub arrow_up: &'static str,
    pub arrow_down: &'static str,
    /// One full turn of a spinning mark, evenly spaced.
    pub spin_frames: &'static [&'static str],
}

const SPIN_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];
const SPIN_FRAMES_ASCII: &[&str] = &["|", "/", "-", "\\"];

#[must_use]
pub fn glyphs(options: UiOptions) -> Glyphs {
    if options.ascii_only {
        Glyphs {
            bullet: "*",
            separator: "|",
            rule: "-",
            arrow_up: "^",
            arrow_down: "v",
            spin_frames: SPIN_FRAMES_ASCII,
        }
    } else {
        Glyphs {
            bullet: "•",
            separator: "│",
            rule: "─",
            arrow_up: "↑",
            arrow_down: "↓",
            spin_frames: SPIN_FRAMES,
        }
    }
}

/// Frame of the spin indicator for a rotation given in turns.
///
/// Whole turns map to the first frame; with `reduced_motion` the first frame
/// is always used.
#[must_use]
pub fn spin_frame(rotation: f32, options: UiOptions) -> &'static str {
    let frames = glyphs(options).spin_frames;
    if options.reduced_motion || !rotation.is_finite() {
        return frames[0];
    }
    let turn = rotation.rem_euclid(1.0);
    let index = (turn * frames.len() as f32).floor() as usize;
    frames[index.min(frames.len() - 1)]
}

/// Pre-defined styles for common UI elements.
pub mod styles {
    use super::{Modifier, Palette, Style};

    #[must_use]
    pub fn nav_active(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.bg_dark)
            .bg(palette.primary)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn nav_inactive(palette: &Palette) -> Style {
        Style::default().fg(palette.text_secondary)
    }

    #[must_use]
    pub fn heading(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.primary)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn subheading(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn body(palette: &Palette) -> Style {
        Style::default().fg(palette.text_primary)
    }

    #[must_use]
    pub fn stat_value(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.yellow)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn stat_label(palette: &Palette) -> Style {
        Style::default().fg(palette.text_muted)
    }

    #[must_use]
    pub fn key_hint(palette: &Palette) -> Style {
        Style::default().fg(palette.text_muted)
    }

    #[must_use]
    pub fn key_highlight(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.peach)
            .add_modifier(Modifier::BOLD)
    }
}

#[cfg(test)]
mod tests {
    use ora_types::ui::UiOptions;

    use super::spin_frame;

    #[test]
    fn spin_frame_follows_rotation() {
        let options = UiOptions::default();
        assert_eq!(spin_frame(0.0, options), "◐");
        assert_eq!(spin_frame(0.25, options), "◓");
        assert_eq!(spin_frame(1.5, options), "◑");
        assert_eq!(spin_frame(2.0, options), "◐");
    }

    #[test]
    fn spin_frame_static_with_reduced_motion() {
        let options = UiOptions {
            reduced_motion: true,
            ..UiOptions::default()
        };
        assert_eq!(spin_frame(0.0, options), spin_frame(0.6, options));
    }

    #[test]
    fn spin_frame_ascii() {
        let options = UiOptions {
            ascii_only: true,
            ..UiOptions::default()
        };
        assert_eq!(spin_frame(0.75, options), "\\");
        assert_eq!(spin_frame(f32::NAN, options), "|");
    }
}
