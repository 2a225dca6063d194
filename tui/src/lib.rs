//! TUI rendering for Ora using ratatui.

mod effects;
mod input;
mod theme;

pub use effects::{apply_reveal_effect, blend, reveal_opacity};
pub use input::{InputPump, handle_events};
pub use theme::{Glyphs, Palette, glyphs, palette, spin_frame, styles};

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use ora_engine::{App, IntroView, Page, STAT_HEIGHT, StatDisplay};
use ora_types::IntroTimingPlan;
use ora_types::ui::UiOptions;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &mut App) {
    let options = app.ui_options();
    let palette = palette(options);
    let glyphs = glyphs(options);
    // Clear with background color
    let bg_block = Block::default().style(Style::default().bg(palette.bg_dark));
    frame.render_widget(bg_block, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Navigation
            Constraint::Length(1), // Rule
            Constraint::Min(1),    // Page content
            Constraint::Length(1), // Key hints
        ])
        .split(frame.area());

    app.set_viewport_height(chunks[2].height);

    if app.content_visible() {
        draw_nav(frame, app, chunks[0], &palette, &glyphs);
        draw_rule(frame, chunks[1], &palette, &glyphs);
        draw_content(frame, app, chunks[2], &palette, &glyphs);
        draw_key_hints(frame, app, chunks[3], &palette, &glyphs);
    }

    if let Some(view) = app.intro_view() {
        draw_intro(frame, app, view, &palette, options);
    }
}

fn draw_nav(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let mut spans = vec![Span::styled(" ORA ", styles::heading(palette)), Span::raw(" ")];
    for page in Page::ALL {
        if page.index() > 0 {
            spans.push(Span::styled(
                format!(" {} ", glyphs.separator),
                Style::default().fg(palette.bg_border),
            ));
        }
        let label = format!(" {} {} ", page.index() + 1, page.title());
        let style = if page == app.page() {
            styles::nav_active(palette)
        } else {
            styles::nav_inactive(palette)
        };
        spans.push(Span::styled(label, style));
    }

    let path = app.page().path();
    let used: usize = spans.iter().map(|span| span.content.width()).sum();
    let filler = usize::from(area.width).saturating_sub(used + path.width() + 1);
    spans.push(Span::raw(" ".repeat(filler)));
    spans.push(Span::styled(path, Style::default().fg(palette.text_muted)));

    let nav = Paragraph::new(Line::from(spans)).style(Style::default().bg(palette.bg_panel));
    frame.render_widget(nav, area);
}

fn draw_rule(frame: &mut Frame, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let rule = Line::from(Span::styled(
        glyphs.rule.repeat(usize::from(area.width)),
        Style::default().fg(palette.primary_dim),
    ));
    frame.render_widget(Paragraph::new(rule), area);
}

fn draw_content(frame: &mut Frame, app: &mut App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let elapsed = app.effect_delta();
    let (content_area, opacity, reveal_done) = if let Some(effect) = app.content_effect_mut() {
        effect.advance(elapsed);
        (
            apply_reveal_effect(effect, area),
            reveal_opacity(effect),
            Some(effect.is_finished()),
        )
    } else {
        (area, 1.0, None)
    };

    // Rows uncovered by the rise become visible this frame.
    match reveal_done {
        Some(true) => app.clear_content_effect(),
        Some(false) => app.refresh_visibility(),
        None => {}
    }

    let mut lines = page_lines(app.page(), palette, glyphs);
    if !app.stats().is_empty() {
        lines.push(Line::from(""));
        for stat in app.stats() {
            lines.extend(stat_lines(stat, palette));
        }
    }

    let text_color = blend(palette.bg_dark, palette.text_primary, opacity);
    let paragraph = Paragraph::new(lines)
        .style(Style::default().fg(text_color))
        .scroll((app.scroll(), 0));

    let padded = Rect {
        x: content_area.x.saturating_add(2),
        width: content_area.width.saturating_sub(4),
        ..content_area
    };
    frame.render_widget(paragraph, padded);
}

fn page_lines(page: Page, palette: &Palette, glyphs: &Glyphs) -> Vec<Line<'static>> {
    page.body()
        .iter()
        .map(|&line| {
            if let Some(title) = line.strip_prefix("# ") {
                Line::from(Span::styled(title.to_uppercase(), styles::heading(palette)))
            } else if let Some(title) = line.strip_prefix("## ") {
                Line::from(Span::styled(title, styles::subheading(palette)))
            } else if let Some(item) = line.strip_prefix("- ") {
                Line::from(vec![
                    Span::styled(format!("  {} ", glyphs.bullet), Style::default().fg(palette.accent)),
                    Span::styled(item, styles::body(palette)),
                ])
            } else {
                Line::from(Span::styled(line, styles::body(palette)))
            }
        })
        .collect()
}

fn stat_lines(stat: &StatDisplay, palette: &Palette) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!("  {}", format_count(stat.value())), styles::stat_value(palette)),
            Span::styled(stat.suffix().to_string(), styles::stat_value(palette)),
        ]),
        Line::from(Span::styled(
            format!("  {}", stat.label()),
            styles::stat_label(palette),
        )),
    ];
    while lines.len() < usize::from(STAT_HEIGHT) {
        lines.push(Line::from(""));
    }
    lines
}

/// Group digits in threes: `86400` renders as `86,400`.
#[must_use]
pub fn format_count(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index).is_multiple_of(3) {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn draw_key_hints(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let mut spans = vec![
        Span::styled(" Tab", styles::key_highlight(palette)),
        Span::styled(" next  ", styles::key_hint(palette)),
        Span::styled("1-6", styles::key_highlight(palette)),
        Span::styled(" jump  ", styles::key_hint(palette)),
        Span::styled(
            format!("{}{}", glyphs.arrow_up, glyphs.arrow_down),
            styles::key_highlight(palette),
        ),
        Span::styled(" scroll  ", styles::key_hint(palette)),
        Span::styled("q", styles::key_highlight(palette)),
        Span::styled(" quit", styles::key_hint(palette)),
    ];

    let max_scroll = app.content_height().saturating_sub(app.viewport_height());
    if max_scroll > 0 {
        let percent = u32::from(app.scroll()) * 100 / u32::from(max_scroll);
        spans.push(Span::styled(
            format!("  {percent:>3}%"),
            Style::default().fg(palette.text_muted),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Draw the intro overlay and drive its fade.
///
/// The fade effect is advanced here, by the frame that shows it; when it
/// has played out the app is told so it can complete the intro.
fn draw_intro(frame: &mut Frame, app: &mut App, view: IntroView, palette: &Palette, options: UiOptions) {
    let area = frame.area();
    let elapsed = app.effect_delta();
    let (overlay_opacity, fade_done) = if let Some(effect) = app.fade_effect_mut() {
        effect.advance(elapsed);
        (reveal_opacity(effect), effect.is_finished())
    } else {
        (1.0, false)
    };

    // Before the handoff the overlay hides the page completely.
    if !app.content_visible() {
        frame.render_widget(Clear, area);
        frame.render_widget(
            Block::default().style(Style::default().bg(palette.bg_dark)),
            area,
        );
    }

    draw_intro_mark(frame, app.intro_plan(), view, area, palette, options, overlay_opacity);

    if fade_done {
        app.report_fade_finished();
    }
}

fn draw_intro_mark(
    frame: &mut Frame,
    plan: &IntroTimingPlan,
    view: IntroView,
    area: Rect,
    palette: &Palette,
    options: UiOptions,
    overlay_opacity: f32,
) {
    if overlay_opacity <= 0.0 {
        return;
    }
    let center_x = i32::from(area.x) + i32::from(area.width) / 2;
    let center_y = i32::from(area.y) + i32::from(area.height) / 2;

    for (index, element) in plan.elements().iter().enumerate() {
        let pose = plan.pose(index, view.elapsed);
        let opacity = pose.opacity * overlay_opacity;
        if opacity <= 0.0 {
            continue;
        }

        let text = if pose.is_settled() {
            format!(" {} ", element.label)
        } else {
            let spin = spin_frame(pose.rotation, options);
            format!("{spin}{}{spin}", element.label)
        };
        let width = u16::try_from(text.width()).unwrap_or(u16::MAX);

        let x = center_x + pose.offset.x.round() as i32 - i32::from(width) / 2;
        let y = center_y + pose.offset.y.round() as i32;
        let Some(cell) = clip(area, x, y, width) else {
            continue;
        };

        let style = Style::default()
            .fg(blend(palette.bg_dark, palette.primary, opacity))
            .add_modifier(Modifier::BOLD);
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(text, style))).alignment(Alignment::Left),
            cell,
        );
    }
}

/// One-row rectangle at `(x, y)` clipped to `area`.
fn clip(area: Rect, x: i32, y: i32, width: u16) -> Option<Rect> {
    let left = i32::from(area.x);
    let top = i32::from(area.y);
    let right = left + i32::from(area.width);
    let bottom = top + i32::from(area.height);
    if y < top || y >= bottom || x >= right || x + i32::from(width) <= left {
        return None;
    }
    let start = x.max(left);
    let end = (x + i32::from(width)).min(right);
    Some(Rect {
        x: u16::try_from(start).ok()?,
        y: u16::try_from(y).ok()?,
        width: u16::try_from(end - start).ok()?,
        height: 1,
    })
}

#[cfg(test)]
mod tests;
