//! Rendering tests against ratatui's test backend.

use std::time::Duration;

use insta::assert_snapshot;
use ratatui::{Terminal, backend::TestBackend};

use ora_engine::{App, Page, Settings};
use ora_types::HandoffState;

use super::{draw, format_count};

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn terminal() -> Terminal<TestBackend> {
    Terminal::new(TestBackend::new(100, 24)).expect("test terminal")
}

/// Draw one frame and return the screen, one quoted line per row.
fn render(terminal: &mut Terminal<TestBackend>, app: &mut App) -> String {
    terminal.draw(|frame| draw(frame, app)).expect("draw");
    terminal.backend().to_string()
}

fn row(screen: &str, index: usize) -> &str {
    screen
        .lines()
        .nth(index)
        .expect("row on screen")
        .trim_matches('"')
}

fn still_app() -> App {
    let mut settings = Settings::default();
    settings.ui.reduced_motion = true;
    App::new(settings)
}

#[test]
fn home_page_renders_nav_and_copy() {
    let mut terminal = terminal();
    let mut app = still_app();
    let screen = render(&mut terminal, &mut app);

    assert!(screen.contains("1 Home"));
    assert!(screen.contains("6 Legal"));
    assert!(screen.contains("WHAT WE DO") || screen.contains("What we do"));
    assert!(screen.contains("q quit"));
}

#[test]
fn chrome_rows_are_in_place() {
    let mut terminal = terminal();
    let mut app = still_app();
    let screen = render(&mut terminal, &mut app);

    assert_eq!(screen.lines().count(), 24);
    assert!(row(&screen, 0).starts_with(" ORA   1 Home "));
    assert!(row(&screen, 0).trim_end().ends_with('/'));
    assert!(row(&screen, 1).chars().all(|ch| ch == '─'));
    assert_eq!(row(&screen, 2).trim(), "ORA");
    assert!(row(&screen, 23).starts_with(" Tab next  1-6 jump "));
}

#[test]
fn small_ascii_frame() {
    let mut settings = Settings::default();
    settings.ui.reduced_motion = true;
    settings.ui.ascii_only = true;
    let mut app = App::new(settings);
    app.navigate(Page::Legal);
    let mut terminal = Terminal::new(TestBackend::new(30, 6)).expect("test terminal");
    terminal.draw(|frame| draw(frame, &mut app)).expect("draw");

    assert_snapshot!(terminal.backend().to_string(), @r#"
    " ORA   1 Home  |  2 Roster  | "
    "------------------------------"
    "  LEGAL                       "
    "                              "
    "  All trademarks belong to t  "
    " Tab next  1-6 jump  ^v scroll"
    "#);
}

#[test]
fn overlay_hides_content_until_handoff() {
    let mut terminal = terminal();
    let mut app = App::new(Settings::default());
    app.advance(Duration::from_millis(1000));
    let screen = render(&mut terminal, &mut app);
    assert!(!screen.contains("Roster"));

    app.advance(Duration::from_millis(1000));
    let screen = render(&mut terminal, &mut app);
    assert!(screen.contains("Roster"));
}

#[test]
fn renderer_reports_fade_completion() {
    let mut terminal = terminal();
    let mut app = App::new(Settings::default());
    app.advance(Duration::from_millis(2000));
    render(&mut terminal, &mut app);
    assert_eq!(app.handoff_state(), HandoffState::HandedOff);

    for _ in 0..5 {
        app.advance(Duration::from_millis(100));
        render(&mut terminal, &mut app);
        assert_eq!(app.handoff_state(), HandoffState::HandedOff);
    }

    app.advance(Duration::from_millis(100));
    render(&mut terminal, &mut app);
    assert_eq!(app.handoff_state(), HandoffState::Complete);
    assert!(app.intro_view().is_none());
}

#[test]
fn fade_is_not_reported_without_frames() {
    let mut app = App::new(Settings::default());
    app.advance(Duration::from_millis(10_000));
    assert_eq!(app.handoff_state(), HandoffState::HandedOff);
}

#[test]
fn counters_render_once_scrolled_into_view() {
    let mut terminal = terminal();
    let mut app = still_app();
    render(&mut terminal, &mut app);
    app.advance(Duration::from_secs(5));
    assert!(app.stats().iter().all(|stat| !stat.has_started()));

    app.scroll_by(i32::MAX);
    app.advance(Duration::from_secs(5));
    let screen = render(&mut terminal, &mut app);
    assert!(screen.contains("1,280+"));
    assert!(screen.contains("86,400+"));
    assert!(screen.contains("Events hosted"));
}

#[test]
fn rising_content_keeps_clipped_counters_waiting() {
    let mut terminal = terminal();
    let mut app = App::new(Settings::default());
    app.advance(ms(2000));
    render(&mut terminal, &mut app);
    assert!(app.content_visible());

    // Put the first value row on the last row of the content area.
    let height = app.viewport_height();
    let value_row = app.stats()[0].row();
    app.scroll_by(i32::from(value_row + 1 - height));
    assert_eq!(app.scroll() + height - 1, value_row);

    let screen = render(&mut terminal, &mut app);
    assert!(!app.stats()[0].has_started());
    assert!(!screen.contains("Members"));

    // Each frame, a started counter must have its row on screen.
    for _ in 0..6 {
        app.advance(ms(100));
        let screen = render(&mut terminal, &mut app);
        // Bottom row of the content area, above the key hints.
        let drawn = row(&screen, 22).trim().ends_with('+');
        if app.stats()[0].has_started() {
            assert!(drawn, "counter started while clipped:\n{screen}");
        }
    }
    assert!(app.stats()[0].has_started());
}

#[test]
fn other_pages_render_their_copy() {
    let mut terminal = terminal();
    let mut app = still_app();
    app.navigate(Page::Partners);
    let screen = render(&mut terminal, &mut app);
    assert!(screen.contains("Northlight Peripherals"));
    assert!(screen.contains("/partners"));
}

#[test]
fn ascii_only_uses_ascii_chrome() {
    let mut settings = Settings::default();
    settings.ui.reduced_motion = true;
    settings.ui.ascii_only = true;
    let mut app = App::new(settings);
    let mut terminal = terminal();
    let screen = render(&mut terminal, &mut app);
    assert!(screen.contains(" | "));
    assert!(!screen.contains('│'));
}

#[test]
fn count_formatting() {
    assert_eq!(format_count(0), "0");
    assert_eq!(format_count(999), "999");
    assert_eq!(format_count(1_280), "1,280");
    assert_eq!(format_count(1_000_000), "1,000,000");
}
