//! Page shell for Ora - routing, intro handoff and statistic counters.
//!
//! This crate contains the App state machine without TUI dependencies. The
//! renderer reads from it and reports back two things: how tall the
//! viewport is, and when the intro fade finished playing.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use ora_core::{
    CounterAnimator, ElementId, IntroSequencer, SharedScheduler, Span, TickScheduler,
    ViewportObserver,
};
use ora_types::ui::{RevealEffect, UiOptions};
use ora_types::{HandoffState, IntroPhase, IntroTimingPlan};

pub use ora_config::{Settings, StatConfig};

mod page;
pub use page::Page;

/// Rows taken by one statistic display (value, label, spacer).
pub const STAT_HEIGHT: u16 = 3;

/// Duration of the content rise-in after the handoff.
pub const CONTENT_REVEAL: Duration = Duration::from_millis(500);

/// Rows the content travels while rising in.
pub const CONTENT_RISE: u16 = 3;

/// A mounted statistic display. Owns its counter: dropping the display
/// unmounts the counter.
#[derive(Debug)]
pub struct StatDisplay {
    label: String,
    suffix: String,
    row: u16,
    counter: CounterAnimator,
}

impl StatDisplay {
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// First content row of this display.
    #[must_use]
    pub fn row(&self) -> u16 {
        self.row
    }

    #[must_use]
    pub fn value(&self) -> u32 {
        self.counter.value()
    }

    #[must_use]
    pub fn target(&self) -> u32 {
        self.counter.target()
    }

    #[must_use]
    pub fn element(&self) -> ElementId {
        self.counter.element()
    }

    #[must_use]
    pub fn has_started(&self) -> bool {
        self.counter.has_started()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.counter.is_finished()
    }
}

/// Snapshot of the intro overlay for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntroView {
    pub phase: IntroPhase,
    pub elapsed: Duration,
}

pub struct App {
    settings: Settings,
    clock: TickScheduler,
    scheduler: SharedScheduler,
    observer: ViewportObserver,
    intro: Option<IntroSequencer>,
    handoff: Rc<Cell<HandoffState>>,
    fade_effect: Option<RevealEffect>,
    content_effect: Option<RevealEffect>,
    reveal_started: bool,
    page: Page,
    scroll: u16,
    viewport_height: u16,
    stats: Vec<StatDisplay>,
    next_element: u64,
    last_frame: Instant,
    effect_delta: Duration,
    should_quit: bool,
}

impl App {
    /// Build the shell on the home page and start the intro.
    ///
    /// With reduced motion the intro is skipped and content shows at once.
    pub fn new(settings: Settings) -> Self {
        let clock = TickScheduler::new();
        let scheduler: SharedScheduler = Rc::new(clock.clone());
        let reduced_motion = settings.ui.reduced_motion;

        let mut app = Self {
            settings,
            clock,
            scheduler,
            observer: ViewportObserver::new(),
            intro: None,
            handoff: Rc::new(Cell::new(HandoffState::Pending)),
            fade_effect: None,
            content_effect: None,
            reveal_started: false,
            page: Page::Home,
            scroll: 0,
            viewport_height: 0,
            stats: Vec::new(),
            next_element: 1,
            last_frame: Instant::now(),
            effect_delta: Duration::ZERO,
            should_quit: false,
        };

        if reduced_motion {
            tracing::info!("Reduced motion: skipping intro");
            app.handoff.set(HandoffState::skipped());
            app.reveal_started = true;
        } else {
            app.mount_intro();
        }
        app.mount_stats();
        app
    }

    fn mount_intro(&mut self) {
        let on_handoff = {
            let handoff = Rc::clone(&self.handoff);
            Box::new(move || {
                let mut state = handoff.get();
                if state.fire_handoff() {
                    handoff.set(state);
                }
            })
        };
        let on_done = {
            let handoff = Rc::clone(&self.handoff);
            Box::new(move || {
                let mut state = handoff.get();
                if state.complete() {
                    handoff.set(state);
                }
            })
        };

        let intro = IntroSequencer::new(
            self.settings.intro.clone(),
            Rc::clone(&self.scheduler),
            on_handoff,
            on_done,
        );
        intro.activate();
        self.intro = Some(intro);
    }

    fn mount_stats(&mut self) {
        if !self.page.has_stats() {
            return;
        }
        let first_row = self.body_height() + 1;
        let range = self.settings.range;

        for (index, stat) in self.settings.stats.iter().enumerate() {
            let element = ElementId::new(self.next_element);
            self.next_element += 1;

            let row = first_row.saturating_add((index as u16).saturating_mul(STAT_HEIGHT));
            self.observer.set_layout(element, Span::new(u32::from(row), 1));
            let counter = CounterAnimator::mount(
                stat.value,
                range,
                element,
                Rc::clone(&self.scheduler),
                &self.observer,
            );
            self.stats.push(StatDisplay {
                label: stat.label.clone(),
                suffix: stat.suffix.clone(),
                row,
                counter,
            });
        }
        tracing::debug!(count = self.stats.len(), "statistic counters mounted");
    }

    fn unmount_stats(&mut self) {
        for stat in self.stats.drain(..) {
            self.observer.remove_layout(stat.element());
        }
    }

    /// Advance by the real time since the previous frame.
    pub fn tick(&mut self) {
        let delta = self.frame_elapsed();
        self.advance(delta);
    }

    /// Advance the shell clock by `delta`, firing due timers.
    pub fn advance(&mut self, delta: Duration) {
        self.effect_delta = delta;
        self.clock.advance(delta);
        self.sync_handoff();
    }

    /// Get elapsed time since last frame and update timing.
    pub fn frame_elapsed(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.last_frame = now;
        elapsed
    }

    /// How far running effects should advance this frame: the last
    /// [`App::advance`] delta, cut to the time since they started.
    #[must_use]
    pub fn effect_delta(&self) -> Duration {
        self.effect_delta
    }

    /// React to handoff state changes made by the intro callbacks.
    fn sync_handoff(&mut self) {
        let state = self.handoff.get();

        if state.handoff_fired() && !self.reveal_started {
            self.reveal_started = true;
            self.fade_effect = Some(RevealEffect::fade_out(self.settings.intro.fade()));
            self.content_effect = Some(RevealEffect::rise_in(CONTENT_REVEAL));
            // Effects only run from the handoff on, not for the whole frame.
            let since_handoff = self
                .intro
                .as_ref()
                .and_then(IntroSequencer::elapsed)
                .map(|elapsed| elapsed.saturating_sub(self.settings.intro.handoff_at()))
                .unwrap_or_default();
            self.effect_delta = self.effect_delta.min(since_handoff);
            tracing::debug!("content reveal started");
            self.refresh_visibility();
        }

        if state.intro_complete() && self.intro.is_some() {
            self.intro = None;
            self.fade_effect = None;
            tracing::debug!("intro overlay removed");
        }
    }

    /// The overlay fade finished playing on screen.
    pub fn report_fade_finished(&mut self) {
        if let Some(intro) = &self.intro {
            intro.report_fade_finished();
        }
        self.sync_handoff();
    }

    #[must_use]
    pub fn handoff_state(&self) -> HandoffState {
        self.handoff.get()
    }

    /// Overlay state while the intro is mounted.
    #[must_use]
    pub fn intro_view(&self) -> Option<IntroView> {
        let intro = self.intro.as_ref()?;
        Some(IntroView {
            phase: intro.phase()?,
            elapsed: intro.elapsed()?,
        })
    }

    #[must_use]
    pub fn intro_plan(&self) -> &IntroTimingPlan {
        &self.settings.intro
    }

    /// Get mutable reference to the overlay fade for UI processing.
    pub fn fade_effect_mut(&mut self) -> Option<&mut RevealEffect> {
        self.fade_effect.as_mut()
    }

    pub fn content_effect_mut(&mut self) -> Option<&mut RevealEffect> {
        self.content_effect.as_mut()
    }

    pub fn clear_content_effect(&mut self) {
        self.content_effect = None;
        self.refresh_visibility();
    }

    /// Whether the routed content may be drawn.
    #[must_use]
    pub fn content_visible(&self) -> bool {
        self.handoff.get().handoff_fired()
    }

    #[must_use]
    pub fn page(&self) -> Page {
        self.page
    }

    /// Route to `page`, remounting its counters.
    pub fn navigate(&mut self, page: Page) {
        if page == self.page {
            return;
        }
        tracing::info!(from = self.page.path(), to = page.path(), "Navigating");
        self.unmount_stats();
        self.page = page;
        self.scroll = 0;
        self.mount_stats();
        self.refresh_visibility();
    }

    pub fn next_page(&mut self) {
        self.navigate(self.page.next());
    }

    pub fn prev_page(&mut self) {
        self.navigate(self.page.prev());
    }

    #[must_use]
    pub fn stats(&self) -> &[StatDisplay] {
        &self.stats
    }

    fn body_height(&self) -> u16 {
        u16::try_from(self.page.body().len()).unwrap_or(u16::MAX)
    }

    /// Total rows of the current page, counters included.
    #[must_use]
    pub fn content_height(&self) -> u16 {
        let stats = u16::try_from(self.stats.len())
            .unwrap_or(u16::MAX)
            .saturating_mul(STAT_HEIGHT);
        if stats == 0 {
            self.body_height()
        } else {
            self.body_height().saturating_add(1).saturating_add(stats)
        }
    }

    #[must_use]
    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    fn max_scroll(&self) -> u16 {
        self.content_height().saturating_sub(self.viewport_height)
    }

    pub fn scroll_by(&mut self, delta: i32) {
        let next = i32::from(self.scroll).saturating_add(delta);
        let clamped = next.clamp(0, i32::from(self.max_scroll()));
        self.scroll = u16::try_from(clamped).unwrap_or(0);
        self.refresh_visibility();
    }

    pub fn page_down(&mut self) {
        self.scroll_by(i32::from(self.viewport_height.max(1)));
    }

    pub fn page_up(&mut self) {
        self.scroll_by(-i32::from(self.viewport_height.max(1)));
    }

    #[must_use]
    pub fn viewport_height(&self) -> u16 {
        self.viewport_height
    }

    /// The renderer's content area height changed (or was first measured).
    pub fn set_viewport_height(&mut self, height: u16) {
        if height == self.viewport_height {
            return;
        }
        self.viewport_height = height;
        self.scroll = self.scroll.min(self.max_scroll());
        self.refresh_visibility();
    }

    /// Rows at the bottom of the viewport still covered while content
    /// rises in.
    fn content_inset(&self) -> u16 {
        let distance = CONTENT_RISE.min(self.viewport_height.saturating_sub(1));
        self.content_effect
            .as_ref()
            .map_or(0, |effect| effect.rise_offset(distance))
    }

    /// Report the drawn rows to the observer.
    ///
    /// Content held back by the intro is not on screen yet, so nothing is
    /// reported before handoff. The renderer calls this each frame while
    /// the content rise is running.
    pub fn refresh_visibility(&self) {
        let rows = self.viewport_height.saturating_sub(self.content_inset());
        if !self.content_visible() || rows == 0 {
            return;
        }
        self.observer
            .set_viewport(Span::new(u32::from(self.scroll), u32::from(rows)));
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        self.settings.ui
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("page", &self.page)
            .field("handoff", &self.handoff.get())
            .field("intro", &self.intro)
            .field("scroll", &self.scroll)
            .field("stats", &self.stats.len())
            .finish_non_exhaustive()
    }
}
