//! Viewport visibility notifications.
//!
//! An element is visible when its laid-out span has a non-zero intersection
//! with the viewport span (no margin). Observations are one-shot: the
//! callback fires the first time the element is seen and the observation is
//! then dropped.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::guard::CancelGuard;

/// Identity of an observable element, minted by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl ElementId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Half-open run of rows `[start, start + len)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: u32,
    pub len: u32,
}

impl Span {
    #[must_use]
    pub const fn new(start: u32, len: u32) -> Self {
        Self { start, len }
    }

    #[must_use]
    pub const fn end(self) -> u32 {
        self.start.saturating_add(self.len)
    }

    /// Non-zero overlap. Touching edges do not count.
    #[must_use]
    pub fn intersects(self, other: Span) -> bool {
        self.len > 0 && other.len > 0 && self.start < other.end() && other.start < self.end()
    }
}

/// Visibility notifier with a one-time trigger mode.
pub trait VisibilityNotifier {
    /// Call `on_visible` once, the first time `element` is visible.
    fn observe_once(&self, element: ElementId, on_visible: Box<dyn FnOnce()>) -> CancelGuard;
}

struct Watch {
    element: ElementId,
    on_visible: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct ObserverState {
    viewport: Option<Span>,
    layout: HashMap<ElementId, Span>,
    watches: HashMap<u64, Watch>,
    next_token: u64,
}

impl ObserverState {
    fn is_visible(&self, element: ElementId) -> bool {
        match (self.viewport, self.layout.get(&element)) {
            (Some(viewport), Some(span)) => span.intersects(viewport),
            _ => false,
        }
    }

    fn take_matching(&mut self, hit: impl Fn(&Self, ElementId) -> bool) -> Vec<Watch> {
        let this: &Self = self;
        let mut tokens: Vec<u64> = this
            .watches
            .iter()
            .filter(|(_, watch)| hit(this, watch.element))
            .map(|(&token, _)| token)
            .collect();
        tokens.sort_unstable();
        tokens
            .into_iter()
            .filter_map(|token| self.watches.remove(&token))
            .collect()
    }
}

/// Row-based viewport observer.
///
/// The host reports the viewport and element layout (typically every
/// frame); observations fire during those reports, never from inside
/// [`VisibilityNotifier::observe_once`] itself.
#[derive(Clone, Default)]
pub struct ViewportObserver {
    state: Rc<RefCell<ObserverState>>,
}

impl ViewportObserver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_viewport(&self, viewport: Span) {
        self.state.borrow_mut().viewport = Some(viewport);
        self.evaluate();
    }

    pub fn set_layout(&self, element: ElementId, span: Span) {
        self.state.borrow_mut().layout.insert(element, span);
        self.evaluate();
    }

    pub fn remove_layout(&self, element: ElementId) {
        self.state.borrow_mut().layout.remove(&element);
    }

    /// Number of observations still waiting for their element.
    #[must_use]
    pub fn watching(&self) -> usize {
        self.state.borrow().watches.len()
    }

    /// Fire observations of `element` regardless of layout.
    pub fn notify(&self, element: ElementId) {
        let fired = self
            .state
            .borrow_mut()
            .take_matching(|_, watched| watched == element);
        run(fired);
    }

    /// Fire every observation whose element is currently visible.
    pub fn evaluate(&self) {
        let fired = self
            .state
            .borrow_mut()
            .take_matching(ObserverState::is_visible);
        run(fired);
    }
}

fn run(fired: Vec<Watch>) {
    for watch in fired {
        tracing::trace!(element = watch.element.get(), "element became visible");
        (watch.on_visible)();
    }
}

impl VisibilityNotifier for ViewportObserver {
    fn observe_once(&self, element: ElementId, on_visible: Box<dyn FnOnce()>) -> CancelGuard {
        let token = {
            let mut state = self.state.borrow_mut();
            let token = state.next_token;
            state.next_token += 1;
            state.watches.insert(
                token,
                Watch {
                    element,
                    on_visible,
                },
            );
            token
        };

        let state: Weak<RefCell<ObserverState>> = Rc::downgrade(&self.state);
        CancelGuard::new(move || {
            let Some(state) = state.upgrade() else { return };
            let removed = state.borrow_mut().watches.remove(&token);
            drop(removed);
        })
    }
}

impl fmt::Debug for ViewportObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ViewportObserver")
            .field("viewport", &state.viewport)
            .field("elements", &state.layout.len())
            .field("watching", &state.watches.len())
            .finish()
    }
}
