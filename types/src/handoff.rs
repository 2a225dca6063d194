//! Page-load handoff between the intro overlay and the routed content.

/// Progress of the initial page load.
///
/// Exposed as two one-way flags (`handoff_fired`, `intro_complete`), stored as
/// a single forward-only state so that "complete but not handed off" cannot
/// be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandoffState {
    /// Intro overlay is playing; content is held back.
    #[default]
    Pending,
    /// Content may begin revealing; overlay still mounted.
    HandedOff,
    /// Overlay may be removed from the render tree.
    Complete,
}

impl HandoffState {
    #[must_use]
    pub fn handoff_fired(self) -> bool {
        matches!(self, Self::HandedOff | Self::Complete)
    }

    #[must_use]
    pub fn intro_complete(self) -> bool {
        matches!(self, Self::Complete)
    }

    /// Returns `true` if this call changed the state.
    pub fn fire_handoff(&mut self) -> bool {
        match self {
            Self::Pending => {
                *self = Self::HandedOff;
                true
            }
            Self::HandedOff | Self::Complete => false,
        }
    }

    /// Returns `true` if this call changed the state. Refused while the
    /// handoff has not fired yet.
    pub fn complete(&mut self) -> bool {
        match self {
            Self::HandedOff => {
                *self = Self::Complete;
                true
            }
            Self::Pending | Self::Complete => false,
        }
    }

    /// State for a page load that skips the intro entirely.
    #[must_use]
    pub fn skipped() -> Self {
        Self::Complete
    }
}
