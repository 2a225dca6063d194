//! Rendering options derived from config and environment.

/// UI configuration options derived from config/environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiOptions {
    pub ascii_only: bool,
    pub high_contrast: bool,
    /// Skip the intro overlay and content reveal.
    pub reduced_motion: bool,
}
