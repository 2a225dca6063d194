//! UI state types for the rendering layer.
//!
//! Pure data types with no IO, no async, no ratatui dependency.
//! Used by both the engine (state ownership) and tui (rendering/input).

mod animation;
mod options;
mod reveal;

pub use animation::{AnimPhase, EffectTimer, ease_out_cubic};
pub use options::UiOptions;
pub use reveal::{RevealEffect, RevealEffectKind};

pub(crate) use animation::normalized_progress;
