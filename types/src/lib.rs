//! Core domain types for Ora.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application: the timing
//! controllers in `ora-core`, the page shell in `ora-engine` and the renderer.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

mod clamp;
mod counter;
mod handoff;
mod intro;
pub mod ui;

pub use clamp::{CountRange, InvalidCountRange, clamp_count};
pub use counter::{COUNT_DURATION, CounterPlan, CounterState, MAX_STEPS, MIN_TICK_INTERVAL};
pub use handoff::HandoffState;
pub use intro::{
    ElementPose, IntroElement, IntroPhase, IntroTimingPlan, Keyframes, Offset, TimingPlanError,
};
