//! Clamping of raw statistic values into the counter domain.
//!
//! Raw values come from configuration and may be fractional, negative or
//! not even finite. They never produce an error: they are coerced into a
//! closed integer interval instead.

use thiserror::Error;

/// Closed integer interval `[min, max]` used to bound counter targets.
///
/// `min <= max` holds by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountRange {
    min: u32,
    max: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("count range minimum ({min}) must not exceed maximum ({max})")]
pub struct InvalidCountRange {
    pub min: u32,
    pub max: u32,
}

impl CountRange {
    /// The statistic domain: `[0, 1_000_000]`.
    pub const DEFAULT: Self = Self {
        min: 0,
        max: 1_000_000,
    };

    pub const fn new(min: u32, max: u32) -> Result<Self, InvalidCountRange> {
        if min > max {
            return Err(InvalidCountRange { min, max });
        }
        Ok(Self { min, max })
    }

    #[must_use]
    pub const fn min(self) -> u32 {
        self.min
    }

    #[must_use]
    pub const fn max(self) -> u32 {
        self.max
    }

    /// Coerce `raw` into the range.
    ///
    /// Non-finite input is treated as `0`; the fractional part is discarded
    /// (truncation toward zero) before bounding.
    #[must_use]
    pub fn clamp(self, raw: f64) -> u32 {
        let value = if raw.is_finite() { raw.trunc() } else { 0.0 };

        if value <= f64::from(self.min) {
            self.min
        } else if value >= f64::from(self.max) {
            self.max
        } else {
            value as u32
        }
    }
}

impl Default for CountRange {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Clamp `raw` into [`CountRange::DEFAULT`].
#[must_use]
pub fn clamp_count(raw: f64) -> u32 {
    CountRange::DEFAULT.clamp(raw)
}
