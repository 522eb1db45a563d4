//! Time-of-day model.
//!
//! Times are `f64` seconds after midnight of the service day.  Values past
//! 24:00:00 are legal (night services of the same service day), so hours in
//! `HH:MM:SS` strings are not capped at 23.

use std::fmt;

use crate::{CoreError, CoreResult};

/// Parse `HH:MM:SS` or `HH:MM` into seconds after midnight.
///
/// ```
/// assert_eq!(skim_core::parse_time("08:00:00").unwrap(), 28_800.0);
/// assert_eq!(skim_core::parse_time("25:30").unwrap(), 91_800.0);
/// ```
pub fn parse_time(s: &str) -> CoreResult<f64> {
    let parts: Vec<&str> = s.trim().split(':').collect();
    if !(2..=3).contains(&parts.len()) {
        return Err(CoreError::Parse(format!("expected HH:MM[:SS], got '{s}'")));
    }
    let field = |p: &str| -> CoreResult<u64> {
        p.parse::<u32>()
            .map(u64::from)
            .map_err(|_| CoreError::Parse(format!("bad time component '{p}' in '{s}'")))
    };
    let hours = field(parts[0])?;
    let minutes = field(parts[1])?;
    let seconds = if parts.len() == 3 { field(parts[2])? } else { 0 };
    if minutes >= 60 || seconds >= 60 {
        return Err(CoreError::Parse(format!("minutes/seconds out of range in '{s}'")));
    }
    // u32 hours × 3600 stays far below 2^53, so the cast is exact.
    Ok((hours * 3_600 + minutes * 60 + seconds) as f64)
}

/// Format seconds after midnight as `HH:MM:SS` (truncating sub-seconds).
///
/// Non-finite values are written as `--:--:--`.
pub fn format_time(secs: f64) -> String {
    if !secs.is_finite() {
        return "--:--:--".to_string();
    }
    let sign = if secs < 0.0 { "-" } else { "" };
    let total = secs.abs() as u64;
    format!(
        "{sign}{:02}:{:02}:{:02}",
        total / 3_600,
        (total % 3_600) / 60,
        total % 60
    )
}

// ── TimeWindow ────────────────────────────────────────────────────────────────

/// A closed departure-time window `[start, end]` with `start < end`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeWindow {
    pub start: f64,
    pub end: f64,
}

impl TimeWindow {
    /// Validate and construct a window.  Both bounds must be finite and the
    /// window must have positive length.
    pub fn new(start: f64, end: f64) -> CoreResult<Self> {
        let window = Self { start, end };
        window.validate()?;
        Ok(window)
    }

    /// Re-check the invariants, e.g. after deserialising.
    pub fn validate(&self) -> CoreResult<()> {
        if self.start.is_finite() && self.end.is_finite() && self.start < self.end {
            Ok(())
        } else {
            Err(CoreError::InvalidTimeWindow { start: self.start, end: self.end })
        }
    }

    #[inline]
    pub fn duration_secs(&self) -> f64 {
        self.end - self.start
    }

    #[inline]
    pub fn duration_hours(&self) -> f64 {
        self.duration_secs() / 3_600.0
    }

    #[inline]
    pub fn contains(&self, t: f64) -> bool {
        t >= self.start && t <= self.end
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", format_time(self.start), format_time(self.end))
    }
}
