//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant where they parse core values (times, modes).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid time window [{start}, {end}]")]
    InvalidTimeWindow { start: f64, end: f64 },
}

/// Shorthand result type for `skim-core`.
pub type CoreResult<T> = Result<T, CoreError>;
