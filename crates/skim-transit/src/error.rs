//! Transit-subsystem error type.

use thiserror::Error;

use skim_core::StopId;

#[derive(Debug, Error)]
pub enum TransitError {
    #[error("route {index} of line '{line}' is invalid: {reason}")]
    InvalidRoute { line: String, index: usize, reason: String },

    #[error("{0} is not part of the schedule")]
    UnknownStop(StopId),

    #[error("invalid router parameter: {0}")]
    InvalidParameter(String),
}

pub type TransitResult<T> = Result<T, TransitError>;
