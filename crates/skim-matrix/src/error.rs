//! Error types for skim-matrix.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MatrixError {
    #[error("duplicate {axis} id at position {index}")]
    DuplicateId { axis: &'static str, index: usize },

    #[error("unknown {axis} id")]
    UnknownId { axis: &'static str },

    #[error("NaN cannot be stored; it marks never-computed cells")]
    NotANumber,
}

/// Alias for `Result<T, MatrixError>`.
pub type MatrixResult<T> = Result<T, MatrixError>;
