//! `skim-matrix` — dense associative float matrix for skim indicators.
//!
//! | Module        | Contents                                               |
//! |---------------|--------------------------------------------------------|
//! | [`matrix`]    | `FloatMatrix<T>`, `RowBlock`, `partition_rows`         |
//! | [`error`]     | `MatrixError`, `MatrixResult<T>`                       |
//!
//! # Cell states
//!
//! Every cell is either *computed* (holding any non-NaN `f32`, including
//! `0.0` and `+inf` for "unreachable") or *never computed*.  [`FloatMatrix::get`]
//! reads never-computed cells as `0.0`; [`FloatMatrix::try_get`] tells the
//! two apart.

pub mod error;
pub mod matrix;


pub use error::{MatrixError, MatrixResult};
pub use matrix::{FloatMatrix, RowBlock, partition_rows};
