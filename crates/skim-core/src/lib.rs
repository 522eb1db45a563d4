//! `skim-core` — foundational types for the skim matrix workspace.
//!
//! This crate is a dependency of every other `skim-*` crate.  It has no
//! `skim-*` dependencies and only `thiserror` (plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `NodeId`, `LinkId`, `StopId`, `RouteId`               |
//! | [`geo`]         | `Coord`, Euclidean distance                           |
//! | [`time`]        | `parse_time`, `format_time`, `TimeWindow`             |
//! | [`mode`]        | `TransportMode` enum, `ModeSet` bitset                |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod mode;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::Coord;
pub use ids::{LinkId, NodeId, RouteId, StopId};
pub use mode::{ModeSet, TransportMode};
pub use time::{TimeWindow, format_time, parse_time};
