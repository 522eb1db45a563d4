//! `skim-transit` — transit schedule, RAPTOR router and rooftop analysis.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                         |
//! |--------------|------------------------------------------------------------------|
//! | [`schedule`] | `TransitSchedule`, `ScheduleBuilder`, `TransitRoute`, `RouteStop` |
//! | [`raptor`]   | `Raptor`, `RaptorParameters`, `RaptorTree`, `StopArrival`        |
//! | [`rooftop`]  | `OdConnection`, `filter_dominated`, `rooftop`, `RooftopSummary`  |
//! | [`error`]    | `TransitError`, `TransitResult<T>`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                             |
//! |---------|----------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `RaptorParameters`. |

pub mod error;
pub mod raptor;
pub mod rooftop;
pub mod schedule;

#[cfg(test)]
mod tests;

pub use error::{TransitError, TransitResult};
pub use raptor::{AccessStop, Raptor, RaptorParameters, RaptorTree, StopArrival};
pub use rooftop::{OdConnection, RooftopSummary, filter_dominated, rooftop};
pub use schedule::{RouteStop, ScheduleBuilder, Transfer, TransitRoute, TransitSchedule};
