//! `skim-calc` — parallel assembly of zone-to-zone skim matrices.
//!
//! # Crate layout
//!
//! | Module            | Contents                                                   |
//! |-------------------|------------------------------------------------------------|
//! | [`calculator`]    | `SkimCalculator`, the entry point                          |
//! | [`config`]        | `SkimConfig` and its validation                            |
//! | [`zones`]         | `Zones`, `ZoneId`, weighted sampling-point selection       |
//! | [`network_skims`] | `NetworkIndicators`: road travel time and distance         |
//! | [`pt_skims`]      | `PtIndicators`: the nine public-transport matrices         |
//! | [`error`]         | `SkimError`, `SkimResult<T>`                               |
//!
//! # Execution model
//!
//! Origin zones are split into one contiguous row range per worker before
//! any search starts.  Workers keep their search state private and write
//! straight into their own rows of every output matrix.  A run either
//! completes for all zones or fails as a whole on the first engine fault.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                             |
//! |---------|----------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `SkimConfig`. |

mod beeline;
mod parallel;

pub mod calculator;
pub mod config;
pub mod error;
pub mod network_skims;
pub mod pt_skims;
pub mod zones;


pub use calculator::SkimCalculator;
pub use config::SkimConfig;
pub use error::{SkimError, SkimResult};
pub use network_skims::NetworkIndicators;
pub use pt_skims::PtIndicators;
pub use zones::{WeightedCoord, ZoneId, Zones, select_sampling_points};
