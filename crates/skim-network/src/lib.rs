//! `skim-network` — road network, link cost functions and label-setting search.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                       |
//! |-----------------|----------------------------------------------------------------|
//! | [`network`]     | `Network` (link arena + CSR in/out adjacency + R-tree), `NetworkBuilder` |
//! | [`travel_time`] | `TravelTime` trait, `FreeSpeedTravelTime`, `TimeBinnedTravelTime` |
//! | [`disutility`]  | `TravelDisutility` trait, time-only and time+distance costs     |
//! | [`search`]      | `LabelSettingSearch`, `SearchTree`, `SearchLabel`, `Path`       |
//! | [`error`]       | `NetworkError`, `NetworkResult<T>`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public config types.    |

pub mod disutility;
pub mod error;
pub mod network;
pub mod search;
pub mod travel_time;


pub use disutility::{OnlyTimeDependentDisutility, TimeDistanceDisutility, TravelDisutility};
pub use error::{CostKind, NetworkError, NetworkResult};
pub use network::{LinkSpec, Network, NetworkBuilder};
pub use search::{LabelSettingSearch, Path, SearchBound, SearchDirection, SearchLabel, SearchTree};
pub use travel_time::{FreeSpeedTravelTime, TimeBinnedTravelTime, TravelTime};
