//! Run configuration for the skim calculator.

use skim_core::{TimeWindow, TransportMode};
use skim_transit::RaptorParameters;

use crate::{SkimError, SkimResult};

/// Top-level skim configuration.
///
/// Typically loaded from a JSON file by the application and checked with
/// [`SkimConfig::validate`] before any worker starts.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SkimConfig {
    /// Road-network departure times in seconds since midnight.  Matrices
    /// are averaged over all of them.
    pub departure_times: Vec<f64>,

    /// Departure window scanned by the transit router.
    pub pt_window: TimeWindow,

    /// Worker thread count.  Must be at least 1.
    pub num_threads: usize,

    /// Zone pairs whose centroids lie further apart stay never-computed.
    /// `None` computes every pair.
    pub max_beeline_distance: Option<f64>,

    /// Road searches stop expanding beyond this generalized cost.
    pub max_search_cost: Option<f64>,

    /// Sampling points drawn per zone by `select_sampling_points`.
    pub points_per_zone: usize,

    /// Seed for sampling-point selection.
    pub seed: u64,

    pub raptor: RaptorParameters,

    /// Route modes counted as train for the train-share matrices.
    pub train_modes: Vec<TransportMode>,
}

impl Default for SkimConfig {
    fn default() -> Self {
        Self {
            departure_times: vec![8.0 * 3_600.0],
            pt_window: TimeWindow { start: 7.0 * 3_600.0, end: 8.0 * 3_600.0 },
            num_threads: std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1),
            max_beeline_distance: None,
            max_search_cost: None,
            points_per_zone: 5,
            seed: 4711,
            raptor: RaptorParameters::default(),
            train_modes: vec![TransportMode::Rail],
        }
    }
}

impl SkimConfig {
    /// Reject configurations that cannot produce a run.
    pub fn validate(&self) -> SkimResult<()> {
        if self.num_threads == 0 {
            return Err(SkimError::Config("num_threads must be at least 1".into()));
        }
        if self.departure_times.is_empty() {
            return Err(SkimError::Config("no departure times given".into()));
        }
        if let Some(t) = self.departure_times.iter().find(|t| !t.is_finite()) {
            return Err(SkimError::Config(format!("departure time {t} is not finite")));
        }
        self.pt_window.validate()?;
        if let Some(d) = self.max_beeline_distance.filter(|d| d.is_nan() || *d <= 0.0) {
            return Err(SkimError::Config(format!("max_beeline_distance must be positive, got {d}")));
        }
        if let Some(c) = self.max_search_cost.filter(|c| c.is_nan() || *c <= 0.0) {
            return Err(SkimError::Config(format!("max_search_cost must be positive, got {c}")));
        }
        self.raptor.validate()?;
        Ok(())
    }

    /// `true` if routes of `mode` count as train.
    #[inline]
    pub fn is_train_mode(&self, mode: TransportMode) -> bool {
        self.train_modes.contains(&mode)
    }
}
