//! `SkimCalculator` — the entry point of a skim run.

use std::collections::BTreeMap;

use rayon::ThreadPool;

use skim_core::Coord;
use skim_matrix::FloatMatrix;
use skim_network::{Network, TravelDisutility, TravelTime};
use skim_transit::{Raptor, TransitRoute, TransitSchedule};

use crate::beeline::calc_beeline_matrix;
use crate::network_skims::{NetworkIndicators, calc_network_skims};
use crate::parallel::build_pool;
use crate::pt_skims::{PtIndicators, calc_pt_skims};
use crate::zones::{ZoneId, Zones};
use crate::{SkimConfig, SkimError, SkimResult};

/// Computes skim matrices for a fixed set of zones.
///
/// Construction validates the configuration, drops zones without a usable
/// coordinate and starts the worker pool, so every configuration fault
/// surfaces here rather than inside a worker.  All matrices of one
/// calculator share the same zone id order.
pub struct SkimCalculator<Z> {
    config: SkimConfig,
    zones: Zones<Z>,
    pool: ThreadPool,
}

impl<Z: ZoneId> SkimCalculator<Z> {
    pub fn new(config: SkimConfig, coords_per_zone: BTreeMap<Z, Vec<Coord>>) -> SkimResult<Self> {
        config.validate()?;
        let zones = Zones::new(coords_per_zone);
        if zones.is_empty() {
            return Err(SkimError::Config("no zone has a usable coordinate".into()));
        }
        log::info!(
            "{} zones with {} sampling points, {} worker threads",
            zones.len(),
            zones.point_count(),
            config.num_threads
        );
        let pool = build_pool(&config)?;
        Ok(Self { config, zones, pool })
    }

    pub fn config(&self) -> &SkimConfig {
        &self.config
    }

    pub fn zones(&self) -> &Zones<Z> {
        &self.zones
    }

    pub fn calc_beeline_matrix(&self) -> SkimResult<FloatMatrix<Z>> {
        calc_beeline_matrix(&self.zones, &self.pool)
    }

    /// Road travel time and distance, averaged over the configured
    /// departure times.
    pub fn calc_network_matrices<TT, TD>(
        &self,
        network: &Network,
        travel_time: &TT,
        disutility: &TD,
    ) -> SkimResult<NetworkIndicators<Z>>
    where
        TT: TravelTime + ?Sized,
        TD: TravelDisutility + ?Sized,
    {
        calc_network_skims(&self.zones, network, travel_time, disutility, &self.config, &self.pool)
    }

    /// Public-transport indicators, counting routes of the configured
    /// `train_modes` as train.
    pub fn calc_pt_matrices(&self, schedule: &TransitSchedule) -> SkimResult<PtIndicators<Z>> {
        self.calc_pt_matrices_with(schedule, |route| self.config.is_train_mode(route.mode))
    }

    /// Public-transport indicators with a caller-supplied train predicate.
    pub fn calc_pt_matrices_with(
        &self,
        schedule: &TransitSchedule,
        is_train: impl Fn(&TransitRoute) -> bool,
    ) -> SkimResult<PtIndicators<Z>> {
        let raptor = Raptor::new(schedule, self.config.raptor.clone(), is_train)?;
        calc_pt_skims(&self.zones, &raptor, &self.config, &self.pool)
    }
}
