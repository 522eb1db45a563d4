//! Public-transport skims.
//!
//! For every origin sampling point the router runs once per catchable
//! departure in the window.  Per destination sampling point the trees yield
//! one door-to-door connection each; dominated connections are dropped and
//! the rest are averaged over the window by the rooftop analysis.  A cell is
//! the mean over all origin and destination point pairs with at least one
//! connection.

use rayon::ThreadPool;

use skim_core::TimeWindow;
use skim_matrix::FloatMatrix;
use skim_transit::{
    AccessStop, OdConnection, Raptor, RaptorTree, RooftopSummary, StopArrival, filter_dominated, rooftop,
};

use crate::parallel::for_each_row;
use crate::zones::{ZoneId, Zones};
use crate::{SkimConfig, SkimResult};

/// The public-transport indicator matrices.
///
/// Pairs without any connection hold `+inf` in every time, distance and
/// transfer matrix and `0` in the frequency and train-share matrices.
#[derive(Clone, Debug)]
pub struct PtIndicators<Z> {
    /// Mean gap between desired and actual departure (s).
    pub adaption_time: FloatMatrix<Z>,
    /// Non-dominated connections departing in the window.
    pub frequency: FloatMatrix<Z>,
    /// In-vehicle distance (m).
    pub distance: FloatMatrix<Z>,
    /// Door-to-door travel time (s).
    pub travel_time: FloatMatrix<Z>,
    pub access_time: FloatMatrix<Z>,
    pub egress_time: FloatMatrix<Z>,
    pub transfer_count: FloatMatrix<Z>,
    /// Share of in-vehicle time spent on train-like routes.
    pub train_time_share: FloatMatrix<Z>,
    /// Share of in-vehicle distance covered on train-like routes.
    pub train_distance_share: FloatMatrix<Z>,
}

impl<Z: ZoneId> PtIndicators<Z> {
    pub fn new(ids: &[Z]) -> SkimResult<Self> {
        let m = || FloatMatrix::square(ids.to_vec());
        Ok(Self {
            adaption_time: m()?,
            frequency: m()?,
            distance: m()?,
            travel_time: m()?,
            access_time: m()?,
            egress_time: m()?,
            transfer_count: m()?,
            train_time_share: m()?,
            train_distance_share: m()?,
        })
    }

    /// All matrices in the order of [`summary_values`].
    fn matrices_mut(&mut self) -> Vec<&mut FloatMatrix<Z>> {
        vec![
            &mut self.adaption_time,
            &mut self.frequency,
            &mut self.distance,
            &mut self.travel_time,
            &mut self.access_time,
            &mut self.egress_time,
            &mut self.transfer_count,
            &mut self.train_time_share,
            &mut self.train_distance_share,
        ]
    }
}

fn summary_values(s: &RooftopSummary) -> [f64; 9] {
    [
        s.adaption_time,
        s.frequency,
        s.in_vehicle_distance,
        s.travel_time,
        s.access_time,
        s.egress_time,
        s.transfers,
        s.train_share_by_time,
        s.train_share_by_distance,
    ]
}

const UNREACHABLE: [f32; 9] = [
    f32::INFINITY,
    0.0,
    f32::INFINITY,
    f32::INFINITY,
    f32::INFINITY,
    f32::INFINITY,
    f32::INFINITY,
    0.0,
    0.0,
];

pub(crate) fn calc_pt_skims<Z: ZoneId>(
    zones: &Zones<Z>,
    raptor: &Raptor<'_>,
    config: &SkimConfig,
    pool: &ThreadPool,
) -> SkimResult<PtIndicators<Z>> {
    let window = config.pt_window;
    log::info!("calc PT matrices for {window}");

    let stops: Vec<Vec<Vec<AccessStop>>> = (0..zones.len())
        .map(|z| zones.points(z).iter().map(|&c| raptor.access_stops(c)).collect())
        .collect();

    let mut out = PtIndicators::new(zones.ids())?;
    for_each_row(pool, out.matrices_mut(), |row, blocks| {
        let trees: Vec<Vec<RaptorTree>> =
            stops[row].iter().map(|access| raptor.calc_trees(access, window)).collect();

        for col in 0..zones.len() {
            if !zones.within(row, col, config.max_beeline_distance) {
                continue;
            }
            let mut sum = [0.0f64; 9];
            let mut pairs = 0u32;
            for point_trees in &trees {
                for egress in &stops[col] {
                    if let Some(s) = summarize(point_trees, egress, window) {
                        for (acc, v) in sum.iter_mut().zip(summary_values(&s)) {
                            *acc += v;
                        }
                        pairs += 1;
                    }
                }
            }
            for (k, block) in blocks.iter_mut().enumerate() {
                let value = if pairs > 0 { (sum[k] / f64::from(pairs)) as f32 } else { UNREACHABLE[k] };
                block.set(row, col, value);
            }
        }
        Ok(())
    })?;
    Ok(out)
}

/// Rooftop summary of the connections the trees offer towards one
/// destination point.
fn summarize(trees: &[RaptorTree], egress: &[AccessStop], window: TimeWindow) -> Option<RooftopSummary> {
    let connections: Vec<OdConnection> = trees.iter().filter_map(|tree| connection(tree, egress)).collect();
    rooftop(&filter_dominated(connections), window)
}

/// Earliest door-to-door arrival over all egress stops.  Stops reached on
/// foot only do not count as a transit connection.
fn connection(tree: &RaptorTree, egress: &[AccessStop]) -> Option<OdConnection> {
    let mut best: Option<(f64, StopArrival, f64)> = None;
    for e in egress {
        let Some(a) = tree.arrival(e.stop).filter(|a| a.legs > 0) else {
            continue;
        };
        let arrival = a.arrival_time + e.walk_time;
        if best.is_none_or(|(b, _, _)| arrival < b) {
            best = Some((arrival, *a, e.walk_time));
        }
    }
    let (arrival, a, egress_time) = best?;
    Some(OdConnection {
        departure_time: tree.departure_time,
        travel_time: arrival - tree.departure_time,
        access_time: a.access_time,
        egress_time,
        transfers: a.transfers(),
        in_vehicle_time: a.in_vehicle_time,
        in_vehicle_distance: a.in_vehicle_distance,
        train_time: a.train_time,
        train_distance: a.train_distance,
    })
}
