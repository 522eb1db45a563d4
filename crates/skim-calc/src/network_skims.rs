//! Road-network skims: travel time and distance.
//!
//! Every sampling point is snapped to its nearest network node.  Each origin
//! point grows one shortest-path tree per departure time; a cell is the mean
//! over all reached pairs of origin and destination points.

use rayon::ThreadPool;

use skim_core::{NodeId, format_time};
use skim_matrix::FloatMatrix;
use skim_network::{LabelSettingSearch, Network, SearchBound, TravelDisutility, TravelTime};

use crate::parallel::for_each_row;
use crate::zones::{ZoneId, Zones};
use crate::{SkimConfig, SkimError, SkimResult};

/// Travel time (seconds) and distance (metres) per zone pair.
///
/// Unreachable pairs hold `+inf`.  Pairs skipped by the beeline radius, or
/// lying entirely beyond the search cost bound, are never computed.
#[derive(Clone, Debug)]
pub struct NetworkIndicators<Z> {
    pub travel_time: FloatMatrix<Z>,
    pub distance: FloatMatrix<Z>,
}

impl<Z: ZoneId> NetworkIndicators<Z> {
    pub fn new(ids: &[Z]) -> SkimResult<Self> {
        Ok(Self {
            travel_time: FloatMatrix::square(ids.to_vec())?,
            distance: FloatMatrix::square(ids.to_vec())?,
        })
    }

    pub fn combine(&mut self, other: &Self) -> SkimResult<()> {
        self.travel_time.combine(&other.travel_time)?;
        self.distance.combine(&other.distance)?;
        Ok(())
    }

    pub fn multiply(&mut self, factor: f32) {
        self.travel_time.multiply(factor);
        self.distance.multiply(factor);
    }
}

/// Average the skims over every configured departure time.
///
/// With time-invariant link functions all slices are equal, so only the
/// first is computed.
pub(crate) fn calc_network_skims<Z, TT, TD>(
    zones: &Zones<Z>,
    network: &Network,
    travel_time: &TT,
    disutility: &TD,
    config: &SkimConfig,
    pool: &ThreadPool,
) -> SkimResult<NetworkIndicators<Z>>
where
    Z: ZoneId,
    TT: TravelTime + ?Sized,
    TD: TravelDisutility + ?Sized,
{
    let times = &config.departure_times;
    let Some(&first) = times.first() else {
        return Err(SkimError::Config("no departure times given".into()));
    };
    let snapped = snap_zones(zones, network);

    if travel_time.is_time_invariant() && disutility.is_time_invariant() {
        if times.len() > 1 {
            log::info!("link costs are time-invariant; one slice stands for {} departure times", times.len());
        }
        return calc_slice(zones, &snapped, network, travel_time, disutility, first, config, pool);
    }

    let mut total = NetworkIndicators::new(zones.ids())?;
    for &time in times {
        let slice = calc_slice(zones, &snapped, network, travel_time, disutility, time, config, pool)?;
        total.combine(&slice)?;
    }
    total.multiply(1.0 / times.len() as f32);
    Ok(total)
}

fn snap_zones<Z: ZoneId>(zones: &Zones<Z>, network: &Network) -> Vec<Vec<NodeId>> {
    let snapped: Vec<Vec<NodeId>> = (0..zones.len())
        .map(|z| zones.points(z).iter().filter_map(|&c| network.nearest_node(c)).collect())
        .collect();
    let unsnapped = snapped.iter().filter(|nodes| nodes.is_empty()).count();
    if unsnapped > 0 {
        log::warn!("{unsnapped} zones could not be snapped to the network and stay unreachable");
    }
    snapped
}

#[allow(clippy::too_many_arguments)]
fn calc_slice<Z, TT, TD>(
    zones: &Zones<Z>,
    snapped: &[Vec<NodeId>],
    network: &Network,
    travel_time: &TT,
    disutility: &TD,
    departure_time: f64,
    config: &SkimConfig,
    pool: &ThreadPool,
) -> SkimResult<NetworkIndicators<Z>>
where
    Z: ZoneId,
    TT: TravelTime + ?Sized,
    TD: TravelDisutility + ?Sized,
{
    const TIME: usize = 0;
    const DISTANCE: usize = 1;

    log::info!("calc network matrices for {}", format_time(departure_time));
    let bound = config.max_search_cost.map_or(SearchBound::UNBOUNDED, SearchBound::max_cost);
    let search = LabelSettingSearch::new(network, travel_time, disutility);

    let mut out = NetworkIndicators::new(zones.ids())?;
    for_each_row(pool, vec![&mut out.travel_time, &mut out.distance], |row, blocks| {
        let trees = snapped[row]
            .iter()
            .map(|&node| search.one_to_all(node, departure_time, bound))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| SkimError::Network { zone: format!("{:?}", zones.ids()[row]), source })?;

        for col in 0..zones.len() {
            if !zones.within(row, col, config.max_beeline_distance) {
                continue;
            }
            let (mut time, mut distance, mut pairs) = (0.0, 0.0, 0u32);
            for tree in &trees {
                for &node in &snapped[col] {
                    if let (Some(t), Some(d)) = (tree.travel_time(node), tree.distance(node)) {
                        time += t;
                        distance += d;
                        pairs += 1;
                    }
                }
            }
            if pairs > 0 {
                blocks[TIME].set(row, col, (time / f64::from(pairs)) as f32);
                blocks[DISTANCE].set(row, col, (distance / f64::from(pairs)) as f32);
            } else if config.max_search_cost.is_none() {
                blocks[TIME].set(row, col, f32::INFINITY);
                blocks[DISTANCE].set(row, col, f32::INFINITY);
            }
        }
        Ok(())
    })?;
    Ok(out)
}
