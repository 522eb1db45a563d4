//! Zones and their sampling points.
//!
//! Every skim is an average over the sampling points of the origin and the
//! destination zone.  [`Zones`] is the validated, index-addressed form the
//! drivers work on: zone `i` is row `i` and column `i` of every matrix.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::hash::Hash;

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use skim_core::Coord;

/// Bounds every zone identifier satisfies.
pub trait ZoneId: Clone + Eq + Hash + Ord + Debug + Send + Sync {}

impl<T: Clone + Eq + Hash + Ord + Debug + Send + Sync> ZoneId for T {}

/// Zones with at least one usable sampling point, in id order.
#[derive(Clone, Debug)]
pub struct Zones<Z> {
    ids: Vec<Z>,
    points: Vec<Vec<Coord>>,
    centroids: Vec<Coord>,
    dropped: usize,
}

impl<Z: ZoneId> Zones<Z> {
    /// Keep the finite coordinates of every zone.  Zones left with none are
    /// dropped and counted; they appear in no matrix.
    pub fn new(coords: BTreeMap<Z, Vec<Coord>>) -> Self {
        let mut zones = Zones { ids: Vec::new(), points: Vec::new(), centroids: Vec::new(), dropped: 0 };
        for (id, pts) in coords {
            let pts: Vec<Coord> = pts.into_iter().filter(|c| c.is_finite()).collect();
            if pts.is_empty() {
                log::debug!("zone {id:?} has no usable coordinate");
                zones.dropped += 1;
                continue;
            }
            let n = pts.len() as f64;
            let centroid = Coord::new(
                pts.iter().map(|c| c.x).sum::<f64>() / n,
                pts.iter().map(|c| c.y).sum::<f64>() / n,
            );
            zones.ids.push(id);
            zones.points.push(pts);
            zones.centroids.push(centroid);
        }
        if zones.dropped > 0 {
            log::warn!("{} zones without a usable coordinate were dropped", zones.dropped);
        }
        zones
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[Z] {
        &self.ids
    }

    pub fn points(&self, zone: usize) -> &[Coord] {
        &self.points[zone]
    }

    pub fn centroid(&self, zone: usize) -> Coord {
        self.centroids[zone]
    }

    /// Zones dropped for lack of a usable coordinate.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn point_count(&self) -> usize {
        self.points.iter().map(Vec::len).sum()
    }

    /// `false` when the centroids of `a` and `b` lie beyond `radius`.
    #[inline]
    pub fn within(&self, a: usize, b: usize, radius: Option<f64>) -> bool {
        radius.is_none_or(|r| self.centroids[a].distance(self.centroids[b]) <= r)
    }
}

// ── Sampling-point selection ──────────────────────────────────────────────────

/// A candidate location, e.g. a facility or network node, with its weight.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WeightedCoord {
    pub coord: Coord,
    pub weight: f64,
}

/// Draw `points_per_zone` sampling points for every zone `locate` assigns at
/// least one location to.
///
/// Points are drawn with replacement, proportionally to weight; a zone whose
/// weights are all zero or unusable draws uniformly.  Locations `locate`
/// cannot place are counted and logged.  The same `seed` always gives the
/// same points.
pub fn select_sampling_points<Z, F>(
    locations: &[WeightedCoord],
    points_per_zone: usize,
    seed: u64,
    locate: F,
) -> BTreeMap<Z, Vec<Coord>>
where
    Z: ZoneId,
    F: Fn(Coord) -> Option<Z>,
{
    let mut per_zone: BTreeMap<Z, Vec<WeightedCoord>> = BTreeMap::new();
    let mut unassigned = 0usize;
    for loc in locations {
        match locate(loc.coord) {
            Some(zone) => per_zone.entry(zone).or_default().push(*loc),
            None => unassigned += 1,
        }
    }
    if unassigned > 0 {
        log::warn!("{unassigned} of {} locations could not be assigned to a zone", locations.len());
    }

    let mut rng = SmallRng::seed_from_u64(seed);
    per_zone
        .into_iter()
        .map(|(zone, candidates)| {
            let weights = candidates.iter().map(|c| if c.weight.is_finite() { c.weight.max(0.0) } else { 0.0 });
            let picks: Vec<Coord> = match WeightedIndex::new(weights) {
                Ok(dist) => (0..points_per_zone).map(|_| candidates[dist.sample(&mut rng)].coord).collect(),
                Err(_) => (0..points_per_zone)
                    .map(|_| candidates[rng.gen_range(0..candidates.len())].coord)
                    .collect(),
            };
            (zone, picks)
        })
        .collect()
}
