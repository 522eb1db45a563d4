//! Round-based public-transit router (RAPTOR).
//!
//! # Rounds
//!
//! Round 0 seeds every access stop with `departure + walk time`.  Round `k`
//! (`k ≥ 1`) scans every route serving a stop improved in round `k - 1`,
//! starting at the earliest such position, and rides the earliest catchable
//! trip.  Alighting labels replace the stop's best label only on a strict
//! arrival improvement.  Walking transfers are then relaxed once from the
//! stops improved in this round; they do not chain.  The search stops after
//! `max_transfers + 1` rounds or when a round improves nothing.
//!
//! Routes within a round are scanned in ascending [`RouteId`] order, so
//! identical inputs always produce identical trees.
//!
//! # Labels
//!
//! A [`StopArrival`] carries, next to the arrival time, every quantity the
//! skim driver aggregates: vehicle legs, access walk, in-vehicle time and
//! distance, and the part of both spent on train-like routes.

use std::collections::BTreeMap;

use skim_core::{Coord, RouteId, StopId, TimeWindow};

use crate::{TransitError, TransitResult, TransitRoute, TransitSchedule};

// ── Parameters ────────────────────────────────────────────────────────────────

/// Router parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RaptorParameters {
    /// Maximum number of vehicle changes; the search runs at most
    /// `max_transfers + 1` boarding rounds.
    pub max_transfers: u32,
    /// Longest wait in seconds accepted when changing vehicles.
    pub max_transfer_wait: f64,
    /// Walking speed in metres per second.
    pub walk_speed: f64,
    /// Detour factor applied to beeline walking distances.
    pub beeline_walk_factor: f64,
    /// Radius in metres searched for access and egress stops.
    pub search_radius: f64,
}

impl Default for RaptorParameters {
    fn default() -> Self {
        Self {
            max_transfers: 6,
            max_transfer_wait: 3_600.0,
            walk_speed: 1.1,
            beeline_walk_factor: 1.3,
            search_radius: 1_000.0,
        }
    }
}

impl RaptorParameters {
    pub fn validate(&self) -> TransitResult<()> {
        let positive = |name: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(TransitError::InvalidParameter(format!("{name} must be positive, got {v}")))
            }
        };
        positive("walk_speed", self.walk_speed)?;
        positive("beeline_walk_factor", self.beeline_walk_factor)?;
        positive("search_radius", self.search_radius)?;
        if self.max_transfer_wait.is_nan() || self.max_transfer_wait < 0.0 {
            return Err(TransitError::InvalidParameter(format!(
                "max_transfer_wait must not be negative, got {}",
                self.max_transfer_wait
            )));
        }
        Ok(())
    }

    /// Walking time for a beeline distance in metres.
    #[inline]
    pub fn walk_time(&self, beeline: f64) -> f64 {
        beeline * self.beeline_walk_factor / self.walk_speed
    }
}

// ── Labels ────────────────────────────────────────────────────────────────────

/// A stop reachable by walking from a location.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AccessStop {
    pub stop: StopId,
    pub walk_time: f64,
}

/// Best known way of reaching a stop.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StopArrival {
    pub arrival_time: f64,
    /// Vehicle legs ridden; `0` for stops reached on foot only.
    pub legs: u32,
    /// Walk from the origin to the first stop.
    pub access_time: f64,
    pub in_vehicle_time: f64,
    pub in_vehicle_distance: f64,
    /// In-vehicle time on train-like routes.
    pub train_time: f64,
    /// In-vehicle distance on train-like routes.
    pub train_distance: f64,
}

impl StopArrival {
    pub const UNREACHED: StopArrival = StopArrival {
        arrival_time: f64::INFINITY,
        legs: 0,
        access_time: 0.0,
        in_vehicle_time: 0.0,
        in_vehicle_distance: 0.0,
        train_time: 0.0,
        train_distance: 0.0,
    };

    #[inline]
    pub fn is_reached(&self) -> bool {
        self.arrival_time.is_finite()
    }

    /// Vehicle changes, one fewer than the legs ridden.
    #[inline]
    pub fn transfers(&self) -> u32 {
        self.legs.saturating_sub(1)
    }
}

/// Result of one router run from a fixed departure time.
#[derive(Clone, Debug)]
pub struct RaptorTree {
    pub departure_time: f64,
    arrivals: Vec<StopArrival>,
    rounds: u32,
}

impl RaptorTree {
    pub fn arrival(&self, stop: StopId) -> Option<&StopArrival> {
        self.arrivals.get(stop.index()).filter(|a| a.is_reached())
    }

    /// Reached stops in id order.
    pub fn reached(&self) -> impl Iterator<Item = (StopId, &StopArrival)> {
        self.arrivals
            .iter()
            .enumerate()
            .filter(|(_, a)| a.is_reached())
            .map(|(i, a)| (StopId(i as u32), a))
    }

    /// Boarding rounds that were scanned.
    pub fn rounds(&self) -> u32 {
        self.rounds
    }
}

// ── Router ────────────────────────────────────────────────────────────────────

/// RAPTOR router over an immutable schedule.
///
/// Holds no per-query state, so one router may be shared by reference across
/// worker threads; every query allocates its own labels.
pub struct Raptor<'a> {
    schedule: &'a TransitSchedule,
    params: RaptorParameters,
    is_train: Vec<bool>,
}

struct Boarding {
    trip: usize,
    pos: usize,
    label: StopArrival,
}

impl<'a> Raptor<'a> {
    /// `is_train` classifies each route once; its verdict drives the train
    /// time and distance accumulators.
    pub fn new(
        schedule: &'a TransitSchedule,
        params: RaptorParameters,
        is_train: impl Fn(&TransitRoute) -> bool,
    ) -> TransitResult<Self> {
        params.validate()?;
        let is_train = schedule.routes().map(|(_, r)| is_train(r)).collect();
        Ok(Self { schedule, params, is_train })
    }

    pub fn schedule(&self) -> &'a TransitSchedule {
        self.schedule
    }

    pub fn params(&self) -> &RaptorParameters {
        &self.params
    }

    /// Stops within `search_radius` of `coord`, or the nearest stop when none
    /// lies that close.  Ordered by walk time then stop id.
    pub fn access_stops(&self, coord: Coord) -> Vec<AccessStop> {
        let mut near = self.schedule.stops_within(coord, self.params.search_radius);
        if near.is_empty() {
            near.extend(self.schedule.nearest_stop(coord));
        }
        near.into_iter()
            .map(|(stop, d)| AccessStop { stop, walk_time: self.params.walk_time(d) })
            .collect()
    }

    /// Earliest arrival at every stop when leaving the origin at
    /// `departure_time` through `access`.
    pub fn calc_tree(&self, access: &[AccessStop], departure_time: f64) -> RaptorTree {
        let n = self.schedule.stop_count();
        let mut best = vec![StopArrival::UNREACHED; n];
        let mut marked: Vec<StopId> = Vec::new();

        for a in access {
            let label = StopArrival {
                arrival_time: departure_time + a.walk_time,
                access_time: a.walk_time,
                ..StopArrival::UNREACHED
            };
            let slot = &mut best[a.stop.index()];
            if label.arrival_time < slot.arrival_time {
                *slot = label;
                marked.push(a.stop);
            }
        }

        let mut rounds = 0;
        let mut is_marked = vec![false; n];
        for round in 1..=self.params.max_transfers.saturating_add(1) {
            if marked.is_empty() {
                break;
            }
            rounds = round;
            let prev = best.clone();

            let mut queue: BTreeMap<RouteId, usize> = BTreeMap::new();
            for &stop in &marked {
                for &(route, pos) in self.schedule.routes_serving(stop) {
                    queue.entry(route).and_modify(|p| *p = (*p).min(pos)).or_insert(pos);
                }
            }

            is_marked.iter_mut().for_each(|m| *m = false);
            let mut improved: Vec<StopId> = Vec::new();
            for (route_id, start) in queue {
                self.scan_route(route_id, start, &prev, &mut best, &mut is_marked, &mut improved);
            }

            // Walking transfers from this round's improvements, read from a
            // snapshot so they never chain.
            improved.sort_unstable();
            let sources: Vec<(StopId, StopArrival)> =
                improved.iter().map(|&s| (s, best[s.index()])).collect();
            for (stop, label) in sources {
                for t in self.schedule.transfers_from(stop) {
                    let arrival_time = label.arrival_time + t.walk_time;
                    let slot = &mut best[t.to.index()];
                    if arrival_time < slot.arrival_time {
                        *slot = StopArrival { arrival_time, ..label };
                        if !is_marked[t.to.index()] {
                            is_marked[t.to.index()] = true;
                            improved.push(t.to);
                        }
                    }
                }
            }
            marked = improved;
        }

        RaptorTree { departure_time, arrivals: best, rounds }
    }

    fn scan_route(
        &self,
        route_id: RouteId,
        start: usize,
        prev: &[StopArrival],
        best: &mut [StopArrival],
        is_marked: &mut [bool],
        improved: &mut Vec<StopId>,
    ) {
        let route = self.schedule.route(route_id);
        let train = self.is_train[route_id.index()];
        let mut boarded: Option<Boarding> = None;

        for pos in start..route.stop_count() {
            let stop = route.stops[pos].stop;

            if let Some(b) = &boarded {
                let arrival_time = route.arrival_at(b.trip, pos);
                if arrival_time < best[stop.index()].arrival_time {
                    let ride_time = arrival_time - route.departure_at(b.trip, b.pos);
                    let ride_distance = route.distance_between(b.pos, pos);
                    let mut label = StopArrival {
                        arrival_time,
                        legs: b.label.legs + 1,
                        in_vehicle_time: b.label.in_vehicle_time + ride_time,
                        in_vehicle_distance: b.label.in_vehicle_distance + ride_distance,
                        ..b.label
                    };
                    if train {
                        label.train_time += ride_time;
                        label.train_distance += ride_distance;
                    }
                    best[stop.index()] = label;
                    if !is_marked[stop.index()] {
                        is_marked[stop.index()] = true;
                        improved.push(stop);
                    }
                }
            }

            let here = prev[stop.index()];
            if !here.is_reached() {
                continue;
            }
            let Some(trip) = route.earliest_trip(pos, here.arrival_time) else {
                continue;
            };
            if boarded.as_ref().is_some_and(|b| b.trip <= trip) {
                continue;
            }
            // The wait limit applies to changes, not to the first boarding.
            if here.legs > 0 && route.departure_at(trip, pos) - here.arrival_time > self.params.max_transfer_wait {
                continue;
            }
            boarded = Some(Boarding { trip, pos, label: here });
        }
    }

    /// Range query over `window`: one run per candidate departure, i.e. per
    /// moment at which leaving the origin exactly catches a trip at one of
    /// the access stops.  Trees come back in ascending departure order.
    pub fn calc_trees(&self, access: &[AccessStop], window: TimeWindow) -> Vec<RaptorTree> {
        let mut candidates: Vec<f64> = Vec::new();
        for a in access {
            for &(route_id, pos) in self.schedule.routes_serving(a.stop) {
                let route = self.schedule.route(route_id);
                candidates.extend(
                    (0..route.trip_count())
                        .map(|trip| route.departure_at(trip, pos) - a.walk_time)
                        .filter(|&t| window.contains(t)),
                );
            }
        }
        candidates.sort_by(f64::total_cmp);
        candidates.dedup();
        candidates.into_iter().map(|t| self.calc_tree(access, t)).collect()
    }
}
