//! Transit schedule: stops, routes with stop profiles and trip start times,
//! and walking transfers between nearby stops.
//!
//! # Timetable model
//!
//! Every trip of a route runs the same stop profile.  A trip starting at
//! `t0` arrives at position `p` at `t0 + stops[p].arrival_offset` and leaves
//! at `t0 + stops[p].departure_offset`.  Start times are sorted by `build()`,
//! so trips never overtake each other and the earliest catchable trip at any
//! position is found by binary search.
//!
//! Stops and routes are addressed by [`StopId`] and [`RouteId`] in
//! declaration order.  Route ids are also the router's scan order.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use skim_core::{Coord, RouteId, StopId, TransportMode};

use crate::{TransitError, TransitResult};

// ── R-tree stop entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct StopEntry {
    point: [f64; 2],
    id: StopId,
}

impl RTreeObject for StopEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for StopEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

fn stop_tree(coords: &[Coord]) -> RTree<StopEntry> {
    let entries = coords
        .iter()
        .enumerate()
        .map(|(i, c)| StopEntry { point: c.to_array(), id: StopId(i as u32) })
        .collect();
    RTree::bulk_load(entries)
}

// ── Route model ───────────────────────────────────────────────────────────────

/// One position of a route's stop profile.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RouteStop {
    pub stop: StopId,
    /// Seconds after trip start at which vehicles arrive here.
    pub arrival_offset: f64,
    /// Seconds after trip start at which vehicles leave here.
    pub departure_offset: f64,
    /// Distance travelled from the previous position in metres.  When any
    /// position of a route leaves it out, the whole route falls back to
    /// beeline distances between stops.
    pub distance: Option<f64>,
}

impl RouteStop {
    pub fn new(stop: StopId, arrival_offset: f64, departure_offset: f64) -> Self {
        Self { stop, arrival_offset, departure_offset, distance: None }
    }

    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = Some(distance);
        self
    }
}

/// A route of a line: a fixed stop profile operated by a set of trips.
#[derive(Clone, Debug)]
pub struct TransitRoute {
    pub line: String,
    pub mode: TransportMode,
    pub stops: Vec<RouteStop>,
    /// Trip start times in seconds since midnight, ascending.
    pub departures: Vec<f64>,
    /// Cumulative in-vehicle distance from the first position, in metres.
    pub cum_distance: Vec<f64>,
}

impl TransitRoute {
    #[inline]
    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    #[inline]
    pub fn trip_count(&self) -> usize {
        self.departures.len()
    }

    #[inline]
    pub fn departure_at(&self, trip: usize, pos: usize) -> f64 {
        self.departures[trip] + self.stops[pos].departure_offset
    }

    #[inline]
    pub fn arrival_at(&self, trip: usize, pos: usize) -> f64 {
        self.departures[trip] + self.stops[pos].arrival_offset
    }

    /// Index of the first trip leaving position `pos` at or after `ready`.
    pub fn earliest_trip(&self, pos: usize, ready: f64) -> Option<usize> {
        let offset = self.stops[pos].departure_offset;
        let trip = self.departures.partition_point(|&d| d + offset < ready);
        (trip < self.departures.len()).then_some(trip)
    }

    /// In-vehicle distance between two positions of the profile.
    #[inline]
    pub fn distance_between(&self, from: usize, to: usize) -> f64 {
        self.cum_distance[to] - self.cum_distance[from]
    }
}

/// A walking link from one stop to another.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transfer {
    pub to: StopId,
    pub walk_time: f64,
}

// ── TransitSchedule ───────────────────────────────────────────────────────────

/// Immutable, query-ready schedule.
pub struct TransitSchedule {
    stop_coord: Vec<Coord>,
    routes: Vec<TransitRoute>,
    /// Every `(route, position)` at which a stop is served, in route order.
    stop_routes: Vec<Vec<(RouteId, usize)>>,
    transfers: Vec<Vec<Transfer>>,
    rtree: RTree<StopEntry>,
}

impl TransitSchedule {
    pub fn stop_count(&self) -> usize {
        self.stop_coord.len()
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    pub fn contains_stop(&self, stop: StopId) -> bool {
        stop.index() < self.stop_coord.len()
    }

    pub fn stop_coord(&self, stop: StopId) -> Coord {
        self.stop_coord[stop.index()]
    }

    pub fn route(&self, route: RouteId) -> &TransitRoute {
        &self.routes[route.index()]
    }

    pub fn routes(&self) -> impl Iterator<Item = (RouteId, &TransitRoute)> {
        self.routes.iter().enumerate().map(|(i, r)| (RouteId(i as u32), r))
    }

    pub fn routes_serving(&self, stop: StopId) -> &[(RouteId, usize)] {
        &self.stop_routes[stop.index()]
    }

    pub fn transfers_from(&self, stop: StopId) -> &[Transfer] {
        &self.transfers[stop.index()]
    }

    /// Stops within `radius` metres of `coord` with their beeline distance,
    /// ordered by distance then id.
    pub fn stops_within(&self, coord: Coord, radius: f64) -> Vec<(StopId, f64)> {
        let mut found: Vec<(StopId, f64)> = self
            .rtree
            .locate_within_distance(coord.to_array(), radius * radius)
            .map(|e| (e.id, e.distance_2(&coord.to_array()).sqrt()))
            .collect();
        found.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        found
    }

    /// The stop closest to `coord`, `None` for a schedule without stops.
    pub fn nearest_stop(&self, coord: Coord) -> Option<(StopId, f64)> {
        let point = coord.to_array();
        self.rtree
            .nearest_neighbor(&point)
            .map(|e| (e.id, e.distance_2(&point).sqrt()))
    }
}

// ── ScheduleBuilder ───────────────────────────────────────────────────────────

/// Incrementally collects stops, routes and transfers, then produces an
/// immutable [`TransitSchedule`].
#[derive(Default)]
pub struct ScheduleBuilder {
    stops: Vec<Coord>,
    routes: Vec<TransitRoute>,
    transfers: Vec<(StopId, Transfer)>,
}

impl ScheduleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_stop(&mut self, coord: Coord) -> StopId {
        let id = StopId(self.stops.len() as u32);
        self.stops.push(coord);
        id
    }

    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    fn check_stop(&self, stop: StopId) -> TransitResult<()> {
        if stop.index() < self.stops.len() {
            Ok(())
        } else {
            Err(TransitError::UnknownStop(stop))
        }
    }

    /// Add a route operated by trips starting at `departures`.
    ///
    /// Rejects profiles with fewer than two stops, unknown stops, non-finite
    /// or negative values, and offsets that run backwards in time.
    pub fn add_route(
        &mut self,
        line: impl Into<String>,
        mode: TransportMode,
        stops: Vec<RouteStop>,
        mut departures: Vec<f64>,
    ) -> TransitResult<RouteId> {
        let line = line.into();
        let index = self.routes.len();
        let invalid = |reason: String| TransitError::InvalidRoute { line: line.clone(), index, reason };

        if stops.len() < 2 {
            return Err(invalid(format!("needs at least two stops, got {}", stops.len())));
        }
        let mut last_offset = 0.0;
        for (pos, rs) in stops.iter().enumerate() {
            self.check_stop(rs.stop)?;
            let valid = rs.arrival_offset.is_finite()
                && rs.departure_offset.is_finite()
                && rs.arrival_offset >= last_offset
                && rs.departure_offset >= rs.arrival_offset;
            if !valid {
                return Err(invalid(format!("offsets at position {pos} are not non-decreasing")));
            }
            if rs.distance.is_some_and(|d| !(d.is_finite() && d >= 0.0)) {
                return Err(invalid(format!("bad distance at position {pos}")));
            }
            last_offset = rs.departure_offset;
        }
        if let Some(d) = departures.iter().find(|d| !d.is_finite()) {
            return Err(invalid(format!("non-finite trip start {d}")));
        }
        departures.sort_by(f64::total_cmp);

        let cum_distance = self.cumulative_distance(&stops);
        let id = RouteId(index as u32);
        self.routes.push(TransitRoute { line, mode, stops, departures, cum_distance });
        Ok(id)
    }

    fn cumulative_distance(&self, stops: &[RouteStop]) -> Vec<f64> {
        let explicit = stops.iter().skip(1).all(|rs| rs.distance.is_some());
        let mut total = 0.0;
        let mut cum = Vec::with_capacity(stops.len());
        cum.push(0.0);
        for pair in stops.windows(2) {
            total += match pair[1].distance {
                Some(d) if explicit => d,
                _ => self.stops[pair[0].stop.index()].distance(self.stops[pair[1].stop.index()]),
            };
            cum.push(total);
        }
        cum
    }

    /// Add a one-way walking transfer.
    pub fn add_transfer(&mut self, from: StopId, to: StopId, walk_time: f64) -> TransitResult<()> {
        self.check_stop(from)?;
        self.check_stop(to)?;
        if !(walk_time.is_finite() && walk_time >= 0.0) {
            return Err(TransitError::InvalidParameter(format!(
                "transfer walk time {walk_time} from {from} to {to}"
            )));
        }
        self.transfers.push((from, Transfer { to, walk_time }));
        Ok(())
    }

    /// Add walking transfers in both directions between every pair of
    /// distinct stops at most `max_distance` apart.  Walk time is
    /// `beeline × beeline_factor / walk_speed`.  Returns the number added.
    ///
    /// `walk_speed` and `beeline_factor` must be finite and positive,
    /// `max_distance` finite and not negative.
    pub fn generate_transfers(
        &mut self,
        max_distance: f64,
        walk_speed: f64,
        beeline_factor: f64,
    ) -> TransitResult<usize> {
        for (name, v) in [("walk_speed", walk_speed), ("beeline_factor", beeline_factor)] {
            if !(v.is_finite() && v > 0.0) {
                return Err(TransitError::InvalidParameter(format!("{name} must be positive, got {v}")));
            }
        }
        if !(max_distance.is_finite() && max_distance >= 0.0) {
            return Err(TransitError::InvalidParameter(format!(
                "transfer distance must not be negative, got {max_distance}"
            )));
        }
        let tree = stop_tree(&self.stops);
        let before = self.transfers.len();
        for (i, &coord) in self.stops.iter().enumerate() {
            let from = StopId(i as u32);
            let mut near: Vec<&StopEntry> = tree
                .locate_within_distance(coord.to_array(), max_distance * max_distance)
                .filter(|e| e.id != from)
                .collect();
            near.sort_by_key(|e| e.id);
            for e in near {
                let beeline = e.distance_2(&coord.to_array()).sqrt();
                let walk_time = beeline * beeline_factor / walk_speed;
                self.transfers.push((from, Transfer { to: e.id, walk_time }));
            }
        }
        let added = self.transfers.len() - before;
        log::debug!("generated {added} walking transfers within {max_distance} m");
        Ok(added)
    }

    pub fn build(self) -> TransitSchedule {
        let n = self.stops.len();
        let mut stop_routes = vec![Vec::new(); n];
        for (r, route) in self.routes.iter().enumerate() {
            for (pos, rs) in route.stops.iter().enumerate() {
                stop_routes[rs.stop.index()].push((RouteId(r as u32), pos));
            }
        }
        let mut transfers = vec![Vec::new(); n];
        for (from, t) in self.transfers {
            transfers[from.index()].push(t);
        }
        let rtree = stop_tree(&self.stops);
        TransitSchedule { stop_coord: self.stops, routes: self.routes, stop_routes, transfers, rtree }
    }
}
