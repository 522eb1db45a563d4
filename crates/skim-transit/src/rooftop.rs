//! Rooftop analysis of the connections between one origin and destination.
//!
//! A traveller who wants to leave at time `t` within the window takes the
//! connection whose departure is nearest to `t`.  Each connection therefore
//! serves a segment of the window bounded by the midpoints to its
//! neighbours.  Segment lengths become the weights of every averaged
//! indicator, and the gap `|t - departure|` integrated over the window is
//! the adaption time.

use skim_core::TimeWindow;

/// One door-to-door connection.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OdConnection {
    /// Leaving the origin, in seconds since midnight.
    pub departure_time: f64,
    /// Door to door, access and egress included.
    pub travel_time: f64,
    pub access_time: f64,
    pub egress_time: f64,
    pub transfers: u32,
    pub in_vehicle_time: f64,
    pub in_vehicle_distance: f64,
    pub train_time: f64,
    pub train_distance: f64,
}

impl OdConnection {
    #[inline]
    pub fn arrival_time(&self) -> f64 {
        self.departure_time + self.travel_time
    }

    fn train_share_by_time(&self) -> f64 {
        if self.in_vehicle_time > 0.0 { self.train_time / self.in_vehicle_time } else { 0.0 }
    }

    fn train_share_by_distance(&self) -> f64 {
        if self.in_vehicle_distance > 0.0 { self.train_distance / self.in_vehicle_distance } else { 0.0 }
    }
}

/// Drop every connection that another one dominates by leaving no earlier
/// and arriving no later.  Of exact duplicates the first is kept.  The
/// result is sorted by departure.
pub fn filter_dominated(mut connections: Vec<OdConnection>) -> Vec<OdConnection> {
    connections.sort_by(|a, b| {
        b.departure_time
            .total_cmp(&a.departure_time)
            .then(a.arrival_time().total_cmp(&b.arrival_time()))
    });
    let mut earliest_later_arrival = f64::INFINITY;
    let mut kept = Vec::with_capacity(connections.len());
    for c in connections {
        if c.arrival_time() < earliest_later_arrival {
            earliest_later_arrival = c.arrival_time();
            kept.push(c);
        }
    }
    kept.reverse();
    kept
}

/// Window-averaged indicators for one origin-destination pair.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RooftopSummary {
    /// Mean gap between desired and actual departure, in seconds.
    pub adaption_time: f64,
    /// Non-dominated connections departing in the window.
    pub frequency: f64,
    /// `frequency` divided by the window length in hours.
    pub hourly_frequency: f64,
    pub travel_time: f64,
    pub access_time: f64,
    pub egress_time: f64,
    pub transfers: f64,
    pub in_vehicle_distance: f64,
    pub train_share_by_time: f64,
    pub train_share_by_distance: f64,
}

/// Average `connections` over `window`.
///
/// `connections` must be sorted by departure and free of dominated entries,
/// as returned by [`filter_dominated`].  `None` when there are none.
pub fn rooftop(connections: &[OdConnection], window: TimeWindow) -> Option<RooftopSummary> {
    if connections.is_empty() {
        return None;
    }
    let span = window.duration_secs();
    let count = connections.len() as f64;
    let mut summary = RooftopSummary {
        frequency: count,
        hourly_frequency: count / window.duration_hours(),
        ..RooftopSummary::default()
    };

    for (i, c) in connections.iter().enumerate() {
        let d = c.departure_time;
        let lower = match i {
            0 => window.start,
            _ => ((connections[i - 1].departure_time + d) / 2.0).clamp(window.start, window.end),
        };
        let upper = match connections.get(i + 1) {
            None => window.end,
            Some(next) => ((d + next.departure_time) / 2.0).clamp(window.start, window.end),
        };
        if upper <= lower {
            continue;
        }
        let share = (upper - lower) / span;

        summary.adaption_time += (gap_integral(upper, d) - gap_integral(lower, d)) / span;
        summary.travel_time += share * c.travel_time;
        summary.access_time += share * c.access_time;
        summary.egress_time += share * c.egress_time;
        summary.transfers += share * f64::from(c.transfers);
        summary.in_vehicle_distance += share * c.in_vehicle_distance;
        summary.train_share_by_time += share * c.train_share_by_time();
        summary.train_share_by_distance += share * c.train_share_by_distance();
    }
    Some(summary)
}

/// Antiderivative of `|t - d|` in `t`.
#[inline]
fn gap_integral(t: f64, d: f64) -> f64 {
    let x = t - d;
    x * x.abs() / 2.0
}
