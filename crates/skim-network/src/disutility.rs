//! Link generalized-cost (disutility) functions.
//!
//! The search engine orders its frontier by disutility and accumulates
//! travel time alongside, so the two can differ: a time+distance cost finds
//! the cheapest path and still reports that path's travel time.

use skim_core::LinkId;

use crate::network::Network;
use crate::travel_time::TravelTime;

/// Pluggable link cost function.
///
/// Same contract as [`TravelTime`]: finite, non-negative, `Send + Sync`.
pub trait TravelDisutility: Send + Sync {
    /// Generalized cost of traversing `link` when entering it at `time`.
    fn link_disutility(&self, network: &Network, link: LinkId, time: f64) -> f64;

    fn is_time_invariant(&self) -> bool {
        false
    }
}

impl<F> TravelDisutility for F
where
    F: Fn(&Network, LinkId, f64) -> f64 + Send + Sync,
{
    fn link_disutility(&self, network: &Network, link: LinkId, time: f64) -> f64 {
        self(network, link, time)
    }
}

/// Cost equals travel time.
pub struct OnlyTimeDependentDisutility<T> {
    travel_time: T,
}

impl<T: TravelTime> OnlyTimeDependentDisutility<T> {
    pub fn new(travel_time: T) -> Self {
        Self { travel_time }
    }
}

impl<T: TravelTime> TravelDisutility for OnlyTimeDependentDisutility<T> {
    #[inline]
    fn link_disutility(&self, network: &Network, link: LinkId, time: f64) -> f64 {
        self.travel_time.link_travel_time(network, link, time)
    }

    fn is_time_invariant(&self) -> bool {
        self.travel_time.is_time_invariant()
    }
}

/// `cost_of_time * travel_time + cost_of_distance * length`.
///
/// Both marginal costs are per unit (second, metre) and must be
/// non-negative for the label-setting search to stay correct.
pub struct TimeDistanceDisutility<T> {
    travel_time: T,
    pub marginal_cost_of_time: f64,
    pub marginal_cost_of_distance: f64,
}

impl<T: TravelTime> TimeDistanceDisutility<T> {
    pub fn new(travel_time: T, marginal_cost_of_time: f64, marginal_cost_of_distance: f64) -> Self {
        Self { travel_time, marginal_cost_of_time, marginal_cost_of_distance }
    }
}

impl<T: TravelTime> TravelDisutility for TimeDistanceDisutility<T> {
    #[inline]
    fn link_disutility(&self, network: &Network, link: LinkId, time: f64) -> f64 {
        self.marginal_cost_of_time * self.travel_time.link_travel_time(network, link, time)
            + self.marginal_cost_of_distance * network.link_length_m[link.index()]
    }

    fn is_time_invariant(&self) -> bool {
        self.travel_time.is_time_invariant()
    }
}
