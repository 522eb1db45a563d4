//! Link travel-time functions.
//!
//! # Contract
//!
//! A [`TravelTime`] maps `(link, time-of-day)` to the seconds needed to
//! traverse the link when entering it at that time.  Implementations must
//! return finite, non-negative values; the search engine treats anything
//! else as a fatal engine fault.  Any `Fn(&Network, LinkId, f64) -> f64`
//! closure is a `TravelTime` too.

use skim_core::LinkId;

use crate::network::Network;

/// Speed floor (m/s) applied to links with zero, negative or undefined
/// free speed so that free-flow times stay finite.
pub const MIN_FREESPEED: f64 = 0.1;

/// Pluggable link travel-time function.
///
/// Implementations must be `Send + Sync`: one instance is shared read-only
/// by every skim worker thread.
pub trait TravelTime: Send + Sync {
    /// Seconds to traverse `link` when entering it at `time`.
    fn link_travel_time(&self, network: &Network, link: LinkId, time: f64) -> f64;

    /// `true` if the result never depends on `time`.  The skim driver skips
    /// recomputing later departure-time slices when this holds.
    fn is_time_invariant(&self) -> bool {
        false
    }
}

impl<F> TravelTime for F
where
    F: Fn(&Network, LinkId, f64) -> f64 + Send + Sync,
{
    fn link_travel_time(&self, network: &Network, link: LinkId, time: f64) -> f64 {
        self(network, link, time)
    }
}

/// Free-flow travel time of a link, with the [`MIN_FREESPEED`] floor.
#[inline]
pub fn freespeed_travel_time(network: &Network, link: LinkId) -> f64 {
    let speed = network.link_freespeed[link.index()].max(MIN_FREESPEED);
    network.link_length_m[link.index()] / speed
}

// ── FreeSpeedTravelTime ───────────────────────────────────────────────────────

/// `length / freespeed`, independent of the time of day.
#[derive(Copy, Clone, Debug, Default)]
pub struct FreeSpeedTravelTime;

impl TravelTime for FreeSpeedTravelTime {
    #[inline]
    fn link_travel_time(&self, network: &Network, link: LinkId, _time: f64) -> f64 {
        freespeed_travel_time(network, link)
    }

    fn is_time_invariant(&self) -> bool {
        true
    }
}

// ── TimeBinnedTravelTime ──────────────────────────────────────────────────────

/// Congested travel times aggregated from observed link traversals.
///
/// Observations are averaged per link and per time bin of `bin_size`
/// seconds.  Lookups never return less than the free-flow time, and fall
/// back to it for bins without observations.  Times past the last bin use
/// the last bin.
pub struct TimeBinnedTravelTime {
    bin_size: f64,
    bin_count: usize,
    /// `[link * bin_count + bin]` → (sum of observed seconds, observation count)
    bins: Vec<(f64, u32)>,
}

impl TimeBinnedTravelTime {
    /// Empty aggregation covering `[0, max_time)` in bins of `bin_size`
    /// seconds for every link of `network`.
    ///
    /// # Panics
    /// Panics if `bin_size` is not strictly positive.
    pub fn new(network: &Network, bin_size: f64, max_time: f64) -> Self {
        assert!(bin_size > 0.0, "bin size must be positive");
        let bin_count = ((max_time / bin_size).ceil() as usize).max(1);
        Self {
            bin_size,
            bin_count,
            bins: vec![(0.0, 0); network.link_count() * bin_count],
        }
    }

    pub fn bin_count(&self) -> usize {
        self.bin_count
    }

    #[inline]
    fn bin_index(&self, time: f64) -> usize {
        let bin = (time.max(0.0) / self.bin_size) as usize;
        bin.min(self.bin_count - 1)
    }

    /// Record one traversal of `link` entered at `enter_time` that took
    /// `travel_time` seconds.  Non-finite or negative samples are ignored.
    pub fn add_observation(&mut self, link: LinkId, enter_time: f64, travel_time: f64) {
        if !travel_time.is_finite() || travel_time < 0.0 {
            return;
        }
        let slot = link.index() * self.bin_count + self.bin_index(enter_time);
        let (sum, count) = &mut self.bins[slot];
        *sum += travel_time;
        *count += 1;
    }

    /// Number of observations recorded for `link` in the bin containing `time`.
    pub fn observation_count(&self, link: LinkId, time: f64) -> u32 {
        self.bins[link.index() * self.bin_count + self.bin_index(time)].1
    }
}

impl TravelTime for TimeBinnedTravelTime {
    fn link_travel_time(&self, network: &Network, link: LinkId, time: f64) -> f64 {
        let freespeed = freespeed_travel_time(network, link);
        let (sum, count) = self.bins[link.index() * self.bin_count + self.bin_index(time)];
        if count == 0 {
            freespeed
        } else {
            (sum / count as f64).max(freespeed)
        }
    }
}
