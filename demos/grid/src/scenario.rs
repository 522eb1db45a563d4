//! Synthetic 2 km × 2 km town used by the demo.
//!
//! An 11 × 11 street grid with 200 m blocks; every fifth street is an
//! arterial.  A few footpaths cut diagonally through the centre.  Transit is
//! one east-west bus line along the middle street and one north-south rail
//! line along the middle avenue, with the rail platform 10 m off the bus stop
//! so the interchange runs over a generated walking transfer.

use skim_core::{Coord, ModeSet, NodeId, TransportMode};
use skim_network::{LinkSpec, Network, NetworkBuilder};
use skim_transit::{RouteStop, ScheduleBuilder, TransitResult, TransitSchedule};

const SIZE:      usize = 11;
const SPACING:   f64   = 200.0;
const ARTERIAL:  f64   = 50.0 / 3.6;
const LOCAL:     f64   = 30.0 / 3.6;
const WALK:      f64   = 1.4;
const ZONE_SIZE: f64   = 500.0;

pub fn build_network() -> Network {
    let mut b = NetworkBuilder::with_capacity(SIZE * SIZE, 4 * SIZE * SIZE);
    let mut nodes: Vec<NodeId> = Vec::with_capacity(SIZE * SIZE);
    for row in 0..SIZE {
        for col in 0..SIZE {
            nodes.push(b.add_node(Coord::new(col as f64 * SPACING, row as f64 * SPACING)));
        }
    }

    let street = ModeSet::from_iter([TransportMode::Car, TransportMode::Walk, TransportMode::Bike]);
    for row in 0..SIZE {
        for col in 0..SIZE {
            let here = nodes[row * SIZE + col];
            if col + 1 < SIZE {
                let speed = if row % 5 == 0 { ARTERIAL } else { LOCAL };
                b.add_road(here, nodes[row * SIZE + col + 1], LinkSpec::car(SPACING, speed).with_modes(street));
            }
            if row + 1 < SIZE {
                let speed = if col % 5 == 0 { ARTERIAL } else { LOCAL };
                b.add_road(here, nodes[(row + 1) * SIZE + col], LinkSpec::car(SPACING, speed).with_modes(street));
            }
        }
    }

    // Diagonal footpaths around the centre square.
    let footpath = LinkSpec::car(SPACING * std::f64::consts::SQRT_2, WALK).with_modes(ModeSet::single(TransportMode::Walk));
    for k in 3..7 {
        b.add_road(nodes[k * SIZE + k], nodes[(k + 1) * SIZE + k + 1], footpath);
    }

    b.build()
}

pub fn build_schedule() -> TransitResult<TransitSchedule> {
    let mut b = ScheduleBuilder::new();
    let hour = 3_600.0;

    // Bus B1 along y = 1000, a stop every 400 m, 90 s per hop with 20 s dwell.
    let bus_stops: Vec<_> = (0..6).map(|i| b.add_stop(Coord::new(i as f64 * 400.0, 1_000.0))).collect();
    let profile = |stops: &[skim_core::StopId]| -> Vec<RouteStop> {
        stops
            .iter()
            .enumerate()
            .map(|(i, &s)| {
                let arrival = i as f64 * 110.0;
                let departure = if i == 0 || i + 1 == stops.len() { arrival } else { arrival + 20.0 };
                RouteStop::new(s, arrival, departure)
            })
            .collect()
    };
    let every = |first: f64, last: f64, headway: f64| -> Vec<f64> {
        let n = ((last - first) / headway) as usize;
        (0..=n).map(|i| first + i as f64 * headway).collect()
    };

    b.add_route("B1", TransportMode::Bus, profile(&bus_stops), every(6.0 * hour, 10.0 * hour, 600.0))?;
    let reversed: Vec<_> = bus_stops.iter().rev().copied().collect();
    b.add_route("B1", TransportMode::Bus, profile(&reversed), every(6.0 * hour + 300.0, 10.0 * hour, 600.0))?;

    // Rail S1 along x = 1010, 1 km apart, with measured track lengths.
    let rail_stops: Vec<_> = [0.0, 1_000.0, 2_000.0]
        .iter()
        .map(|&y| b.add_stop(Coord::new(1_010.0, y)))
        .collect();
    let rail = |stops: &[skim_core::StopId]| -> Vec<RouteStop> {
        stops
            .iter()
            .enumerate()
            .map(|(i, &s)| {
                let t = i as f64 * 150.0;
                RouteStop::new(s, t, t + if i == 1 { 30.0 } else { 0.0 }).with_distance(if i == 0 { 0.0 } else { 1_050.0 })
            })
            .collect()
    };
    b.add_route("S1", TransportMode::Rail, rail(&rail_stops), every(6.0 * hour, 10.0 * hour, 1_200.0))?;
    let reversed: Vec<_> = rail_stops.iter().rev().copied().collect();
    b.add_route("S1", TransportMode::Rail, rail(&reversed), every(6.0 * hour + 600.0, 10.0 * hour, 1_200.0))?;

    let generated = b.generate_transfers(100.0, WALK, 1.3)?;
    log::info!("schedule: {} stops, {generated} walking transfers", b.stop_count());
    Ok(b.build())
}

/// One candidate sampling location per street corner, weighted by a
/// made-up activity density that peaks in the centre.
pub fn locations() -> Vec<skim_calc::WeightedCoord> {
    let centre = Coord::new(1_000.0, 1_000.0);
    (0..SIZE * SIZE)
        .map(|i| {
            let coord = Coord::new((i % SIZE) as f64 * SPACING, (i / SIZE) as f64 * SPACING);
            let weight = 1.0 / (1.0 + coord.distance(centre) / 500.0);
            skim_calc::WeightedCoord { coord, weight }
        })
        .collect()
}

/// Square 500 m zones `Z<row><col>`; nothing outside the town.
pub fn locate(coord: Coord) -> Option<String> {
    let extent = (SIZE - 1) as f64 * SPACING;
    if !(0.0..=extent).contains(&coord.x) || !(0.0..=extent).contains(&coord.y) {
        return None;
    }
    let cells = (extent / ZONE_SIZE).ceil() as usize;
    let col = ((coord.x / ZONE_SIZE) as usize).min(cells - 1);
    let row = ((coord.y / ZONE_SIZE) as usize).min(cells - 1);
    Some(format!("Z{row}{col}"))
}
