//! Unit tests for skim-transit.

#[cfg(test)]
mod helpers {
    use skim_core::{Coord, StopId, TransportMode};

    use crate::{AccessStop, RaptorParameters, RouteStop, ScheduleBuilder, TransitSchedule};

    pub const H8: f64 = 8.0 * 3_600.0;

    /// ```text
    /// S0 ──rail── S1 ──rail── S2
    ///                          ┆ 50 m walk
    ///                          S3 ──bus── S4
    /// ```
    /// Rail leaves S0 at 08:00 and 08:30 and takes 300 s per hop.  The bus
    /// leaves S3 at 08:15, 08:45 and 09:15 and takes 600 s.
    pub fn corridor() -> TransitSchedule {
        let mut b = ScheduleBuilder::new();
        let s0 = b.add_stop(Coord::new(0.0, 0.0));
        let s1 = b.add_stop(Coord::new(1_000.0, 0.0));
        let s2 = b.add_stop(Coord::new(2_000.0, 0.0));
        let s3 = b.add_stop(Coord::new(2_000.0, 50.0));
        let s4 = b.add_stop(Coord::new(5_000.0, 50.0));
        b.add_route(
            "R1",
            TransportMode::Rail,
            vec![
                RouteStop::new(s0, 0.0, 0.0),
                RouteStop::new(s1, 300.0, 300.0),
                RouteStop::new(s2, 600.0, 600.0),
            ],
            vec![H8 + 1_800.0, H8],
        )
        .unwrap();
        b.add_route(
            "B1",
            TransportMode::Bus,
            vec![
                RouteStop::new(s3, 0.0, 0.0).with_distance(0.0),
                RouteStop::new(s4, 600.0, 600.0).with_distance(3_500.0),
            ],
            vec![H8 + 900.0, H8 + 2_700.0, H8 + 4_500.0],
        )
        .unwrap();
        b.generate_transfers(100.0, 1.0, 1.0).unwrap();
        b.build()
    }

    pub fn params() -> RaptorParameters {
        RaptorParameters {
            max_transfers: 3,
            max_transfer_wait: 1_800.0,
            walk_speed: 1.0,
            beeline_walk_factor: 1.0,
            search_radius: 500.0,
        }
    }

    pub fn at(stop: u32) -> Vec<AccessStop> {
        vec![AccessStop { stop: StopId(stop), walk_time: 0.0 }]
    }
}

#[cfg(test)]
mod schedule {
    use skim_core::{Coord, StopId, TransportMode};

    use super::helpers::{H8, corridor};
    use crate::{RouteStop, ScheduleBuilder, TransitError};

    #[test]
    fn build_indexes_routes_and_transfers() {
        let s = corridor();
        assert_eq!(s.stop_count(), 5);
        assert_eq!(s.route_count(), 2);
        assert_eq!(s.routes_serving(StopId(2)).len(), 1);
        assert_eq!(s.routes_serving(StopId(2))[0].1, 2);

        let from_s2 = s.transfers_from(StopId(2));
        assert_eq!(from_s2.len(), 1);
        assert_eq!(from_s2[0].to, StopId(3));
        assert!((from_s2[0].walk_time - 50.0).abs() < 1e-9);
        assert!(s.transfers_from(StopId(0)).is_empty());
    }

    #[test]
    fn departures_are_sorted_and_searchable() {
        let s = corridor();
        let rail = s.route(skim_core::RouteId(0));
        assert_eq!(rail.departures, vec![H8, H8 + 1_800.0]);
        assert_eq!(rail.earliest_trip(1, H8 + 300.0), Some(0));
        assert_eq!(rail.earliest_trip(1, H8 + 301.0), Some(1));
        assert_eq!(rail.earliest_trip(1, H8 + 2_101.0), None);
    }

    #[test]
    fn distances_fall_back_to_beeline() {
        let s = corridor();
        assert_eq!(s.route(skim_core::RouteId(0)).cum_distance, vec![0.0, 1_000.0, 2_000.0]);
        assert_eq!(s.route(skim_core::RouteId(1)).cum_distance, vec![0.0, 3_500.0]);
    }

    #[test]
    fn invalid_routes_are_rejected() {
        let mut b = ScheduleBuilder::new();
        let a = b.add_stop(Coord::new(0.0, 0.0));
        let c = b.add_stop(Coord::new(1.0, 0.0));

        let short = b.add_route("L", TransportMode::Bus, vec![RouteStop::new(a, 0.0, 0.0)], vec![0.0]);
        assert!(matches!(short, Err(TransitError::InvalidRoute { .. })));

        let backwards = b.add_route(
            "L",
            TransportMode::Bus,
            vec![RouteStop::new(a, 0.0, 100.0), RouteStop::new(c, 50.0, 50.0)],
            vec![0.0],
        );
        assert!(matches!(backwards, Err(TransitError::InvalidRoute { .. })));

        let unknown = b.add_route(
            "L",
            TransportMode::Bus,
            vec![RouteStop::new(a, 0.0, 0.0), RouteStop::new(StopId(9), 60.0, 60.0)],
            vec![0.0],
        );
        assert!(matches!(unknown, Err(TransitError::UnknownStop(StopId(9)))));
        assert!(b.add_transfer(a, StopId(7), 10.0).is_err());
    }

    #[test]
    fn transfer_generation_rejects_bad_walk_parameters() {
        let mut b = ScheduleBuilder::new();
        b.add_stop(Coord::new(0.0, 0.0));
        b.add_stop(Coord::new(50.0, 0.0));

        for (speed, factor) in [(-1.0, 1.0), (0.0, 1.0), (f64::NAN, 1.0), (1.0, -1.3), (1.0, f64::INFINITY)] {
            let result = b.generate_transfers(100.0, speed, factor);
            assert!(matches!(result, Err(TransitError::InvalidParameter(_))), "{speed} {factor}");
        }
        assert!(b.generate_transfers(-5.0, 1.0, 1.0).is_err());

        assert_eq!(b.generate_transfers(100.0, 1.0, 1.0).unwrap(), 2);
        let s = b.build();
        assert_eq!(s.transfers_from(StopId(0)).len(), 1);
        assert!(s.transfers_from(StopId(0))[0].walk_time > 0.0);
    }

    #[test]
    fn stop_lookup() {
        let s = corridor();
        let near = s.stops_within(Coord::new(1_990.0, 0.0), 100.0);
        let ids: Vec<StopId> = near.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![StopId(2), StopId(3)]);
        assert_eq!(s.nearest_stop(Coord::new(9_000.0, 0.0)).map(|(id, _)| id), Some(StopId(4)));
    }
}

#[cfg(test)]
mod raptor {
    use skim_core::{Coord, StopId, TimeWindow, TransportMode};

    use super::helpers::{H8, at, corridor, params};
    use crate::{Raptor, RaptorParameters, RouteStop, ScheduleBuilder, TransitSchedule};

    /// A ends at S1 where B starts; the stops are kilometres apart and no
    /// walking transfer exists.
    fn same_stop_change() -> TransitSchedule {
        let mut b = ScheduleBuilder::new();
        let s0 = b.add_stop(Coord::new(0.0, 0.0));
        let s1 = b.add_stop(Coord::new(3_000.0, 0.0));
        let s2 = b.add_stop(Coord::new(6_000.0, 0.0));
        let a = vec![RouteStop::new(s0, 0.0, 0.0), RouteStop::new(s1, 300.0, 300.0)];
        b.add_route("A", TransportMode::Bus, a, vec![H8]).unwrap();
        let line = vec![RouteStop::new(s1, 0.0, 0.0), RouteStop::new(s2, 400.0, 400.0)];
        b.add_route("B", TransportMode::Bus, line, vec![H8 + 600.0]).unwrap();
        b.build()
    }

    #[test]
    fn earlier_of_two_feasible_trips_is_used() {
        let s = corridor();
        let raptor = Raptor::new(&s, params(), |r| r.mode == skim_core::TransportMode::Rail).unwrap();
        let tree = raptor.calc_tree(&at(0), H8 - 600.0);

        let s2 = tree.arrival(StopId(2)).unwrap();
        assert_eq!(s2.arrival_time, H8 + 600.0);
        assert_eq!(s2.legs, 1);
        assert_eq!(s2.transfers(), 0);
        assert_eq!(s2.in_vehicle_time, 600.0);
        assert_eq!(s2.in_vehicle_distance, 2_000.0);
        assert_eq!(s2.train_time, 600.0);
        assert_eq!(s2.train_distance, 2_000.0);
    }

    #[test]
    fn transfer_via_footpath() {
        let s = corridor();
        let raptor = Raptor::new(&s, params(), |r| r.mode == skim_core::TransportMode::Rail).unwrap();
        let tree = raptor.calc_tree(&at(0), H8);

        let s3 = tree.arrival(StopId(3)).unwrap();
        assert_eq!(s3.arrival_time, H8 + 650.0);
        assert_eq!(s3.legs, 1);

        let s4 = tree.arrival(StopId(4)).unwrap();
        assert_eq!(s4.arrival_time, H8 + 1_500.0);
        assert_eq!(s4.transfers(), 1);
        assert_eq!(s4.in_vehicle_time, 1_200.0);
        assert_eq!(s4.in_vehicle_distance, 5_500.0);
        assert_eq!(s4.train_time, 600.0);
        assert_eq!(s4.train_distance, 2_000.0);
    }

    #[test]
    fn round_cap_limits_transfers() {
        let s = corridor();
        let direct = RaptorParameters { max_transfers: 0, ..params() };
        let raptor = Raptor::new(&s, direct, |_| false).unwrap();
        let tree = raptor.calc_tree(&at(0), H8);
        assert!(tree.arrival(StopId(2)).is_some());
        assert!(tree.arrival(StopId(4)).is_none());
        assert_eq!(tree.rounds(), 1);
    }

    #[test]
    fn change_vehicles_at_the_same_stop() {
        let s = same_stop_change();
        assert!(s.transfers_from(StopId(1)).is_empty());

        let raptor = Raptor::new(&s, params(), |_| false).unwrap();
        let tree = raptor.calc_tree(&at(0), H8);
        let s1 = tree.arrival(StopId(1)).unwrap();
        assert_eq!((s1.arrival_time, s1.legs), (H8 + 300.0, 1));

        let s2 = tree.arrival(StopId(2)).unwrap();
        assert_eq!(s2.arrival_time, H8 + 1_000.0);
        assert_eq!(s2.legs, 2);
        assert_eq!(s2.transfers(), 1);
        assert_eq!(s2.in_vehicle_time, 700.0);

        let direct = RaptorParameters { max_transfers: 0, ..params() };
        let tree = Raptor::new(&s, direct, |_| false).unwrap().calc_tree(&at(0), H8);
        assert!(tree.arrival(StopId(1)).is_some());
        assert!(tree.arrival(StopId(2)).is_none());
    }

    #[test]
    fn unlimited_transfers_end_when_nothing_improves() {
        let s = corridor();
        let unlimited = RaptorParameters { max_transfers: u32::MAX, ..params() };
        let raptor = Raptor::new(&s, unlimited, |_| false).unwrap();
        let tree = raptor.calc_tree(&at(0), H8);
        assert_eq!(tree.arrival(StopId(4)).map(|a| a.arrival_time), Some(H8 + 1_500.0));
        assert!(tree.rounds() >= 2 && tree.rounds() <= 5, "{}", tree.rounds());
    }

    #[test]
    fn long_transfer_waits_are_refused() {
        let s = corridor();
        let impatient = RaptorParameters { max_transfer_wait: 200.0, ..params() };
        let raptor = Raptor::new(&s, impatient, |_| false).unwrap();
        // Arrives at S3 at 08:10:50; the 08:15 bus means a 250 s wait.
        let tree = raptor.calc_tree(&at(0), H8);
        assert!(tree.arrival(StopId(4)).is_none());
    }

    #[test]
    fn first_boarding_ignores_wait_limit() {
        let s = corridor();
        let impatient = RaptorParameters { max_transfer_wait: 0.0, ..params() };
        let raptor = Raptor::new(&s, impatient, |_| false).unwrap();
        let tree = raptor.calc_tree(&at(0), H8 - 3_000.0);
        assert_eq!(tree.arrival(StopId(2)).map(|a| a.arrival_time), Some(H8 + 600.0));
    }

    #[test]
    fn nothing_reachable_after_last_trip() {
        let s = corridor();
        let raptor = Raptor::new(&s, params(), |_| false).unwrap();
        let tree = raptor.calc_tree(&at(0), H8 + 1_801.0);
        let reached: Vec<StopId> = tree.reached().map(|(id, _)| id).collect();
        assert_eq!(reached, vec![StopId(0)]);
    }

    #[test]
    fn access_stops_use_radius_then_nearest() {
        let s = corridor();
        let raptor = Raptor::new(&s, params(), |_| false).unwrap();

        let near = raptor.access_stops(Coord::new(1_900.0, 0.0));
        let ids: Vec<StopId> = near.iter().map(|a| a.stop).collect();
        assert_eq!(ids, vec![StopId(2), StopId(3)]);
        assert!((near[0].walk_time - 100.0).abs() < 1e-9);

        let far = raptor.access_stops(Coord::new(0.0, 3_000.0));
        assert_eq!(far.len(), 1);
        assert_eq!(far[0].stop, StopId(0));
        assert!((far[0].walk_time - 3_000.0).abs() < 1e-9);
    }

    #[test]
    fn calc_trees_runs_once_per_catchable_departure() {
        let s = corridor();
        let raptor = Raptor::new(&s, params(), |_| false).unwrap();
        let window = TimeWindow::new(H8, H8 + 3_600.0).unwrap();
        let trees = raptor.calc_trees(&at(0), window);
        let deps: Vec<f64> = trees.iter().map(|t| t.departure_time).collect();
        assert_eq!(deps, vec![H8, H8 + 1_800.0]);
    }

    #[test]
    fn repeated_queries_are_identical() {
        let s = corridor();
        let raptor = Raptor::new(&s, params(), |r| r.mode == skim_core::TransportMode::Rail).unwrap();
        let access = raptor.access_stops(Coord::new(10.0, 10.0));
        let a: Vec<_> = raptor.calc_tree(&access, H8).reached().map(|(id, l)| (id, *l)).collect();
        let b: Vec<_> = raptor.calc_tree(&access, H8).reached().map(|(id, l)| (id, *l)).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn bad_parameters_are_rejected() {
        let s = corridor();
        let zero_speed = RaptorParameters { walk_speed: 0.0, ..params() };
        assert!(Raptor::new(&s, zero_speed, |_| false).is_err());
        let negative_wait = RaptorParameters { max_transfer_wait: -1.0, ..params() };
        assert!(negative_wait.validate().is_err());
    }
}

#[cfg(test)]
mod rooftop {
    use skim_core::{StopId, TimeWindow};

    use super::helpers::{H8, at, corridor, params};
    use crate::{OdConnection, Raptor, filter_dominated, rooftop};

    fn conn(departure_time: f64, travel_time: f64) -> OdConnection {
        OdConnection {
            departure_time,
            travel_time,
            access_time: 0.0,
            egress_time: 0.0,
            transfers: 0,
            in_vehicle_time: travel_time,
            in_vehicle_distance: 1_000.0,
            train_time: 0.0,
            train_distance: 0.0,
        }
    }

    #[test]
    fn dominated_connections_are_removed() {
        let kept = filter_dominated(vec![conn(20.0, 180.0), conn(0.0, 100.0), conn(10.0, 90.0), conn(20.0, 130.0)]);
        let deps: Vec<(f64, f64)> = kept.iter().map(|c| (c.departure_time, c.arrival_time())).collect();
        assert_eq!(deps, vec![(10.0, 100.0), (20.0, 150.0)]);
    }

    #[test]
    fn duplicates_collapse_to_one() {
        let kept = filter_dominated(vec![conn(0.0, 100.0), conn(0.0, 100.0)]);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn single_connection_in_mid_window() {
        let window = TimeWindow::new(0.0, 3_600.0).unwrap();
        let s = rooftop(&[conn(1_800.0, 600.0)], window).unwrap();
        assert_eq!(s.frequency, 1.0);
        assert_eq!(s.hourly_frequency, 1.0);
        assert!((s.adaption_time - 900.0).abs() < 1e-9);
        assert!((s.travel_time - 600.0).abs() < 1e-9);
        assert_eq!(s.train_share_by_time, 0.0);
        assert!(rooftop(&[], window).is_none());
    }

    /// Non-dominated rail connections S0 → S2 departing in `window`.
    fn rail_connections(window: TimeWindow) -> Vec<OdConnection> {
        let s = corridor();
        let raptor = Raptor::new(&s, params(), |_| true).unwrap();
        let connections = raptor
            .calc_trees(&at(0), window)
            .iter()
            .filter_map(|tree| {
                let a = tree.arrival(StopId(2))?;
                Some(OdConnection {
                    departure_time: tree.departure_time,
                    travel_time: a.arrival_time - tree.departure_time,
                    access_time: a.access_time,
                    egress_time: 0.0,
                    transfers: a.transfers(),
                    in_vehicle_time: a.in_vehicle_time,
                    in_vehicle_distance: a.in_vehicle_distance,
                    train_time: a.train_time,
                    train_distance: a.train_distance,
                })
            })
            .collect();
        filter_dominated(connections)
    }

    #[test]
    fn two_trips_in_one_hour() {
        let window = TimeWindow::new(H8, H8 + 3_600.0).unwrap();
        let connections = rail_connections(window);
        assert_eq!(connections.len(), 2);

        let summary = rooftop(&connections, window).unwrap();
        assert_eq!(summary.frequency, 2.0);
        assert_eq!(summary.hourly_frequency, 2.0);
        assert!((summary.travel_time - 600.0).abs() < 1e-9);
        // Segments [0, 900] around 0 and [900, 3600] around 1800.
        assert!((summary.adaption_time - 675.0).abs() < 1e-9);
        assert!((summary.train_share_by_time - 1.0).abs() < 1e-12);
        assert!((summary.in_vehicle_distance - 2_000.0).abs() < 1e-9);
    }

    #[test]
    fn frequency_counts_departures_per_window() {
        let window = TimeWindow::new(H8 - 3_600.0, H8 + 3_600.0).unwrap();
        let connections = rail_connections(window);
        assert_eq!(connections.len(), 2);

        let summary = rooftop(&connections, window).unwrap();
        assert_eq!(summary.frequency, 2.0);
        assert_eq!(summary.hourly_frequency, 1.0);
    }
}
