//! Unit tests for skim-core primitives.

#[cfg(test)]
mod ids {
    use crate::{LinkId, NodeId, RouteId, StopId};

    #[test]
    fn index_roundtrip() {
        let id = NodeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(NodeId::from_index(42), Some(id));
    }

    #[test]
    fn from_index_rejects_out_of_range() {
        assert_eq!(StopId::from_index(u32::MAX as usize), None);
        assert_eq!(StopId::from_index(usize::MAX), None);
    }

    #[test]
    fn ordering() {
        assert!(StopId(0) < StopId(1));
        assert!(RouteId(100) > RouteId(99));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(NodeId::INVALID.0, u32::MAX);
        assert_eq!(LinkId::INVALID.0, u32::MAX);
        assert_eq!(LinkId::default(), LinkId::INVALID);
        assert!(!LinkId::INVALID.is_valid());
        assert!(LinkId(0).is_valid());
    }

    #[test]
    fn display() {
        assert_eq!(LinkId(7).to_string(), "link 7");
        assert_eq!(StopId::INVALID.to_string(), "stop <invalid>");
    }
}

#[cfg(test)]
mod geo {
    use crate::Coord;

    #[test]
    fn zero_distance() {
        let p = Coord::new(4_500.0, 1_200.0);
        assert_eq!(p.distance(p), 0.0);
    }

    #[test]
    fn pythagoras() {
        let a = Coord::new(0.0, 0.0);
        let b = Coord::new(300.0, 400.0);
        assert!((a.distance(b) - 500.0).abs() < 1e-9);
        assert_eq!(a.distance(b), b.distance(a));
    }

    #[test]
    fn finiteness() {
        assert!(Coord::new(1.0, 2.0).is_finite());
        assert!(!Coord::new(f64::NAN, 2.0).is_finite());
        assert!(!Coord::new(1.0, f64::INFINITY).is_finite());
    }
}

#[cfg(test)]
mod mode {
    use crate::{ModeSet, TransportMode};

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("Rail".parse::<TransportMode>().unwrap(), TransportMode::Rail);
        assert_eq!(" bus ".parse::<TransportMode>().unwrap(), TransportMode::Bus);
        assert!("hovercraft".parse::<TransportMode>().is_err());
    }

    #[test]
    fn transit_classification() {
        assert!(TransportMode::Bus.is_transit());
        assert!(TransportMode::Rail.is_transit());
        assert!(!TransportMode::Car.is_transit());
        assert!(!TransportMode::Walk.is_transit());
    }

    #[test]
    fn mode_set_membership() {
        let set = ModeSet::single(TransportMode::Car).with(TransportMode::Bus);
        assert!(set.contains(TransportMode::Car));
        assert!(set.contains(TransportMode::Bus));
        assert!(!set.contains(TransportMode::Rail));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![TransportMode::Car, TransportMode::Bus]);
    }

    #[test]
    fn mode_set_parse_list() {
        let set = ModeSet::parse_list("car,bus,rail").unwrap();
        assert_eq!(set.iter().count(), 3);
        assert!(ModeSet::parse_list("").unwrap().is_empty());
        assert!(ModeSet::parse_list("car,zeppelin").is_err());
    }
}

#[cfg(test)]
mod time {
    use crate::{TimeWindow, format_time, parse_time};

    #[test]
    fn parse_full_and_short_forms() {
        assert_eq!(parse_time("08:00:00").unwrap(), 28_800.0);
        assert_eq!(parse_time("10:15").unwrap(), 36_900.0);
        assert_eq!(parse_time("00:00:01").unwrap(), 1.0);
    }

    #[test]
    fn parse_past_midnight() {
        assert_eq!(parse_time("25:00:00").unwrap(), 90_000.0);
    }

    #[test]
    fn parse_large_hour_counts_without_overflow() {
        assert_eq!(parse_time("4000000:00:00").unwrap(), 14_400_000_000.0);
        assert_eq!(parse_time("4294967295:59:59").unwrap(), 4_294_967_295.0 * 3_600.0 + 3_599.0);
        assert!(parse_time("4294967296:00:00").is_err());
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_time("8").is_err());
        assert!(parse_time("08:61:00").is_err());
        assert!(parse_time("aa:00:00").is_err());
        assert!(parse_time("08:00:00:00").is_err());
    }

    #[test]
    fn format_roundtrip() {
        for s in ["00:00:00", "08:00:00", "17:45:30", "26:01:02"] {
            assert_eq!(format_time(parse_time(s).unwrap()), s);
        }
        assert_eq!(format_time(f64::INFINITY), "--:--:--");
    }

    #[test]
    fn window_validation() {
        assert!(TimeWindow::new(28_800.0, 32_400.0).is_ok());
        assert!(TimeWindow::new(32_400.0, 28_800.0).is_err());
        assert!(TimeWindow::new(28_800.0, 28_800.0).is_err());
        assert!(TimeWindow::new(f64::NAN, 28_800.0).is_err());
    }

    #[test]
    fn window_duration() {
        let w = TimeWindow::new(28_800.0, 36_000.0).unwrap();
        assert_eq!(w.duration_secs(), 7_200.0);
        assert_eq!(w.duration_hours(), 2.0);
        assert!(w.contains(28_800.0));
        assert!(w.contains(36_000.0));
        assert!(!w.contains(36_000.5));
        assert_eq!(w.to_string(), "08:00:00 - 10:00:00");
    }
}
