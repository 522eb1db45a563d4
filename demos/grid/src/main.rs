//! grid — end-to-end skim run on a synthetic town.
//!
//! Builds a 2 km street grid with a bus and a rail line, draws weighted
//! sampling points for sixteen 500 m zones and computes the beeline, car and
//! public-transport matrices.  Pass a JSON `SkimConfig` as the first
//! argument to override the built-in settings; omitted fields keep their
//! defaults.

mod scenario;

use std::time::Instant;

use anyhow::{Context, Result};

use skim_calc::{SkimCalculator, SkimConfig, select_sampling_points};
use skim_core::{LinkId, TimeWindow, TransportMode, format_time};
use skim_matrix::FloatMatrix;
use skim_network::{FreeSpeedTravelTime, Network, TimeBinnedTravelTime, TimeDistanceDisutility, TravelTime};

// ── Constants ─────────────────────────────────────────────────────────────────

const POINTS_PER_ZONE:  usize = 4;
const SEED:             u64   = 42;
const COST_OF_TIME:     f64   = 1.0 / 3_600.0; // per second
const COST_OF_DISTANCE: f64   = 0.2 / 1_000.0; // per metre
const CONGESTION:       f64   = 2.0;           // arterial slow-down in the peak bin
const BIN_SIZE:         f64   = 900.0;

fn default_config() -> SkimConfig {
    SkimConfig {
        departure_times: vec![7.5 * 3_600.0, 8.0 * 3_600.0, 8.5 * 3_600.0],
        pt_window: TimeWindow { start: 7.0 * 3_600.0, end: 9.0 * 3_600.0 },
        points_per_zone: POINTS_PER_ZONE,
        seed: SEED,
        max_beeline_distance: Some(2_500.0),
        ..SkimConfig::default()
    }
}

fn load_config() -> Result<SkimConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {path}"))
        }
        None => Ok(default_config()),
    }
}

/// Synthetic loop-detector data: arterial links run at half speed
/// between 07:45 and 08:15.
fn peak_travel_times(network: &Network) -> TimeBinnedTravelTime {
    let mut tt = TimeBinnedTravelTime::new(network, BIN_SIZE, 30.0 * 3_600.0);
    for link in (0..network.link_count()).filter_map(LinkId::from_index) {
        let free = FreeSpeedTravelTime.link_travel_time(network, link, 0.0);
        if free < 200.0 / (40.0 / 3.6) {
            for enter in [7.75 * 3_600.0, 8.0 * 3_600.0] {
                tt.add_observation(link, enter, free * CONGESTION);
            }
        }
    }
    tt
}

fn summarize(name: &str, m: &FloatMatrix<String>) {
    let values: Vec<f32> = (0..m.rows())
        .flat_map(|r| (0..m.cols()).filter_map(move |c| m.get_at(r, c)))
        .collect();
    let finite: Vec<f32> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let mean = if finite.is_empty() { f32::NAN } else { finite.iter().sum::<f32>() / finite.len() as f32 };
    println!(
        "{name:<24} {:>6} {:>6} {:>10.1}",
        values.len(),
        values.len() - finite.len(),
        mean
    );
}

fn print_table(title: &str, m: &FloatMatrix<String>, scale: f32) {
    println!("{title}");
    print!("{:<6}", "");
    for id in m.col_ids() {
        print!("{id:>7}");
    }
    println!();
    for (r, from) in m.row_ids().iter().enumerate() {
        print!("{from:<6}");
        for c in 0..m.cols() {
            match m.get_at(r, c) {
                Some(v) if v.is_finite() => print!("{:>7.1}", v * scale),
                Some(_) => print!("{:>7}", "inf"),
                None => print!("{:>7}", "-"),
            }
        }
        println!();
    }
    println!();
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = load_config()?;
    println!("=== grid — zone-to-zone skim matrices ===");
    println!(
        "Departures: {}  |  PT window: {}  |  Threads: {}",
        config.departure_times.iter().map(|&t| format_time(t)).collect::<Vec<_>>().join(", "),
        config.pt_window,
        config.num_threads
    );
    println!();

    // 1. Build the street grid and its car-only subnetwork.
    let network = scenario::build_network();
    let car = network.filter_modes(TransportMode::Car);
    println!(
        "Network: {} nodes, {} links ({} car links)",
        network.node_count(),
        network.link_count(),
        car.link_count()
    );

    // 2. Build the transit schedule.
    let schedule = scenario::build_schedule()?;
    println!("Schedule: {} stops, {} routes", schedule.stop_count(), schedule.route_count());

    // 3. Draw weighted sampling points per zone.
    let points = select_sampling_points(
        &scenario::locations(),
        config.points_per_zone,
        config.seed,
        scenario::locate,
    );
    println!("Zones with sampling points: {}", points.len());
    println!();

    // 4. Calculator: validates the config and starts the worker pool.
    let calculator = SkimCalculator::new(config, points)?;

    // 5. Beeline distances.
    let t0 = Instant::now();
    let beeline = calculator.calc_beeline_matrix()?;

    // 6. Free-flow car matrices.  Time-invariant, so one departure slice suffices.
    let freeflow = calculator.calc_network_matrices(
        &car,
        &FreeSpeedTravelTime,
        &TimeDistanceDisutility::new(FreeSpeedTravelTime, COST_OF_TIME, COST_OF_DISTANCE),
    )?;

    // 7. Congested car matrices, averaged over all departure times.
    let binned = peak_travel_times(&car);
    let binned_ref = |n: &Network, l: LinkId, t: f64| binned.link_travel_time(n, l, t);
    let congested = calculator.calc_network_matrices(
        &car,
        &binned,
        &TimeDistanceDisutility::new(binned_ref, COST_OF_TIME, COST_OF_DISTANCE),
    )?;

    // 8. Public transport.
    let pt = calculator.calc_pt_matrices(&schedule)?;
    println!("Skims complete in {:.3} s", t0.elapsed().as_secs_f64());
    println!();

    // 9. Summary.
    println!("{:<24} {:>6} {:>6} {:>10}", "Matrix", "Cells", "Inf", "Mean");
    println!("{}", "-".repeat(49));
    summarize("beeline distance [m]", &beeline);
    summarize("car free tt [s]", &freeflow.travel_time);
    summarize("car free dist [m]", &freeflow.distance);
    summarize("car congested tt [s]", &congested.travel_time);
    summarize("pt adaption [s]", &pt.adaption_time);
    summarize("pt frequency [/window]", &pt.frequency);
    summarize("pt travel time [s]", &pt.travel_time);
    summarize("pt access [s]", &pt.access_time);
    summarize("pt egress [s]", &pt.egress_time);
    summarize("pt transfers", &pt.transfer_count);
    summarize("pt in-vehicle dist [m]", &pt.distance);
    summarize("pt train share (time)", &pt.train_time_share);
    summarize("pt train share (dist)", &pt.train_distance_share);
    println!();

    // 10. Travel-time tables in minutes.
    print_table("Car travel time, congested [min]", &congested.travel_time, 1.0 / 60.0);
    print_table("PT travel time [min]", &pt.travel_time, 1.0 / 60.0);

    Ok(())
}
