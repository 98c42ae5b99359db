//! Generate a 500 riders / 25 drivers scenario, run it and print the report.
//!
//! Run with: cargo run -p sim_core --example scenario_run

use sim_core::profiling::EventMetrics;
use sim_core::scenario::{generate_requests, ScenarioParams};
use sim_core::Simulation;

fn main() {
    const NUM_RIDERS: usize = 500;
    const NUM_DRIVERS: usize = 25;
    const SEED: u64 = 123;

    let records = generate_requests(
        &ScenarioParams {
            num_riders: NUM_RIDERS,
            num_drivers: NUM_DRIVERS,
            ..Default::default()
        }
        .with_seed(SEED)
        .with_initial_drivers(NUM_DRIVERS / 2)
        .with_request_window(2_000)
        .with_patience_range(20, 200),
    );

    let mut sim = Simulation::new().with_metrics();
    let report = match sim.run(&records) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("simulation failed: {err}");
            std::process::exit(1);
        }
    };
    let summary = sim.summary();

    println!(
        "--- Scenario run ({} riders, {} drivers, seed {}) ---",
        NUM_RIDERS, NUM_DRIVERS, SEED
    );
    println!("Simulation time: {}", summary.final_time);
    println!(
        "Satisfied: {}  Cancelled: {}",
        summary.riders_satisfied, summary.riders_cancelled
    );
    println!("\nReport:");
    for (name, value) in &report {
        println!("  {:24} {:.2}", name, value);
    }
    if let Some(metrics) = sim.world().get_resource::<EventMetrics>() {
        metrics.print_summary();
    }
}
