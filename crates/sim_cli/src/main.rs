use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use sim_core::profiling::EventMetrics;
use sim_core::scenario::{
    create_matching, format_event_list, generate_requests, load_event_file,
    MatchingAlgorithmType, ScenarioParams,
};
use sim_core::Simulation;
use tracing::info;

mod telemetry;

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "ride_sim",
    about = "Discrete-event simulation of a ride-dispatch service",
    long_about = "Replays an event list of rider and driver requests through the\n\
                  dispatcher and prints the monitor's statistics."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an event list and print the report
    Run {
        /// Event list file, one request per line
        input: PathBuf,
        /// Driver selection policy
        #[arg(value_enum, long, default_value_t = Matching::Nearest, env = "RIDE_SIM_MATCHING")]
        matching: Matching,
        /// Output format
        #[arg(value_enum, long, default_value_t = Format::Text)]
        format: Format,
        /// Also print per-kind event counts
        #[arg(long)]
        metrics: bool,
    },
    /// Generate a random event list
    Generate {
        #[arg(long, default_value_t = 100)]
        riders: usize,
        #[arg(long, default_value_t = 10)]
        drivers: usize,
        /// Drivers requesting at t = 0
        #[arg(long, default_value_t = 0)]
        initial_drivers: usize,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value_t = 100)]
        rows: i64,
        #[arg(long, default_value_t = 100)]
        columns: i64,
        /// Requests are spread over [0, window]
        #[arg(long, default_value_t = 1_000)]
        window: u64,
        #[arg(long, default_value_t = 1.0)]
        min_speed: f64,
        #[arg(long, default_value_t = 5.0)]
        max_speed: f64,
        #[arg(long, default_value_t = 10)]
        min_patience: u64,
        #[arg(long, default_value_t = 100)]
        max_patience: u64,
        /// Write to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Matching {
    /// Shortest travel time to the rider
    Nearest,
    /// First available driver
    Simple,
}

impl From<Matching> for MatchingAlgorithmType {
    fn from(matching: Matching) -> Self {
        match matching {
            Matching::Nearest => MatchingAlgorithmType::Nearest,
            Matching::Simple => MatchingAlgorithmType::Simple,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

// ── Commands ───────────────────────────────────────────────────────

fn run(input: PathBuf, matching: Matching, format: Format, metrics: bool) -> Result<()> {
    let records = load_event_file(&input)
        .with_context(|| format!("failed to load event list {}", input.display()))?;
    info!(path = %input.display(), requests = records.len(), "event list loaded");

    let mut simulation = Simulation::new().with_matching(create_matching(matching.into()));
    if metrics {
        simulation = simulation.with_metrics();
    }
    let report = simulation
        .run(&records)
        .with_context(|| format!("simulation of {} failed", input.display()))?;
    let summary = simulation.summary();
    let event_metrics = simulation.world().get_resource::<EventMetrics>();

    match format {
        Format::Text => {
            for (name, value) in &report {
                println!("{name}: {value:.2}");
            }
            if let Some(event_metrics) = event_metrics {
                event_metrics.print_summary();
            }
        }
        Format::Json => {
            let mut output = json!({ "report": report, "summary": summary });
            if let Some(event_metrics) = event_metrics {
                output["events"] = json!(event_metrics.events_by_kind);
            }
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

fn generate(params: ScenarioParams, output: Option<PathBuf>) -> Result<()> {
    let records = generate_requests(&params);
    let text = format_event_list(&records);
    match output {
        Some(path) => {
            fs::write(&path, text)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), requests = records.len(), "event list written");
        }
        None => print!("{text}"),
    }
    Ok(())
}

fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run {
            input,
            matching,
            format,
            metrics,
        } => run(input, matching, format, metrics),
        Commands::Generate {
            riders,
            drivers,
            initial_drivers,
            seed,
            rows,
            columns,
            window,
            min_speed,
            max_speed,
            min_patience,
            max_patience,
            output,
        } => {
            let mut params = ScenarioParams::default()
                .with_counts(riders, drivers)
                .with_initial_drivers(initial_drivers)
                .with_grid(rows, columns)
                .with_request_window(window)
                .with_speed_range(min_speed, max_speed)
                .with_patience_range(min_patience, max_patience);
            if let Some(seed) = seed {
                params = params.with_seed(seed);
            }
            generate(params, output)
        }
    }
}

fn main() -> ExitCode {
    telemetry::init_tracing();
    match dispatch(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
