mod support;

use std::fs;

use sim_core::scenario::{
    format_event_list, generate_requests, load_event_file, parse_event_list, ScenarioParams,
};
use sim_core::{ParseError, Simulation};
use support::entities::single_ride;

const WALKTHROUGH: &str = "\
# driver D1 waits at the origin
0 DriverRequest D1 0,0 10
1 RiderRequest R1 10,0 20,0 5
";

#[test]
fn event_file_is_loaded_and_run() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("events.txt");
    fs::write(&path, WALKTHROUGH).expect("write event list");

    let records = load_event_file(&path).expect("load");
    assert_eq!(records, single_ride());

    let report = Simulation::new().run(&records).expect("run");
    assert_eq!(report.get("riders_satisfied"), Some(&1.0));
}

#[test]
fn missing_event_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = load_event_file(dir.path().join("absent.txt")).unwrap_err();
    assert!(matches!(err, ParseError::Io(_)));
}

#[test]
fn generated_list_survives_a_file_round_trip() {
    let params = ScenarioParams::default().with_seed(9).with_counts(25, 4);
    let records = generate_requests(&params);

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("generated.txt");
    fs::write(&path, format_event_list(&records)).expect("write");
    let reloaded = load_event_file(&path).expect("reload");

    assert_eq!(reloaded, records);
    assert_eq!(
        Simulation::new().run(&records).expect("run original"),
        Simulation::new().run(&reloaded).expect("run reloaded")
    );
}

#[test]
fn generated_scenario_terminates_with_every_rider_settled() {
    let params = ScenarioParams::default()
        .with_seed(2024)
        .with_counts(200, 15)
        .with_initial_drivers(5)
        .with_grid(40, 40)
        .with_request_window(500)
        .with_patience_range(0, 60);
    let records = generate_requests(&params);

    let mut sim = Simulation::new();
    let report = sim.run(&records).expect("run");
    let summary = sim.summary();

    assert_eq!(summary.riders_total, 200);
    assert_eq!(summary.riders_waiting, 0);
    assert_eq!(summary.riders_cancelled + summary.riders_satisfied, 200);
    assert_eq!(summary.drivers_idle, 15);
    assert_eq!(report.get("riders_total"), Some(&200.0));
    assert_eq!(report.get("drivers_total"), Some(&15.0));
    assert_eq!(
        report.get("riders_satisfied"),
        Some(&(summary.riders_satisfied as f64))
    );
    assert_eq!(
        report.get("riders_cancelled"),
        Some(&(summary.riders_cancelled as f64))
    );
}

#[test]
fn same_seed_replays_identically() {
    let params = ScenarioParams::default().with_seed(77).with_counts(120, 8);

    let run = || {
        let mut sim = Simulation::new();
        let report = sim.run(&generate_requests(&params)).expect("run");
        (report, sim.summary())
    };

    assert_eq!(run(), run());
}

#[test]
fn parse_errors_point_at_the_offending_line() {
    let input = format!("{WALKTHROUGH}2 RiderRequest R2 1,1 2,2\n");
    match parse_event_list(&input) {
        Err(ParseError::MalformedLine { line, .. }) => assert_eq!(line, 4),
        other => panic!("expected malformed line, got {other:?}"),
    }
}
