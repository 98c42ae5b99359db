#![allow(dead_code)]

use sim_core::scenario::RequestRecord;
use sim_core::spatial::Location;

/// `DriverRequest` record at `(row, column)`.
pub fn driver_at(timestamp: u64, id: &str, at: (i64, i64), speed: f64) -> RequestRecord {
    RequestRecord::driver(timestamp, id, Location::new(at.0, at.1), speed)
}

/// `RiderRequest` record from `origin` to `destination`.
pub fn rider_at(
    timestamp: u64,
    id: &str,
    origin: (i64, i64),
    destination: (i64, i64),
    patience: u64,
) -> RequestRecord {
    RequestRecord::rider(
        timestamp,
        id,
        Location::new(origin.0, origin.1),
        Location::new(destination.0, destination.1),
        patience,
    )
}

/// One driver at the origin, one rider ten cells away who is picked up
/// before their patience runs out.
pub fn single_ride() -> Vec<RequestRecord> {
    vec![
        driver_at(0, "D1", (0, 0), 10.0),
        rider_at(1, "R1", (10, 0), (20, 0), 5),
    ]
}

/// A rider with zero patience matched to a driver that needs 5 time units to arrive.
pub fn impatient_rider() -> Vec<RequestRecord> {
    vec![
        driver_at(0, "D1", (0, 0), 1.0),
        rider_at(0, "R1", (5, 0), (9, 0), 0),
    ]
}
