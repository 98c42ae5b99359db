//! Spatial operations: grid locations and travel-time calculations.
//!
//! The simulation runs on an integer grid addressed by `(row, column)`.
//! Distances are Manhattan distances; travel time is distance divided by
//! the driver's speed, rounded to the nearest whole time unit.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Location {
    pub row: i64,
    pub column: i64,
}

impl Location {
    pub fn new(row: i64, column: i64) -> Self {
        Self { row, column }
    }

    /// Manhattan distance between two grid locations, or `None` when it does
    /// not fit in a `u64` (only possible near the ends of the `i64` range).
    pub fn manhattan_distance(self, other: Location) -> Option<u64> {
        self.row
            .abs_diff(other.row)
            .checked_add(self.column.abs_diff(other.column))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationParseError(pub String);

impl fmt::Display for LocationParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid location `{}` (expected `row,col`)", self.0)
    }
}

impl std::error::Error for LocationParseError {}

impl FromStr for Location {
    type Err = LocationParseError;

    /// Parses the `row,col` form used by event lists.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (row, column) = s
            .split_once(',')
            .ok_or_else(|| LocationParseError(s.to_string()))?;
        let row = row
            .trim()
            .parse()
            .map_err(|_| LocationParseError(s.to_string()))?;
        let column = column
            .trim()
            .parse()
            .map_err(|_| LocationParseError(s.to_string()))?;
        Ok(Self { row, column })
    }
}

/// Returns `true` when `speed` can be used as a divisor for travel time.
pub fn is_valid_speed(speed: f64) -> bool {
    speed.is_finite() && speed > 0.0
}

/// Travel time between two locations at `speed` distance units per time unit,
/// rounded to the nearest integer.
///
/// Returns `None` for a zero, negative or non-finite speed, and when the
/// duration does not fit in a `u64`; callers decide how to surface that.
pub fn travel_time(speed: f64, from: Location, to: Location) -> Option<u64> {
    if !is_valid_speed(speed) {
        return None;
    }
    let distance = from.manhattan_distance(to)? as f64;
    let time = (distance / speed).round();
    // `u64::MAX as f64` rounds up to 2^64, which is already out of range.
    if time >= u64::MAX as f64 {
        return None;
    }
    Some(time as u64)
}
