use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Default grid: 100 x 100 cells.
const DEFAULT_GRID_ROWS: i64 = 100;
const DEFAULT_GRID_COLUMNS: i64 = 100;

/// Default time window for requests (simulation time units).
const DEFAULT_REQUEST_WINDOW: u64 = 1_000;

/// Type of matching algorithm to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MatchingAlgorithmType {
    /// Driver with the shortest travel time to the rider.
    #[default]
    Nearest,
    /// First available driver.
    Simple,
}

impl fmt::Display for MatchingAlgorithmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MatchingAlgorithmType::Nearest => "nearest",
            MatchingAlgorithmType::Simple => "simple",
        })
    }
}

impl FromStr for MatchingAlgorithmType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nearest" => Ok(MatchingAlgorithmType::Nearest),
            "simple" => Ok(MatchingAlgorithmType::Simple),
            other => Err(format!(
                "unknown matching algorithm `{other}` (expected `nearest` or `simple`)"
            )),
        }
    }
}

/// Parameters for generating a random event list.
///
/// Riders and drivers request uniformly over `[0, request_window]`; locations
/// are uniform over the `grid_rows x grid_columns` grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioParams {
    pub num_riders: usize,
    pub num_drivers: usize,
    /// Requests at t = 0 for this many drivers, the rest spread over the window.
    pub initial_driver_count: usize,
    pub seed: Option<u64>,
    pub grid_rows: i64,
    pub grid_columns: i64,
    pub request_window: u64,
    pub min_speed: f64,
    pub max_speed: f64,
    pub min_patience: u64,
    pub max_patience: u64,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            num_riders: 100,
            num_drivers: 10,
            initial_driver_count: 0,
            seed: None,
            grid_rows: DEFAULT_GRID_ROWS,
            grid_columns: DEFAULT_GRID_COLUMNS,
            request_window: DEFAULT_REQUEST_WINDOW,
            min_speed: 1.0,
            max_speed: 5.0,
            min_patience: 10,
            max_patience: 100,
        }
    }
}

impl ScenarioParams {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_counts(mut self, num_riders: usize, num_drivers: usize) -> Self {
        self.num_riders = num_riders;
        self.num_drivers = num_drivers;
        self
    }

    /// Drivers that request at t = 0 before any rider appears.
    pub fn with_initial_drivers(mut self, count: usize) -> Self {
        self.initial_driver_count = count;
        self
    }

    pub fn with_grid(mut self, rows: i64, columns: i64) -> Self {
        self.grid_rows = rows;
        self.grid_columns = columns;
        self
    }

    /// Requests are spread uniformly over `[0, window]`.
    pub fn with_request_window(mut self, window: u64) -> Self {
        self.request_window = window;
        self
    }

    pub fn with_speed_range(mut self, min: f64, max: f64) -> Self {
        self.min_speed = min;
        self.max_speed = max;
        self
    }

    pub fn with_patience_range(mut self, min: u64, max: u64) -> Self {
        self.min_patience = min;
        self.max_patience = max;
        self
    }
}
