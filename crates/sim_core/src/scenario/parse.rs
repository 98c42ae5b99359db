//! Event-list ingestion.
//!
//! One request per line:
//!
//! ```text
//! <t> DriverRequest <id> <row,col> <speed>
//! <t> RiderRequest <id> <row,col> <row,col> <patience>
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::spatial::Location;

/// What an initial request declares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Request {
    Driver {
        id: String,
        location: Location,
        speed: f64,
    },
    Rider {
        id: String,
        origin: Location,
        destination: Location,
        patience: u64,
    },
}

impl Request {
    pub fn id(&self) -> &str {
        match self {
            Request::Driver { id, .. } | Request::Rider { id, .. } => id,
        }
    }
}

/// A timestamped request: one line of an event list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestRecord {
    pub timestamp: u64,
    pub request: Request,
}

impl RequestRecord {
    pub fn driver(timestamp: u64, id: impl Into<String>, location: Location, speed: f64) -> Self {
        Self {
            timestamp,
            request: Request::Driver {
                id: id.into(),
                location,
                speed,
            },
        }
    }

    pub fn rider(
        timestamp: u64,
        id: impl Into<String>,
        origin: Location,
        destination: Location,
        patience: u64,
    ) -> Self {
        Self {
            timestamp,
            request: Request::Rider {
                id: id.into(),
                origin,
                destination,
                patience,
            },
        }
    }
}

impl fmt::Display for RequestRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.request {
            Request::Driver {
                id,
                location,
                speed,
            } => write!(f, "{} DriverRequest {id} {location} {speed}", self.timestamp),
            Request::Rider {
                id,
                origin,
                destination,
                patience,
            } => write!(
                f,
                "{} RiderRequest {id} {origin} {destination} {patience}",
                self.timestamp
            ),
        }
    }
}

/// Render records in the event-list format, one per line.
pub fn format_event_list(records: &[RequestRecord]) -> String {
    records.iter().map(|record| format!("{record}\n")).collect()
}

/// Parse an event list. Identifiers must be unique among riders and among
/// drivers.
pub fn parse_event_list(input: &str) -> Result<Vec<RequestRecord>, ParseError> {
    let mut records = Vec::new();
    let mut riders = HashSet::new();
    let mut drivers = HashSet::new();

    for (index, raw) in input.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let record =
            parse_line(trimmed).map_err(|reason| ParseError::MalformedLine { line, reason })?;
        let seen = match record.request {
            Request::Driver { .. } => &mut drivers,
            Request::Rider { .. } => &mut riders,
        };
        if !seen.insert(record.request.id().to_string()) {
            return Err(ParseError::DuplicateId {
                line,
                id: record.request.id().to_string(),
            });
        }
        records.push(record);
    }

    Ok(records)
}

/// Read and parse an event-list file.
pub fn load_event_file(path: impl AsRef<Path>) -> Result<Vec<RequestRecord>, ParseError> {
    let contents = fs::read_to_string(path)?;
    parse_event_list(&contents)
}

fn parse_line(line: &str) -> Result<RequestRecord, String> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let timestamp = field::<u64>(&fields, 0, "timestamp")?;
    let kind = fields.get(1).copied().ok_or("missing request kind")?;

    let (request, expected) = match kind {
        "DriverRequest" => (
            Request::Driver {
                id: field::<String>(&fields, 2, "driver id")?,
                location: field(&fields, 3, "driver location")?,
                speed: field(&fields, 4, "driver speed")?,
            },
            5,
        ),
        "RiderRequest" => (
            Request::Rider {
                id: field::<String>(&fields, 2, "rider id")?,
                origin: field(&fields, 3, "rider origin")?,
                destination: field(&fields, 4, "rider destination")?,
                patience: field(&fields, 5, "rider patience")?,
            },
            6,
        ),
        other => return Err(format!("unknown request kind `{other}`")),
    };
    if fields.len() != expected {
        return Err(format!(
            "{kind} takes {expected} fields, found {}",
            fields.len()
        ));
    }

    Ok(RequestRecord { timestamp, request })
}

fn field<T>(fields: &[&str], index: usize, name: &str) -> Result<T, String>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = fields.get(index).ok_or_else(|| format!("missing {name}"))?;
    raw.parse()
        .map_err(|err| format!("invalid {name} `{raw}`: {err}"))
}
