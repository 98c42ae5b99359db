//! Scenario setup: event lists read from text files or generated at random.
//!
//! An event list is the sequence of initial rider and driver requests that
//! seeds a run. [parse] reads and writes the text format; [generate_requests]
//! produces reproducible random lists from [ScenarioParams].

mod build;
mod params;
pub mod parse;

pub use build::{
    create_matching, create_nearest_matching, create_simple_matching, generate_requests,
};
pub use params::{MatchingAlgorithmType, ScenarioParams};
pub use parse::{
    format_event_list, load_event_file, parse_event_list, Request, RequestRecord,
};
