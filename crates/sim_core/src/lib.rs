pub mod spatial;
pub mod clock;
pub mod dispatcher;
pub mod ecs;
pub mod error;
pub mod matching;
pub mod profiling;
pub mod runner;
pub mod scenario;
pub mod simulation;
pub mod systems;
pub mod telemetry;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use error::{ParseError, SimError};
pub use simulation::{Simulation, SimulationSummary};
