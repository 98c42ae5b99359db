#![allow(dead_code)]

use sim_core::scenario::{create_matching, MatchingAlgorithmType, RequestRecord};
use sim_core::telemetry::Monitor;
use sim_core::Simulation;

/// Builder for simulations used across integration tests.
#[derive(Default)]
pub struct TestSimulationBuilder {
    matching: MatchingAlgorithmType,
    monitor: Option<Box<dyn Monitor>>,
    metrics: bool,
}

impl TestSimulationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_matching(mut self, matching: MatchingAlgorithmType) -> Self {
        self.matching = matching;
        self
    }

    pub fn with_monitor(mut self, monitor: Box<dyn Monitor>) -> Self {
        self.monitor = Some(monitor);
        self
    }

    pub fn with_metrics(mut self) -> Self {
        self.metrics = true;
        self
    }

    pub fn build(self) -> Simulation {
        let mut simulation = Simulation::new().with_matching(create_matching(self.matching));
        if let Some(monitor) = self.monitor {
            simulation = simulation.with_monitor(monitor);
        }
        if self.metrics {
            simulation = simulation.with_metrics();
        }
        simulation
    }

    /// Build and load `records` without processing any event.
    pub fn load(self, records: &[RequestRecord]) -> Simulation {
        let mut simulation = self.build();
        simulation.load(records).expect("records should load");
        simulation
    }
}
