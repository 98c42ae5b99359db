//! The simulation loop: load an event list, drain the queue, report.
//!
//! [Simulation] owns the [World] with the clock, dispatcher, identifier index,
//! matching policy and monitor. Riders and drivers are spawned when the event
//! list is loaded; their requests are the initial events of the run.

use std::collections::HashSet;

use bevy_ecs::prelude::World;
use serde::Serialize;
use tracing::info;

use crate::clock::{EventKind, SimulationClock};
use crate::dispatcher::Dispatcher;
use crate::ecs::{Driver, EntityIndex, Rider, RiderStatus};
use crate::error::SimError;
use crate::matching::MatchingAlgorithmResource;
use crate::profiling::EventMetrics;
use crate::runner::run_until_empty;
use crate::scenario::{Request, RequestRecord};
use crate::spatial::is_valid_speed;
use crate::telemetry::{Monitor, MonitorResource, Report};

/// Insert the resources every run needs: clock, dispatcher, identifier index,
/// nearest-driver matching and an [crate::telemetry::ActivityMonitor].
pub fn insert_resources(world: &mut World) {
    world.insert_resource(SimulationClock::default());
    world.insert_resource(Dispatcher::default());
    world.insert_resource(EntityIndex::default());
    world.insert_resource(MatchingAlgorithmResource::default());
    world.insert_resource(MonitorResource::default());
}

/// Final state counts of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SimulationSummary {
    pub final_time: u64,
    pub riders_total: usize,
    pub riders_waiting: usize,
    pub riders_cancelled: usize,
    pub riders_satisfied: usize,
    pub drivers_total: usize,
    pub drivers_idle: usize,
}

pub struct Simulation {
    world: World,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulation {
    pub fn new() -> Self {
        let mut world = World::new();
        insert_resources(&mut world);
        Self { world }
    }

    pub fn with_matching(mut self, matching: MatchingAlgorithmResource) -> Self {
        self.world.insert_resource(matching);
        self
    }

    pub fn with_monitor(mut self, monitor: Box<dyn Monitor>) -> Self {
        self.world.insert_resource(MonitorResource::new(monitor));
        self
    }

    /// Record per-kind event counts in an [EventMetrics] resource.
    pub fn with_metrics(mut self) -> Self {
        self.world.insert_resource(EventMetrics::default());
        self
    }

    /// Spawn the declared riders and drivers and schedule their requests.
    ///
    /// Records are scheduled in the given order, which fixes the processing
    /// order of requests sharing a timestamp. The whole batch is checked
    /// first: on error nothing is spawned or scheduled.
    pub fn load(&mut self, records: &[RequestRecord]) -> Result<(), SimError> {
        self.validate(records)?;
        for record in records {
            let kind = match &record.request {
                Request::Driver {
                    id,
                    location,
                    speed,
                } => {
                    let driver = self
                        .world
                        .spawn(Driver::new(id.as_str(), *location, *speed))
                        .id();
                    self.world
                        .resource_mut::<EntityIndex>()
                        .insert_driver(id, driver)?;
                    EventKind::DriverRequest { driver }
                }
                Request::Rider {
                    id,
                    origin,
                    destination,
                    patience,
                } => {
                    let rider = self
                        .world
                        .spawn(Rider::new(id.as_str(), *origin, *destination, *patience))
                        .id();
                    self.world
                        .resource_mut::<EntityIndex>()
                        .insert_rider(id, rider)?;
                    EventKind::RiderRequest { rider }
                }
            };
            self.world
                .resource_mut::<SimulationClock>()
                .schedule_at(record.timestamp, kind);
        }
        Ok(())
    }

    /// Load `records`, process every event and return the monitor's report.
    ///
    /// A fatal error aborts the run; no report is produced.
    pub fn run(&mut self, records: &[RequestRecord]) -> Result<Report, SimError> {
        self.load(records)?;
        self.run_loaded()
    }

    /// Process every pending event and return the monitor's report.
    pub fn run_loaded(&mut self) -> Result<Report, SimError> {
        info!(
            riders = self.world.resource::<EntityIndex>().rider_count(),
            drivers = self.world.resource::<EntityIndex>().driver_count(),
            events = self.world.resource::<SimulationClock>().len(),
            matching = self.world.resource::<MatchingAlgorithmResource>().name(),
            "simulation started"
        );

        let steps = run_until_empty(&mut self.world, usize::MAX)?;
        self.ensure_all_riders_settled()?;

        info!(
            steps,
            final_time = self.world.resource::<SimulationClock>().now(),
            "simulation finished"
        );
        Ok(self.world.resource::<MonitorResource>().report())
    }

    pub fn rider(&self, id: &str) -> Option<&Rider> {
        let entity = self.world.resource::<EntityIndex>().rider(id)?;
        self.world.get::<Rider>(entity)
    }

    pub fn driver(&self, id: &str) -> Option<&Driver> {
        let entity = self.world.resource::<EntityIndex>().driver(id)?;
        self.world.get::<Driver>(entity)
    }

    pub fn summary(&self) -> SimulationSummary {
        let index = self.world.resource::<EntityIndex>();
        let mut summary = SimulationSummary {
            final_time: self.world.resource::<SimulationClock>().now(),
            riders_total: index.rider_count(),
            drivers_total: index.driver_count(),
            ..SimulationSummary::default()
        };
        for rider in index.rider_entities().filter_map(|e| self.world.get::<Rider>(e)) {
            match rider.status {
                RiderStatus::Unset => {}
                RiderStatus::Waiting => summary.riders_waiting += 1,
                RiderStatus::Cancelled => summary.riders_cancelled += 1,
                RiderStatus::Satisfied => summary.riders_satisfied += 1,
            }
        }
        summary.drivers_idle = index
            .driver_entities()
            .filter_map(|e| self.world.get::<Driver>(e))
            .filter(|driver| driver.is_idle)
            .count();
        summary
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    fn validate(&self, records: &[RequestRecord]) -> Result<(), SimError> {
        let now = self.world.resource::<SimulationClock>().now();
        let index = self.world.resource::<EntityIndex>();
        let mut riders = HashSet::new();
        let mut drivers = HashSet::new();
        for record in records {
            if record.timestamp < now {
                return Err(SimError::invariant(format!(
                    "request for `{}` at t={} is before the current time {now}",
                    record.request.id(),
                    record.timestamp
                )));
            }
            match &record.request {
                Request::Driver { id, speed, .. } => {
                    if !is_valid_speed(*speed) {
                        return Err(SimError::InvalidSpeed {
                            id: id.clone(),
                            speed: *speed,
                        });
                    }
                    if index.driver(id).is_some() || !drivers.insert(id.as_str()) {
                        return Err(SimError::DuplicateId(id.clone()));
                    }
                }
                Request::Rider { id, .. } => {
                    if index.rider(id).is_some() || !riders.insert(id.as_str()) {
                        return Err(SimError::DuplicateId(id.clone()));
                    }
                }
            }
        }
        Ok(())
    }

    fn ensure_all_riders_settled(&self) -> Result<(), SimError> {
        let index = self.world.resource::<EntityIndex>();
        for entity in index.rider_entities() {
            let rider = self
                .world
                .get::<Rider>(entity)
                .ok_or(SimError::UnknownEntity(entity))?;
            if !rider.status.is_terminal() {
                return Err(SimError::invariant(format!(
                    "rider `{}` ended the run with status {:?}",
                    rider.id, rider.status
                )));
            }
        }
        if self.world.resource::<Dispatcher>().waiting_len() != 0 {
            return Err(SimError::invariant("waiting queue not empty at end of run"));
        }
        Ok(())
    }
}
