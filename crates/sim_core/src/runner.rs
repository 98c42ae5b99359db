//! Simulation runner: advances the clock and routes events into the world.
//!
//! Each step pops the earliest event from [SimulationClock], applies it through
//! [apply_event] and schedules every event it returns. Steps never overlap, so
//! the world is only ever mutated by one event at a time.

use bevy_ecs::prelude::World;
use tracing::error;

use crate::clock::{Event, SimulationClock};
use crate::error::SimError;
use crate::profiling::EventMetrics;
use crate::systems::apply_event;

/// Runs one simulation step.
/// Returns `Ok(true)` if an event was processed, `Ok(false)` if the clock was empty.
pub fn run_next_event(world: &mut World) -> Result<bool, SimError> {
    run_next_event_with_hook(world, |_, _| {})
}

/// Runs one simulation step and invokes `hook` after the event's results are scheduled.
pub fn run_next_event_with_hook<F>(world: &mut World, mut hook: F) -> Result<bool, SimError>
where
    F: FnMut(&World, &Event),
{
    let event = {
        let mut clock = world.resource_mut::<SimulationClock>();
        if clock.is_empty() {
            return Ok(false);
        }
        clock.remove()?
    };

    // Track event metrics if EventMetrics resource exists
    if let Some(mut metrics) = world.get_resource_mut::<EventMetrics>() {
        metrics.record_event(&event.kind);
    }

    let spawned = apply_event(world, event).map_err(|err| {
        error!(timestamp = event.timestamp, event = event.kind.name(), %err, "event failed");
        err
    })?;
    world.resource_mut::<SimulationClock>().schedule_all(spawned);

    hook(world, &event);
    Ok(true)
}

/// Runs simulation steps until the event queue is empty or `max_steps` is reached.
/// Returns the number of steps executed.
pub fn run_until_empty(world: &mut World, max_steps: usize) -> Result<usize, SimError> {
    run_until_empty_with_hook(world, max_steps, |_, _| {})
}

/// Runs simulation steps until empty and invokes `hook` after each step.
pub fn run_until_empty_with_hook<F>(
    world: &mut World,
    max_steps: usize,
    mut hook: F,
) -> Result<usize, SimError>
where
    F: FnMut(&World, &Event),
{
    let mut steps = 0;
    while steps < max_steps && run_next_event_with_hook(world, &mut hook)? {
        steps += 1;
    }
    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::EventKind;
    use crate::ecs::{Driver, Rider, RiderStatus};
    use crate::spatial::Location;
    use crate::test_helpers::{create_test_world, spawn_driver, spawn_rider};

    #[test]
    fn empty_clock_runs_no_steps() {
        let mut world = create_test_world();
        assert_eq!(run_next_event(&mut world), Ok(false));
        assert_eq!(run_until_empty(&mut world, 10), Ok(0));
    }

    #[test]
    fn drains_single_ride_and_reports_each_event() {
        let mut world = create_test_world();
        world.insert_resource(EventMetrics::default());
        let driver = spawn_driver(&mut world, "D1", Location::new(0, 0), 10.0);
        let rider = spawn_rider(&mut world, "R1", Location::new(10, 0), Location::new(20, 0), 5);
        {
            let mut clock = world.resource_mut::<SimulationClock>();
            clock.schedule_at(0, EventKind::DriverRequest { driver });
            clock.schedule_at(1, EventKind::RiderRequest { rider });
        }

        let mut seen = Vec::new();
        let steps = run_until_empty_with_hook(&mut world, 100, |_, event| {
            seen.push((event.timestamp, event.kind.name()));
        })
        .expect("run");

        assert_eq!(
            seen,
            vec![
                (0, "DriverRequest"),
                (1, "RiderRequest"),
                (2, "Pickup"),
                (3, "Dropoff"),
                (3, "DriverRequest"),
                (6, "Cancellation"),
            ]
        );
        assert_eq!(steps, 6);
        assert!(world.resource::<SimulationClock>().is_empty());
        assert_eq!(world.resource::<SimulationClock>().now(), 6);
        assert_eq!(world.resource::<EventMetrics>().count("DriverRequest"), 2);
        assert_eq!(
            world.get::<Rider>(rider).map(|r| r.status),
            Some(RiderStatus::Satisfied)
        );
        assert!(world.get::<Driver>(driver).map_or(false, |d| d.is_idle));
    }

    #[test]
    fn max_steps_bounds_the_run() {
        let mut world = create_test_world();
        let rider = spawn_rider(&mut world, "R1", Location::new(0, 0), Location::new(1, 1), 3);
        world
            .resource_mut::<SimulationClock>()
            .schedule_at(0, EventKind::RiderRequest { rider });

        assert_eq!(run_until_empty(&mut world, 1), Ok(1));
        assert_eq!(world.resource::<SimulationClock>().len(), 1);
    }

    #[test]
    fn failing_event_aborts_the_run() {
        let mut world = create_test_world();
        let rider = spawn_rider(&mut world, "R1", Location::new(0, 0), Location::new(1, 1), 3);
        {
            let mut clock = world.resource_mut::<SimulationClock>();
            clock.schedule_at(0, EventKind::Cancellation { rider });
            clock.schedule_at(1, EventKind::RiderRequest { rider });
        }

        let err = run_until_empty(&mut world, 100).unwrap_err();
        assert!(matches!(err, SimError::InvariantViolation(_)));
        // The request behind the failing event was never applied.
        assert_eq!(world.resource::<SimulationClock>().len(), 1);
    }
}
