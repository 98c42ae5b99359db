//! Event transitions.
//!
//! Each event kind has one handler that mutates the world and returns the
//! follow-on events. Handlers run one at a time; a handler finishes all of its
//! mutations before the runner pops the next event.

pub mod driver_request;
pub mod rider_cancel;
pub mod rider_request;
pub mod trip_completed;
pub mod trip_started;

use bevy_ecs::prelude::{Entity, Mut, World};
use tracing::debug;

use crate::clock::{Event, EventKind};
use crate::dispatcher::Dispatcher;
use crate::ecs::{Driver, Rider};
use crate::error::SimError;
use crate::spatial::Location;
use crate::telemetry::{Action, Category, MonitorResource};

/// Apply `event` to the world and return the events it spawns.
pub fn apply_event(world: &mut World, event: Event) -> Result<Vec<Event>, SimError> {
    let now = event.timestamp;
    let spawned = match event.kind {
        EventKind::RiderRequest { rider } => rider_request::handle_rider_request(world, now, rider),
        EventKind::DriverRequest { driver } => {
            driver_request::handle_driver_request(world, now, driver)
        }
        EventKind::Cancellation { rider } => rider_cancel::handle_cancellation(world, now, rider),
        EventKind::Pickup { rider, driver } => {
            trip_started::handle_pickup(world, now, rider, driver)
        }
        EventKind::Dropoff { rider, driver } => {
            trip_completed::handle_dropoff(world, now, rider, driver)
        }
    }?;

    debug!(
        timestamp = now,
        event = event.kind.name(),
        spawned = spawned.len(),
        "event applied"
    );
    Ok(spawned)
}

pub(crate) fn rider(world: &World, entity: Entity) -> Result<&Rider, SimError> {
    world
        .get::<Rider>(entity)
        .ok_or(SimError::UnknownEntity(entity))
}

pub(crate) fn driver(world: &World, entity: Entity) -> Result<&Driver, SimError> {
    world
        .get::<Driver>(entity)
        .ok_or(SimError::UnknownEntity(entity))
}

pub(crate) fn rider_mut(world: &mut World, entity: Entity) -> Result<Mut<'_, Rider>, SimError> {
    world
        .get_mut::<Rider>(entity)
        .ok_or(SimError::UnknownEntity(entity))
}

pub(crate) fn driver_mut(world: &mut World, entity: Entity) -> Result<Mut<'_, Driver>, SimError> {
    world
        .get_mut::<Driver>(entity)
        .ok_or(SimError::UnknownEntity(entity))
}

pub(crate) fn notify(
    world: &mut World,
    timestamp: u64,
    category: Category,
    action: Action,
    id: &str,
    location: Location,
) {
    if let Some(mut monitor) = world.get_resource_mut::<MonitorResource>() {
        monitor.notify(timestamp, category, action, id, location);
    }
}

/// Timestamp `delay` units after `now`.
pub(crate) fn after(now: u64, delay: u64) -> Result<u64, SimError> {
    now.checked_add(delay)
        .ok_or_else(|| SimError::TimeOverflow(format!("t={now} plus {delay}")))
}

/// Send `driver_entity` toward `rider_entity`'s origin and commit the match
/// with the dispatcher. Returns the drive duration.
pub(crate) fn start_drive(
    world: &mut World,
    rider_entity: Entity,
    driver_entity: Entity,
) -> Result<u64, SimError> {
    let origin = rider(world, rider_entity)?.origin;
    let duration = driver_mut(world, driver_entity)?.start_drive(rider_entity, origin)?;
    rider_mut(world, rider_entity)?.matched_driver = Some(driver_entity);
    world
        .resource_mut::<Dispatcher>()
        .commit_match(rider_entity, driver_entity);
    Ok(duration)
}

/// Both sides of a trip must point at each other.
pub(crate) fn ensure_matched(
    world: &World,
    rider_entity: Entity,
    driver_entity: Entity,
) -> Result<(), SimError> {
    let rider = rider(world, rider_entity)?;
    let driver = driver(world, driver_entity)?;
    if rider.matched_driver != Some(driver_entity) || driver.matched_rider != Some(rider_entity) {
        return Err(SimError::invariant(format!(
            "driver `{}` and rider `{}` are not matched to each other",
            driver.id, rider.id
        )));
    }
    Ok(())
}
