//! Test helpers for common test setup and utilities.
//!
//! This module provides shared test utilities to reduce duplication across test files.

use bevy_ecs::prelude::{Entity, World};

use crate::ecs::{Driver, Rider};
use crate::simulation::insert_resources;
use crate::spatial::Location;

/// Create a basic test world with the clock, dispatcher, index, nearest-driver
/// matching and an [crate::telemetry::ActivityMonitor].
pub fn create_test_world() -> World {
    let mut world = World::new();
    insert_resources(&mut world);
    world
}

/// Spawn a rider and register its identifier.
///
/// # Panics
///
/// Panics if the identifier is already taken.
pub fn spawn_rider(
    world: &mut World,
    id: &str,
    origin: Location,
    destination: Location,
    patience: u64,
) -> Entity {
    let entity = world.spawn(Rider::new(id, origin, destination, patience)).id();
    world
        .resource_mut::<crate::ecs::EntityIndex>()
        .insert_rider(id, entity)
        .expect("rider id should be unique in tests");
    entity
}

/// Spawn an idle driver and register its identifier.
///
/// # Panics
///
/// Panics if the identifier is already taken.
pub fn spawn_driver(world: &mut World, id: &str, location: Location, speed: f64) -> Entity {
    let entity = world.spawn(Driver::new(id, location, speed)).id();
    world
        .resource_mut::<crate::ecs::EntityIndex>()
        .insert_driver(id, entity)
        .expect("driver id should be unique in tests");
    entity
}

/// Put `driver` into the dispatcher's available pool, as a processed
/// DriverRequest with no waiting riders would.
pub fn make_available(world: &mut World, driver: Entity) {
    world
        .resource_mut::<crate::dispatcher::Dispatcher>()
        .request_rider(driver);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::Dispatcher;
    use crate::ecs::EntityIndex;

    #[test]
    fn test_world_has_core_resources() {
        let mut world = create_test_world();
        let rider = spawn_rider(&mut world, "R", Location::new(0, 0), Location::new(1, 1), 3);
        let driver = spawn_driver(&mut world, "D", Location::new(2, 2), 1.0);
        make_available(&mut world, driver);

        let index = world.resource::<EntityIndex>();
        assert_eq!(index.rider("R"), Some(rider));
        assert_eq!(index.driver("D"), Some(driver));
        assert!(world.resource::<Dispatcher>().is_available(driver));
    }
}
