use bevy_ecs::prelude::{Entity, World};

use crate::clock::{Event, EventKind};
use crate::dispatcher;
use crate::ecs::RiderStatus;
use crate::error::SimError;
use crate::telemetry::{Action, Category};

use super::{after, notify, rider, rider_mut, start_drive};

/// A rider asks for a driver.
///
/// When a driver is proposed it starts driving toward the rider at once and a
/// Pickup is scheduled for its arrival. A Cancellation is always scheduled at
/// the end of the rider's patience; whichever is processed first decides the
/// rider's fate.
pub fn handle_rider_request(
    world: &mut World,
    now: u64,
    rider_entity: Entity,
) -> Result<Vec<Event>, SimError> {
    let (id, origin, patience, status) = {
        let rider = rider(world, rider_entity)?;
        (rider.id.clone(), rider.origin, rider.patience, rider.status)
    };
    if status != RiderStatus::Unset {
        return Err(SimError::invariant(format!(
            "rider `{id}` requested a driver twice (status {status:?})"
        )));
    }
    rider_mut(world, rider_entity)?.requested_at = Some(now);
    notify(world, now, Category::Rider, Action::Request, &id, origin);

    let mut events = Vec::with_capacity(2);
    if let Some(driver_entity) = dispatcher::request_driver(world, rider_entity)? {
        let drive = start_drive(world, rider_entity, driver_entity)?;
        events.push(Event::new(
            after(now, drive)?,
            EventKind::Pickup {
                rider: rider_entity,
                driver: driver_entity,
            },
        ));
    }
    events.push(Event::new(
        after(now, patience)?,
        EventKind::Cancellation {
            rider: rider_entity,
        },
    ));
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::Dispatcher;
    use crate::ecs::{Driver, Rider};
    use crate::spatial::Location;
    use crate::test_helpers::{create_test_world, make_available, spawn_driver, spawn_rider};

    #[test]
    fn rider_without_drivers_waits_and_schedules_cancellation() {
        let mut world = create_test_world();
        let rider_entity =
            spawn_rider(&mut world, "R1", Location::new(1, 1), Location::new(4, 4), 7);

        let events = handle_rider_request(&mut world, 3, rider_entity).expect("apply");

        assert_eq!(
            events,
            vec![Event::new(10, EventKind::Cancellation { rider: rider_entity })]
        );
        let rider = world.get::<Rider>(rider_entity).expect("rider");
        assert_eq!(rider.status, RiderStatus::Waiting);
        assert_eq!(rider.requested_at, Some(3));
        assert_eq!(rider.matched_driver, None);
        assert!(world.resource::<Dispatcher>().is_waiting(rider_entity));
    }

    #[test]
    fn matched_rider_schedules_pickup_before_cancellation() {
        let mut world = create_test_world();
        let driver_entity = spawn_driver(&mut world, "D1", Location::new(0, 0), 10.0);
        make_available(&mut world, driver_entity);
        let rider_entity =
            spawn_rider(&mut world, "R1", Location::new(10, 0), Location::new(20, 0), 5);

        let events = handle_rider_request(&mut world, 1, rider_entity).expect("apply");

        assert_eq!(
            events,
            vec![
                Event::new(
                    2,
                    EventKind::Pickup {
                        rider: rider_entity,
                        driver: driver_entity
                    }
                ),
                Event::new(6, EventKind::Cancellation { rider: rider_entity }),
            ]
        );

        let driver = world.get::<Driver>(driver_entity).expect("driver");
        assert!(!driver.is_idle);
        assert_eq!(driver.destination, Some(Location::new(10, 0)));
        assert_eq!(driver.matched_rider, Some(rider_entity));

        let dispatcher = world.resource::<Dispatcher>();
        assert!(!dispatcher.is_available(driver_entity));
        assert!(!dispatcher.is_waiting(rider_entity));
        assert_eq!(
            world.get::<Rider>(rider_entity).map(|r| r.status),
            Some(RiderStatus::Waiting)
        );
    }

    #[test]
    fn second_request_for_same_rider_is_rejected() {
        let mut world = create_test_world();
        let rider_entity =
            spawn_rider(&mut world, "R1", Location::new(0, 0), Location::new(1, 0), 2);
        handle_rider_request(&mut world, 0, rider_entity).expect("first");

        let err = handle_rider_request(&mut world, 1, rider_entity).unwrap_err();
        assert!(matches!(err, SimError::InvariantViolation(_)));
        assert_eq!(world.resource::<Dispatcher>().waiting_len(), 1);
    }

    #[test]
    fn patience_past_end_of_time_is_an_error() {
        let mut world = create_test_world();
        let rider_entity = spawn_rider(
            &mut world,
            "R1",
            Location::new(0, 0),
            Location::new(1, 1),
            u64::MAX,
        );

        let err = handle_rider_request(&mut world, 5, rider_entity).unwrap_err();
        assert!(matches!(err, SimError::TimeOverflow(_)));
    }

    #[test]
    fn driver_that_can_never_arrive_is_not_proposed() {
        let mut world = create_test_world();
        let driver_entity = spawn_driver(&mut world, "D1", Location::new(0, 0), 1e-300);
        make_available(&mut world, driver_entity);
        let rider_entity =
            spawn_rider(&mut world, "R1", Location::new(1, 1), Location::new(2, 2), 3);

        let events = handle_rider_request(&mut world, 1, rider_entity).expect("apply");

        assert_eq!(
            events,
            vec![Event::new(4, EventKind::Cancellation { rider: rider_entity })]
        );
        assert!(world.resource::<Dispatcher>().is_waiting(rider_entity));
        assert!(world.get::<Driver>(driver_entity).expect("driver").is_idle);
    }

    #[test]
    fn unrepresentable_drive_time_is_an_error() {
        let mut world = create_test_world();
        world.insert_resource(crate::scenario::create_simple_matching());
        let driver_entity = spawn_driver(&mut world, "D1", Location::new(0, 0), 1e-300);
        make_available(&mut world, driver_entity);
        let rider_entity =
            spawn_rider(&mut world, "R1", Location::new(1, 1), Location::new(2, 2), 3);

        let err = handle_rider_request(&mut world, 1, rider_entity).unwrap_err();
        assert!(matches!(err, SimError::TimeOverflow(_)));
    }

    #[test]
    fn unknown_rider_is_reported() {
        let mut world = create_test_world();
        let ghost = world.spawn_empty().id();
        assert_eq!(
            handle_rider_request(&mut world, 0, ghost),
            Err(SimError::UnknownEntity(ghost))
        );
    }
}
