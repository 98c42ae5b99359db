use bevy_ecs::prelude::{Entity, World};

use crate::clock::{Event, EventKind};
use crate::ecs::RiderStatus;
use crate::error::SimError;
use crate::telemetry::{Action, Category};

use super::{driver_mut, ensure_matched, notify, rider, rider_mut};

/// The driver reaches the rider's destination, becomes idle and asks for the
/// next rider straight away.
pub fn handle_dropoff(
    world: &mut World,
    now: u64,
    rider_entity: Entity,
    driver_entity: Entity,
) -> Result<Vec<Event>, SimError> {
    ensure_matched(world, rider_entity, driver_entity)?;
    let (rider_id, destination, status) = {
        let rider = rider(world, rider_entity)?;
        (rider.id.clone(), rider.destination, rider.status)
    };
    if status != RiderStatus::Satisfied {
        return Err(SimError::invariant(format!(
            "dropoff of rider `{rider_id}` that was never picked up (status {status:?})"
        )));
    }

    let driver_id = {
        let mut driver = driver_mut(world, driver_entity)?;
        driver.end_ride(destination);
        driver.id.clone()
    };
    rider_mut(world, rider_entity)?.status = RiderStatus::Satisfied;

    notify(world, now, Category::Driver, Action::Dropoff, &driver_id, destination);
    notify(world, now, Category::Rider, Action::Dropoff, &rider_id, destination);

    Ok(vec![Event::new(
        now,
        EventKind::DriverRequest {
            driver: driver_entity,
        },
    )])
}
