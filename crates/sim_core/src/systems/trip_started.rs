use bevy_ecs::prelude::{Entity, World};
use tracing::debug;

use crate::clock::{Event, EventKind};
use crate::ecs::RiderStatus;
use crate::error::SimError;
use crate::telemetry::{Action, Category};

use super::{after, driver_mut, ensure_matched, notify, rider, rider_mut};

/// The driver reaches the rider's origin.
///
/// The rider's status at this moment settles any race with its Cancellation:
/// a still-waiting rider is picked up and a Dropoff is scheduled; a cancelled
/// rider releases the driver, who immediately asks for another rider.
pub fn handle_pickup(
    world: &mut World,
    now: u64,
    rider_entity: Entity,
    driver_entity: Entity,
) -> Result<Vec<Event>, SimError> {
    ensure_matched(world, rider_entity, driver_entity)?;
    let (rider_id, origin, destination, status) = {
        let rider = rider(world, rider_entity)?;
        (rider.id.clone(), rider.origin, rider.destination, rider.status)
    };

    let driver_id = {
        let mut driver = driver_mut(world, driver_entity)?;
        driver.location = origin;
        driver.id.clone()
    };
    notify(world, now, Category::Driver, Action::Pickup, &driver_id, origin);

    match status {
        RiderStatus::Waiting => {
            let ride = driver_mut(world, driver_entity)?.start_ride(origin, destination)?;
            rider_mut(world, rider_entity)?.status = RiderStatus::Satisfied;
            notify(world, now, Category::Rider, Action::Pickup, &rider_id, origin);
            Ok(vec![Event::new(
                after(now, ride)?,
                EventKind::Dropoff {
                    rider: rider_entity,
                    driver: driver_entity,
                },
            )])
        }
        RiderStatus::Cancelled => {
            debug!(rider = %rider_id, driver = %driver_id, "rider cancelled before pickup");
            driver_mut(world, driver_entity)?.release();
            rider_mut(world, rider_entity)?.matched_driver = None;
            Ok(vec![Event::new(
                now,
                EventKind::DriverRequest {
                    driver: driver_entity,
                },
            )])
        }
        RiderStatus::Unset | RiderStatus::Satisfied => Err(SimError::invariant(format!(
            "pickup of rider `{rider_id}` with status {status:?}"
        ))),
    }
}
