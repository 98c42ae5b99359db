use bevy_ecs::prelude::{Entity, World};

use crate::clock::{Event, EventKind};
use crate::dispatcher::Dispatcher;
use crate::ecs::RiderStatus;
use crate::error::SimError;
use crate::telemetry::{Action, Category};

use super::{after, driver, notify, rider, start_drive};

/// An idle driver asks for a rider.
///
/// The driver joins the available pool. If a rider is waiting, the driver
/// heads for the oldest one and a Pickup is scheduled for its arrival.
pub fn handle_driver_request(
    world: &mut World,
    now: u64,
    driver_entity: Entity,
) -> Result<Vec<Event>, SimError> {
    let (id, location, is_idle) = {
        let driver = driver(world, driver_entity)?;
        (driver.id.clone(), driver.location, driver.is_idle)
    };
    if !is_idle {
        return Err(SimError::invariant(format!(
            "driver `{id}` requested a rider while occupied"
        )));
    }
    notify(world, now, Category::Driver, Action::Request, &id, location);

    let Some(rider_entity) = world.resource_mut::<Dispatcher>().request_rider(driver_entity) else {
        return Ok(Vec::new());
    };

    let status = rider(world, rider_entity)?.status;
    if status != RiderStatus::Waiting {
        return Err(SimError::invariant(format!(
            "queued rider {rider_entity:?} has status {status:?}"
        )));
    }

    let drive = start_drive(world, rider_entity, driver_entity)?;
    Ok(vec![Event::new(
        after(now, drive)?,
        EventKind::Pickup {
            rider: rider_entity,
            driver: driver_entity,
        },
    )])
}
