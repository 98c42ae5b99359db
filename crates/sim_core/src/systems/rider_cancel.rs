use bevy_ecs::prelude::{Entity, Mut, World};
use tracing::debug;

use crate::clock::Event;
use crate::dispatcher::Dispatcher;
use crate::ecs::{Rider, RiderStatus};
use crate::error::SimError;
use crate::telemetry::{Action, Category};

use super::{notify, rider, rider_mut};

/// The rider's patience ran out.
///
/// Only a `Waiting` rider is cancelled. A queued rider leaves the waiting
/// queue; a rider whose driver is already on the way is just marked
/// `Cancelled`, and the driver finds out at Pickup. For a rider that was
/// already picked up or cancelled this is a no-op.
pub fn handle_cancellation(
    world: &mut World,
    now: u64,
    rider_entity: Entity,
) -> Result<Vec<Event>, SimError> {
    let (id, origin, status, matched_driver) = {
        let rider = rider(world, rider_entity)?;
        (rider.id.clone(), rider.origin, rider.status, rider.matched_driver)
    };

    match status {
        RiderStatus::Waiting => {}
        RiderStatus::Cancelled | RiderStatus::Satisfied => {
            debug!(rider = %id, ?status, "late cancellation ignored");
            return Ok(Vec::new());
        }
        RiderStatus::Unset => {
            return Err(SimError::invariant(format!(
                "cancellation for rider `{id}` before its request"
            )));
        }
    }

    if world.resource::<Dispatcher>().is_waiting(rider_entity) {
        world.resource_scope(|world, mut dispatcher: Mut<Dispatcher>| {
            let mut rider = world
                .get_mut::<Rider>(rider_entity)
                .ok_or(SimError::UnknownEntity(rider_entity))?;
            dispatcher.cancel_ride(rider_entity, &mut rider)
        })?;
    } else if matched_driver.is_some() {
        rider_mut(world, rider_entity)?.status = RiderStatus::Cancelled;
    } else {
        return Err(SimError::invariant(format!(
            "waiting rider `{id}` is neither queued nor matched"
        )));
    }

    notify(world, now, Category::Rider, Action::Cancel, &id, origin);
    Ok(Vec::new())
}
