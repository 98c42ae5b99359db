//! Dispatcher: the waiting-rider queue, the driver pool and the matching entry points.
//!
//! Matching is greedy and immediate. A proposed match is not a committed one:
//! [Dispatcher::request_driver] and [Dispatcher::request_rider] only propose,
//! and the event that actually starts the drive calls
//! [Dispatcher::commit_match]. Cancellations racing a proposal are resolved by
//! the event layer through rider status checks.

use std::collections::VecDeque;

use bevy_ecs::prelude::{Entity, Mut, Resource, World};
use tracing::trace;

use crate::ecs::{Driver, Rider, RiderStatus};
use crate::error::SimError;
use crate::matching::{MatchCandidate, MatchingAlgorithm, MatchingAlgorithmResource};

#[derive(Debug, Default, Resource)]
pub struct Dispatcher {
    /// Riders with no committed driver, oldest first.
    waiting: VecDeque<Entity>,
    /// Every driver that ever requested a rider, in registration order.
    registered: Vec<Entity>,
    /// Registered drivers that are idle and eligible for matching.
    available: Vec<Entity>,
}

impl Dispatcher {
    /// Propose a driver for `rider`, or queue the rider when none is usable.
    ///
    /// `candidates` must describe the drivers in [Self::available_drivers], in
    /// the same order. The rider ends up `Waiting` either way; a rider already
    /// in the queue is not queued a second time.
    pub fn request_driver(
        &mut self,
        rider_entity: Entity,
        rider: &mut Rider,
        candidates: &[MatchCandidate],
        matching: &dyn MatchingAlgorithm,
    ) -> Option<Entity> {
        rider.status = RiderStatus::Waiting;

        let proposed = if candidates.is_empty() {
            None
        } else {
            matching.find_match(rider_entity, rider.origin, candidates)
        };

        match proposed {
            Some(driver) => {
                trace!(rider = %rider.id, ?driver, policy = matching.name(), "driver proposed");
                Some(driver)
            }
            None => {
                if !self.waiting.contains(&rider_entity) {
                    self.waiting.push_back(rider_entity);
                }
                trace!(rider = %rider.id, queued = self.waiting.len(), "no driver available");
                None
            }
        }
    }

    /// Register `driver` (first sight only) and propose the oldest waiting rider.
    ///
    /// The rider stays in the queue until the caller commits the match.
    pub fn request_rider(&mut self, driver: Entity) -> Option<Entity> {
        if !self.registered.contains(&driver) {
            self.registered.push(driver);
        }
        if !self.available.contains(&driver) {
            self.available.push(driver);
        }
        self.waiting.front().copied()
    }

    /// Cancel a queued rider.
    ///
    /// Fails with [SimError::InvariantViolation] when the rider is not in the
    /// waiting queue.
    pub fn cancel_ride(&mut self, rider_entity: Entity, rider: &mut Rider) -> Result<(), SimError> {
        let position = self
            .waiting
            .iter()
            .position(|queued| *queued == rider_entity)
            .ok_or_else(|| {
                SimError::invariant(format!(
                    "cannot cancel rider `{}`: not in the waiting queue",
                    rider.id
                ))
            })?;
        self.waiting.remove(position);
        rider.status = RiderStatus::Cancelled;
        Ok(())
    }

    /// Commit a proposed match: the driver leaves the pool and the rider
    /// leaves the waiting queue (if it was queued).
    pub fn commit_match(&mut self, rider: Entity, driver: Entity) {
        self.available.retain(|candidate| *candidate != driver);
        self.waiting.retain(|queued| *queued != rider);
    }

    pub fn waiting_riders(&self) -> impl Iterator<Item = Entity> + '_ {
        self.waiting.iter().copied()
    }

    pub fn available_drivers(&self) -> &[Entity] {
        &self.available
    }

    pub fn registered_drivers(&self) -> &[Entity] {
        &self.registered
    }

    pub fn is_waiting(&self, rider: Entity) -> bool {
        self.waiting.contains(&rider)
    }

    pub fn is_available(&self, driver: Entity) -> bool {
        self.available.contains(&driver)
    }

    pub fn waiting_len(&self) -> usize {
        self.waiting.len()
    }
}

/// Snapshot of the available drivers as matching candidates, in pool order.
pub fn available_candidates(world: &World) -> Result<Vec<MatchCandidate>, SimError> {
    world
        .resource::<Dispatcher>()
        .available_drivers()
        .iter()
        .map(|&driver_entity| {
            let driver = world
                .get::<Driver>(driver_entity)
                .ok_or(SimError::UnknownEntity(driver_entity))?;
            Ok(MatchCandidate {
                driver_entity,
                location: driver.location,
                speed: driver.speed,
            })
        })
        .collect()
}

/// Runs [Dispatcher::request_driver] against the world's current driver pool
/// and the installed matching algorithm.
pub fn request_driver(world: &mut World, rider_entity: Entity) -> Result<Option<Entity>, SimError> {
    let candidates = available_candidates(world)?;
    let mut rider = world
        .get::<Rider>(rider_entity)
        .cloned()
        .ok_or(SimError::UnknownEntity(rider_entity))?;

    let proposed = world.resource_scope(|world, mut dispatcher: Mut<Dispatcher>| {
        let matching = world.resource::<MatchingAlgorithmResource>();
        dispatcher.request_driver(rider_entity, &mut rider, &candidates, &**matching)
    });

    if let Some(mut slot) = world.get_mut::<Rider>(rider_entity) {
        *slot = rider;
    }
    Ok(proposed)
}
