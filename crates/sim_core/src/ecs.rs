//! Entity components and the identifier index.
//!
//! Riders and drivers live in the [bevy_ecs::prelude::World], which acts as the
//! arena for every entity in a run. Events refer to them by [Entity] handle and
//! look up the current component state when they are applied.

use std::collections::HashMap;

use bevy_ecs::prelude::{Component, Entity, Resource};
use serde::Serialize;

use crate::error::SimError;
use crate::spatial::{is_valid_speed, travel_time, Location};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum RiderStatus {
    /// Declared but its request has not been processed yet.
    #[default]
    Unset,
    Waiting,
    Cancelled,
    /// Picked up (and later dropped off) by a driver.
    Satisfied,
}

impl RiderStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, RiderStatus::Cancelled | RiderStatus::Satisfied)
    }
}

#[derive(Debug, Clone, PartialEq, Component)]
pub struct Rider {
    pub id: String,
    pub origin: Location,
    pub destination: Location,
    /// Time units the rider waits before cancelling.
    pub patience: u64,
    pub status: RiderStatus,
    /// Driver committed to this rider (driving toward it or carrying it).
    pub matched_driver: Option<Entity>,
    /// Simulation time when the rider's request was processed.
    pub requested_at: Option<u64>,
}

impl Rider {
    pub fn new(
        id: impl Into<String>,
        origin: Location,
        destination: Location,
        patience: u64,
    ) -> Self {
        Self {
            id: id.into(),
            origin,
            destination,
            patience,
            status: RiderStatus::Unset,
            matched_driver: None,
            requested_at: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Component)]
pub struct Driver {
    pub id: String,
    pub location: Location,
    /// Distance units per time unit.
    pub speed: f64,
    pub destination: Option<Location>,
    pub is_idle: bool,
    /// Rider this driver is driving toward or carrying.
    pub matched_rider: Option<Entity>,
}

impl Driver {
    pub fn new(id: impl Into<String>, location: Location, speed: f64) -> Self {
        Self {
            id: id.into(),
            location,
            speed,
            destination: None,
            is_idle: true,
            matched_rider: None,
        }
    }

    /// Travel time from the current location to `to` at this driver's speed.
    pub fn travel_time_to(&self, to: Location) -> Result<u64, SimError> {
        self.travel_time_between(self.location, to)
    }

    pub fn travel_time_between(&self, from: Location, to: Location) -> Result<u64, SimError> {
        if !is_valid_speed(self.speed) {
            return Err(SimError::InvalidSpeed {
                id: self.id.clone(),
                speed: self.speed,
            });
        }
        travel_time(self.speed, from, to).ok_or_else(|| {
            SimError::TimeOverflow(format!(
                "driver `{}` from {from} to {to} at speed {}",
                self.id, self.speed
            ))
        })
    }

    /// Start driving toward `rider`'s origin. Returns the drive duration.
    pub fn start_drive(&mut self, rider: Entity, origin: Location) -> Result<u64, SimError> {
        let duration = self.travel_time_to(origin)?;
        self.is_idle = false;
        self.destination = Some(origin);
        self.matched_rider = Some(rider);
        Ok(duration)
    }

    /// Arrive at the rider's origin and start the ride to `destination`.
    /// Returns the ride duration.
    pub fn start_ride(&mut self, origin: Location, destination: Location) -> Result<u64, SimError> {
        let duration = self.travel_time_between(origin, destination)?;
        self.location = origin;
        self.destination = Some(destination);
        Ok(duration)
    }

    /// Arrive at the current destination and become idle.
    pub fn end_ride(&mut self, at: Location) {
        self.location = at;
        self.release();
    }

    /// Drop the current assignment without moving.
    pub fn release(&mut self) {
        self.destination = None;
        self.is_idle = true;
        self.matched_rider = None;
    }
}

/// Identifier string to entity lookup. Riders and drivers have separate
/// namespaces; an identifier may not repeat within one.
#[derive(Debug, Default, Resource)]
pub struct EntityIndex {
    riders: HashMap<String, Entity>,
    drivers: HashMap<String, Entity>,
}

impl EntityIndex {
    pub fn insert_rider(&mut self, id: &str, entity: Entity) -> Result<(), SimError> {
        if self.riders.contains_key(id) {
            return Err(SimError::DuplicateId(id.to_string()));
        }
        self.riders.insert(id.to_string(), entity);
        Ok(())
    }

    pub fn insert_driver(&mut self, id: &str, entity: Entity) -> Result<(), SimError> {
        if self.drivers.contains_key(id) {
            return Err(SimError::DuplicateId(id.to_string()));
        }
        self.drivers.insert(id.to_string(), entity);
        Ok(())
    }

    pub fn rider(&self, id: &str) -> Option<Entity> {
        self.riders.get(id).copied()
    }

    pub fn driver(&self, id: &str) -> Option<Entity> {
        self.drivers.get(id).copied()
    }

    pub fn rider_count(&self) -> usize {
        self.riders.len()
    }

    pub fn driver_count(&self) -> usize {
        self.drivers.len()
    }

    pub fn rider_entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.riders.values().copied()
    }

    pub fn driver_entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.drivers.values().copied()
    }
}
