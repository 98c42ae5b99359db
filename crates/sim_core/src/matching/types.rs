use bevy_ecs::prelude::Entity;

use crate::spatial::Location;

/// An available driver as seen by a matching algorithm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchCandidate {
    pub driver_entity: Entity,
    pub location: Location,
    pub speed: f64,
}
