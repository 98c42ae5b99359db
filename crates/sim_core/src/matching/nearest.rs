use bevy_ecs::prelude::Entity;

use crate::spatial::{travel_time, Location};

use super::algorithm::MatchingAlgorithm;
use super::types::MatchCandidate;

/// Nearest-driver matching: selects the available driver with the smallest
/// travel time to the rider's origin.
///
/// Ties go to the driver that appears first in `available_drivers`, i.e. the
/// one registered earlier. Drivers with an unusable speed are never chosen.
#[derive(Debug, Default)]
pub struct NearestDriverMatching;

impl MatchingAlgorithm for NearestDriverMatching {
    fn find_match(
        &self,
        _rider_entity: Entity,
        rider_origin: Location,
        available_drivers: &[MatchCandidate],
    ) -> Option<Entity> {
        let mut best_match: Option<(Entity, u64)> = None;

        for candidate in available_drivers {
            let Some(time) = travel_time(candidate.speed, candidate.location, rider_origin) else {
                continue;
            };
            match best_match {
                None => best_match = Some((candidate.driver_entity, time)),
                // Strictly smaller only: equal times keep the earlier driver.
                Some((_, best_time)) if time < best_time => {
                    best_match = Some((candidate.driver_entity, time))
                }
                _ => {}
            }
        }

        best_match.map(|(driver_entity, _)| driver_entity)
    }

    fn name(&self) -> &'static str {
        "nearest"
    }
}
