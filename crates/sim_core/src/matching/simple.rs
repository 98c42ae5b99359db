use bevy_ecs::prelude::Entity;

use crate::spatial::{is_valid_speed, Location};

use super::algorithm::MatchingAlgorithm;
use super::types::MatchCandidate;

/// First-come-first-served matching: the earliest registered available driver
/// wins, regardless of distance. Drivers that cannot move are skipped.
#[derive(Debug, Default)]
pub struct SimpleMatching;

impl MatchingAlgorithm for SimpleMatching {
    fn find_match(
        &self,
        _rider_entity: Entity,
        _rider_origin: Location,
        available_drivers: &[MatchCandidate],
    ) -> Option<Entity> {
        available_drivers
            .iter()
            .find(|candidate| is_valid_speed(candidate.speed))
            .map(|candidate| candidate.driver_entity)
    }

    fn name(&self) -> &'static str {
        "simple"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_first_movable_driver() {
        let drivers = [
            MatchCandidate {
                driver_entity: Entity::from_raw(1),
                location: Location::new(50, 50),
                speed: 0.0,
            },
            MatchCandidate {
                driver_entity: Entity::from_raw(2),
                location: Location::new(40, 40),
                speed: 1.0,
            },
            MatchCandidate {
                driver_entity: Entity::from_raw(3),
                location: Location::new(0, 0),
                speed: 1.0,
            },
        ];
        let result = SimpleMatching.find_match(Entity::from_raw(9), Location::new(0, 0), &drivers);
        assert_eq!(result, Some(Entity::from_raw(2)));
        assert_eq!(
            SimpleMatching.find_match(Entity::from_raw(9), Location::new(0, 0), &[]),
            None
        );
    }
}
