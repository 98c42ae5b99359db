use bevy_ecs::prelude::Entity;

use crate::spatial::Location;

use super::types::MatchCandidate;

/// Trait for matching algorithms that pick a driver for a requesting rider.
///
/// `available_drivers` is ordered by registration; algorithms that break ties
/// should prefer the earlier entry so repeated runs pick the same driver.
pub trait MatchingAlgorithm: Send + Sync {
    /// Returns the chosen driver, or `None` when no candidate is usable.
    fn find_match(
        &self,
        rider_entity: Entity,
        rider_origin: Location,
        available_drivers: &[MatchCandidate],
    ) -> Option<Entity>;

    fn name(&self) -> &'static str;
}
