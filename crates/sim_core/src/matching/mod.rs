//! Driver selection policies used by the dispatcher.

pub mod algorithm;
pub mod nearest;
pub mod simple;
pub mod types;

use bevy_ecs::prelude::Resource;

pub use algorithm::MatchingAlgorithm;
pub use nearest::NearestDriverMatching;
pub use simple::SimpleMatching;
pub use types::MatchCandidate;

/// Resource wrapper for the matching algorithm trait object.
#[derive(Resource)]
pub struct MatchingAlgorithmResource(pub Box<dyn MatchingAlgorithm>);

impl MatchingAlgorithmResource {
    pub fn new(algorithm: Box<dyn MatchingAlgorithm>) -> Self {
        Self(algorithm)
    }
}

impl Default for MatchingAlgorithmResource {
    fn default() -> Self {
        Self::new(Box::new(NearestDriverMatching))
    }
}

impl std::ops::Deref for MatchingAlgorithmResource {
    type Target = dyn MatchingAlgorithm;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}
