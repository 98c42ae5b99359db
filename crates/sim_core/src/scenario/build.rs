use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::matching::{MatchingAlgorithmResource, NearestDriverMatching, SimpleMatching};
use crate::scenario::params::{MatchingAlgorithmType, ScenarioParams};
use crate::scenario::parse::RequestRecord;
use crate::spatial::Location;

pub fn create_nearest_matching() -> MatchingAlgorithmResource {
    MatchingAlgorithmResource::new(Box::new(NearestDriverMatching))
}

pub fn create_simple_matching() -> MatchingAlgorithmResource {
    MatchingAlgorithmResource::new(Box::new(SimpleMatching))
}

pub fn create_matching(kind: MatchingAlgorithmType) -> MatchingAlgorithmResource {
    match kind {
        MatchingAlgorithmType::Nearest => create_nearest_matching(),
        MatchingAlgorithmType::Simple => create_simple_matching(),
    }
}

/// Generate a random event list, ordered by timestamp with drivers ahead of
/// riders on equal timestamps. The same seed always yields the same list.
pub fn generate_requests(params: &ScenarioParams) -> Vec<RequestRecord> {
    let mut rng = match params.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut records = Vec::with_capacity(params.num_drivers + params.num_riders);
    for n in 0..params.num_drivers {
        let timestamp = if n < params.initial_driver_count {
            0
        } else {
            rng.gen_range(0..=params.request_window)
        };
        let location = random_location(&mut rng, params);
        let speed = if params.max_speed > params.min_speed {
            rng.gen_range(params.min_speed..=params.max_speed)
        } else {
            params.min_speed
        };
        records.push(RequestRecord::driver(
            timestamp,
            format!("D{}", n + 1),
            location,
            speed,
        ));
    }
    for n in 0..params.num_riders {
        let timestamp = rng.gen_range(0..=params.request_window);
        let origin = random_location(&mut rng, params);
        let destination = random_location(&mut rng, params);
        let patience =
            rng.gen_range(params.min_patience..=params.max_patience.max(params.min_patience));
        records.push(RequestRecord::rider(
            timestamp,
            format!("R{}", n + 1),
            origin,
            destination,
            patience,
        ));
    }

    records.sort_by_key(|record| record.timestamp);
    records
}

fn random_location<R: Rng>(rng: &mut R, params: &ScenarioParams) -> Location {
    Location::new(
        rng.gen_range(0..params.grid_rows.max(1)),
        rng.gen_range(0..params.grid_columns.max(1)),
    )
}
