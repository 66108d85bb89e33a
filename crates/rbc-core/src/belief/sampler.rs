//! Cardinality cap on the belief set.

use super::BeliefSet;
use rand::Rng;
use rand::seq::IteratorRandom;

/// Default cap applied after expansion and before oracle queries.
pub const DEFAULT_SAMPLE_LIMIT: usize = 10_000;

/// Returns `beliefs` unchanged when it fits in `limit`, otherwise a uniformly
/// random subset of exactly `limit` members.
pub fn cap<R: Rng + ?Sized>(beliefs: &BeliefSet, limit: usize, rng: &mut R) -> BeliefSet {
    if beliefs.len() <= limit {
        return beliefs.clone();
    }
    beliefs
        .iter()
        .choose_multiple(rng, limit)
        .into_iter()
        .cloned()
        .collect()
}
