//! Seeded random instance generation.

use knapcert_opt::{InstanceResult, Item, KnapsackInstance};
use rand::prelude::*;

/// Seed used when none is given, so that runs are reproducible.
pub const DEFAULT_SEED: u64 = 5489;

/// Draw `n` items whose weight and profit are uniform in `1..=max`.
///
/// Each item draws its weight first, then its profit.
pub fn random_instance(
    n: usize,
    max: i64,
    capacity: i64,
    seed: u64,
) -> InstanceResult<KnapsackInstance> {
    let mut rng = StdRng::seed_from_u64(seed);
    let items = (0..n)
        .map(|_| {
            let weight = rng.random_range(1..=max);
            let profit = rng.random_range(1..=max);
            Item { weight, profit }
        })
        .collect();
    KnapsackInstance::from_items(items, capacity)
}
