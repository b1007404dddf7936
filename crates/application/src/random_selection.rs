//! Uniform random subsets of a candidate pool.

use rand::Rng;
use rand::seq::SliceRandom;

/// Draws up to `k` distinct members of `pool` uniformly at random.
///
/// Returns `min(k, pool.len())` elements. A non-positive `k` or an empty pool
/// yields an empty result. Uses the thread-local OS-seeded generator.
#[must_use]
pub fn sample<T>(pool: Vec<T>, k: i64) -> Vec<T> {
    sample_with_rng(pool, k, &mut rand::rng())
}

/// Same as [`sample`] with a caller-supplied generator.
///
/// The whole pool is Fisher-Yates shuffled before truncation, so every
/// subset and every ordering is equally likely.
#[must_use]
pub fn sample_with_rng<T, R>(mut pool: Vec<T>, k: i64, rng: &mut R) -> Vec<T>
where
    R: Rng + ?Sized,
{
    let k = usize::try_from(k).unwrap_or(0);
    if k == 0 || pool.is_empty() {
        return Vec::new();
    }

    pool.shuffle(rng);
    pool.truncate(k);
    pool
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, HashMap};

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::{sample, sample_with_rng};

    #[test]
    fn draws_requested_number_of_distinct_members() {
        let pool = vec![1, 2, 3, 4, 5];
        let drawn = sample(pool.clone(), 3);

        assert_eq!(drawn.len(), 3);
        let unique: BTreeSet<i64> = drawn.iter().copied().collect();
        assert_eq!(unique.len(), 3);
        assert!(drawn.iter().all(|id| pool.contains(id)));
    }

    #[test]
    fn undersized_pool_returns_everything() {
        let mut drawn = sample(vec![7, 8], 10);
        drawn.sort_unstable();
        assert_eq!(drawn, vec![7, 8]);
    }

    #[test]
    fn zero_negative_and_empty_inputs_yield_nothing() {
        assert!(sample(vec![1, 2, 3], 0).is_empty());
        assert!(sample(vec![1, 2, 3], -4).is_empty());
        assert!(sample(Vec::<i64>::new(), 5).is_empty());
    }

    #[test]
    fn seeded_generator_is_reproducible() {
        let pool: Vec<i64> = (1..=20).collect();
        let first = sample_with_rng(pool.clone(), 6, &mut StdRng::seed_from_u64(42));
        let second = sample_with_rng(pool, 6, &mut StdRng::seed_from_u64(42));

        assert_eq!(first, second);
    }

    #[test]
    fn membership_is_approximately_uniform() {
        let pool: Vec<i64> = (0..10).collect();
        let trials: u32 = 20_000;
        let k = 3;
        let mut rng = StdRng::seed_from_u64(7);
        let mut hits: HashMap<i64, u32> = HashMap::new();

        for _ in 0..trials {
            for id in sample_with_rng(pool.clone(), k, &mut rng) {
                *hits.entry(id).or_default() += 1;
            }
        }

        // Each member is expected in 30% of draws.
        let expected = f64::from(trials) * 0.3;
        for id in &pool {
            let observed = f64::from(hits.get(id).copied().unwrap_or_default());
            let deviation = (observed - expected).abs() / expected;
            assert!(
                deviation < 0.05,
                "member {id} drawn {observed} times, expected about {expected}"
            );
        }
    }

    #[test]
    fn first_position_is_not_biased_towards_pool_order() {
        let pool: Vec<i64> = (0..5).collect();
        let mut rng = StdRng::seed_from_u64(11);
        let mut first_counts = [0_u32; 5];

        for _ in 0..10_000 {
            let drawn = sample_with_rng(pool.clone(), 5, &mut rng);
            if let Some(first) = drawn.first().and_then(|id| usize::try_from(*id).ok()) {
                first_counts[first] += 1;
            }
        }

        for count in first_counts {
            assert!((1_700..=2_300).contains(&count), "count {count}");
        }
    }
}
