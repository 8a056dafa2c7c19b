//! Deterministic randomness for baselines and user sampling.
//!
//! A small LCG keeps runs reproducible from a single `--seed` without pulling
//! in a full RNG crate.

use recbench_core::types::UserId;

/// Simple LCG random number generator.
#[derive(Debug, Clone)]
pub struct LcgRng {
    state: u64,
}

impl LcgRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Seeds from a base seed plus a string key, so each key gets its own
    /// reproducible stream.
    pub fn keyed(seed: u64, key: &str) -> Self {
        // FNV-1a over the key, mixed into the seed
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in key.bytes() {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        Self::new(seed ^ hash)
    }

    pub fn next_u64(&mut self) -> u64 {
        // LCG parameters from Numerical Recipes
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        self.state
    }

    pub fn next_usize(&mut self, max: usize) -> usize {
        // High bits have a longer period than the low ones
        ((self.next_u64() >> 33) as usize) % max
    }

    /// Partial Fisher-Yates: moves `n` randomly chosen elements to the front.
    pub fn shuffle_prefix<T>(&mut self, values: &mut [T], n: usize) {
        let n = n.min(values.len());
        for i in 0..n {
            let j = i + self.next_usize(values.len() - i);
            values.swap(i, j);
        }
    }
}

/// Draws up to `size` distinct users, keeping the result reproducible for a
/// given seed.
///
/// Returns every user (in input order) when `size` covers the population.
pub fn sample_users(users: &[UserId], size: usize, seed: u64) -> Vec<UserId> {
    if size >= users.len() {
        return users.to_vec();
    }

    let mut pool = users.to_vec();
    LcgRng::new(seed).shuffle_prefix(&mut pool, size);
    pool.truncate(size);
    pool
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn population(n: usize) -> Vec<UserId> {
        (0..n).map(|i| UserId::new(format!("u{}", i))).collect()
    }

    #[test]
    fn test_sample_is_reproducible() {
        let users = population(50);
        assert_eq!(sample_users(&users, 10, 7), sample_users(&users, 10, 7));
    }

    #[test]
    fn test_sample_is_distinct_and_sized() {
        let users = population(50);
        let sample = sample_users(&users, 10, 42);

        assert_eq!(sample.len(), 10);
        let distinct: HashSet<&UserId> = sample.iter().collect();
        assert_eq!(distinct.len(), 10);
    }

    #[test]
    fn test_oversized_sample_returns_everyone() {
        let users = population(3);
        assert_eq!(sample_users(&users, 500, 1), users);
    }

    #[test]
    fn test_keyed_streams_differ() {
        let mut a = LcgRng::keyed(1, "u1");
        let mut b = LcgRng::keyed(1, "u2");
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn test_next_usize_in_range() {
        let mut rng = LcgRng::new(3);
        for _ in 0..1000 {
            assert!(rng.next_usize(7) < 7);
        }
    }
}
