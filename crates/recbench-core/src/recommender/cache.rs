//! Memoizing recommender.
//!
//! Evaluators call the recommender independently, so a full benchmark run can
//! ask for the same `(user, top_n)` pair several times. [`CachedRecommender`]
//! answers repeats from memory. Every outcome is cached, failures included,
//! so a user that fails once is skipped consistently across metrics.

use super::{Recommendation, Recommender};
use crate::types::UserId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

/// Cache statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Calls answered from the cache
    pub hits: usize,
    /// Calls forwarded to the wrapped recommender
    pub misses: usize,
}

/// Wraps a recommender and memoizes results per `(user, top_n)`.
pub struct CachedRecommender<R> {
    inner: R,
    entries: Mutex<HashMap<(UserId, usize), Recommendation>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl<R: Recommender> CachedRecommender<R> {
    /// Creates an empty cache in front of `inner`.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            entries: Mutex::new(HashMap::new()),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    /// Returns hit/miss counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Number of cached `(user, top_n)` pairs.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the wrapped recommender.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Recommender> Recommender for CachedRecommender<R> {
    fn recommend(&self, user: &UserId, top_n: usize) -> Recommendation {
        let key = (user.clone(), top_n);

        if let Some(cached) = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return cached.clone();
        }

        // Lock is not held across the inner call
        self.misses.fetch_add(1, Ordering::Relaxed);
        let outcome = self.inner.recommend(user, top_n);
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, outcome.clone());
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_repeated_calls_hit_cache() {
        let calls = Cell::new(0);
        let counting = |_user: &UserId, top_n: usize| {
            calls.set(calls.get() + 1);
            Recommendation::items(["a", "b", "c"].into_iter().take(top_n))
        };
        let cached = CachedRecommender::new(counting);
        let user = UserId::from("u1");

        let first = cached.recommend(&user, 2);
        let second = cached.recommend(&user, 2);

        assert_eq!(first, second);
        assert_eq!(calls.get(), 1);
        assert_eq!(cached.stats(), CacheStats { hits: 1, misses: 1 });
    }

    #[test]
    fn test_distinct_sizes_are_distinct_entries() {
        let cached = CachedRecommender::new(|_user: &UserId, top_n: usize| {
            Recommendation::items(["a", "b", "c"].into_iter().take(top_n))
        });
        let user = UserId::from("u1");

        assert_eq!(cached.recommend(&user, 1).as_items().unwrap().len(), 1);
        assert_eq!(cached.recommend(&user, 3).as_items().unwrap().len(), 3);
        assert_eq!(cached.len(), 2);
        assert_eq!(cached.stats().misses, 2);
    }

    #[test]
    fn test_failures_are_cached() {
        let calls = Cell::new(0);
        let flaky = |_user: &UserId, _top_n: usize| {
            calls.set(calls.get() + 1);
            Recommendation::failed("backend unavailable")
        };
        let cached = CachedRecommender::new(flaky);
        let user = UserId::from("u1");

        assert!(!cached.recommend(&user, 5).is_usable());
        assert!(!cached.recommend(&user, 5).is_usable());
        assert_eq!(calls.get(), 1);
    }
}
