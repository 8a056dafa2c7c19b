//! Catalog coverage: how much of the item universe a recommender ever surfaces.
//!
//! ```text
//! coverage = |∪ recommended@k(u) for u in sample| / |universe|
//! ```

use super::aggregate::{usable_items, EvalStats, MetricOutcome};
use crate::error::EvalError;
use crate::recommender::Recommender;
use crate::types::{ItemId, UserId};
use std::collections::HashSet;
use tracing::debug;

/// Score name produced by this evaluator.
pub const COVERAGE_KEY: &str = "coverage";

/// Computes catalog coverage of top-`k` recommendations over `user_sample`.
///
/// Users with an unusable recommendation contribute nothing but do not fail
/// the metric; if every user is skipped the coverage is `0.0`. Recommended
/// items outside `item_universe` still enter the union, so only a
/// recommender that invents items can push the score above 1.
///
/// # Errors
///
/// - [`EvalError::InvalidCutoff`] if `k == 0`
/// - [`EvalError::EmptyItemUniverse`] if `item_universe` is empty
///
/// # Example
///
/// ```
/// use recbench_core::evaluation::coverage;
/// use recbench_core::recommender::Recommendation;
/// use recbench_core::types::{ItemId, UserId};
/// use std::collections::HashSet;
///
/// let universe: HashSet<ItemId> = ["i1", "i2", "i3", "i4"].into_iter().map(ItemId::from).collect();
/// let users = vec![UserId::from("u1"), UserId::from("u2")];
/// let recommender = |user: &UserId, _top_n: usize| match user.as_str() {
///     "u1" => Recommendation::items(["i1", "i2"]),
///     _ => Recommendation::items(["i2", "i3"]),
/// };
///
/// let outcome = coverage(&recommender, &universe, &users, 2).unwrap();
/// assert_eq!(outcome.score("coverage"), Some(0.75));
/// ```
pub fn coverage<R>(
    recommender: &R,
    item_universe: &HashSet<ItemId>,
    user_sample: &[UserId],
    k: usize,
) -> Result<MetricOutcome, EvalError>
where
    R: Recommender + ?Sized,
{
    if k == 0 {
        return Err(EvalError::InvalidCutoff(k));
    }
    if item_universe.is_empty() {
        return Err(EvalError::EmptyItemUniverse);
    }

    let mut stats = EvalStats::default();
    let mut recommended: HashSet<ItemId> = HashSet::new();

    for user in user_sample {
        let recommendation = recommender.recommend(user, k);
        match usable_items(&recommendation, k) {
            Ok(items) => {
                recommended.extend(items.iter().cloned());
                stats.scored += 1;
            }
            Err(reason) => stats.record_skip(reason),
        }
    }

    let outside_universe = recommended
        .iter()
        .filter(|item| !item_universe.contains(*item))
        .count();
    let score = recommended.len() as f64 / item_universe.len() as f64;

    debug!(
        k,
        coverage = score,
        distinct_items = recommended.len(),
        universe = item_universe.len(),
        outside_universe,
        scored = stats.scored,
        skipped = stats.total_skipped(),
        "coverage computed"
    );

    Ok(MetricOutcome::single(COVERAGE_KEY, score, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::aggregate::SkipReason;
    use crate::test_utils::{fixed_recommender, items, users};

    #[test]
    fn test_union_over_users() {
        let universe = items(&["i1", "i2", "i3", "i4"]);
        let rec = fixed_recommender(&[("u1", "i1 i2"), ("u2", "i2 i3")]);

        let outcome = coverage(&rec, &universe, &users(&["u1", "u2"]), 2).unwrap();
        assert!((outcome.score(COVERAGE_KEY).unwrap() - 0.75).abs() < 1e-12);
        assert_eq!(outcome.stats.scored, 2);
    }

    #[test]
    fn test_failed_users_contribute_nothing() {
        let universe = items(&["i1", "i2", "i3", "i4"]);
        let rec = fixed_recommender(&[("u1", "i1 i2")]);

        let outcome = coverage(&rec, &universe, &users(&["u1", "ghost"]), 2).unwrap();
        assert!((outcome.score(COVERAGE_KEY).unwrap() - 0.5).abs() < 1e-12);
        assert_eq!(outcome.stats.skipped_for(SkipReason::Unavailable), 1);
    }

    #[test]
    fn test_all_skipped_is_zero() {
        let universe = items(&["i1"]);
        let rec = fixed_recommender(&[]);

        let outcome = coverage(&rec, &universe, &users(&["u1", "u2"]), 5).unwrap();
        assert_eq!(outcome.score(COVERAGE_KEY), Some(0.0));
    }

    #[test]
    fn test_only_top_k_counts() {
        let universe = items(&["i1", "i2", "i3", "i4"]);
        let rec = fixed_recommender(&[("u1", "i1 i2 i3 i4")]);

        let outcome = coverage(&rec, &universe, &users(&["u1"]), 1).unwrap();
        assert!((outcome.score(COVERAGE_KEY).unwrap() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_monotone_in_user_sample() {
        let universe = items(&["i1", "i2", "i3", "i4", "i5"]);
        let rec = fixed_recommender(&[("u1", "i1 i2"), ("u2", "i2 i3"), ("u3", "i5")]);
        let all = users(&["u1", "u2", "u3"]);

        let mut previous = 0.0;
        for n in 0..=all.len() {
            let score = coverage(&rec, &universe, &all[..n], 2)
                .unwrap()
                .score(COVERAGE_KEY)
                .unwrap();
            assert!(score >= previous);
            previous = score;
        }
    }

    #[test]
    fn test_empty_universe_is_error() {
        let rec = fixed_recommender(&[]);
        assert_eq!(
            coverage(&rec, &HashSet::new(), &users(&["u1"]), 5),
            Err(EvalError::EmptyItemUniverse)
        );
    }

    #[test]
    fn test_zero_k_is_error() {
        let rec = fixed_recommender(&[]);
        assert_eq!(
            coverage(&rec, &items(&["i1"]), &users(&["u1"]), 0),
            Err(EvalError::InvalidCutoff(0))
        );
    }
}
