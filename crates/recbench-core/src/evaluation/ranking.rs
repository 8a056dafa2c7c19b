//! Precision@k and Recall@k over a held-out interaction log.
//!
//! # Formula
//!
//! ```text
//! hits = |recommended@k ∩ clicked|
//! P@k  = hits / k
//! R@k  = hits / |clicked|
//! ```
//!
//! The precision denominator is the requested `k`, not the number of items
//! actually returned, so a recommender that returns short lists is penalized.

use super::aggregate::{usable_items, EvalStats, MeanAccumulator, MetricOutcome};
use crate::error::EvalError;
use crate::recommender::Recommender;
use crate::types::{InteractionLog, ItemId};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// Score name for precision at cutoff `k`.
pub fn precision_key(k: usize) -> String {
    format!("precision@{}", k)
}

/// Score name for recall at cutoff `k`.
pub fn recall_key(k: usize) -> String {
    format!("recall@{}", k)
}

/// Number of distinct recommended items that the user clicked.
pub fn count_hits(recommended: &[ItemId], clicked: &HashSet<&ItemId>) -> usize {
    let recommended: HashSet<&ItemId> = recommended.iter().collect();
    recommended.intersection(clicked).count()
}

/// Computes mean Precision@k and Recall@k over every user in `test_log`.
///
/// Users without a single click are excluded (not scored as zero). Users
/// whose recommendation is unusable are skipped. Both means are taken over
/// the same set of scored users.
///
/// # Errors
///
/// - [`EvalError::InvalidCutoff`] if `k == 0`
/// - [`EvalError::NoEligibleUsers`] if no user could be scored
///
/// # Example
///
/// ```
/// use recbench_core::evaluation::precision_recall_at_k;
/// use recbench_core::recommender::Recommendation;
/// use recbench_core::types::{Interaction, InteractionLog, UserId};
///
/// let log = InteractionLog::new(vec![
///     Interaction::click("u1", "i1"),
///     Interaction::skip("u1", "i2"),
///     Interaction::click("u1", "i3"),
/// ]);
/// let recommender = |_user: &UserId, _top_n: usize| Recommendation::items(["i1", "i3"]);
///
/// let outcome = precision_recall_at_k(&recommender, &log, 2).unwrap();
/// assert_eq!(outcome.score("precision@2"), Some(1.0));
/// assert_eq!(outcome.score("recall@2"), Some(1.0));
/// ```
pub fn precision_recall_at_k<R>(
    recommender: &R,
    test_log: &InteractionLog,
    k: usize,
) -> Result<MetricOutcome, EvalError>
where
    R: Recommender + ?Sized,
{
    if k == 0 {
        return Err(EvalError::InvalidCutoff(k));
    }

    let mut stats = EvalStats::default();
    let mut precision = MeanAccumulator::default();
    let mut recall = MeanAccumulator::default();

    for group in test_log.group_by_user() {
        let clicked = group.positive_items();
        if clicked.is_empty() {
            stats.ineligible += 1;
            continue;
        }

        let recommendation = recommender.recommend(group.user_id, k);
        let items = match usable_items(&recommendation, k) {
            Ok(items) => items,
            Err(reason) => {
                stats.record_skip(reason);
                continue;
            }
        };

        let hits = count_hits(items, &clicked);
        precision.push(hits as f64 / k as f64);
        recall.push(hits as f64 / clicked.len() as f64);
        stats.scored += 1;
    }

    let precision = precision.mean_or_err("precision@k", &stats)?;
    let recall = recall.mean_or_err("recall@k", &stats)?;

    debug!(
        k,
        precision,
        recall,
        scored = stats.scored,
        skipped = stats.total_skipped(),
        ineligible = stats.ineligible,
        "precision/recall computed"
    );

    let mut scores = BTreeMap::new();
    scores.insert(precision_key(k), precision);
    scores.insert(recall_key(k), recall);
    Ok(MetricOutcome { scores, stats })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::aggregate::SkipReason;
    use crate::recommender::Recommendation;
    use crate::test_utils::{fixed_recommender, log};
    use crate::types::UserId;

    #[test]
    fn test_perfect_recommender() {
        let test_log = log(&[("u1", "i1", 1), ("u1", "i2", 0), ("u1", "i3", 1)]);
        let rec = fixed_recommender(&[("u1", "i1 i3")]);

        let outcome = precision_recall_at_k(&rec, &test_log, 2).unwrap();
        assert!((outcome.score("precision@2").unwrap() - 1.0).abs() < 1e-12);
        assert!((outcome.score("recall@2").unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(outcome.stats.scored, 1);
    }

    #[test]
    fn test_precision_uses_requested_k() {
        // Only one item returned for k = 4: precision is 1/4, not 1/1
        let test_log = log(&[("u1", "i1", 1), ("u1", "i2", 1)]);
        let rec = fixed_recommender(&[("u1", "i1")]);

        let outcome = precision_recall_at_k(&rec, &test_log, 4).unwrap();
        assert!((outcome.score("precision@4").unwrap() - 0.25).abs() < 1e-12);
        assert!((outcome.score("recall@4").unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_mean_over_scored_users_only() {
        let test_log = log(&[
            ("u1", "i1", 1),
            ("u2", "i2", 1),
            ("u3", "i3", 0), // no positives: ineligible
            ("u4", "i4", 1), // recommender fails: skipped
        ]);
        let rec = |user: &UserId, _top_n: usize| match user.as_str() {
            "u1" => Recommendation::items(["i1"]),
            "u2" => Recommendation::items(["x"]),
            _ => Recommendation::failed("unknown user"),
        };

        let outcome = precision_recall_at_k(&rec, &test_log, 1).unwrap();
        assert!((outcome.score("precision@1").unwrap() - 0.5).abs() < 1e-12);
        assert!((outcome.score("recall@1").unwrap() - 0.5).abs() < 1e-12);
        assert_eq!(outcome.stats.scored, 2);
        assert_eq!(outcome.stats.ineligible, 1);
        assert_eq!(outcome.stats.skipped_for(SkipReason::Failed), 1);
    }

    #[test]
    fn test_extra_items_beyond_k_are_ignored() {
        let test_log = log(&[("u1", "i1", 1), ("u1", "i2", 1)]);
        let rec = fixed_recommender(&[("u1", "x i1 i2")]);

        let outcome = precision_recall_at_k(&rec, &test_log, 1).unwrap();
        assert_eq!(outcome.score("precision@1"), Some(0.0));
    }

    #[test]
    fn test_duplicate_recommendations_count_once() {
        let test_log = log(&[("u1", "i1", 1)]);
        let rec = fixed_recommender(&[("u1", "i1 i1")]);

        let outcome = precision_recall_at_k(&rec, &test_log, 2).unwrap();
        assert!((outcome.score("precision@2").unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_all_skipped_is_error() {
        let test_log = log(&[("u1", "i1", 1), ("u2", "i2", 0)]);
        let rec = |_user: &UserId, _top_n: usize| Recommendation::Empty;

        let err = precision_recall_at_k(&rec, &test_log, 5).unwrap_err();
        assert_eq!(
            err,
            EvalError::NoEligibleUsers {
                metric: "precision@k",
                skipped: 1,
                ineligible: 1,
            }
        );
    }

    #[test]
    fn test_zero_k_is_error() {
        let test_log = log(&[("u1", "i1", 1)]);
        let rec = fixed_recommender(&[]);
        assert_eq!(
            precision_recall_at_k(&rec, &test_log, 0),
            Err(EvalError::InvalidCutoff(0))
        );
    }

    #[test]
    fn test_empty_list_is_scored_as_zero() {
        let test_log = log(&[("u1", "i1", 1)]);
        let rec = |_user: &UserId, _top_n: usize| Recommendation::Items(Vec::new());

        let outcome = precision_recall_at_k(&rec, &test_log, 3).unwrap();
        assert_eq!(outcome.score("precision@3"), Some(0.0));
        assert_eq!(outcome.score("recall@3"), Some(0.0));
        assert_eq!(outcome.stats.scored, 1);
    }

    #[test]
    fn test_count_hits() {
        let a = ItemId::from("a");
        let b = ItemId::from("b");
        let clicked: HashSet<&ItemId> = [&a, &b].into_iter().collect();
        let recommended = vec![ItemId::from("a"), ItemId::from("c"), ItemId::from("b")];
        assert_eq!(count_hits(&recommended, &clicked), 2);
    }
}
