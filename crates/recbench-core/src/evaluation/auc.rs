//! Ranking AUC over each user's test group.
//!
//! For every row in a user's test group the evaluator builds a pair
//! `(y_true, y_score)`: `y_true` is 1 if the user clicked the row's item and
//! `y_score` is 1 if the item appears in the user's top-`pool` recommendation.
//! The ROC AUC of those pairs is averaged across users.
//!
//! The score is a 0/1 membership indicator, not the item's rank, so this
//! measures how well the recommended set separates clicked from non-clicked
//! items rather than fine-grained ordering. It is kept that way so results
//! stay comparable across runs.

use super::aggregate::{usable_items, EvalStats, MeanAccumulator, MetricOutcome, SkipReason};
use crate::config::AUC_CANDIDATE_POOL;
use crate::error::EvalError;
use crate::recommender::Recommender;
use crate::types::{InteractionLog, ItemId};
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::debug;

/// Score name produced by this evaluator.
pub const AUC_KEY: &str = "auc_score";

/// Computes the area under the ROC curve for binary labels and real scores.
///
/// Uses the Mann-Whitney formulation with average ranks, so a tie between a
/// positive and a negative counts one half.
///
/// # Formula
///
/// ```text
/// AUC = (Σ rank(positive) - P(P+1)/2) / (P · N)
/// ```
///
/// # Returns
///
/// `None` if the inputs differ in length or either class is absent.
pub fn roc_auc(y_true: &[bool], y_score: &[f64]) -> Option<f64> {
    if y_true.len() != y_score.len() {
        return None;
    }

    let positives = y_true.iter().filter(|&&label| label).count();
    let negatives = y_true.len() - positives;
    if positives == 0 || negatives == 0 {
        return None;
    }

    let mut order: Vec<usize> = (0..y_score.len()).collect();
    order.sort_by(|&a, &b| {
        y_score[a]
            .partial_cmp(&y_score[b])
            .unwrap_or(Ordering::Equal)
    });

    // Assign 1-based average ranks to runs of tied scores
    let mut rank_sum_positive = 0.0;
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && y_score[order[end]] == y_score[order[start]] {
            end += 1;
        }
        let average_rank = (start + 1 + end) as f64 / 2.0;
        for &idx in &order[start..end] {
            if y_true[idx] {
                rank_sum_positive += average_rank;
            }
        }
        start = end;
    }

    let p = positives as f64;
    let n = negatives as f64;
    Some((rank_sum_positive - p * (p + 1.0) / 2.0) / (p * n))
}

/// Computes mean indicator AUC with the default candidate pool of
/// [`AUC_CANDIDATE_POOL`] items.
///
/// # Errors
///
/// [`EvalError::NoEligibleUsers`] if no user could be scored.
pub fn auc_score<R>(
    recommender: &R,
    test_log: &InteractionLog,
) -> Result<MetricOutcome, EvalError>
where
    R: Recommender + ?Sized,
{
    auc_score_with_pool(recommender, test_log, AUC_CANDIDATE_POOL)
}

/// Computes mean indicator AUC, requesting `pool` candidates per user.
///
/// Users without a click are ineligible. Users whose group contains only
/// clicks (a single class) are skipped without calling the recommender,
/// since AUC is undefined for them. Users with an unusable recommendation
/// are skipped.
///
/// # Errors
///
/// - [`EvalError::InvalidCutoff`] if `pool == 0`
/// - [`EvalError::NoEligibleUsers`] if no user could be scored
pub fn auc_score_with_pool<R>(
    recommender: &R,
    test_log: &InteractionLog,
    pool: usize,
) -> Result<MetricOutcome, EvalError>
where
    R: Recommender + ?Sized,
{
    if pool == 0 {
        return Err(EvalError::InvalidCutoff(pool));
    }

    let mut stats = EvalStats::default();
    let mut auc = MeanAccumulator::default();

    for group in test_log.group_by_user() {
        let clicked = group.positive_items();
        if clicked.is_empty() {
            stats.ineligible += 1;
            continue;
        }

        let y_true: Vec<bool> = group
            .rows
            .iter()
            .map(|row| clicked.contains(&row.news_id))
            .collect();
        if y_true.iter().all(|&label| label) {
            stats.record_skip(SkipReason::SingleClass);
            continue;
        }

        let recommendation = recommender.recommend(group.user_id, pool);
        let recommended: HashSet<&ItemId> = match usable_items(&recommendation, pool) {
            Ok(items) => items.iter().collect(),
            Err(reason) => {
                stats.record_skip(reason);
                continue;
            }
        };

        let y_score: Vec<f64> = group
            .rows
            .iter()
            .map(|row| {
                if recommended.contains(&row.news_id) {
                    1.0
                } else {
                    0.0
                }
            })
            .collect();

        match roc_auc(&y_true, &y_score) {
            Some(score) => {
                auc.push(score);
                stats.scored += 1;
            }
            None => stats.record_skip(SkipReason::SingleClass),
        }
    }

    let score = auc.mean_or_err(AUC_KEY, &stats)?;

    debug!(
        pool,
        auc = score,
        scored = stats.scored,
        skipped = stats.total_skipped(),
        ineligible = stats.ineligible,
        "auc computed"
    );

    Ok(MetricOutcome::single(AUC_KEY, score, stats))
}
