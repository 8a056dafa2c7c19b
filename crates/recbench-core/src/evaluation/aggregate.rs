//! Shared aggregation helpers for the metric evaluators.
//!
//! Every evaluator follows the same policy: score each eligible user, skip
//! users whose recommendation is unusable, and average the per-user scores.
//! Skips are counted per reason instead of being logged one by one.

use crate::error::EvalError;
use crate::recommender::Recommendation;
use crate::types::ItemId;
use serde::Serialize;
use std::collections::BTreeMap;

/// Why a user did not contribute to a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Recommender returned [`Recommendation::Empty`]
    Unavailable,
    /// Recommender returned [`Recommendation::Failed`]
    Failed,
    /// Recommender returned zero items where the metric needs at least one
    NoItems,
    /// Only one relevance class in the user's test group (AUC undefined)
    SingleClass,
}

impl SkipReason {
    /// Maps an unusable recommendation to its skip reason.
    pub fn of(recommendation: &Recommendation) -> Option<Self> {
        match recommendation {
            Recommendation::Items(_) => None,
            Recommendation::Empty => Some(SkipReason::Unavailable),
            Recommendation::Failed(_) => Some(SkipReason::Failed),
        }
    }
}

/// Per-evaluator bookkeeping: how many users were scored, skipped, or excluded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EvalStats {
    /// Users that contributed a score
    pub scored: usize,
    /// Users excluded before calling the recommender (e.g. no positives)
    pub ineligible: usize,
    /// Users skipped after calling the recommender, by reason
    pub skipped: BTreeMap<SkipReason, usize>,
}

impl EvalStats {
    /// Records one skipped user.
    pub fn record_skip(&mut self, reason: SkipReason) {
        *self.skipped.entry(reason).or_insert(0) += 1;
    }

    /// Total skipped users across all reasons.
    pub fn total_skipped(&self) -> usize {
        self.skipped.values().sum()
    }

    /// Skipped users for one reason.
    pub fn skipped_for(&self, reason: SkipReason) -> usize {
        self.skipped.get(&reason).copied().unwrap_or(0)
    }
}

/// Running arithmetic mean.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanAccumulator {
    sum: f64,
    count: usize,
}

impl MeanAccumulator {
    /// Adds one sample.
    pub fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if no samples were added.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Mean of the samples, or `None` when there are none.
    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }

    /// Mean of the samples, or [`EvalError::NoEligibleUsers`] for `metric`.
    pub fn mean_or_err(
        &self,
        metric: &'static str,
        stats: &EvalStats,
    ) -> Result<f64, EvalError> {
        self.mean().ok_or(EvalError::NoEligibleUsers {
            metric,
            skipped: stats.total_skipped(),
            ineligible: stats.ineligible,
        })
    }
}

/// Named scores produced by one evaluator, plus its bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricOutcome {
    /// Metric name -> score
    pub scores: BTreeMap<String, f64>,
    /// Users scored/skipped/excluded while computing the scores
    pub stats: EvalStats,
}

impl MetricOutcome {
    /// Creates an outcome with a single named score.
    pub fn single(name: impl Into<String>, score: f64, stats: EvalStats) -> Self {
        let mut scores = BTreeMap::new();
        scores.insert(name.into(), score);
        Self { scores, stats }
    }

    /// Looks up a score by metric name.
    pub fn score(&self, name: &str) -> Option<f64> {
        self.scores.get(name).copied()
    }
}

/// Returns the leading `top_n` items of a usable recommendation, or the
/// reason the user must be skipped.
pub(crate) fn usable_items(
    recommendation: &Recommendation,
    top_n: usize,
) -> Result<&[ItemId], SkipReason> {
    match SkipReason::of(recommendation) {
        Some(reason) => Err(reason),
        None => recommendation.top(top_n).ok_or(SkipReason::Failed),
    }
}
