//! Novelty: mean self-information of recommended items.
//!
//! Item popularity is the item's share of all clicks in the training log.
//! Self-information `-ln(p)` is high for rarely clicked items, so a higher
//! novelty means the recommender favors the long tail.
//!
//! Items absent from the popularity table (never clicked in training) count
//! as self-information 0, the same as an item with probability 1. This
//! treats unseen items as maximally popular, which may be the opposite of
//! what "novel" should mean; it is kept for comparability with earlier runs.

use super::aggregate::{usable_items, EvalStats, MeanAccumulator, MetricOutcome, SkipReason};
use crate::error::EvalError;
use crate::recommender::Recommender;
use crate::types::{InteractionLog, ItemId, UserId};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Score name produced by this evaluator.
pub const NOVELTY_KEY: &str = "novelty";

/// Empirical click probability of each item in a training log.
#[derive(Debug, Clone, Default)]
pub struct PopularityTable {
    probabilities: HashMap<ItemId, f64>,
    total_clicks: usize,
}

impl PopularityTable {
    /// Builds the table from the clicked rows of `train_log`.
    ///
    /// # Example
    ///
    /// ```
    /// use recbench_core::evaluation::PopularityTable;
    /// use recbench_core::types::{Interaction, InteractionLog, ItemId};
    ///
    /// let train = InteractionLog::new(vec![
    ///     Interaction::click("u1", "i1"),
    ///     Interaction::click("u2", "i1"),
    ///     Interaction::click("u3", "i1"),
    ///     Interaction::click("u1", "i2"),
    ///     Interaction::skip("u2", "i3"),
    /// ]);
    /// let table = PopularityTable::from_log(&train);
    ///
    /// assert_eq!(table.probability(&ItemId::from("i1")), Some(0.75));
    /// assert_eq!(table.probability(&ItemId::from("i3")), None);
    /// ```
    pub fn from_log(train_log: &InteractionLog) -> Self {
        let mut counts: HashMap<&ItemId, usize> = HashMap::new();
        for row in train_log.rows().iter().filter(|row| row.clicked) {
            *counts.entry(&row.news_id).or_insert(0) += 1;
        }

        let total_clicks: usize = counts.values().sum();
        let probabilities = counts
            .into_iter()
            .map(|(item, count)| (item.clone(), count as f64 / total_clicks as f64))
            .collect();

        Self {
            probabilities,
            total_clicks,
        }
    }

    /// Click probability of `item`, or `None` if it was never clicked.
    pub fn probability(&self, item: &ItemId) -> Option<f64> {
        self.probabilities.get(item).copied()
    }

    /// Self-information `-ln(p)` of `item`; 0 for items not in the table.
    pub fn self_information(&self, item: &ItemId) -> f64 {
        self.probability(item).map(|p| -p.ln()).unwrap_or(0.0)
    }

    /// Total clicks the table was built from.
    pub fn total_clicks(&self) -> usize {
        self.total_clicks
    }

    /// Number of distinct clicked items.
    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    /// Returns true if the training log had no clicks.
    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }
}

/// Computes mean novelty of top-`k` recommendations over `user_sample`.
///
/// Per user, novelty is the mean self-information of the recommended items;
/// the final score is the mean over users. Users with an unusable
/// recommendation, or with zero recommended items, are skipped.
///
/// # Errors
///
/// - [`EvalError::InvalidCutoff`] if `k == 0`
/// - [`EvalError::NoEligibleUsers`] if no user could be scored
pub fn novelty<R>(
    recommender: &R,
    train_log: &InteractionLog,
    user_sample: &[UserId],
    k: usize,
) -> Result<MetricOutcome, EvalError>
where
    R: Recommender + ?Sized,
{
    if k == 0 {
        return Err(EvalError::InvalidCutoff(k));
    }

    let popularity = PopularityTable::from_log(train_log);
    if popularity.is_empty() {
        warn!("training log has no clicks; every item scores zero novelty");
    }
    novelty_with_table(recommender, &popularity, user_sample, k)
}

/// Computes novelty against a prebuilt [`PopularityTable`].
pub fn novelty_with_table<R>(
    recommender: &R,
    popularity: &PopularityTable,
    user_sample: &[UserId],
    k: usize,
) -> Result<MetricOutcome, EvalError>
where
    R: Recommender + ?Sized,
{
    if k == 0 {
        return Err(EvalError::InvalidCutoff(k));
    }

    let mut stats = EvalStats::default();
    let mut novelty = MeanAccumulator::default();

    for user in user_sample {
        let recommendation = recommender.recommend(user, k);
        let items = match usable_items(&recommendation, k) {
            Ok(items) => items,
            Err(reason) => {
                stats.record_skip(reason);
                continue;
            }
        };

        let mut per_user = MeanAccumulator::default();
        for item in items {
            per_user.push(popularity.self_information(item));
        }

        match per_user.mean() {
            Some(score) => {
                novelty.push(score);
                stats.scored += 1;
            }
            None => stats.record_skip(SkipReason::NoItems),
        }
    }

    let score = novelty.mean_or_err(NOVELTY_KEY, &stats)?;

    debug!(
        k,
        novelty = score,
        popular_items = popularity.len(),
        scored = stats.scored,
        skipped = stats.total_skipped(),
        "novelty computed"
    );

    Ok(MetricOutcome::single(NOVELTY_KEY, score, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{fixed_recommender, log, users};

    fn train_log() -> InteractionLog {
        log(&[
            ("a", "i1", 1),
            ("b", "i1", 1),
            ("c", "i1", 1),
            ("a", "i2", 1),
            ("b", "i3", 0),
        ])
    }

    #[test]
    fn test_popularity_table() {
        let table = PopularityTable::from_log(&train_log());

        assert_eq!(table.total_clicks(), 4);
        assert_eq!(table.len(), 2);
        assert!((table.probability(&ItemId::from("i1")).unwrap() - 0.75).abs() < 1e-12);
        assert!((table.probability(&ItemId::from("i2")).unwrap() - 0.25).abs() < 1e-12);
        assert!((table.self_information(&ItemId::from("i1")) - 0.2877).abs() < 1e-4);
        assert!((table.self_information(&ItemId::from("i2")) - 1.3863).abs() < 1e-4);
    }

    #[test]
    fn test_unclicked_item_has_zero_information() {
        let table = PopularityTable::from_log(&train_log());
        assert_eq!(table.self_information(&ItemId::from("i3")), 0.0);
        assert_eq!(table.self_information(&ItemId::from("never-seen")), 0.0);
    }

    #[test]
    fn test_user_novelty_is_mean_self_information() {
        let rec = fixed_recommender(&[("u1", "i1 i2")]);

        let outcome = novelty(&rec, &train_log(), &users(&["u1"]), 2).unwrap();
        assert!((outcome.score(NOVELTY_KEY).unwrap() - 0.837).abs() < 1e-3);
    }

    #[test]
    fn test_mean_of_user_means() {
        // u1: mean(0.2877, 1.3863) = 0.8370, u2: 1.3863
        let rec = fixed_recommender(&[("u1", "i1 i2"), ("u2", "i2")]);

        let outcome = novelty(&rec, &train_log(), &users(&["u1", "u2"]), 2).unwrap();
        let expected = (0.25f64.ln() + 0.75f64.ln()) / -2.0 / 2.0 - 0.25f64.ln() / 2.0;
        assert!((outcome.score(NOVELTY_KEY).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_most_popular_only_approaches_zero() {
        let mut rows = vec![("u", "hit", 1u8); 999];
        rows.push(("u", "rare", 1));
        let train = log(&rows);
        let rec = fixed_recommender(&[("u1", "hit")]);

        let outcome = novelty(&rec, &train, &users(&["u1"]), 1).unwrap();
        assert!(outcome.score(NOVELTY_KEY).unwrap() < 0.01);
    }

    #[test]
    fn test_unseen_items_score_zero() {
        let rec = fixed_recommender(&[("u1", "x y z")]);

        let outcome = novelty(&rec, &train_log(), &users(&["u1"]), 3).unwrap();
        assert_eq!(outcome.score(NOVELTY_KEY), Some(0.0));
    }

    #[test]
    fn test_empty_list_is_skipped() {
        let rec = fixed_recommender(&[("u1", ""), ("u2", "i2")]);

        let outcome = novelty(&rec, &train_log(), &users(&["u1", "u2"]), 3).unwrap();
        assert_eq!(outcome.stats.skipped_for(SkipReason::NoItems), 1);
        assert_eq!(outcome.stats.scored, 1);
    }

    #[test]
    fn test_all_skipped_is_error() {
        let rec = fixed_recommender(&[]);

        let err = novelty(&rec, &train_log(), &users(&["u1", "u2"]), 5).unwrap_err();
        assert!(matches!(
            err,
            EvalError::NoEligibleUsers {
                metric: NOVELTY_KEY,
                skipped: 2,
                ineligible: 0,
            }
        ));
    }

    #[test]
    fn test_training_log_without_clicks() {
        let train = log(&[("a", "i1", 0)]);
        let rec = fixed_recommender(&[("u1", "i1")]);

        let outcome = novelty(&rec, &train, &users(&["u1"]), 1).unwrap();
        assert_eq!(outcome.score(NOVELTY_KEY), Some(0.0));
    }
}
