//! Benchmark runner: one named recommender through every evaluator.
//!
//! The runner calls the four evaluators in a fixed order (precision/recall,
//! AUC, coverage, novelty), merges their scores into one [`BenchmarkResult`],
//! and reports each score. The first evaluator that fails aborts the run so a
//! result never silently lacks a metric.
//!
//! # Example
//!
//! ```
//! use recbench_core::benchmark::{BenchmarkData, BenchmarkRunner};
//! use recbench_core::config::BenchmarkConfig;
//! use recbench_core::recommender::Recommendation;
//! use recbench_core::types::{Interaction, InteractionLog, ItemId, UserId};
//! use std::collections::HashSet;
//!
//! let log = InteractionLog::new(vec![
//!     Interaction::click("u1", "i1"),
//!     Interaction::skip("u1", "i2"),
//!     Interaction::click("u2", "i2"),
//!     Interaction::skip("u2", "i3"),
//! ]);
//! let universe: HashSet<ItemId> = log.items();
//! let users = log.users();
//! let data = BenchmarkData::new(&log, &log, &universe, &users);
//!
//! let always_i1 = |_user: &UserId, _top_n: usize| Recommendation::items(["i1"]);
//! let runner = BenchmarkRunner::new(BenchmarkConfig::with_k(1)).unwrap();
//! let result = runner.run("always-i1", &always_i1, &data).unwrap();
//!
//! assert_eq!(result.score("precision@1"), Some(0.5));
//! assert_eq!(result.scores.len(), 5);
//! ```

use crate::config::{BenchmarkConfig, REPORT_PRECISION};
use crate::error::EvalError;
use crate::evaluation::{
    auc_score_with_pool, coverage, novelty, precision_recall_at_k, EvalStats, MetricOutcome,
};
use crate::recommender::Recommender;
use crate::types::{InteractionLog, ItemId, UserId};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use tracing::{info, warn};

/// Inputs shared by every run of a benchmark.
///
/// All fields are borrowed; the runner never mutates them.
#[derive(Debug, Clone, Copy)]
pub struct BenchmarkData<'a> {
    /// Held-out interactions used by precision/recall and AUC
    pub test_log: &'a InteractionLog,
    /// Training interactions used to build the novelty popularity table
    pub train_log: &'a InteractionLog,
    /// Every item eligible for recommendation (coverage denominator)
    pub item_universe: &'a HashSet<ItemId>,
    /// Users over which coverage and novelty are computed
    pub user_sample: &'a [UserId],
}

impl<'a> BenchmarkData<'a> {
    /// Groups borrowed inputs for a run.
    pub fn new(
        test_log: &'a InteractionLog,
        train_log: &'a InteractionLog,
        item_universe: &'a HashSet<ItemId>,
        user_sample: &'a [UserId],
    ) -> Self {
        Self {
            test_log,
            train_log,
            item_universe,
            user_sample,
        }
    }
}

/// Merged scores of one named run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkResult {
    /// Recommender name
    pub name: String,
    /// Cutoff used for precision/recall, coverage, and novelty
    pub k: usize,
    /// Metric name -> score
    pub scores: BTreeMap<String, f64>,
    /// Evaluator name -> users scored/skipped/excluded
    pub diagnostics: BTreeMap<String, EvalStats>,
    /// Score names in the order the evaluators produced them
    #[serde(skip)]
    order: Vec<String>,
}

impl BenchmarkResult {
    fn new(name: &str, k: usize) -> Self {
        Self {
            name: name.to_string(),
            k,
            scores: BTreeMap::new(),
            diagnostics: BTreeMap::new(),
            order: Vec::new(),
        }
    }

    fn merge(&mut self, evaluator: &str, outcome: MetricOutcome) {
        for (metric, score) in outcome.scores {
            if self.scores.insert(metric.clone(), score).is_some() {
                warn!(metric = %metric, evaluator, "duplicate metric name, keeping latest score");
            } else {
                self.order.push(metric);
            }
        }
        self.diagnostics.insert(evaluator.to_string(), outcome.stats);
    }

    /// Looks up a score by metric name.
    pub fn score(&self, metric: &str) -> Option<f64> {
        self.scores.get(metric).copied()
    }

    /// Scores in evaluation order.
    pub fn ordered_scores(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.order
            .iter()
            .filter_map(|metric| self.scores.get(metric).map(|&s| (metric.as_str(), s)))
    }
}

impl fmt::Display for BenchmarkResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Evaluating {} recommender", self.name)?;
        for (metric, score) in self.ordered_scores() {
            writeln!(f, "{}: {:.prec$}", metric, score, prec = REPORT_PRECISION)?;
        }
        Ok(())
    }
}

/// Runs the full evaluator set against named recommenders.
///
/// The runner holds only its configuration; nothing carries over between runs.
#[derive(Debug, Clone, Default)]
pub struct BenchmarkRunner {
    config: BenchmarkConfig,
}

impl BenchmarkRunner {
    /// Creates a runner after validating `config`.
    pub fn new(config: BenchmarkConfig) -> Result<Self, EvalError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration used for every run.
    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    /// Evaluates one recommender and reports its scores.
    ///
    /// # Errors
    ///
    /// The first evaluator error, unchanged.
    pub fn run<R>(
        &self,
        name: &str,
        recommender: &R,
        data: &BenchmarkData<'_>,
    ) -> Result<BenchmarkResult, EvalError>
    where
        R: Recommender + ?Sized,
    {
        let k = self.config.k;
        info!(run = name, k, users = data.user_sample.len(), "evaluating recommender");

        let mut result = BenchmarkResult::new(name, k);
        result.merge(
            "precision_recall",
            precision_recall_at_k(recommender, data.test_log, k)?,
        );
        result.merge(
            "auc",
            auc_score_with_pool(recommender, data.test_log, self.config.auc_candidate_pool)?,
        );
        result.merge(
            "coverage",
            coverage(recommender, data.item_universe, data.user_sample, k)?,
        );
        result.merge(
            "novelty",
            novelty(recommender, data.train_log, data.user_sample, k)?,
        );

        for (metric, score) in result.ordered_scores() {
            info!(run = name, "{}: {:.prec$}", metric, score, prec = REPORT_PRECISION);
        }

        Ok(result)
    }

    /// Evaluates several named recommenders on the same data, in order.
    ///
    /// # Errors
    ///
    /// The first failing run's error; later systems are not evaluated.
    pub fn compare(
        &self,
        systems: &[(&str, &dyn Recommender)],
        data: &BenchmarkData<'_>,
    ) -> Result<Vec<BenchmarkResult>, EvalError> {
        systems
            .iter()
            .map(|(name, recommender)| self.run(name, *recommender, data))
            .collect()
    }
}

/// Runs the benchmark for one recommender with the default AUC pool.
///
/// Shorthand for [`BenchmarkRunner::run`] with [`BenchmarkConfig::with_k`].
pub fn run_benchmark<R>(
    name: &str,
    recommender: &R,
    test_log: &InteractionLog,
    train_log: &InteractionLog,
    item_universe: &HashSet<ItemId>,
    user_sample: &[UserId],
    k: usize,
) -> Result<BenchmarkResult, EvalError>
where
    R: Recommender + ?Sized,
{
    let runner = BenchmarkRunner::new(BenchmarkConfig::with_k(k))?;
    let data = BenchmarkData::new(test_log, train_log, item_universe, user_sample);
    runner.run(name, recommender, &data)
}
