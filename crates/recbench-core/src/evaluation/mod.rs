//! Offline metrics for ranked recommendations.
//!
//! Each evaluator consumes an interaction log (and/or an item universe, and/or
//! a user sample) plus a [`Recommender`](crate::recommender::Recommender), and
//! returns a [`MetricOutcome`]: named scores plus counts of users scored,
//! skipped, and excluded.
//!
//! # Aggregation Policy
//!
//! - Users whose recommendation is `Empty` or `Failed` are skipped: they enter
//!   neither the numerator nor the denominator of a mean.
//! - Users that cannot be scored at all for a metric (no clicks for
//!   precision/recall and AUC) are excluded up front.
//! - A mean over zero users is an error ([`EvalError::NoEligibleUsers`](crate::error::EvalError)),
//!   never a silent default.
//!
//! # Metrics Reference
//!
//! | Metric | Score name(s) | Inputs | Meaning |
//! |--------|---------------|--------|---------|
//! | P@k / R@k | `precision@k`, `recall@k` | test log | Hit rate against clicked items |
//! | AUC | `auc_score` | test log | Separation of clicked vs. shown-not-clicked by the recommended set |
//! | Coverage | `coverage` | universe, user sample | Share of the catalog ever recommended |
//! | Novelty | `novelty` | training log, user sample | Mean self-information of recommended items |

mod aggregate;
pub mod auc;
pub mod coverage;
pub mod novelty;
pub mod ranking;

pub use aggregate::{EvalStats, MeanAccumulator, MetricOutcome, SkipReason};
pub use auc::{auc_score, auc_score_with_pool, roc_auc, AUC_KEY};
pub use coverage::{coverage, COVERAGE_KEY};
pub use novelty::{novelty, novelty_with_table, PopularityTable, NOVELTY_KEY};
pub use ranking::{count_hits, precision_key, precision_recall_at_k, recall_key};
