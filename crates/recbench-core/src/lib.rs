//! # Recbench Core
//!
//! Offline evaluation of ranked recommenders against logged interactions.
//!
//! This crate computes accuracy and beyond-accuracy metrics for any system
//! that implements [`recommender::Recommender`], and bundles them into a
//! single benchmark run per named system.
//!
//! ## Modules
//!
//! - [`types`] - Users, items, interactions, and per-user grouping
//! - [`recommender`] - Recommender contract plus timeout and caching wrappers
//! - [`evaluation`] - Precision/recall@k, ranking AUC, coverage, novelty
//! - [`benchmark`] - Runs every evaluator for one or more named recommenders
//! - [`config`] - Evaluation protocol constants and run configuration
//! - [`error`] - Error types for metrics and interaction parsing

pub mod benchmark;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod recommender;
pub mod types;

#[cfg(test)]
pub(crate) mod test_utils;

pub use benchmark::{run_benchmark, BenchmarkData, BenchmarkResult, BenchmarkRunner};
pub use error::{EvalError, InteractionError};
pub use recommender::{Recommendation, Recommender};
pub use types::{Interaction, InteractionLog, ItemId, UserId};
