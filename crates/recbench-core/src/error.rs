//! Error types for recbench-core.
//!
//! Per-user recommender failures are not errors at this level: evaluators
//! recover from them by skipping the user. The variants here describe
//! failures of a whole metric or of its inputs.

use thiserror::Error;

/// Errors that can occur while computing a metric or running a benchmark.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// Every candidate user was skipped or ineligible, so the mean is undefined.
    #[error("No eligible users for metric '{metric}' ({skipped} skipped, {ineligible} ineligible)")]
    NoEligibleUsers {
        /// Metric that could not be computed
        metric: &'static str,
        /// Users skipped because the recommender gave no usable result
        skipped: usize,
        /// Users excluded before the recommender was called
        ineligible: usize,
    },
    /// Cutoff `k` (or candidate pool size) must be positive
    #[error("Invalid cutoff: {0} (must be greater than zero)")]
    InvalidCutoff(usize),
    /// The item universe used by coverage is empty
    #[error("Item universe is empty")]
    EmptyItemUniverse,
    /// Invalid benchmark configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Errors that can occur while parsing interaction records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InteractionError {
    /// `clicked` must be exactly 0 or 1
    #[error("Invalid clicked value: {0} (expected 0 or 1)")]
    InvalidClicked(i64),
}

impl From<EvalError> for String {
    fn from(err: EvalError) -> String {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_eligible_users_message() {
        let err = EvalError::NoEligibleUsers {
            metric: "novelty",
            skipped: 3,
            ineligible: 0,
        };
        let msg = err.to_string();
        assert!(msg.contains("novelty"));
        assert!(msg.contains("3 skipped"));
    }

    #[test]
    fn test_into_string() {
        let s: String = EvalError::EmptyItemUniverse.into();
        assert_eq!(s, "Item universe is empty");
    }
}
