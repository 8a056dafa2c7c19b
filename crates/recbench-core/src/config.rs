//! Benchmark configuration.
//!
//! Constants that define the default evaluation protocol, plus
//! [`BenchmarkConfig`] which groups the tunable parts of a run.
//!
//! # Usage
//!
//! ```
//! use recbench_core::config::{BenchmarkConfig, DEFAULT_K};
//!
//! let config = BenchmarkConfig::default();
//! assert_eq!(config.k, DEFAULT_K);
//! assert!(config.validate().is_ok());
//! ```

use crate::error::EvalError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// =============================================================================
// Evaluation Protocol
// =============================================================================

/// Default recommendation list length (the `k` in precision@k).
pub const DEFAULT_K: usize = 5;

/// Number of candidates requested per user by the AUC evaluator.
///
/// Large enough to approximate "every relevant candidate" for a user's
/// test group.
pub const AUC_CANDIDATE_POOL: usize = 100;

/// Decimal places used when reporting scores.
pub const REPORT_PRECISION: usize = 4;

/// Number of users sampled for coverage and novelty by the eval tool.
pub const DEFAULT_USER_SAMPLE_SIZE: usize = 500;

/// Per-call deadline applied by the eval tool to every recommender call.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(5);

/// Tunable parameters of a benchmark run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    /// Cutoff for precision/recall, coverage and novelty
    pub k: usize,
    /// Candidates requested per user by the AUC evaluator
    pub auc_candidate_pool: usize,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            k: DEFAULT_K,
            auc_candidate_pool: AUC_CANDIDATE_POOL,
        }
    }
}

impl BenchmarkConfig {
    /// Creates a config with the given cutoff and the default AUC pool.
    pub fn with_k(k: usize) -> Self {
        Self {
            k,
            ..Self::default()
        }
    }

    /// Checks that every cutoff is positive.
    pub fn validate(&self) -> Result<(), EvalError> {
        if self.k == 0 {
            return Err(EvalError::InvalidCutoff(self.k));
        }
        if self.auc_candidate_pool == 0 {
            return Err(EvalError::InvalidConfig(
                "auc_candidate_pool must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_protocol() {
        let config = BenchmarkConfig::default();
        assert_eq!(config.k, 5);
        assert_eq!(config.auc_candidate_pool, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_k_rejected() {
        let config = BenchmarkConfig::with_k(0);
        assert_eq!(config.validate(), Err(EvalError::InvalidCutoff(0)));
    }

    #[test]
    fn test_zero_pool_rejected() {
        let config = BenchmarkConfig {
            k: 5,
            auc_candidate_pool: 0,
        };
        assert!(matches!(
            config.validate(),
            Err(EvalError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: BenchmarkConfig = serde_json::from_str(r#"{"k": 10}"#).unwrap();
        assert_eq!(config.k, 10);
        assert_eq!(config.auc_candidate_pool, AUC_CANDIDATE_POOL);
    }
}
