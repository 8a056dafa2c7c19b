//! The recommender contract evaluated by this crate.
//!
//! A recommender maps `(user, top_n)` to a [`Recommendation`]. Evaluators never
//! inspect a result's shape: every implementation returns the same tagged
//! outcome and the evaluators match on it.
//!
//! Any closure `Fn(&UserId, usize) -> Recommendation` is a recommender, which
//! keeps test doubles and adapters short:
//!
//! ```
//! use recbench_core::recommender::{Recommendation, Recommender};
//! use recbench_core::types::{ItemId, UserId};
//!
//! let most_popular = |_user: &UserId, top_n: usize| {
//!     let ranked = ["N1", "N2", "N3"];
//!     Recommendation::items(ranked.iter().take(top_n).map(|id| ItemId::from(*id)))
//! };
//!
//! let recs = most_popular.recommend(&UserId::from("U1"), 2);
//! assert_eq!(recs.as_items().map(|items| items.len()), Some(2));
//! ```
//!
//! Two decorators close gaps left open by the bare contract:
//!
//! - [`TimeoutRecommender`] bounds each call with a deadline
//! - [`CachedRecommender`] makes at most one underlying call per `(user, top_n)`

mod cache;
mod timeout;

pub use cache::{CacheStats, CachedRecommender};
pub use timeout::TimeoutRecommender;

use crate::types::{ItemId, UserId};
use serde::Serialize;

/// Outcome of a single recommender call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum Recommendation {
    /// Ranked item ids, most relevant first
    Items(Vec<ItemId>),
    /// The recommender has nothing usable for this user (e.g. unknown user)
    Empty,
    /// The call failed
    Failed(String),
}

impl Recommendation {
    /// Builds a successful result from ranked item ids.
    pub fn items<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ItemId>,
    {
        Recommendation::Items(items.into_iter().map(Into::into).collect())
    }

    /// Builds a failed result.
    pub fn failed(reason: impl Into<String>) -> Self {
        Recommendation::Failed(reason.into())
    }

    /// Returns the ranked items if the result is usable.
    pub fn as_items(&self) -> Option<&[ItemId]> {
        match self {
            Recommendation::Items(items) => Some(items),
            Recommendation::Empty | Recommendation::Failed(_) => None,
        }
    }

    /// Returns at most `top_n` leading items if the result is usable.
    pub fn top(&self, top_n: usize) -> Option<&[ItemId]> {
        self.as_items().map(|items| &items[..items.len().min(top_n)])
    }

    /// Returns true unless the result is `Empty` or `Failed`.
    pub fn is_usable(&self) -> bool {
        matches!(self, Recommendation::Items(_))
    }
}

impl<E: std::fmt::Display> From<Result<Vec<ItemId>, E>> for Recommendation {
    fn from(result: Result<Vec<ItemId>, E>) -> Self {
        match result {
            Ok(items) => Recommendation::Items(items),
            Err(err) => Recommendation::Failed(err.to_string()),
        }
    }
}

/// A recommender under test.
///
/// Implementations must tolerate arbitrary user ids, including users never
/// seen in training: return [`Recommendation::Empty`] or
/// [`Recommendation::Failed`] rather than panicking.
pub trait Recommender {
    /// Produces up to `top_n` ranked items for `user`.
    fn recommend(&self, user: &UserId, top_n: usize) -> Recommendation;
}

impl<F> Recommender for F
where
    F: Fn(&UserId, usize) -> Recommendation,
{
    fn recommend(&self, user: &UserId, top_n: usize) -> Recommendation {
        self(user, top_n)
    }
}
