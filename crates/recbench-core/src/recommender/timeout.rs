//! Per-call deadline for recommenders.
//!
//! Each call runs on its own worker thread and the caller waits on a channel
//! with `recv_timeout`. A call that misses the deadline becomes
//! [`Recommendation::Failed`], which evaluators treat as a skip. The worker
//! thread of a timed-out call is abandoned; its late result is dropped.

use super::{Recommendation, Recommender};
use crate::types::UserId;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::trace;

/// Wraps a recommender so no single call can block longer than `timeout`.
///
/// Panics inside the wrapped recommender are caught and reported as
/// [`Recommendation::Failed`] as well.
///
/// # Example
///
/// ```
/// use recbench_core::recommender::{Recommendation, Recommender, TimeoutRecommender};
/// use recbench_core::types::UserId;
/// use std::time::Duration;
///
/// let slow = |_user: &UserId, _top_n: usize| {
///     std::thread::sleep(Duration::from_millis(200));
///     Recommendation::items(["N1"])
/// };
/// let bounded = TimeoutRecommender::new(slow, Duration::from_millis(10));
///
/// assert!(!bounded.recommend(&UserId::from("U1"), 5).is_usable());
/// assert_eq!(bounded.timed_out_calls(), 1);
/// ```
pub struct TimeoutRecommender<R> {
    inner: Arc<R>,
    timeout: Duration,
    timed_out: AtomicUsize,
}

impl<R> TimeoutRecommender<R>
where
    R: Recommender + Send + Sync + 'static,
{
    /// Creates a wrapper that gives every call at most `timeout`.
    pub fn new(inner: R, timeout: Duration) -> Self {
        Self {
            inner: Arc::new(inner),
            timeout,
            timed_out: AtomicUsize::new(0),
        }
    }

    /// Deadline applied to each call.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Number of calls that missed the deadline so far.
    pub fn timed_out_calls(&self) -> usize {
        self.timed_out.load(Ordering::Relaxed)
    }
}

impl<R> Recommender for TimeoutRecommender<R>
where
    R: Recommender + Send + Sync + 'static,
{
    fn recommend(&self, user: &UserId, top_n: usize) -> Recommendation {
        let (tx, rx) = mpsc::channel();
        let inner = Arc::clone(&self.inner);
        let user_id = user.clone();

        let spawned = thread::Builder::new()
            .name("recbench-call".to_string())
            .spawn(move || {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                    inner.recommend(&user_id, top_n)
                }))
                .unwrap_or_else(|_| Recommendation::failed("recommender panicked"));
                // Receiver is gone if the caller already timed out
                let _ = tx.send(outcome);
            });

        if let Err(e) = spawned {
            return Recommendation::failed(format!("failed to spawn call thread: {}", e));
        }

        match rx.recv_timeout(self.timeout) {
            Ok(outcome) => outcome,
            Err(RecvTimeoutError::Timeout) => {
                self.timed_out.fetch_add(1, Ordering::Relaxed);
                trace!(user = %user, top_n, "recommender call timed out");
                Recommendation::failed(format!("timed out after {:?}", self.timeout))
            }
            Err(RecvTimeoutError::Disconnected) => {
                Recommendation::failed("call thread exited without a result")
            }
        }
    }
}
