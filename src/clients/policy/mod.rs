//! Execution policies: how a request template becomes one or more attempts.
//!
//! A policy receives the caller's [`RequestTemplate`] and an
//! [`AttemptExecutor`] that performs exactly one physical send. It clones the
//! template for every attempt, classifies every outcome with
//! [`ErrorClassifier`], and decides whether to retry. Only rate-limit errors
//! are retried; every other error is returned on first occurrence.
//!
//! - [`DefaultExecutionPolicy`]: one attempt
//! - [`FixedRetryPolicy`]: retry rate-limited calls after a fixed delay
//! - [`LeakyBucketPolicy`]: pace calls with the server's call budget
//!
//! Policies are plain values handed to each client; there is no global
//! policy. Share one [`LeakyBucketPolicy`] between clients to share its
//! bucket.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use shopify_client_core::clients::{HttpClient, LeakyBucketPolicy};
//!
//! let policy = Arc::new(LeakyBucketPolicy::new());
//! let orders = HttpClient::new("/admin/api/2025-10", &session, None)?
//!     .with_policy(policy.clone());
//! let products = HttpClient::new("/admin/api/2025-10", &session, None)?
//!     .with_policy(policy);
//! ```

mod bucket;
mod fixed_retry;
mod leaky_bucket;
mod sleeper;

use std::fmt::Debug;
use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};

use crate::clients::classifier::ErrorClassifier;
use crate::clients::errors::HttpError;
use crate::clients::http_request::RequestTemplate;
use crate::clients::http_response::ResponseOutcome;

pub use bucket::{
    BucketSnapshot, LeakyBucketState, DEFAULT_CAPACITY, DEFAULT_LEAK_INTERVAL,
    DEFAULT_SAFETY_MARGIN,
};
pub use fixed_retry::{FixedRetryPolicy, DEFAULT_RETRY_DELAY};
pub use leaky_bucket::LeakyBucketPolicy;
pub use sleeper::{InstantSleeper, Sleeper, TokioSleeper, TrackingSleeper};

/// The future returned by executors and policies.
pub type AttemptFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ResponseOutcome, HttpError>> + Send + 'a>>;

/// Performs one physical attempt for a request template.
///
/// The returned outcome is unclassified: any status may come back as `Ok`.
/// Implemented by [`HttpClient`](crate::clients::HttpClient) and by any
/// `Fn(RequestTemplate) -> impl Future<Output = Result<ResponseOutcome, HttpError>>`.
pub trait AttemptExecutor: Send + Sync {
    /// Sends `template` once.
    fn attempt(&self, template: RequestTemplate) -> AttemptFuture<'_>;
}

impl<F, Fut> AttemptExecutor for F
where
    F: Fn(RequestTemplate) -> Fut + Send + Sync,
    Fut: Future<Output = Result<ResponseOutcome, HttpError>> + Send + 'static,
{
    fn attempt(&self, template: RequestTemplate) -> AttemptFuture<'_> {
        Box::pin(self(template))
    }
}

/// Strategy wrapping every outbound call.
pub trait ExecutionPolicy: Send + Sync + Debug {
    /// Runs `template` through `executor` until it succeeds or the policy
    /// gives up.
    ///
    /// The template itself is never sent; each attempt gets a clone.
    fn run<'a>(
        &'a self,
        template: &'a RequestTemplate,
        executor: &'a dyn AttemptExecutor,
    ) -> AttemptFuture<'a>;
}

/// One attempt, no retry.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultExecutionPolicy;

impl ExecutionPolicy for DefaultExecutionPolicy {
    fn run<'a>(
        &'a self,
        template: &'a RequestTemplate,
        executor: &'a dyn AttemptExecutor,
    ) -> AttemptFuture<'a> {
        Box::pin(async move { attempt_once(template, executor).await })
    }
}

/// Sends a clone of `template` and classifies the result.
pub(crate) async fn attempt_once(
    template: &RequestTemplate,
    executor: &dyn AttemptExecutor,
) -> Result<ResponseOutcome, HttpError> {
    executor
        .attempt(template.clone())
        .await
        .and_then(ErrorClassifier::check)
}

/// Tracks time spent against an optional overall deadline.
///
/// Sleepers that return early still count their requested duration, so the
/// deadline holds under test sleepers too.
#[derive(Debug)]
pub(crate) struct RetryBudget {
    deadline: Option<Duration>,
    started: Instant,
    slept: Duration,
}

impl RetryBudget {
    pub(crate) fn new(deadline: Option<Duration>) -> Self {
        Self {
            deadline,
            started: Instant::now(),
            slept: Duration::ZERO,
        }
    }

    pub(crate) fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Returns `false` if waiting `delay` more would pass the deadline.
    pub(crate) fn allows(&self, delay: Duration) -> bool {
        self.deadline.map_or(true, |deadline| {
            let spent = self.started.elapsed().max(self.slept);
            spent.saturating_add(delay) <= deadline
        })
    }

    pub(crate) fn record_sleep(&mut self, delay: Duration) {
        self.slept = self.slept.saturating_add(delay);
    }
}
