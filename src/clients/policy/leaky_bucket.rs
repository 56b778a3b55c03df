use std::sync::Arc;
use std::time::Duration;

use super::{attempt_once, AttemptExecutor, AttemptFuture, ExecutionPolicy, RetryBudget};
use super::{LeakyBucketState, Sleeper, TokioSleeper};
use crate::clients::errors::{HttpError, MaxHttpRetriesExceededError, RateLimitError};
use crate::clients::http_request::RequestTemplate;
use crate::clients::http_response::ResponseOutcome;

/// Paces calls with the call budget the server reports.
///
/// Before every attempt the policy asks the bucket how long to wait and
/// sleeps that long. After every response, successful or rate limited, the
/// reported `current/maximum` replaces the bucket state. After a 429 the
/// next wait is the bucket wait, but never less than `Retry-After` (or one
/// leak interval when the header is absent).
///
/// Rate-limited retries stop after the bucket capacity (or
/// [`with_max_retries`](Self::with_max_retries)) and at the optional
/// deadline.
///
/// Clones share the bucket.
#[derive(Clone, Debug)]
pub struct LeakyBucketPolicy {
    bucket: Arc<LeakyBucketState>,
    sleeper: Arc<dyn Sleeper>,
    deadline: Option<Duration>,
    max_retries: Option<u32>,
}

impl Default for LeakyBucketPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl LeakyBucketPolicy {
    /// Creates a policy with its own bucket and the platform defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::with_bucket(Arc::new(LeakyBucketState::new()))
    }

    /// Creates a policy around an existing bucket.
    #[must_use]
    pub fn with_bucket(bucket: Arc<LeakyBucketState>) -> Self {
        Self {
            bucket,
            sleeper: Arc::new(TokioSleeper),
            deadline: None,
            max_retries: None,
        }
    }

    /// Replaces the sleeper.
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Fails with [`HttpError::DeadlineExceeded`] rather than wait past
    /// `deadline`, measured from the first attempt.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Caps rate-limited retries below the bucket capacity.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Returns the shared bucket.
    #[must_use]
    pub const fn bucket(&self) -> &Arc<LeakyBucketState> {
        &self.bucket
    }

    fn retry_bound(&self) -> u32 {
        let capacity = self.bucket.retry_bound();
        self.max_retries.map_or(capacity, |max| max.min(capacity))
    }

    async fn execute(
        &self,
        template: &RequestTemplate,
        executor: &dyn AttemptExecutor,
    ) -> Result<ResponseOutcome, HttpError> {
        let mut budget = RetryBudget::new(self.deadline);
        let mut floor: Option<Duration> = None;
        let mut last: Option<RateLimitError> = None;
        let mut tries: u32 = 0;

        loop {
            let wait = self
                .bucket
                .wait_time()
                .max(floor.take().unwrap_or_default());

            if !wait.is_zero() {
                if !budget.allows(wait) {
                    if let Some(last) = last.take() {
                        tracing::warn!(tries, "Rate limited; retry deadline reached");
                        return Err(HttpError::DeadlineExceeded {
                            deadline: budget.deadline().unwrap_or_default(),
                            tries,
                            last,
                        });
                    }
                }
                tracing::debug!(
                    tries,
                    wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
                    "Waiting for call budget"
                );
                self.sleeper.sleep(wait).await;
                budget.record_sleep(wait);
            }

            tries += 1;
            match attempt_once(template, executor).await {
                Ok(outcome) => {
                    if let Some(limit) = outcome.api_call_limit {
                        self.bucket.observe(limit);
                    }
                    return Ok(outcome);
                }
                Err(HttpError::RateLimited(error)) => {
                    if let Some(limit) = error.api_call_limit {
                        self.bucket.observe(limit);
                    }
                    // Even a low reported fill waits at least this long after a 429.
                    floor = Some(
                        error
                            .retry_after
                            .unwrap_or_else(|| self.bucket.leak_interval()),
                    );

                    let bound = self.retry_bound();
                    if tries > bound {
                        tracing::warn!(tries, bound, "Rate limited; retry limit reached");
                        return Err(HttpError::MaxRetries(MaxHttpRetriesExceededError {
                            tries,
                            last: error,
                        }));
                    }
                    last = Some(error);
                }
                Err(other) => return Err(other),
            }
        }
    }
}

impl ExecutionPolicy for LeakyBucketPolicy {
    fn run<'a>(
        &'a self,
        template: &'a RequestTemplate,
        executor: &'a dyn AttemptExecutor,
    ) -> AttemptFuture<'a> {
        Box::pin(self.execute(template, executor))
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{template, ScriptedExecutor};
    use super::super::TrackingSleeper;
    use super::*;
    use crate::clients::http_response::ApiCallLimit;

    fn policy(sleeper: &TrackingSleeper) -> LeakyBucketPolicy {
        LeakyBucketPolicy::new().with_sleeper(Arc::new(sleeper.clone()))
    }

    #[tokio::test]
    async fn test_first_attempt_is_free_with_empty_bucket() {
        let sleeper = TrackingSleeper::new();
        let executor = ScriptedExecutor::new(&[(200, Some("1/40"))]);

        let outcome = policy(&sleeper).run(&template(), &executor).await.unwrap();

        assert_eq!(outcome.status, 200);
        assert!(sleeper.calls().is_empty());
    }

    #[tokio::test]
    async fn test_success_updates_bucket() {
        let sleeper = TrackingSleeper::new();
        let policy = policy(&sleeper);
        let executor = ScriptedExecutor::new(&[(200, Some("33/80"))]);

        policy.run(&template(), &executor).await.unwrap();

        let snapshot = policy.bucket().snapshot();
        assert_eq!(snapshot.current_fill, 33);
        assert_eq!(snapshot.capacity, 80);
    }

    #[tokio::test]
    async fn test_waits_before_first_attempt_when_bucket_is_full() {
        let sleeper = TrackingSleeper::new();
        let policy = policy(&sleeper);
        policy.bucket().observe(ApiCallLimit {
            request_count: 40,
            bucket_size: 40,
        });
        let executor = ScriptedExecutor::new(&[(200, Some("39/40"))]);

        policy.run(&template(), &executor).await.unwrap();

        let calls = sleeper.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0] > Duration::ZERO);
        assert!(calls[0] <= Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_rate_limit_uses_bucket_wait_only() {
        let sleeper = TrackingSleeper::new();
        let executor = ScriptedExecutor::new(&[(429, Some("40/40")), (429, Some("40/40")), (200, Some("39/40"))]);

        let outcome = policy(&sleeper).run(&template(), &executor).await.unwrap();

        assert_eq!(outcome.status, 200);
        assert_eq!(executor.calls(), 3);
        let calls = sleeper.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|wait| *wait <= Duration::from_millis(500)));
    }

    #[tokio::test]
    async fn test_rate_limit_without_header_falls_back_to_leak_interval() {
        let sleeper = TrackingSleeper::new();
        let executor = ScriptedExecutor::new(&[(429, None), (200, None)]);

        policy(&sleeper).run(&template(), &executor).await.unwrap();

        assert_eq!(sleeper.calls(), vec![Duration::from_millis(500)]);
    }

    #[tokio::test]
    async fn test_rate_limit_with_low_fill_still_backs_off() {
        let sleeper = TrackingSleeper::new();
        let executor = ScriptedExecutor::new(&[
            (429, Some("10/40")),
            (429, Some("10/40")),
            (429, Some("10/40")),
            (200, Some("11/40")),
        ]);

        let outcome = policy(&sleeper).run(&template(), &executor).await.unwrap();

        assert_eq!(outcome.status, 200);
        assert_eq!(executor.calls(), 4);
        assert_eq!(sleeper.calls(), vec![Duration::from_millis(500); 3]);
    }

    #[tokio::test]
    async fn test_low_fill_rate_limits_stop_at_deadline() {
        let sleeper = TrackingSleeper::new();
        let script = vec![(429, Some("10/40")); 60];
        let executor = ScriptedExecutor::new(&script);

        let result = policy(&sleeper)
            .with_deadline(Duration::from_secs(10))
            .run(&template(), &executor)
            .await;

        assert!(matches!(result, Err(HttpError::DeadlineExceeded { tries: 21, .. })));
        assert_eq!(executor.calls(), 21);
        assert_eq!(sleeper.total(), Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_retries_bounded_by_capacity() {
        let sleeper = TrackingSleeper::new();
        let script = vec![(429, Some("4/4")); 50];
        let executor = ScriptedExecutor::new(&script);

        let result = policy(&sleeper).run(&template(), &executor).await;

        match result {
            Err(HttpError::MaxRetries(e)) => {
                assert_eq!(e.tries, 5);
                assert_eq!(e.last.status, 429);
            }
            other => panic!("expected MaxRetries, got {other:?}"),
        }
        assert_eq!(executor.calls(), 5);
    }

    #[tokio::test]
    async fn test_max_retries_override() {
        let sleeper = TrackingSleeper::new();
        let script = vec![(429, Some("40/40")); 50];
        let executor = ScriptedExecutor::new(&script);

        let result = policy(&sleeper)
            .with_max_retries(2)
            .run(&template(), &executor)
            .await;

        assert!(matches!(result, Err(HttpError::MaxRetries(ref e)) if e.tries == 3));
        assert_eq!(executor.calls(), 3);
    }

    #[tokio::test]
    async fn test_deadline_stops_retries() {
        let sleeper = TrackingSleeper::new();
        let script = vec![(429, None); 50];
        let executor = ScriptedExecutor::new(&script);

        let result = policy(&sleeper)
            .with_deadline(Duration::from_millis(1200))
            .run(&template(), &executor)
            .await;

        match result {
            Err(HttpError::DeadlineExceeded { tries, .. }) => assert_eq!(tries, 3),
            other => panic!("expected DeadlineExceeded, got {other:?}"),
        }
        assert_eq!(sleeper.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_non_rate_limit_errors_propagate() {
        let sleeper = TrackingSleeper::new();
        let executor = ScriptedExecutor::new(&[(422, Some("5/40")), (200, None)]);
        let policy = policy(&sleeper);

        let result = policy.run(&template(), &executor).await;

        assert!(matches!(result, Err(HttpError::Api(ref e)) if e.status == 422));
        assert_eq!(executor.calls(), 1);
    }

    #[tokio::test]
    async fn test_clones_share_bucket() {
        let sleeper = TrackingSleeper::new();
        let first = policy(&sleeper);
        let second = first.clone();
        let executor = ScriptedExecutor::new(&[(200, Some("17/40"))]);

        first.run(&template(), &executor).await.unwrap();

        assert_eq!(second.bucket().snapshot().current_fill, 17);
    }
}
