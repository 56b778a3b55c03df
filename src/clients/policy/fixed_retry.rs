use std::sync::Arc;
use std::time::Duration;

use super::{attempt_once, AttemptExecutor, AttemptFuture, ExecutionPolicy, RetryBudget};
use super::{Sleeper, TokioSleeper};
use crate::clients::errors::HttpError;
use crate::clients::http_request::RequestTemplate;
use crate::clients::http_response::ResponseOutcome;

/// Delay between rate-limited attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Retries rate-limited calls after a fixed delay.
///
/// Without a deadline this retries until the call succeeds or fails with
/// something other than a rate limit. Set [`with_deadline`](Self::with_deadline)
/// to bound it.
#[derive(Clone, Debug)]
pub struct FixedRetryPolicy {
    delay: Duration,
    deadline: Option<Duration>,
    sleeper: Arc<dyn Sleeper>,
}

impl Default for FixedRetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl FixedRetryPolicy {
    /// Creates a policy with the default 500ms delay and no deadline.
    #[must_use]
    pub fn new() -> Self {
        Self {
            delay: DEFAULT_RETRY_DELAY,
            deadline: None,
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Sets the delay between attempts.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Fails with [`HttpError::DeadlineExceeded`] rather than wait past
    /// `deadline`, measured from the first attempt.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Replaces the sleeper.
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Returns the delay between attempts.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    async fn execute(
        &self,
        template: &RequestTemplate,
        executor: &dyn AttemptExecutor,
    ) -> Result<ResponseOutcome, HttpError> {
        let mut budget = RetryBudget::new(self.deadline);
        let mut tries: u32 = 0;

        loop {
            tries += 1;
            let last = match attempt_once(template, executor).await {
                Err(HttpError::RateLimited(error)) => error,
                other => return other,
            };

            if !budget.allows(self.delay) {
                tracing::warn!(tries, "Rate limited; retry deadline reached");
                return Err(HttpError::DeadlineExceeded {
                    deadline: budget.deadline().unwrap_or_default(),
                    tries,
                    last,
                });
            }

            tracing::debug!(
                tries,
                delay_ms = u64::try_from(self.delay.as_millis()).unwrap_or(u64::MAX),
                "Rate limited; retrying after fixed delay"
            );
            self.sleeper.sleep(self.delay).await;
            budget.record_sleep(self.delay);
        }
    }
}

impl ExecutionPolicy for FixedRetryPolicy {
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

    fn policy(sleeper: &TrackingSleeper) -> FixedRetryPolicy {
        FixedRetryPolicy::new().with_sleeper(Arc::new(sleeper.clone()))
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let sleeper = TrackingSleeper::new();
        let executor = ScriptedExecutor::new(&[(429, None), (429, None), (429, None), (201, None)]);

        let outcome = policy(&sleeper).run(&template(), &executor).await.unwrap();

        assert_eq!(outcome.status, 201);
        assert_eq!(executor.calls(), 4);
        assert_eq!(sleeper.calls(), vec![DEFAULT_RETRY_DELAY; 3]);
    }

    #[tokio::test]
    async fn test_stops_on_first_non_rate_limit_error() {
        let sleeper = TrackingSleeper::new();
        let executor = ScriptedExecutor::new(&[(429, None), (404, None), (200, None)]);

        let result = policy(&sleeper).run(&template(), &executor).await;

        assert!(matches!(result, Err(HttpError::Api(ref e)) if e.status == 404));
        assert_eq!(executor.calls(), 2);
    }

    #[tokio::test]
    async fn test_server_errors_are_not_retried() {
        let sleeper = TrackingSleeper::new();
        let executor = ScriptedExecutor::new(&[(500, None)]);

        let result = policy(&sleeper).run(&template(), &executor).await;

        assert!(matches!(result, Err(HttpError::Api(ref e)) if e.status == 500));
        assert_eq!(executor.calls(), 1);
        assert!(sleeper.calls().is_empty());
    }

    #[tokio::test]
    async fn test_deadline_bounds_retries() {
        let sleeper = TrackingSleeper::new();
        let script = vec![(429, None); 100];
        let executor = ScriptedExecutor::new(&script);

        let result = policy(&sleeper)
            .with_delay(Duration::from_millis(100))
            .with_deadline(Duration::from_millis(350))
            .run(&template(), &executor)
            .await;

        match result {
            Err(HttpError::DeadlineExceeded { tries, last, .. }) => {
                assert_eq!(tries, 4);
                assert_eq!(last.status, 429);
            }
            other => panic!("expected DeadlineExceeded, got {other:?}"),
        }
        assert_eq!(sleeper.calls().len(), 3);
    }
}
