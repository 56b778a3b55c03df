//! Shared model of the server's call-budget bucket.
//!
//! The server reports `current/maximum` on every response. The bucket keeps
//! the latest report and turns it into the wait needed before the next call
//! so that one slot has leaked below the safety margin.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::clients::http_response::ApiCallLimit;

/// Default bucket capacity for REST Admin API calls.
pub const DEFAULT_CAPACITY: u32 = 40;

/// Time for one slot to drain.
pub const DEFAULT_LEAK_INTERVAL: Duration = Duration::from_millis(500);

/// Slots kept free before calls are delayed.
pub const DEFAULT_SAFETY_MARGIN: u32 = 1;

/// A point-in-time copy of the bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BucketSnapshot {
    /// Bucket capacity last reported by the server.
    pub capacity: u32,
    /// Slots in use as last reported by the server.
    pub current_fill: u32,
    /// When the last report was recorded.
    pub last_observed_at: Option<Instant>,
}

/// Thread-safe leaky-bucket state, shared by every call that uses the same
/// policy instance.
///
/// The fill level is only ever overwritten from a server report; it is
/// never incremented locally. `0 <= current_fill <= capacity` holds after
/// every update.
///
/// ```rust
/// use std::time::Duration;
/// use shopify_client_core::clients::{ApiCallLimit, LeakyBucketState};
///
/// let bucket = LeakyBucketState::new();
/// bucket.observe(ApiCallLimit { request_count: 40, bucket_size: 40 });
/// assert!(bucket.wait_time() <= Duration::from_millis(500));
/// ```
#[derive(Debug)]
pub struct LeakyBucketState {
    inner: Mutex<BucketSnapshot>,
    leak_interval: Duration,
    safety_margin: u32,
}

impl Default for LeakyBucketState {
    fn default() -> Self {
        Self::new()
    }
}

impl LeakyBucketState {
    /// Creates an empty bucket with the platform defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(DEFAULT_CAPACITY, DEFAULT_LEAK_INTERVAL, DEFAULT_SAFETY_MARGIN)
    }

    /// Creates an empty bucket with explicit settings.
    ///
    /// `capacity` is only the starting value; the first server report
    /// replaces it.
    #[must_use]
    pub fn with_settings(capacity: u32, leak_interval: Duration, safety_margin: u32) -> Self {
        Self {
            inner: Mutex::new(BucketSnapshot {
                capacity: capacity.max(1),
                current_fill: 0,
                last_observed_at: None,
            }),
            leak_interval,
            safety_margin,
        }
    }

    /// Returns the time one slot takes to drain.
    #[must_use]
    pub const fn leak_interval(&self) -> Duration {
        self.leak_interval
    }

    /// Records a server report, replacing the local state.
    ///
    /// A report with a zero capacity is ignored. A fill above capacity is
    /// clamped.
    pub fn observe(&self, limit: ApiCallLimit) {
        self.observe_at(limit, Instant::now());
    }

    /// Records a server report as of `now`.
    pub fn observe_at(&self, limit: ApiCallLimit, now: Instant) {
        if limit.bucket_size == 0 {
            return;
        }
        let mut state = self.lock();
        state.capacity = limit.bucket_size;
        state.current_fill = limit.request_count.min(limit.bucket_size);
        state.last_observed_at = Some(now);
    }

    /// Returns a copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> BucketSnapshot {
        *self.lock()
    }

    /// Returns how long to wait before the next call.
    #[must_use]
    pub fn wait_time(&self) -> Duration {
        self.wait_time_at(Instant::now())
    }

    /// Returns how long to wait before a call made at `now`.
    ///
    /// The wait covers the slots above `capacity - safety_margin`, minus the
    /// time already passed since the report.
    #[must_use]
    pub fn wait_time_at(&self, now: Instant) -> Duration {
        let state = self.snapshot();
        let threshold = state.capacity.saturating_sub(self.safety_margin);
        let excess = state.current_fill.saturating_sub(threshold);
        if excess == 0 {
            return Duration::ZERO;
        }

        let needed = self.leak_interval.saturating_mul(excess);
        let elapsed = state
            .last_observed_at
            .map_or(Duration::ZERO, |at| now.saturating_duration_since(at));
        needed.saturating_sub(elapsed)
    }

    /// Maximum number of rate-limited retries: the observed capacity.
    #[must_use]
    pub fn retry_bound(&self) -> u32 {
        self.lock().capacity
    }

    fn lock(&self) -> MutexGuard<'_, BucketSnapshot> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
