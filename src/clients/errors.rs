//! HTTP error types.
//!
//! - [`ApiError`]: a non-2xx response other than 429
//! - [`RateLimitError`]: a 429 response
//! - [`MaxHttpRetriesExceededError`]: a policy gave up after repeated 429s
//! - [`InvalidHttpRequestError`]: a request template failed validation
//! - [`HttpError`]: the unified error returned by every client call
//!
//! # Example
//!
//! ```rust,ignore
//! match client.execute(&template).await {
//!     Ok(outcome) => println!("{}", outcome.result),
//!     Err(HttpError::Api(e)) => eprintln!("{e}"),
//!     Err(HttpError::RateLimited(e)) => eprintln!("throttled, retry after {:?}", e.retry_after),
//!     Err(e) => eprintln!("request failed: {e}"),
//! }
//! ```

use std::collections::HashMap;
use std::time::Duration;

use thiserror::Error;

use crate::clients::http_response::ApiCallLimit;

/// Field name used when the body carries errors that belong to no field.
pub const BASE_ERROR_FIELD: &str = "error";

/// A non-2xx response, with the platform's error body parsed into fields.
///
/// `Display` renders `(status) field: message` for the first field error so a
/// CLI can print the error as-is.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("({status}) {}", summarize(.errors))]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Field name to error messages.
    pub errors: HashMap<String, Vec<String>>,
    /// The response body as received.
    pub raw_body: String,
    /// Value of the `X-Request-Id` header.
    pub request_id: Option<String>,
}

impl ApiError {
    /// Returns a one-line description of the first error.
    ///
    /// Base errors render without a field prefix. Field keys are visited in
    /// sorted order so the output is stable.
    #[must_use]
    pub fn summary(&self) -> String {
        summarize(&self.errors)
    }

    /// Returns the messages for `field`, if any.
    #[must_use]
    pub fn field_errors(&self, field: &str) -> Option<&[String]> {
        self.errors.get(field).map(Vec::as_slice)
    }
}

/// A 429 response.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("({status}) {}", summarize(.errors))]
pub struct RateLimitError {
    /// HTTP status code (429).
    pub status: u16,
    /// Field name to error messages.
    pub errors: HashMap<String, Vec<String>>,
    /// The response body as received.
    pub raw_body: String,
    /// Value of the `X-Request-Id` header.
    pub request_id: Option<String>,
    /// Value of the `Retry-After` header.
    pub retry_after: Option<Duration>,
    /// The call budget reported with the response.
    pub api_call_limit: Option<ApiCallLimit>,
}

fn summarize(errors: &HashMap<String, Vec<String>>) -> String {
    let mut fields: Vec<&String> = errors.keys().collect();
    let rank = |field: &str| (field != BASE_ERROR_FIELD, field.to_string());
    fields.sort_unstable_by(|a, b| rank(a).cmp(&rank(b)));

    fields
        .into_iter()
        .find_map(|field| {
            errors[field].first().map(|message| {
                if field == BASE_ERROR_FIELD {
                    message.clone()
                } else {
                    format!("{field}: {message}")
                }
            })
        })
        .unwrap_or_else(|| "Request failed with no error details".to_string())
}

/// Returned when a policy stops retrying a rate-limited request.
#[derive(Debug, Error)]
#[error("Exceeded maximum retry count of {tries}. Last error: {last}")]
pub struct MaxHttpRetriesExceededError {
    /// Attempts made, including the first.
    pub tries: u32,
    /// The last rate-limit response.
    pub last: RateLimitError,
}

/// A request template failed validation before being sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A POST or PUT request was built without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },

    /// The URL is not an absolute http(s) URL.
    #[error("Invalid request URL '{url}'.")]
    InvalidUrl {
        /// The rejected URL.
        url: String,
    },

    /// A header name or value cannot be sent.
    #[error("Invalid header '{name}'.")]
    InvalidHeader {
        /// The rejected header name.
        name: String,
    },
}

/// Unified error type for HTTP operations.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The server answered with a non-2xx status other than 429.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The server answered 429 and the policy did not retry.
    #[error(transparent)]
    RateLimited(#[from] RateLimitError),

    /// A policy gave up retrying.
    #[error(transparent)]
    MaxRetries(#[from] MaxHttpRetriesExceededError),

    /// Retrying would run past the policy deadline.
    #[error("Retry deadline of {deadline:?} exceeded after {tries} tries. Last error: {last}")]
    DeadlineExceeded {
        /// The configured deadline.
        deadline: Duration,
        /// Attempts made.
        tries: u32,
        /// The last rate-limit response.
        last: RateLimitError,
    },

    /// The caller's overall timeout elapsed.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body could not be deserialized.
    #[error("Failed to deserialize response: {0}")]
    Deserialize(#[from] serde_json::Error),
}

impl HttpError {
    /// Returns the HTTP status carried by the error, if a response was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api(e) => Some(e.status),
            Self::RateLimited(e) => Some(e.status),
            Self::MaxRetries(e) => Some(e.last.status),
            Self::DeadlineExceeded { last, .. } => Some(last.status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            Self::Timeout(_) | Self::InvalidRequest(_) | Self::Deserialize(_) => None,
        }
    }

    /// Returns `true` for a 429 that was handed back to the caller.
    #[must_use]
    pub const fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited(_))
    }
}
