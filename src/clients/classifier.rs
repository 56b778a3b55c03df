//! Maps response outcomes to success or a typed error.

use std::collections::HashMap;

use serde_json::Value;

use crate::clients::errors::{ApiError, HttpError, RateLimitError, BASE_ERROR_FIELD};
use crate::clients::http_response::ResponseOutcome;

/// Status code the platform uses for throttled calls.
pub const TOO_MANY_REQUESTS: u16 = 429;

/// Classifies a [`ResponseOutcome`] by status.
///
/// - 2xx passes through unchanged
/// - 429 becomes [`HttpError::RateLimited`]
/// - any other status becomes [`HttpError::Api`]
///
/// Policies use this after every attempt; only the rate-limit variant is
/// ever retried.
#[derive(Clone, Copy, Debug, Default)]
pub struct ErrorClassifier;

impl ErrorClassifier {
    /// Returns the outcome when it succeeded, or the error it represents.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::RateLimited`] for 429 and [`HttpError::Api`] for
    /// every other non-2xx status.
    pub fn check(outcome: ResponseOutcome) -> Result<ResponseOutcome, HttpError> {
        if outcome.is_ok() {
            return Ok(outcome);
        }

        let errors = parse_field_errors(&outcome.result);
        let request_id = outcome.request_id().map(String::from);

        if outcome.status == TOO_MANY_REQUESTS {
            return Err(HttpError::RateLimited(RateLimitError {
                status: outcome.status,
                errors,
                request_id,
                retry_after: outcome.retry_after,
                api_call_limit: outcome.api_call_limit,
                raw_body: outcome.raw_body,
            }));
        }

        Err(HttpError::Api(ApiError {
            status: outcome.status,
            errors,
            request_id,
            raw_body: outcome.raw_body,
        }))
    }
}

/// Extracts field errors from an error body.
///
/// Understands the shapes the platform sends:
///
/// | body | result |
/// |------|--------|
/// | `{"errors": "msg"}` | `{"error": ["msg"]}` |
/// | `{"errors": ["a", "b"]}` | `{"error": ["a", "b"]}` |
/// | `{"errors": {"title": ["m"]}}` | `{"title": ["m"]}` |
/// | `{"error": "e", "error_description": "d"}` | `{"error": ["e", "d"]}` |
///
/// Anything else yields an empty map.
#[must_use]
pub fn parse_field_errors(body: &Value) -> HashMap<String, Vec<String>> {
    let mut result: HashMap<String, Vec<String>> = HashMap::new();

    match body.get("errors") {
        Some(Value::String(message)) => {
            result.insert(BASE_ERROR_FIELD.to_string(), vec![message.clone()]);
        }
        Some(Value::Array(items)) => {
            let messages: Vec<String> = items.iter().filter_map(message_text).collect();
            if !messages.is_empty() {
                result.insert(BASE_ERROR_FIELD.to_string(), messages);
            }
        }
        Some(Value::Object(fields)) => {
            for (field, value) in fields {
                let messages: Vec<String> = match value {
                    Value::Array(items) => items.iter().filter_map(message_text).collect(),
                    other => message_text(other).into_iter().collect(),
                };
                if !messages.is_empty() {
                    result.insert(field.clone(), messages);
                }
            }
        }
        _ => {}
    }

    if result.is_empty() {
        if let Some(error) = body.get("error").and_then(message_text) {
            let mut messages = vec![error];
            if let Some(description) = body.get("error_description").and_then(message_text) {
                messages.push(description);
            }
            result.insert(BASE_ERROR_FIELD.to_string(), messages);
        }
    }

    result
}

fn message_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}
