//! REST-specific error types.
//!
//! - [`RestError::InvalidPath`]: a path was empty after normalization
//! - [`RestError::Http`]: wraps [`HttpError`], including API and rate-limit errors
//! - [`RestError::Json`]: a request body could not be serialized
//!
//! # Example
//!
//! ```rust,ignore
//! use shopify_client_core::clients::{HttpError, RestError};
//!
//! match client.get::<Value>("products", None, Some("products")).await {
//!     Ok(outcome) => println!("{}", outcome.result),
//!     Err(RestError::Http(HttpError::Api(e))) => eprintln!("{e}"),
//!     Err(e) => eprintln!("request failed: {e}"),
//! }
//! ```

use crate::clients::HttpError;
use thiserror::Error;

/// Error type for REST API operations.
///
/// ```rust
/// use shopify_client_core::clients::RestError;
///
/// let error = RestError::InvalidPath { path: "".to_string() };
/// assert!(error.to_string().contains("Invalid"));
/// ```
#[derive(Debug, Error)]
pub enum RestError {
    /// The REST API path is empty after normalization.
    #[error("Invalid REST API path: {path}")]
    InvalidPath {
        /// The invalid path that was provided.
        path: String,
    },

    /// An HTTP-level error occurred.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// A request body could not be serialized.
    #[error("Failed to serialize request body: {0}")]
    Json(#[from] serde_json::Error),
}

impl RestError {
    /// Returns the HTTP status carried by the error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http(e) => e.status(),
            Self::InvalidPath { .. } | Self::Json(_) => None,
        }
    }
}
