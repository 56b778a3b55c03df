//! HTTP client types for Shopify API communication.
//!
//! This module is the request-execution layer: templates describe a call,
//! policies decide how many attempts it takes, and outcomes carry what came
//! back.
//!
//! # Overview
//!
//! - [`RequestTemplate`]: an immutable description of one call; clone it to mutate
//! - [`ResponseOutcome`]: status, headers, raw body and decoded result
//! - [`ErrorClassifier`]: maps non-2xx outcomes to [`ApiError`] or [`RateLimitError`]
//! - [`ExecutionPolicy`]: [`DefaultExecutionPolicy`], [`FixedRetryPolicy`], [`LeakyBucketPolicy`]
//! - [`LeakyBucketState`]: the shared call-budget model
//! - [`HttpClient`]: the transport and the policy that drives it
//! - [`RestClient`]: JSON REST calls with root-element handling
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use shopify_client_core::clients::{HttpClient, HttpMethod, LeakyBucketPolicy};
//! use shopify_client_core::{Session, ShopDomain};
//!
//! let session = Session::new(ShopDomain::new("my-store")?, "access-token");
//! let client = HttpClient::new("/admin/api/2025-10", &session, None)?
//!     .with_policy(Arc::new(LeakyBucketPolicy::new()));
//!
//! let template = client.prepare_request(HttpMethod::Get, "shop.json").build()?;
//! let outcome = client.execute(&template).await?;
//! ```
//!
//! # Retry Behavior
//!
//! Only rate-limited (429) responses are ever retried, and only by a policy
//! that retries. Every other non-2xx status surfaces as [`HttpError::Api`]
//! on the first attempt.

mod classifier;
mod errors;
mod http_client;
mod http_request;
mod http_response;
pub mod policy;
pub mod rest;

pub use classifier::{parse_field_errors, ErrorClassifier, TOO_MANY_REQUESTS};
pub use errors::{
    ApiError, HttpError, InvalidHttpRequestError, MaxHttpRetriesExceededError, RateLimitError,
    BASE_ERROR_FIELD,
};
pub use http_client::{HttpClient, SDK_VERSION};
pub use http_request::{
    DataType, HttpMethod, RequestBody, RequestTemplate, RequestTemplateBuilder,
    ACCESS_TOKEN_HEADER,
};
pub use http_response::{ApiCallLimit, PaginationInfo, ResponseOutcome, MAX_RETRY_AFTER};
pub use policy::{
    AttemptExecutor, AttemptFuture, BucketSnapshot, DefaultExecutionPolicy, ExecutionPolicy,
    FixedRetryPolicy, InstantSleeper, LeakyBucketPolicy, LeakyBucketState, Sleeper,
    TokioSleeper, TrackingSleeper,
};
pub use rest::{RestClient, RestError};
