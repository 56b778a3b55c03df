//! # Shopify Client Core
//!
//! The request-execution and trust layer for Shopify Admin REST API clients.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`ShopifyConfig`] and [`ShopifyConfigBuilder`]
//! - Validated newtypes for API credentials and domain values
//! - Request templates that are cloned for every attempt, so a body is never
//!   sent twice from the same buffer
//! - Pluggable execution policies: a single attempt, a fixed-delay retry, and
//!   a leaky-bucket pacer driven by the server's call-budget header
//! - Typed errors for API failures and rate limits, with field errors parsed
//!   from the response body
//! - HMAC verification of OAuth callbacks, app proxy requests and webhooks,
//!   shop domain validation, and authorization URL construction
//! - Generic CRUD over declared REST resources
//!
//! ## Quick Start
//!
//! ```rust
//! use shopify_client_core::{ShopifyConfig, ApiKey, ApiSecretKey, ApiVersion};
//!
//! let config = ShopifyConfig::builder()
//!     .api_key(ApiKey::new("your-api-key").unwrap())
//!     .api_secret_key(ApiSecretKey::new("your-api-secret").unwrap())
//!     .scopes("read_products,write_orders".parse().unwrap())
//!     .api_version(ApiVersion::latest())
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Verifying Inbound Requests
//!
//! ```rust
//! use shopify_client_core::AuthorizationValidator;
//! use shopify_client_core::ApiSecretKey;
//!
//! let validator = AuthorizationValidator::new(ApiSecretKey::new("secret").unwrap());
//!
//! // Never trust `shop` or `code` before the signature checks out.
//! assert!(!validator.is_authentic_request("shop=foo.myshopify.com&hmac=00"));
//! assert!(AuthorizationValidator::is_valid_shop_domain("foo.myshopify.com"));
//! ```
//!
//! ## Making API Requests
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use shopify_client_core::{LeakyBucketPolicy, RestClient, Session, ShopDomain};
//! use shopify_client_core::rest::{ResourceEndpoint, ResourceService};
//!
//! let session = Session::new(ShopDomain::new("my-store")?, "access-token");
//!
//! // One policy shared by every client keeps one view of the call budget.
//! let policy = Arc::new(LeakyBucketPolicy::new());
//! let client = RestClient::new(&session, None)?.with_policy(policy);
//!
//! let products = ResourceService::<serde_json::Value>::new(&client, ResourceEndpoint::PRODUCTS);
//! let page = products.list(None).await?;
//! println!("{} products, next page: {:?}", page.len(), page.next_page_info());
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: configuration and execution policy are instance-based
//!   and passed explicitly
//! - **Fail-fast validation**: all newtypes validate on construction
//! - **Thread-safe**: all types are `Send + Sync`; the leaky bucket is shared
//!   behind a mutex that is never held across an await
//! - **Async-first**: designed for use with the Tokio async runtime
//! - **Verdicts, not exceptions**: signature and domain checks return `bool`

pub mod auth;
pub mod clients;
pub mod config;
pub mod error;
pub mod rest;

// Re-export public types at crate root for convenience
pub use auth::{AuthScopes, AuthorizationRequest, AuthorizationScope, AuthorizationValidator, Session};
pub use config::{
    ApiKey, ApiSecretKey, ApiVersion, HostUrl, ShopDomain, ShopifyConfig, ShopifyConfigBuilder,
};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    ApiCallLimit, ApiError, DataType, DefaultExecutionPolicy, ErrorClassifier, ExecutionPolicy,
    FixedRetryPolicy, HttpClient, HttpError, HttpMethod, InvalidHttpRequestError,
    LeakyBucketPolicy, LeakyBucketState, MaxHttpRetriesExceededError, PaginationInfo,
    RateLimitError, RequestBody, RequestTemplate, ResponseOutcome, RestClient, RestError,
};
