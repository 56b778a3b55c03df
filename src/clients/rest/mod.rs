//! REST API client for Shopify Admin API.
//!
//! - [`RestClient`]: `get()`, `post()`, `put()`, `delete()` with root-element
//!   wrapping and unwrapping
//! - [`RestError`]: error type for REST API operations
//!
//! # Deprecation Notice
//!
//! The Shopify Admin REST API is deprecated. Shopify recommends migrating to
//! the GraphQL Admin API for new development. This client logs a deprecation
//! warning when constructed.
//!
//! # Path Normalization
//!
//! - Leading slashes are stripped: `/products` -> `products.json`
//! - Trailing `.json` is stripped and re-added: `products.json` -> `products.json`
//! - Empty paths are rejected with [`RestError::InvalidPath`]
//!
//! # Retry Behavior
//!
//! Requests run through the client's execution policy. The default makes a
//! single attempt; see [`with_policy`](RestClient::with_policy).

mod client;
mod errors;

pub use client::RestClient;
pub use errors::RestError;
