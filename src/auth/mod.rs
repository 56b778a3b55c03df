//! Authentication and trust verification.
//!
//! - [`Session`]: the shop and access token a client sends with every call
//! - [`AuthScopes`] and [`AuthorizationScope`]: requested access scopes
//! - [`AuthorizationValidator`]: signature checks for OAuth callbacks, app
//!   proxy requests and webhooks, plus shop domain validation
//! - [`AuthorizationRequest`]: the authorization redirect URL
//! - [`hmac`]: HMAC-SHA256 and constant-time comparison primitives
//!
//! # Installing an app
//!
//! ```rust
//! use shopify_client_core::auth::{AuthorizationRequest, AuthorizationValidator, StateParam};
//! use shopify_client_core::{ApiKey, ApiSecretKey, ShopDomain, ShopifyConfig};
//!
//! let config = ShopifyConfig::builder()
//!     .api_key(ApiKey::new("client-id").unwrap())
//!     .api_secret_key(ApiSecretKey::new("secret").unwrap())
//!     .scopes("read_products,write_orders".parse().unwrap())
//!     .build()
//!     .unwrap();
//!
//! // 1. Redirect the merchant.
//! let shop_input = "example-shop.myshopify.com";
//! assert!(AuthorizationValidator::is_valid_shop_domain(shop_input));
//! let state = StateParam::new();
//! let url = AuthorizationRequest::from_config(
//!     &config,
//!     ShopDomain::new(shop_input).unwrap(),
//!     "https://app.example.com/auth/callback",
//! )
//! .state(state.as_ref())
//! .url();
//! assert!(url.contains("/admin/oauth/authorize?"));
//!
//! // 2. On the callback, check the signature before trusting anything else.
//! let validator = AuthorizationValidator::from_config(&config);
//! assert!(!validator.is_authentic_request("code=1&shop=example-shop.myshopify.com&hmac=bad"));
//! ```

mod authorize;
pub mod hmac;
mod query;
mod scopes;
pub mod session;
mod signature;
mod state;
mod validator;

pub use authorize::{build_authorization_url, AuthorizationRequest};
pub use query::QueryParams;
pub use scopes::{AuthScopes, AuthorizationScope};
pub use session::Session;
pub use signature::{sign, verify, SignatureMode};
pub use state::StateParam;
pub use validator::AuthorizationValidator;
