//! Authorization redirect URL construction.
//!
//! The first step of installing an app is sending the merchant to
//! `https://{shop}/admin/oauth/authorize` with the app's client id, the
//! requested scopes, and the callback URL.
//!
//! ```rust
//! use shopify_client_core::auth::{AuthorizationRequest, AuthorizationScope};
//! use shopify_client_core::ShopDomain;
//!
//! let url = AuthorizationRequest::new(
//!     ShopDomain::new("my-store").unwrap(),
//!     "abc",
//!     "https://app.example.com/auth/callback",
//! )
//! .scope(AuthorizationScope::ReadOrders)
//! .state("xyz")
//! .grant_option("per-user")
//! .url();
//!
//! assert_eq!(
//!     url,
//!     "https://my-store.myshopify.com/admin/oauth/authorize?client_id=abc&scope=read_orders\
//!      &redirect_uri=https://app.example.com/auth/callback&state=xyz&grant_options[]=per-user"
//! );
//! ```

use crate::auth::AuthScopes;
use crate::config::{ShopDomain, ShopifyConfig};

/// Characters left literal in query components besides ASCII alphanumerics.
///
/// These are safe inside a query value and keep scope lists, callback URLs
/// and `grant_options[]` readable.
const LITERAL: &str = "-._~,:/[]@";

/// A pending authorization redirect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationRequest {
    shop: ShopDomain,
    client_id: String,
    scopes: AuthScopes,
    redirect_uri: String,
    state: Option<String>,
    grant_options: Vec<String>,
}

impl AuthorizationRequest {
    /// Starts a request with no scopes, no state and no grant options.
    #[must_use]
    pub fn new(
        shop: ShopDomain,
        client_id: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            shop,
            client_id: client_id.into(),
            scopes: AuthScopes::new(),
            redirect_uri: redirect_uri.into(),
            state: None,
            grant_options: Vec::new(),
        }
    }

    /// Starts a request using the config's API key and scopes.
    #[must_use]
    pub fn from_config(
        config: &ShopifyConfig,
        shop: ShopDomain,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self::new(shop, config.api_key().as_ref(), redirect_uri).scopes(config.scopes().clone())
    }

    /// Replaces the requested scopes.
    #[must_use]
    pub fn scopes(mut self, scopes: AuthScopes) -> Self {
        self.scopes = scopes;
        self
    }

    /// Appends one scope.
    #[must_use]
    pub fn scope(mut self, scope: impl AsRef<str>) -> Self {
        self.scopes.push(scope);
        self
    }

    /// Sets the `state` value echoed back to the callback.
    #[must_use]
    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Appends a `grant_options[]` value such as `per-user`.
    #[must_use]
    pub fn grant_option(mut self, option: impl Into<String>) -> Self {
        self.grant_options.push(option.into());
        self
    }

    /// Returns the shop the merchant is sent to.
    #[must_use]
    pub const fn shop(&self) -> &ShopDomain {
        &self.shop
    }

    /// Renders the redirect URL.
    #[must_use]
    pub fn url(&self) -> String {
        let mut params: Vec<(&str, &str)> = Vec::with_capacity(4 + self.grant_options.len());
        let scope = self.scopes.to_string();
        params.push(("client_id", self.client_id.as_str()));
        params.push(("scope", scope.as_str()));
        params.push(("redirect_uri", self.redirect_uri.as_str()));
        if let Some(state) = &self.state {
            params.push(("state", state.as_str()));
        }
        for option in &self.grant_options {
            params.push(("grant_options[]", option.as_str()));
        }

        let query = params
            .iter()
            .map(|(key, value)| format!("{}={}", encode_component(key), encode_component(value)))
            .collect::<Vec<_>>()
            .join("&");

        format!("https://{}/admin/oauth/authorize?{query}", self.shop)
    }
}

/// Builds an authorization redirect URL in one call.
///
/// Scopes are joined with `,` in the order given, duplicates dropped.
#[must_use]
pub fn build_authorization_url<I, S>(
    scopes: I,
    shop: &ShopDomain,
    client_id: &str,
    redirect_uri: &str,
    state: Option<&str>,
    grant_options: &[&str],
) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut request = AuthorizationRequest::new(shop.clone(), client_id, redirect_uri)
        .scopes(scopes.into_iter().collect());
    if let Some(state) = state {
        request = request.state(state);
    }
    grant_options
        .iter()
        .fold(request, |request, option| request.grant_option(*option))
        .url()
}

fn encode_component(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    let mut buf = [0u8; 4];
    for c in value.chars() {
        if c.is_ascii_alphanumeric() || LITERAL.contains(c) {
            encoded.push(c);
        } else {
            encoded.push_str(&urlencoding::encode(c.encode_utf8(&mut buf)));
        }
    }
    encoded
}
