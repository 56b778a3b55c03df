//! Trust checks for requests that arrive from the platform.
//!
//! [`AuthorizationValidator`] answers three questions with a plain `bool`:
//! was this OAuth callback signed with our secret, was this app proxy request
//! signed with our secret, and was this webhook body signed with our secret.
//! It also validates shop domains before they are used to build URLs.
//!
//! # Key Rotation
//!
//! A validator built with [`AuthorizationValidator::from_config`] also
//! accepts signatures produced with `old_api_secret_key`. Checks try the
//! primary secret first.
//!
//! # Example
//!
//! ```rust
//! use shopify_client_core::auth::AuthorizationValidator;
//! use shopify_client_core::ApiSecretKey;
//!
//! let validator = AuthorizationValidator::new(
//!     ApiSecretKey::new("3467219a2f96ab7d2e95b8b9b3cd0514").unwrap(),
//! );
//!
//! assert!(validator.is_authentic_request(
//!     "code=cda84da98ee07b1231068a6ba51f7101\
//!      &hmac=1f2b427c24b6a0e2a9004a71ea16d3d5a213db5058218e57e9d5fb44d601b903\
//!      &shop=doppler-dev01.myshopify.com&timestamp=1540772285"
//! ));
//! assert!(AuthorizationValidator::is_valid_shop_domain("https://foo.myshopify.com"));
//! assert!(!AuthorizationValidator::is_valid_shop_domain("https://google.com"));
//! ```

use crate::auth::authorize;
use crate::auth::hmac::{compute_signature_base64, constant_time_compare};
use crate::auth::signature::{self, SignatureMode};
use crate::auth::QueryParams;
use crate::config::{ApiSecretKey, ShopDomain, ShopifyConfig};

/// Verifies signed inbound requests against the app's secret keys.
#[derive(Clone, Debug)]
pub struct AuthorizationValidator {
    secret: ApiSecretKey,
    previous_secret: Option<ApiSecretKey>,
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AuthorizationValidator>();
};

impl AuthorizationValidator {
    /// Creates a validator for a single secret.
    #[must_use]
    pub const fn new(secret: ApiSecretKey) -> Self {
        Self {
            secret,
            previous_secret: None,
        }
    }

    /// Also accepts signatures made with `previous`.
    #[must_use]
    pub fn with_previous_secret(mut self, previous: ApiSecretKey) -> Self {
        self.previous_secret = Some(previous);
        self
    }

    /// Creates a validator from the config's secret and, if set, its old secret.
    #[must_use]
    pub fn from_config(config: &ShopifyConfig) -> Self {
        Self {
            secret: config.api_secret_key().clone(),
            previous_secret: config.old_api_secret_key().cloned(),
        }
    }

    /// Returns `true` if an OAuth callback's `hmac` parameter is valid.
    ///
    /// Accepts a raw query string or already-decoded parameters; equivalent
    /// inputs give the same answer.
    #[must_use]
    pub fn is_authentic_request(&self, query: impl Into<QueryParams>) -> bool {
        self.verify(&query.into(), SignatureMode::OAuthCallback)
    }

    /// Returns `true` if an app proxy request's `signature` parameter is valid.
    #[must_use]
    pub fn is_authentic_proxy_request(&self, query: impl Into<QueryParams>) -> bool {
        self.verify(&query.into(), SignatureMode::AppProxy)
    }

    /// Returns `true` if `hmac_header` (the base64 `X-Shopify-Hmac-Sha256`
    /// value) matches the raw webhook body.
    #[must_use]
    pub fn is_authentic_webhook(&self, body: &[u8], hmac_header: &str) -> bool {
        self.secrets().any(|secret| {
            constant_time_compare(
                &compute_signature_base64(body, secret.as_ref()),
                hmac_header.trim(),
            )
        })
    }

    /// Returns `true` if `domain` names a shop on the platform.
    ///
    /// Accepts `name.myshopify.com` with an optional `http://` or `https://`
    /// scheme and an optional trailing `/`, in any letter case. Anything else,
    /// including ports, paths, queries and foreign hosts, is rejected.
    #[must_use]
    pub fn is_valid_shop_domain(domain: &str) -> bool {
        let lower = domain.to_ascii_lowercase();
        let rest = lower
            .strip_prefix("https://")
            .or_else(|| lower.strip_prefix("http://"))
            .unwrap_or(&lower);
        let host = rest.strip_suffix('/').unwrap_or(rest);

        host.strip_suffix(ShopDomain::SUFFIX)
            .is_some_and(ShopDomain::is_valid_shop_name)
    }

    /// Builds the authorization redirect URL.
    ///
    /// See [`authorize::build_authorization_url`].
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
        authorize::build_authorization_url(
            scopes,
            shop,
            client_id,
            redirect_uri,
            state,
            grant_options,
        )
    }

    fn verify(&self, params: &QueryParams, mode: SignatureMode) -> bool {
        if signature::verify(params, self.secret.as_ref(), mode) {
            return true;
        }

        let matched_previous = self
            .previous_secret
            .as_ref()
            .is_some_and(|previous| signature::verify(params, previous.as_ref(), mode));
        if matched_previous {
            tracing::debug!(?mode, "Signed request matched the previous secret key");
        }
        matched_previous
    }

    fn secrets(&self) -> impl Iterator<Item = &ApiSecretKey> {
        std::iter::once(&self.secret).chain(self.previous_secret.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const FIXTURE_SECRET: &str = "3467219a2f96ab7d2e95b8b9b3cd0514";

    fn validator() -> AuthorizationValidator {
        AuthorizationValidator::new(ApiSecretKey::new(FIXTURE_SECRET).unwrap())
    }

    fn fixture_map() -> HashMap<String, String> {
        [
            ("code", "cda84da98ee07b1231068a6ba51f7101"),
            (
                "hmac",
                "1f2b427c24b6a0e2a9004a71ea16d3d5a213db5058218e57e9d5fb44d601b903",
            ),
            ("shop", "doppler-dev01.myshopify.com"),
            ("timestamp", "1540772285"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn test_fixture_validates_from_map() {
        assert!(validator().is_authentic_request(fixture_map()));
    }

    #[test]
    fn test_fixture_fails_with_other_secret() {
        let other = AuthorizationValidator::new(ApiSecretKey::new("nope").unwrap());
        assert!(!other.is_authentic_request(fixture_map()));
    }

    #[test]
    fn test_previous_secret_is_accepted() {
        let rotated = AuthorizationValidator::new(ApiSecretKey::new("new-secret").unwrap())
            .with_previous_secret(ApiSecretKey::new(FIXTURE_SECRET).unwrap());
        assert!(rotated.is_authentic_request(fixture_map()));
    }

    #[test]
    fn test_webhook_signature() {
        let body = br#"{"id":1}"#;
        let header = compute_signature_base64(body, FIXTURE_SECRET);
        assert!(validator().is_authentic_webhook(body, &header));
        assert!(!validator().is_authentic_webhook(br#"{"id":2}"#, &header));
        assert!(!validator().is_authentic_webhook(body, ""));
    }

    #[test]
    fn test_shop_domain_variants() {
        for valid in [
            "foo.myshopify.com",
            "https://foo.myshopify.com",
            "http://foo.myshopify.com/",
            "HTTPS://Foo-Bar.MyShopify.com",
        ] {
            assert!(AuthorizationValidator::is_valid_shop_domain(valid), "{valid}");
        }

        for invalid in [
            "foo",
            "",
            "https://google.com",
            "https://foo.myshopify.com/admin",
            "https://foo.myshopify.com:443",
            "https://foo.myshopify.com?x=1",
            "https://evil.com/foo.myshopify.com",
            "https://user@foo.myshopify.com",
            "https://.myshopify.com",
            "ftp://foo.myshopify.com",
            "foo.myshopify.com.evil.com",
        ] {
            assert!(!AuthorizationValidator::is_valid_shop_domain(invalid), "{invalid}");
        }
    }
}
