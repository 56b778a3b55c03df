//! Canonical messages for signed inbound requests.
//!
//! OAuth callbacks and app proxy requests are signed with the same algorithm
//! but different canonical forms. [`SignatureMode`] names the two forms.
//!
//! | | OAuth callback | App proxy |
//! |---|---|---|
//! | signature parameter | `hmac` | `signature` |
//! | pair separator | `&` | none |
//! | escaping | `%` and `&` (plus `=` in keys) | none |
//!
//! In both modes the `hmac` and `signature` parameters are left out of the
//! message, pairs are sorted by key in byte order, and repeated keys have
//! their values joined with `,`.

use std::borrow::Cow;

use crate::auth::hmac::{compute_signature, constant_time_compare};
use crate::auth::QueryParams;

// Both keys are dropped in either mode, so OAuth never signs over `signature`.
const EXCLUDED_KEYS: [&str; 2] = ["hmac", "signature"];

/// Which canonical form a signed request uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SignatureMode {
    /// OAuth redirects and embedded app loads, signed in `hmac`.
    OAuthCallback,
    /// Requests forwarded through an app proxy, signed in `signature`.
    AppProxy,
}

impl SignatureMode {
    /// The query parameter carrying the signature.
    #[must_use]
    pub const fn signature_key(self) -> &'static str {
        match self {
            Self::OAuthCallback => "hmac",
            Self::AppProxy => "signature",
        }
    }

    const fn separator(self) -> &'static str {
        match self {
            Self::OAuthCallback => "&",
            Self::AppProxy => "",
        }
    }

    /// Builds the message that is fed to HMAC-SHA256.
    ///
    /// ```rust
    /// use shopify_client_core::auth::{QueryParams, SignatureMode};
    ///
    /// let params = QueryParams::parse("shop=a&hmac=ignored&code=1");
    /// assert_eq!(SignatureMode::OAuthCallback.canonical_message(&params), "code=1&shop=a");
    /// assert_eq!(SignatureMode::AppProxy.canonical_message(&params), "code=1shop=a");
    /// ```
    #[must_use]
    pub fn canonical_message(self, params: &QueryParams) -> String {
        let mut pairs: Vec<(Cow<'_, str>, String)> = params
            .iter()
            .filter(|(key, _)| !EXCLUDED_KEYS.contains(key))
            .map(|(key, values)| match self {
                Self::OAuthCallback => (
                    Cow::Owned(escape_key(key)),
                    values
                        .iter()
                        .map(|value| escape_value(value))
                        .collect::<Vec<_>>()
                        .join(","),
                ),
                Self::AppProxy => (Cow::Borrowed(key), values.join(",")),
            })
            .collect();

        pairs.sort_by(|(a, _), (b, _)| a.as_bytes().cmp(b.as_bytes()));

        pairs
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join(self.separator())
    }
}

fn escape_value(value: &str) -> String {
    value.replace('%', "%25").replace('&', "%26")
}

fn escape_key(key: &str) -> String {
    escape_value(key).replace('=', "%3D")
}

/// Computes the hex signature of `params` in the given mode.
#[must_use]
pub fn sign(params: &QueryParams, secret: &str, mode: SignatureMode) -> String {
    compute_signature(&mode.canonical_message(params), secret)
}

/// Returns `true` if the signature parameter of `params` matches `secret`.
///
/// A missing or repeated signature parameter fails verification.
#[must_use]
pub fn verify(params: &QueryParams, secret: &str, mode: SignatureMode) -> bool {
    let Some([received]) = params.get_all(mode.signature_key()) else {
        return false;
    };
    constant_time_compare(&sign(params, secret, mode), received)
}
