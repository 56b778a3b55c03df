//! HMAC-SHA256 primitives.
//!
//! All signature comparisons go through [`constant_time_compare`] so a
//! mismatch never leaks how many leading bytes were correct.
//!
//! ```rust
//! use shopify_client_core::auth::hmac::{compute_signature, compute_signature_base64};
//!
//! let hex = compute_signature("code=abc&shop=x.myshopify.com", "secret");
//! assert_eq!(hex.len(), 64);
//!
//! let b64 = compute_signature_base64(b"webhook payload", "secret");
//! assert_eq!(b64.len(), 44);
//! ```

use base64::prelude::*;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

#[allow(clippy::missing_panics_doc)] // HMAC accepts keys of any length
fn mac_bytes(message: &[u8], secret: &str) -> Vec<u8> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message);
    mac.finalize().into_bytes().to_vec()
}

/// Computes a lowercase hex HMAC-SHA256 of `message`.
#[must_use]
pub fn compute_signature(message: &str, secret: &str) -> String {
    hex::encode(mac_bytes(message.as_bytes(), secret))
}

/// Computes a standard base64 HMAC-SHA256 of raw bytes, the encoding used by
/// the `X-Shopify-Hmac-Sha256` webhook header.
#[must_use]
pub fn compute_signature_base64(message: &[u8], secret: &str) -> String {
    BASE64_STANDARD.encode(mac_bytes(message, secret))
}

/// Compares two strings in time independent of where they differ.
#[must_use]
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
