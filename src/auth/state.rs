//! Anti-forgery `state` values for the authorization redirect.

use rand::distributions::Alphanumeric;
use rand::Rng;
use std::fmt;

use crate::auth::hmac::constant_time_compare;

/// An opaque `state` token echoed back by the authorization callback.
///
/// ```rust
/// use shopify_client_core::auth::StateParam;
///
/// let state = StateParam::new();
/// assert_eq!(state.as_ref().len(), 15);
/// assert!(state.matches(state.as_ref()));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateParam(String);

impl StateParam {
    const NONCE_LENGTH: usize = 15;

    /// Generates a random alphanumeric nonce from the thread-local CSPRNG.
    #[must_use]
    pub fn new() -> Self {
        let nonce: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(Self::NONCE_LENGTH)
            .map(char::from)
            .collect();
        Self(nonce)
    }

    /// Wraps a caller-supplied state value.
    #[must_use]
    pub fn from_raw(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Compares against the value received in a callback, in constant time.
    #[must_use]
    pub fn matches(&self, received: &str) -> bool {
        constant_time_compare(&self.0, received)
    }
}

impl Default for StateParam {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<str> for StateParam {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StateParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nonce_is_alphanumeric() {
        let state = StateParam::new();
        assert!(state.as_ref().chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_nonces_differ() {
        assert_ne!(StateParam::new(), StateParam::new());
    }

    #[test]
    fn test_matches_rejects_other_values() {
        let state = StateParam::from_raw("xyz");
        assert!(state.matches("xyz"));
        assert!(!state.matches("xyz1"));
    }
}
