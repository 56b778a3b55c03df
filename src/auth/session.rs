//! Credentials for calling the Admin API on behalf of one shop.

use std::fmt;

use crate::config::ShopDomain;

/// The shop and access token a client authenticates with.
///
/// How the token was obtained is up to the host application. The token is
/// masked in `Debug` output.
///
/// ```rust
/// use shopify_client_core::{Session, ShopDomain};
///
/// let session = Session::new(ShopDomain::new("my-store").unwrap(), "shpat_123");
/// assert!(session.is_active());
/// assert!(!format!("{session:?}").contains("shpat_123"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    /// The shop this session is for.
    pub shop: ShopDomain,

    /// The access token sent in `X-Shopify-Access-Token`.
    pub access_token: String,
}

impl Session {
    /// Creates a session.
    #[must_use]
    pub fn new(shop: ShopDomain, access_token: impl Into<String>) -> Self {
        Self {
            shop,
            access_token: access_token.into(),
        }
    }

    /// Returns `true` if the session carries an access token.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.access_token.is_empty()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("shop", &self.shop)
            .field("access_token", &"*****")
            .finish()
    }
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Session>();
};
