//! OAuth access scopes.
//!
//! [`AuthorizationScope`] names the scopes the Admin API grants;
//! [`AuthScopes`] is the ordered, de-duplicated list an app requests.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A well-known Admin API access scope.
///
/// Scopes that have no variant here can still be requested through
/// [`AuthScopes::push_raw`] or by parsing a string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AuthorizationScope {
    ReadContent,
    WriteContent,
    ReadThemes,
    WriteThemes,
    ReadProducts,
    WriteProducts,
    ReadCustomers,
    WriteCustomers,
    ReadOrders,
    WriteOrders,
    ReadDraftOrders,
    WriteDraftOrders,
    ReadInventory,
    WriteInventory,
    ReadLocations,
    ReadScriptTags,
    WriteScriptTags,
    ReadFulfillments,
    WriteFulfillments,
    ReadShipping,
    WriteShipping,
    ReadAnalytics,
    ReadUsers,
    WriteUsers,
    ReadCheckouts,
    WriteCheckouts,
    ReadReports,
    WriteReports,
    ReadPriceRules,
    WritePriceRules,
    ReadMarketingEvents,
    WriteMarketingEvents,
    ReadResourceFeedbacks,
    WriteResourceFeedbacks,
}

impl AuthorizationScope {
    /// Every known scope, in declaration order.
    pub const ALL: [Self; 34] = [
        Self::ReadContent,
        Self::WriteContent,
        Self::ReadThemes,
        Self::WriteThemes,
        Self::ReadProducts,
        Self::WriteProducts,
        Self::ReadCustomers,
        Self::WriteCustomers,
        Self::ReadOrders,
        Self::WriteOrders,
        Self::ReadDraftOrders,
        Self::WriteDraftOrders,
        Self::ReadInventory,
        Self::WriteInventory,
        Self::ReadLocations,
        Self::ReadScriptTags,
        Self::WriteScriptTags,
        Self::ReadFulfillments,
        Self::WriteFulfillments,
        Self::ReadShipping,
        Self::WriteShipping,
        Self::ReadAnalytics,
        Self::ReadUsers,
        Self::WriteUsers,
        Self::ReadCheckouts,
        Self::WriteCheckouts,
        Self::ReadReports,
        Self::WriteReports,
        Self::ReadPriceRules,
        Self::WritePriceRules,
        Self::ReadMarketingEvents,
        Self::WriteMarketingEvents,
        Self::ReadResourceFeedbacks,
        Self::WriteResourceFeedbacks,
    ];

    /// Returns the wire name, e.g. `read_customers`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ReadContent => "read_content",
            Self::WriteContent => "write_content",
            Self::ReadThemes => "read_themes",
            Self::WriteThemes => "write_themes",
            Self::ReadProducts => "read_products",
            Self::WriteProducts => "write_products",
            Self::ReadCustomers => "read_customers",
            Self::WriteCustomers => "write_customers",
            Self::ReadOrders => "read_orders",
            Self::WriteOrders => "write_orders",
            Self::ReadDraftOrders => "read_draft_orders",
            Self::WriteDraftOrders => "write_draft_orders",
            Self::ReadInventory => "read_inventory",
            Self::WriteInventory => "write_inventory",
            Self::ReadLocations => "read_locations",
            Self::ReadScriptTags => "read_script_tags",
            Self::WriteScriptTags => "write_script_tags",
            Self::ReadFulfillments => "read_fulfillments",
            Self::WriteFulfillments => "write_fulfillments",
            Self::ReadShipping => "read_shipping",
            Self::WriteShipping => "write_shipping",
            Self::ReadAnalytics => "read_analytics",
            Self::ReadUsers => "read_users",
            Self::WriteUsers => "write_users",
            Self::ReadCheckouts => "read_checkouts",
            Self::WriteCheckouts => "write_checkouts",
            Self::ReadReports => "read_reports",
            Self::WriteReports => "write_reports",
            Self::ReadPriceRules => "read_price_rules",
            Self::WritePriceRules => "write_price_rules",
            Self::ReadMarketingEvents => "read_marketing_events",
            Self::WriteMarketingEvents => "write_marketing_events",
            Self::ReadResourceFeedbacks => "read_resource_feedbacks",
            Self::WriteResourceFeedbacks => "write_resource_feedbacks",
        }
    }
}

impl AsRef<str> for AuthorizationScope {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for AuthorizationScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthorizationScope {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|scope| scope.as_str() == s)
            .ok_or_else(|| ConfigError::InvalidScopes {
                reason: format!("Unknown scope: '{s}'"),
            })
    }
}

/// An ordered list of scopes with duplicates removed.
///
/// Order is insertion order, which is the order the scopes appear in the
/// authorization URL.
///
/// ```rust
/// use shopify_client_core::auth::{AuthScopes, AuthorizationScope};
///
/// let scopes: AuthScopes = [
///     AuthorizationScope::ReadCustomers,
///     AuthorizationScope::WriteCustomers,
///     AuthorizationScope::ReadCustomers,
/// ]
/// .into_iter()
/// .collect();
/// assert_eq!(scopes.to_string(), "read_customers,write_customers");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct AuthScopes {
    scopes: Vec<String>,
}

impl AuthScopes {
    /// Creates an empty scope list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a scope unless it is already present.
    pub fn push(&mut self, scope: impl AsRef<str>) {
        self.push_raw(scope.as_ref());
    }

    /// Appends a scope by name, trimming whitespace. Empty names are ignored.
    pub fn push_raw(&mut self, scope: &str) {
        let scope = scope.trim();
        if !scope.is_empty() && !self.scopes.iter().any(|s| s == scope) {
            self.scopes.push(scope.to_string());
        }
    }

    /// Returns `true` if no scopes are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Returns the number of scopes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Iterates over scope names in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.scopes.iter().map(String::as_str)
    }

    /// Returns `true` if every scope in `other` is granted by `self`.
    ///
    /// `write_x` grants `read_x`.
    #[must_use]
    pub fn covers(&self, other: &Self) -> bool {
        other.iter().all(|wanted| {
            self.iter().any(|held| {
                held == wanted || Self::implied_read(held).is_some_and(|read| read == wanted)
            })
        })
    }

    fn implied_read(scope: &str) -> Option<String> {
        scope
            .strip_prefix("unauthenticated_write_")
            .map(|rest| format!("unauthenticated_read_{rest}"))
            .or_else(|| scope.strip_prefix("write_").map(|rest| format!("read_{rest}")))
    }
}

impl<S: AsRef<str>> FromIterator<S> for AuthScopes {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut scopes = Self::new();
        for scope in iter {
            scopes.push(scope);
        }
        scopes
    }
}

impl FromStr for AuthScopes {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut scopes = Self::new();
        for scope in s.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            if !scope.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(ConfigError::InvalidScopes {
                    reason: format!("Invalid characters in scope: '{scope}'"),
                });
            }
            scopes.push_raw(scope);
        }
        Ok(scopes)
    }
}

impl fmt::Display for AuthScopes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.scopes.join(","))
    }
}

impl Serialize for AuthScopes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AuthScopes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
