//! Resource declarations.
//!
//! A resource is nothing more than its path and its JSON root names; the
//! request logic lives in [`ResourceService`](crate::rest::ResourceService).

use std::fmt;

/// Path and root element names of a REST resource.
///
/// ```rust
/// use shopify_client_core::rest::ResourceEndpoint;
///
/// let products = ResourceEndpoint::PRODUCTS;
/// assert_eq!(products.singular, "product");
/// assert_eq!(products.collection_path(None), "products");
/// assert_eq!(products.member_path(None, 632910392), "products/632910392");
/// assert_eq!(
///     ResourceEndpoint::VARIANTS.collection_path(Some("products/632910392")),
///     "products/632910392/variants"
/// );
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ResourceEndpoint {
    /// Root element of a single resource, e.g. `product`.
    pub singular: &'static str,
    /// Root element of a collection, e.g. `products`.
    pub plural: &'static str,
    /// Collection path relative to the versioned base path.
    pub path: &'static str,
}

macro_rules! endpoints {
    ($($(#[$meta:meta])* $name:ident => ($singular:literal, $plural:literal, $path:literal);)*) => {
        impl ResourceEndpoint {
            $(
                $(#[$meta])*
                pub const $name: Self = Self::new($singular, $plural, $path);
            )*

            /// Every resource declared here.
            pub const ALL: &'static [Self] = &[$(Self::$name),*];
        }
    };
}

endpoints! {
    /// `products`
    PRODUCTS => ("product", "products", "products");
    /// `products/{product_id}/variants`, and `variants/{id}` for single variants.
    VARIANTS => ("variant", "variants", "variants");
    /// `products/{product_id}/images`
    PRODUCT_IMAGES => ("image", "images", "images");
    /// `custom_collections`
    CUSTOM_COLLECTIONS => ("custom_collection", "custom_collections", "custom_collections");
    /// `smart_collections`
    SMART_COLLECTIONS => ("smart_collection", "smart_collections", "smart_collections");
    /// `collects`
    COLLECTS => ("collect", "collects", "collects");
    /// `orders`
    ORDERS => ("order", "orders", "orders");
    /// `draft_orders`
    DRAFT_ORDERS => ("draft_order", "draft_orders", "draft_orders");
    /// `orders/{order_id}/transactions`
    TRANSACTIONS => ("transaction", "transactions", "transactions");
    /// `orders/{order_id}/refunds`
    REFUNDS => ("refund", "refunds", "refunds");
    /// `customers`
    CUSTOMERS => ("customer", "customers", "customers");
    /// `pages`
    PAGES => ("page", "pages", "pages");
    /// `blogs`
    BLOGS => ("blog", "blogs", "blogs");
    /// `blogs/{blog_id}/articles`
    ARTICLES => ("article", "articles", "articles");
    /// `redirects`
    REDIRECTS => ("redirect", "redirects", "redirects");
    /// `script_tags`
    SCRIPT_TAGS => ("script_tag", "script_tags", "script_tags");
    /// `webhooks`
    WEBHOOKS => ("webhook", "webhooks", "webhooks");
    /// `themes`
    THEMES => ("theme", "themes", "themes");
    /// `locations`
    LOCATIONS => ("location", "locations", "locations");
    /// `inventory_items`
    INVENTORY_ITEMS => ("inventory_item", "inventory_items", "inventory_items");
    /// `price_rules`
    PRICE_RULES => ("price_rule", "price_rules", "price_rules");
    /// `gift_cards`
    GIFT_CARDS => ("gift_card", "gift_cards", "gift_cards");
    /// `metafields`, also nested under most owners.
    METAFIELDS => ("metafield", "metafields", "metafields");
}

impl ResourceEndpoint {
    /// Declares a resource not listed here.
    #[must_use]
    pub const fn new(singular: &'static str, plural: &'static str, path: &'static str) -> Self {
        Self {
            singular,
            plural,
            path,
        }
    }

    /// Returns the collection path, under `parent` when given.
    #[must_use]
    pub fn collection_path(&self, parent: Option<&str>) -> String {
        match parent {
            Some(parent) => format!("{}/{}", parent.trim_matches('/'), self.path),
            None => self.path.to_string(),
        }
    }

    /// Returns the path of the member with `id`.
    #[must_use]
    pub fn member_path(&self, parent: Option<&str>, id: impl fmt::Display) -> String {
        format!("{}/{id}", self.collection_path(parent))
    }

    /// Returns the `count` path of the collection.
    #[must_use]
    pub fn count_path(&self, parent: Option<&str>) -> String {
        format!("{}/count", self.collection_path(parent))
    }
}

impl fmt::Display for ResourceEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}
