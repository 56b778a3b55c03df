//! REST resources over the request-execution core.
//!
//! Resources are declarations, not types with behavior:
//!
//! - [`ResourceEndpoint`]: the path and JSON root names of a resource
//! - [`ResourceService`]: `list`, `list_page`, `get`, `count`, `create`,
//!   `update`, `delete` for any endpoint, composed over
//!   [`RestClient`](crate::clients::RestClient)
//! - [`ResourceResponse`] and [`ListPage`]: decoded entities plus pagination
//!   and call-budget metadata
//!
//! Entity shapes are left to the caller: use `serde_json::Value` (the
//! default) or any `Deserialize` type.
//!
//! # Example
//!
//! ```rust,ignore
//! use shopify_client_core::rest::{ResourceEndpoint, ResourceService};
//!
//! let orders = ResourceService::<serde_json::Value>::new(&client, ResourceEndpoint::ORDERS);
//! let mut page = orders.list(None).await?;
//! while let Some(next) = page.next_page_info().map(String::from) {
//!     page = orders.list_page(&next, Some(250)).await?;
//! }
//! ```

mod endpoint;
mod response;
mod service;

pub use endpoint::ResourceEndpoint;
pub use response::{ListPage, ResourceResponse};
pub use service::ResourceService;
