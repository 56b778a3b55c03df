//! Response wrapper for resource operations.
//!
//! [`ResourceResponse<T>`] keeps the decoded resource together with the
//! pagination, call-budget and request-id metadata of the response. It
//! implements `Deref<Target = T>`, so a `ListPage<T>` can be iterated and
//! indexed like the `Vec<T>` it holds.
//!
//! # Example
//!
//! ```rust,ignore
//! let page: ListPage<Value> = products.list(None).await?;
//! for product in page.iter() {
//!     println!("{}", product["title"]);
//! }
//! if let Some(next) = page.next_page_info() {
//!     let page = products.list_page(next, Some(50)).await?;
//! }
//! ```

use std::ops::{Deref, DerefMut};

use crate::clients::{ApiCallLimit, PaginationInfo, ResponseOutcome};

/// A decoded resource plus response metadata.
///
/// ```rust
/// use shopify_client_core::rest::ResourceResponse;
/// use shopify_client_core::clients::{ApiCallLimit, PaginationInfo};
///
/// let response = ResourceResponse::new(
///     vec!["item1", "item2", "item3"],
///     PaginationInfo {
///         prev_page_info: None,
///         next_page_info: Some("eyJsYXN0X2lkIjo0fQ".to_string()),
///     },
///     Some(ApiCallLimit { request_count: 1, bucket_size: 40 }),
///     Some("req-123".to_string()),
/// );
///
/// assert_eq!(response.len(), 3);
/// assert_eq!(response[0], "item1");
/// assert!(response.has_next_page());
/// assert!(!response.has_prev_page());
/// ```
#[derive(Debug, Clone)]
pub struct ResourceResponse<T> {
    data: T,
    pagination: PaginationInfo,
    rate_limit: Option<ApiCallLimit>,
    request_id: Option<String>,
}

/// One page of a collection.
pub type ListPage<T> = ResourceResponse<Vec<T>>;

impl<T> ResourceResponse<T> {
    /// Creates a response from its parts.
    #[must_use]
    pub const fn new(
        data: T,
        pagination: PaginationInfo,
        rate_limit: Option<ApiCallLimit>,
        request_id: Option<String>,
    ) -> Self {
        Self {
            data,
            pagination,
            rate_limit,
            request_id,
        }
    }

    /// Consumes the response and returns the inner data.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.data
    }

    /// Returns a reference to the inner data.
    #[must_use]
    pub const fn data(&self) -> &T {
        &self.data
    }

    /// Returns `true` if there is a next page of results.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.pagination.next_page_info.is_some()
    }

    /// Returns `true` if there is a previous page of results.
    #[must_use]
    pub const fn has_prev_page(&self) -> bool {
        self.pagination.prev_page_info.is_some()
    }

    /// Returns the `page_info` token for the next page.
    #[must_use]
    pub fn next_page_info(&self) -> Option<&str> {
        self.pagination.next_page_info.as_deref()
    }

    /// Returns the `page_info` token for the previous page.
    #[must_use]
    pub fn prev_page_info(&self) -> Option<&str> {
        self.pagination.prev_page_info.as_deref()
    }

    /// Returns the call budget reported with the response.
    #[must_use]
    pub const fn rate_limit(&self) -> Option<&ApiCallLimit> {
        self.rate_limit.as_ref()
    }

    /// Returns the `X-Request-Id` of the response.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Maps the inner data, keeping the metadata.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> ResourceResponse<U>
    where
        F: FnOnce(T) -> U,
    {
        ResourceResponse {
            data: f(self.data),
            pagination: self.pagination,
            rate_limit: self.rate_limit,
            request_id: self.request_id,
        }
    }
}

impl<T> From<ResponseOutcome<T>> for ResourceResponse<T> {
    fn from(outcome: ResponseOutcome<T>) -> Self {
        let request_id = outcome.request_id().map(String::from);
        Self {
            data: outcome.result,
            pagination: outcome.pagination,
            rate_limit: outcome.api_call_limit,
            request_id,
        }
    }
}

impl<T> Deref for ResourceResponse<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl<T> DerefMut for ResourceResponse<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.data
    }
}

// Verify ResourceResponse is Send + Sync when T is Send + Sync
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceResponse<String>>();
    assert_send_sync::<ListPage<serde_json::Value>>();
};
