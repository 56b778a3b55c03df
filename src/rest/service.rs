//! Generic CRUD over a declared resource.

use std::collections::HashMap;
use std::fmt::{self, Display};
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::clients::{RestClient, RestError};
use crate::rest::{ListPage, ResourceEndpoint, ResourceResponse};

/// CRUD operations for one resource, composed over a [`RestClient`].
///
/// `T` is the entity type; the default keeps entities as JSON.
///
/// # Example
///
/// ```rust,ignore
/// use serde_json::json;
/// use shopify_client_core::rest::{ResourceEndpoint, ResourceService};
///
/// let products = ResourceService::<serde_json::Value>::new(&client, ResourceEndpoint::PRODUCTS);
/// let created = products.create(&json!({"title": "Hat"})).await?;
/// let count = products.count(None).await?;
///
/// let variants = ResourceService::<serde_json::Value>::new(&client, ResourceEndpoint::VARIANTS)
///     .under(ResourceEndpoint::PRODUCTS, created["id"].as_u64().unwrap_or_default());
/// let page = variants.list(None).await?;
/// ```
pub struct ResourceService<'a, T = Value> {
    client: &'a RestClient,
    endpoint: ResourceEndpoint,
    parent: Option<String>,
    entity: PhantomData<fn() -> T>,
}

impl<T> Clone for ResourceService<'_, T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client,
            endpoint: self.endpoint,
            parent: self.parent.clone(),
            entity: PhantomData,
        }
    }
}

impl<T> fmt::Debug for ResourceService<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceService")
            .field("endpoint", &self.endpoint)
            .field("parent", &self.parent)
            .finish_non_exhaustive()
    }
}

impl<'a, T> ResourceService<'a, T>
where
    T: DeserializeOwned,
{
    /// Creates a service for `endpoint`.
    #[must_use]
    pub const fn new(client: &'a RestClient, endpoint: ResourceEndpoint) -> Self {
        Self {
            client,
            endpoint,
            parent: None,
            entity: PhantomData,
        }
    }

    /// Nests the resource under the member `id` of `parent`, e.g. variants
    /// under `products/{id}`.
    #[must_use]
    pub fn under(mut self, parent: ResourceEndpoint, id: impl Display) -> Self {
        self.parent = Some(parent.member_path(None, id));
        self
    }

    /// Returns the endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> ResourceEndpoint {
        self.endpoint
    }

    /// Lists the first page of the collection.
    ///
    /// # Errors
    ///
    /// Returns [`RestError`] if the request fails or the body has no
    /// collection root.
    pub async fn list(
        &self,
        query: Option<HashMap<String, String>>,
    ) -> Result<ListPage<T>, RestError> {
        let outcome = self
            .client
            .get::<Vec<T>>(&self.collection_path(), query, Some(self.endpoint.plural))
            .await?;
        Ok(outcome.into())
    }

    /// Lists the page named by a `page_info` token from a previous page.
    ///
    /// Cursor requests only accept `page_info` and `limit`.
    ///
    /// # Errors
    ///
    /// Returns [`RestError`] if the request fails.
    pub async fn list_page(
        &self,
        page_info: &str,
        limit: Option<u32>,
    ) -> Result<ListPage<T>, RestError> {
        let mut query = HashMap::from([("page_info".to_string(), page_info.to_string())]);
        if let Some(limit) = limit {
            query.insert("limit".to_string(), limit.to_string());
        }
        self.list(Some(query)).await
    }

    /// Fetches the member `id`.
    ///
    /// # Errors
    ///
    /// Returns [`RestError`]; a missing member surfaces as a 404 API error.
    pub async fn get(
        &self,
        id: impl Display,
        query: Option<HashMap<String, String>>,
    ) -> Result<ResourceResponse<T>, RestError> {
        let outcome = self
            .client
            .get::<T>(&self.member_path(id), query, Some(self.endpoint.singular))
            .await?;
        Ok(outcome.into())
    }

    /// Counts the collection.
    ///
    /// # Errors
    ///
    /// Returns [`RestError`] if the request fails or the body has no `count`.
    pub async fn count(&self, query: Option<HashMap<String, String>>) -> Result<u64, RestError> {
        let path = self.endpoint.count_path(self.parent.as_deref());
        let outcome = self.client.get::<u64>(&path, query, Some("count")).await?;
        Ok(outcome.result)
    }

    /// Creates a member from `body`, sent under the singular root.
    ///
    /// # Errors
    ///
    /// Returns [`RestError`]; validation failures surface as a 422 API error
    /// with field errors.
    pub async fn create<B>(&self, body: &B) -> Result<ResourceResponse<T>, RestError>
    where
        B: Serialize + ?Sized,
    {
        let outcome = self
            .client
            .post::<B, T>(&self.collection_path(), self.endpoint.singular, body)
            .await?;
        Ok(outcome.into())
    }

    /// Updates the member `id` with the fields in `body`.
    ///
    /// # Errors
    ///
    /// Returns [`RestError`] if the request fails.
    pub async fn update<B>(&self, id: impl Display, body: &B) -> Result<ResourceResponse<T>, RestError>
    where
        B: Serialize + ?Sized,
    {
        let outcome = self
            .client
            .put::<B, T>(&self.member_path(id), self.endpoint.singular, body)
            .await?;
        Ok(outcome.into())
    }

    /// Deletes the member `id`.
    ///
    /// # Errors
    ///
    /// Returns [`RestError`] if the request fails.
    pub async fn delete(&self, id: impl Display) -> Result<(), RestError> {
        self.client.delete(&self.member_path(id)).await?;
        Ok(())
    }

    fn collection_path(&self) -> String {
        self.endpoint.collection_path(self.parent.as_deref())
    }

    fn member_path(&self, id: impl Display) -> String {
        self.endpoint.member_path(self.parent.as_deref(), id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Session;
    use crate::config::ShopDomain;

    fn client() -> RestClient {
        let session = Session::new(ShopDomain::new("test-shop").unwrap(), "token");
        RestClient::new(&session, None).unwrap()
    }

    #[test]
    fn test_nested_paths() {
        let client = client();
        let variants =
            ResourceService::<Value>::new(&client, ResourceEndpoint::VARIANTS).under(ResourceEndpoint::PRODUCTS, 7);

        assert_eq!(variants.collection_path(), "products/7/variants");
        assert_eq!(variants.member_path(9), "products/7/variants/9");
    }

    #[test]
    fn test_debug_omits_client() {
        let client = client();
        let service = ResourceService::<Value>::new(&client, ResourceEndpoint::ORDERS);
        let debug = format!("{service:?}");
        assert!(debug.contains("orders"));
        assert!(!debug.contains("token"));
    }
}
