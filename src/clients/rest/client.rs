//! REST client implementation for Shopify Admin API.
//!
//! [`RestClient`] is the single request-executing service every resource
//! goes through. It normalizes paths, wraps JSON bodies in their root
//! element, runs the request through the client's execution policy, and
//! unwraps the response by root element.

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::auth::Session;
use crate::clients::http_request::{HttpMethod, RequestBody};
use crate::clients::policy::ExecutionPolicy;
use crate::clients::rest::RestError;
use crate::clients::{HttpClient, ResponseOutcome};
use crate::config::{ApiVersion, ShopifyConfig};

/// REST API client for Shopify Admin API.
///
/// # Thread Safety
///
/// `RestClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Deprecation Notice
///
/// The Shopify Admin REST API is deprecated. A warning is logged when this
/// client is constructed.
///
/// # Example
///
/// ```rust,ignore
/// use serde_json::{json, Value};
/// use shopify_client_core::{RestClient, Session, ShopDomain};
///
/// let session = Session::new(ShopDomain::new("my-store")?, "access-token");
/// let client = RestClient::new(&session, None)?;
///
/// let products = client.get::<Vec<Value>>("products", None, Some("products")).await?;
/// let created = client
///     .post::<_, Value>("products", "product", &json!({"title": "Hat"}))
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct RestClient {
    http_client: HttpClient,
    api_version: ApiVersion,
}

// Verify RestClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RestClient>();
};

impl RestClient {
    /// Creates a new REST client for the given session.
    ///
    /// Uses the API version from the configuration, or the latest stable
    /// version when no configuration is given.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::Http`] if the transport cannot be initialized.
    pub fn new(session: &Session, config: Option<&ShopifyConfig>) -> Result<Self, RestError> {
        let api_version = config.map_or_else(ApiVersion::latest, |c| *c.api_version());

        Self::create_client(session, config, api_version)
    }

    /// Creates a new REST client with a specific API version override.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::Http`] if the transport cannot be initialized.
    pub fn with_version(
        session: &Session,
        config: Option<&ShopifyConfig>,
        version: ApiVersion,
    ) -> Result<Self, RestError> {
        if let Some(cfg_version) = config.map(ShopifyConfig::api_version) {
            if &version == cfg_version {
                tracing::debug!(
                    "Rest client has a redundant API version override to the default {}",
                    cfg_version
                );
            } else {
                tracing::debug!(
                    "Rest client overriding default API version {} with {}",
                    cfg_version,
                    version
                );
            }
        }

        Self::create_client(session, config, version)
    }

    fn create_client(
        session: &Session,
        config: Option<&ShopifyConfig>,
        api_version: ApiVersion,
    ) -> Result<Self, RestError> {
        tracing::warn!(
            "The REST Admin API is deprecated. Consider migrating to GraphQL. See: https://www.shopify.com/ca/partners/blog/all-in-on-graphql"
        );

        if !api_version.is_supported() {
            tracing::warn!(version = %api_version, "API version is outside the supported window");
        }

        let base_path = format!("/admin/api/{api_version}");
        let http_client = HttpClient::new(base_path, session, config)?;

        Ok(Self {
            http_client,
            api_version,
        })
    }

    /// Replaces the execution policy used for every request.
    #[must_use]
    pub fn with_policy(mut self, policy: Arc<dyn ExecutionPolicy>) -> Self {
        self.http_client = self.http_client.with_policy(policy);
        self
    }

    /// Returns the API version being used by this client.
    #[must_use]
    pub const fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    /// Returns the underlying HTTP client.
    #[must_use]
    pub const fn http_client(&self) -> &HttpClient {
        &self.http_client
    }

    /// Sends a GET request and decodes the element named `root`.
    ///
    /// With `root` set to `None` the whole body is decoded.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::InvalidPath`] if the path is empty and
    /// [`RestError::Http`] for HTTP-level and decoding errors.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Option<HashMap<String, String>>,
        root: Option<&str>,
    ) -> Result<ResponseOutcome<T>, RestError> {
        self.send(HttpMethod::Get, path, query, None, root).await
    }

    /// Sends `body` wrapped as `{root: body}` with POST and decodes the
    /// response's `root` element.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::Json`] if `body` cannot be serialized,
    /// [`RestError::InvalidPath`] if the path is empty and
    /// [`RestError::Http`] for HTTP-level and decoding errors.
    pub async fn post<B, T>(&self, path: &str, root: &str, body: &B) -> Result<ResponseOutcome<T>, RestError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = wrap_root(root, body)?;
        self.send(HttpMethod::Post, path, None, Some(body), Some(root))
            .await
    }

    /// Sends `body` wrapped as `{root: body}` with PUT and decodes the
    /// response's `root` element.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::Json`] if `body` cannot be serialized,
    /// [`RestError::InvalidPath`] if the path is empty and
    /// [`RestError::Http`] for HTTP-level and decoding errors.
    pub async fn put<B, T>(&self, path: &str, root: &str, body: &B) -> Result<ResponseOutcome<T>, RestError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = wrap_root(root, body)?;
        self.send(HttpMethod::Put, path, None, Some(body), Some(root))
            .await
    }

    /// Sends a DELETE request. The body, usually `{}`, is kept as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::InvalidPath`] if the path is empty and
    /// [`RestError::Http`] for HTTP-level errors.
    pub async fn delete(&self, path: &str) -> Result<ResponseOutcome, RestError> {
        self.send(HttpMethod::Delete, path, None, None, None).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        query: Option<HashMap<String, String>>,
        body: Option<RequestBody>,
        root: Option<&str>,
    ) -> Result<ResponseOutcome<T>, RestError> {
        let normalized_path = normalize_path(path)?;

        let mut builder = self.http_client.prepare_request(method, &normalized_path);
        if let Some(body) = body {
            builder = builder.body(body);
        }
        if let Some(query) = query {
            let mut pairs: Vec<(String, String)> = query.into_iter().collect();
            pairs.sort();
            builder = builder.query(pairs);
        }
        let template = builder.build().map_err(crate::clients::HttpError::from)?;

        let outcome = self.http_client.execute(&template).await?;
        Ok(outcome.into_root(root)?)
    }
}

fn wrap_root<B: Serialize + ?Sized>(root: &str, body: &B) -> Result<RequestBody, RestError> {
    let mut wrapped = serde_json::Map::new();
    wrapped.insert(root.to_string(), serde_json::to_value(body)?);
    Ok(RequestBody::json(&Value::Object(wrapped))?)
}

/// Normalizes a REST API path.
///
/// This function:
/// 1. Strips leading `/` characters
/// 2. Strips trailing `.json` suffix
/// 3. Appends `.json` suffix
/// 4. Returns an error for empty paths
fn normalize_path(path: &str) -> Result<String, RestError> {
    let path = path.trim_start_matches('/');
    let path = path.strip_suffix(".json").unwrap_or(path);

    if path.is_empty() {
        return Err(RestError::InvalidPath {
            path: String::new(),
        });
    }

    Ok(format!("{path}.json"))
}
