//! HTTP client for Shopify API communication.
//!
//! [`HttpClient`] owns the transport, the default headers, and the execution
//! policy. It prepares [`RequestTemplate`]s and runs them through its policy;
//! every physical attempt goes through its [`AttemptExecutor`] impl.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::Session;
use crate::clients::errors::HttpError;
use crate::clients::http_request::{
    HttpMethod, RequestTemplate, RequestTemplateBuilder, ACCESS_TOKEN_HEADER,
};
use crate::clients::http_response::ResponseOutcome;
use crate::clients::policy::{
    AttemptExecutor, AttemptFuture, DefaultExecutionPolicy, ExecutionPolicy,
};
use crate::config::ShopifyConfig;

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for making requests to the Shopify API.
///
/// The client handles:
/// - Base URI construction from the session shop domain or the configured host
/// - Default headers including User-Agent and access token
/// - Running every request through its [`ExecutionPolicy`]
///
/// The transport only negotiates TLS 1.2 or newer. The setting belongs to
/// this client's connection pool and does not leak to other clients.
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use shopify_client_core::{HttpClient, HttpMethod, LeakyBucketPolicy, Session, ShopDomain};
///
/// let session = Session::new(ShopDomain::new("my-store")?, "access-token");
/// let client = HttpClient::new("/admin/api/2025-10", &session, None)?
///     .with_policy(Arc::new(LeakyBucketPolicy::new()));
///
/// let template = client.prepare_request(HttpMethod::Get, "products.json").build()?;
/// let outcome = client.execute(&template).await?;
/// println!("{}", outcome.result);
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    /// Base URI (e.g., `https://my-store.myshopify.com`).
    base_uri: String,
    /// Base path (e.g., `/admin/api/2025-10`).
    base_path: String,
    default_headers: HashMap<String, String>,
    policy: Arc<dyn ExecutionPolicy>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client for the given session.
    ///
    /// # Arguments
    ///
    /// * `base_path` - The base path for API requests (e.g., `/admin/api/2025-10`)
    /// * `session` - The session providing shop domain and access token
    /// * `config` - Optional configuration for the host override, user agent
    ///   prefix and per-attempt timeout
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the transport cannot be initialized.
    pub fn new(
        base_path: impl Into<String>,
        session: &Session,
        config: Option<&ShopifyConfig>,
    ) -> Result<Self, HttpError> {
        let base_path = base_path.into().trim_end_matches('/').to_string();

        let host = config.and_then(ShopifyConfig::host);
        let base_uri = host.map_or_else(
            || format!("https://{}", session.shop.as_ref()),
            |host| host.origin().to_string(),
        );

        let user_agent_prefix = config
            .and_then(ShopifyConfig::user_agent_prefix)
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}Shopify API Library v{SDK_VERSION} | Rust {rust_version}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());

        // Requests to a proxy host still name the shop.
        if host.is_some() {
            default_headers.insert("Host".to_string(), session.shop.as_ref().to_string());
        }

        if !session.access_token.is_empty() {
            default_headers.insert(
                ACCESS_TOKEN_HEADER.to_string(),
                session.access_token.clone(),
            );
        }

        let mut builder = reqwest::Client::builder()
            .use_rustls_tls()
            .min_tls_version(reqwest::tls::Version::TLS_1_2);
        if let Some(timeout) = config.and_then(ShopifyConfig::request_timeout) {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_uri,
            base_path,
            default_headers,
            policy: Arc::new(DefaultExecutionPolicy),
        })
    }

    /// Replaces the execution policy.
    #[must_use]
    pub fn with_policy(mut self, policy: Arc<dyn ExecutionPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the base URI for this client.
    #[must_use]
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Returns the base path for this client.
    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Returns the execution policy.
    #[must_use]
    pub fn policy(&self) -> &Arc<dyn ExecutionPolicy> {
        &self.policy
    }

    /// Starts a request for `path`, relative to the base path, carrying the
    /// default headers.
    #[must_use]
    pub fn prepare_request(&self, method: HttpMethod, path: &str) -> RequestTemplateBuilder {
        let url = format!(
            "{}{}/{}",
            self.base_uri,
            self.base_path,
            path.trim_start_matches('/')
        );
        RequestTemplate::builder(method, url).headers(self.default_headers.clone())
    }

    /// Runs `template` through the execution policy.
    ///
    /// # Errors
    ///
    /// Returns whatever the policy surfaces: [`HttpError::Api`] for non-2xx
    /// responses, a rate-limit variant when the policy stops retrying, or a
    /// transport error.
    pub async fn execute(&self, template: &RequestTemplate) -> Result<ResponseOutcome, HttpError> {
        self.policy.run(template, self).await
    }

    /// Like [`execute`](Self::execute), but gives up after `timeout`.
    ///
    /// The in-flight attempt is dropped and no further attempts are made.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Timeout`] if `timeout` elapses first.
    pub async fn execute_with_timeout(
        &self,
        template: &RequestTemplate,
        timeout: Duration,
    ) -> Result<ResponseOutcome, HttpError> {
        tokio::time::timeout(timeout, self.execute(template))
            .await
            .map_err(|_| HttpError::Timeout(timeout))?
    }

    async fn send_once(&self, template: RequestTemplate) -> Result<ResponseOutcome, HttpError> {
        let url = template.url().to_string();
        let response = template.into_transport(&self.client)?.send().await?;

        let status = response.status().as_u16();
        let headers = parse_response_headers(response.headers());
        let raw_body = response.text().await?;
        let outcome = ResponseOutcome::new(status, headers, raw_body);

        if let Some(reason) = outcome.deprecation_reason() {
            tracing::warn!(
                "Deprecated request to Shopify API at {}, received reason: {}",
                url,
                reason
            );
        }
        tracing::debug!(status, url = %url, "Received response");

        Ok(outcome)
    }
}

impl AttemptExecutor for HttpClient {
    fn attempt(&self, template: RequestTemplate) -> AttemptFuture<'_> {
        Box::pin(self.send_once(template))
    }
}

/// Collects response headers, names lower-cased.
fn parse_response_headers(headers: &reqwest::header::HeaderMap) -> HashMap<String, Vec<String>> {
    let mut result: HashMap<String, Vec<String>> = HashMap::new();
    for (name, value) in headers {
        let key = name.as_str().to_lowercase();
        let value = value.to_str().unwrap_or_default().to_string();
        result.entry(key).or_default().push(value);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::policy::FixedRetryPolicy;
    use crate::config::{ApiKey, ApiSecretKey, HostUrl, ShopDomain};

    fn create_test_session() -> Session {
        Session::new(ShopDomain::new("test-shop").unwrap(), "test-access-token")
    }

    fn client() -> HttpClient {
        HttpClient::new("/admin/api/2025-10", &create_test_session(), None).unwrap()
    }

    #[test]
    fn test_client_construction_with_session() {
        let client = client();

        assert_eq!(client.base_uri(), "https://test-shop.myshopify.com");
        assert_eq!(client.base_path(), "/admin/api/2025-10");
    }

    #[test]
    fn test_user_agent_header_format() {
        let client = client();

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.contains("Shopify API Library v"));
        assert!(user_agent.contains("Rust"));
    }

    #[test]
    fn test_access_token_header_injection() {
        let client = client();

        assert_eq!(
            client.default_headers().get(ACCESS_TOKEN_HEADER),
            Some(&"test-access-token".to_string())
        );
    }

    #[test]
    fn test_no_access_token_header_when_empty() {
        let session = Session::new(ShopDomain::new("test-shop").unwrap(), "");
        let client = HttpClient::new("/admin/api/2025-10", &session, None).unwrap();

        assert!(client.default_headers().get(ACCESS_TOKEN_HEADER).is_none());
    }

    #[test]
    fn test_accept_header_is_json() {
        assert_eq!(
            client().default_headers().get("Accept"),
            Some(&"application/json".to_string())
        );
    }

    #[test]
    fn test_user_agent_with_prefix() {
        let config = ShopifyConfig::builder()
            .api_key(ApiKey::new("test-key").unwrap())
            .api_secret_key(ApiSecretKey::new("test-secret").unwrap())
            .user_agent_prefix("MyApp/1.0")
            .build()
            .unwrap();

        let client =
            HttpClient::new("/admin/api/2025-10", &create_test_session(), Some(&config)).unwrap();

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("MyApp/1.0 | "));
        assert!(user_agent.contains("Shopify API Library"));
    }

    #[test]
    fn test_host_override_keeps_scheme_and_port() {
        let config = ShopifyConfig::builder()
            .api_key(ApiKey::new("test-key").unwrap())
            .api_secret_key(ApiSecretKey::new("test-secret").unwrap())
            .host(HostUrl::new("http://127.0.0.1:8080").unwrap())
            .build()
            .unwrap();

        let client =
            HttpClient::new("/admin/api/2025-10", &create_test_session(), Some(&config)).unwrap();

        assert_eq!(client.base_uri(), "http://127.0.0.1:8080");
        assert_eq!(
            client.default_headers().get("Host"),
            Some(&"test-shop.myshopify.com".to_string())
        );
    }

    #[test]
    fn test_prepare_request_carries_defaults() {
        let template = client()
            .prepare_request(HttpMethod::Get, "/products.json")
            .query_param("limit", "5")
            .build()
            .unwrap();

        assert_eq!(
            template.url(),
            "https://test-shop.myshopify.com/admin/api/2025-10/products.json"
        );
        assert_eq!(template.header("x-shopify-access-token"), Some("test-access-token"));
        assert_eq!(template.query_param("limit"), Some("5"));
    }

    #[test]
    fn test_with_policy_replaces_default() {
        let client = client().with_policy(Arc::new(FixedRetryPolicy::new()));
        assert!(format!("{:?}", client.policy()).contains("FixedRetryPolicy"));
    }
}
