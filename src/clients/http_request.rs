//! Request templates.
//!
//! A [`RequestTemplate`] describes one logical API call. Execution policies
//! clone it for every physical attempt, so a retry never reuses a body that
//! was already consumed and never sees header changes made by an earlier
//! attempt.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use url::Url;

use crate::clients::errors::InvalidHttpRequestError;

/// Header carrying the shop access token.
pub const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// HTTP methods used by the Admin REST API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources.
    Post,
    /// HTTP PUT method for updating resources.
    Put,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl HttpMethod {
    /// Returns `true` for methods that must carry a body.
    #[must_use]
    pub const fn requires_body(self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }

    fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::Post => write!(f, "post"),
            Self::Put => write!(f, "put"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Content type of a request body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataType {
    /// `application/json`
    Json,
    /// `application/graphql`
    GraphQL,
    /// `application/x-www-form-urlencoded`
    FormUrlEncoded,
}

impl DataType {
    /// Returns the MIME type string for this data type.
    #[must_use]
    pub const fn as_content_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::GraphQL => "application/graphql",
            Self::FormUrlEncoded => "application/x-www-form-urlencoded",
        }
    }
}

/// Serialized body bytes plus their content type.
///
/// The bytes are owned by value, so cloning a body yields an independent
/// copy that can be sent again.
#[derive(Clone, PartialEq, Eq)]
pub struct RequestBody {
    bytes: Vec<u8>,
    data_type: DataType,
}

impl RequestBody {
    /// Serializes `value` as JSON.
    ///
    /// # Errors
    ///
    /// Returns the serializer error if `value` cannot be represented as JSON.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        Ok(Self {
            bytes: serde_json::to_vec(value)?,
            data_type: DataType::Json,
        })
    }

    /// Wraps already-serialized bytes.
    #[must_use]
    pub fn raw(bytes: impl Into<Vec<u8>>, data_type: DataType) -> Self {
        Self {
            bytes: bytes.into(),
            data_type,
        }
    }

    /// Returns the serialized bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the content type.
    #[must_use]
    pub const fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Produces a fresh transport body for one attempt.
    #[must_use]
    pub fn materialize(&self) -> reqwest::Body {
        reqwest::Body::from(self.bytes.clone())
    }
}

impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestBody")
            .field("data_type", &self.data_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A complete description of one API call.
///
/// Templates are built through [`RequestTemplate::builder`], which validates
/// them. Accessors take `&self`; mutators take `&mut self`, so code holding a
/// shared template can only change a clone of it.
///
/// ```rust
/// use shopify_client_core::clients::{HttpMethod, RequestBody, RequestTemplate};
/// use serde_json::json;
///
/// let template = RequestTemplate::builder(
///     HttpMethod::Post,
///     "https://my-store.myshopify.com/admin/api/2025-10/products.json",
/// )
/// .header("X-Shopify-Access-Token", "token")
/// .body(RequestBody::json(&json!({"product": {"title": "Hat"}})).unwrap())
/// .build()
/// .unwrap();
///
/// let mut retry = template.clone();
/// retry.set_header("X-Attempt", "2");
/// assert!(template.header("X-Attempt").is_none());
/// assert_eq!(retry.body(), template.body());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestTemplate {
    method: HttpMethod,
    url: String,
    query: Vec<(String, String)>,
    headers: HashMap<String, String>,
    body: Option<RequestBody>,
}

impl RequestTemplate {
    /// Starts building a template for `method` on the absolute `url`.
    #[must_use]
    pub fn builder(method: HttpMethod, url: impl Into<String>) -> RequestTemplateBuilder {
        RequestTemplateBuilder::new(method, url)
    }

    /// Returns the HTTP method.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// Returns the URL without the query string.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the query parameters in insertion order.
    #[must_use]
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// Returns the value of a query parameter.
    #[must_use]
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns all headers.
    #[must_use]
    pub const fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Returns a header value, matching the name case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns the body, if any.
    #[must_use]
    pub const fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }

    /// Sets a header, replacing any existing value with the same name.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.headers.retain(|k, _| !k.eq_ignore_ascii_case(&name));
        self.headers.insert(name, value.into());
    }

    /// Removes a header, returning its value.
    pub fn remove_header(&mut self, name: &str) -> Option<String> {
        let key = self
            .headers
            .keys()
            .find(|k| k.eq_ignore_ascii_case(name))
            .cloned()?;
        self.headers.remove(&key)
    }

    /// Sets a query parameter. An existing parameter with the same key keeps
    /// its position and takes the new value.
    pub fn set_query_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
        upsert(&mut self.query, key.into(), value.into());
    }

    /// Returns the full URL including the encoded query string.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError::InvalidUrl`] if the URL does not parse.
    pub fn full_url(&self) -> Result<Url, InvalidHttpRequestError> {
        let mut url = parse_url(&self.url)?;
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        Ok(url)
    }

    /// Checks the template invariants.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if the URL is not absolute http(s),
    /// if a POST or PUT has no body, or if a header cannot be sent.
    pub fn verify(&self) -> Result<(), InvalidHttpRequestError> {
        parse_url(&self.url)?;

        if self.method.requires_body() && self.body.is_none() {
            return Err(InvalidHttpRequestError::MissingBody {
                method: self.method.to_string(),
            });
        }

        for (name, value) in &self.headers {
            let valid = reqwest::header::HeaderName::from_bytes(name.as_bytes()).is_ok()
                && reqwest::header::HeaderValue::from_str(value).is_ok();
            if !valid {
                return Err(InvalidHttpRequestError::InvalidHeader { name: name.clone() });
            }
        }

        Ok(())
    }

    /// Converts this attempt's copy into a transport request.
    ///
    /// The body is materialized afresh, and the `Content-Type` header follows
    /// the body's data type unless one was set explicitly.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError::InvalidUrl`] if the URL does not parse.
    pub fn into_transport(
        self,
        client: &reqwest::Client,
    ) -> Result<reqwest::RequestBuilder, InvalidHttpRequestError> {
        let url = self.full_url()?;
        let mut builder = client.request(self.method.as_reqwest(), url);

        if let Some(body) = &self.body {
            if self.header("Content-Type").is_none() {
                builder = builder.header("Content-Type", body.data_type().as_content_type());
            }
            builder = builder.body(body.materialize());
        }
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        Ok(builder)
    }
}

fn parse_url(raw: &str) -> Result<Url, InvalidHttpRequestError> {
    Url::parse(raw)
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .ok_or_else(|| InvalidHttpRequestError::InvalidUrl {
            url: raw.to_string(),
        })
}

fn upsert(query: &mut Vec<(String, String)>, key: String, value: String) {
    match query.iter_mut().find(|(k, _)| *k == key) {
        Some((_, existing)) => *existing = value,
        None => query.push((key, value)),
    }
}

/// Builder for [`RequestTemplate`].
#[derive(Debug)]
pub struct RequestTemplateBuilder {
    method: HttpMethod,
    url: String,
    query: Vec<(String, String)>,
    headers: HashMap<String, String>,
    body: Option<RequestBody>,
}

impl RequestTemplateBuilder {
    fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Adds a query parameter; a repeated key overwrites the earlier value.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        upsert(&mut self.query, key.into(), value.into());
        self
    }

    /// Adds several query parameters.
    #[must_use]
    pub fn query<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in params {
            upsert(&mut self.query, key.into(), value.into());
        }
        self
    }

    /// Adds a header; a repeated name overwrites the earlier value.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|k, _| !k.eq_ignore_ascii_case(&name));
        self.headers.insert(name, value.into());
        self
    }

    /// Adds several headers.
    #[must_use]
    pub fn headers<I, K, V>(self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        headers
            .into_iter()
            .fold(self, |builder, (name, value)| builder.header(name, value))
    }

    /// Builds and validates the template.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if validation fails.
    pub fn build(self) -> Result<RequestTemplate, InvalidHttpRequestError> {
        let template = RequestTemplate {
            method: self.method,
            url: self.url,
            query: self.query,
            headers: self.headers,
            body: self.body,
        };
        template.verify()?;
        Ok(template)
    }
}
