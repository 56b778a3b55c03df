//! Response types.
//!
//! [`ResponseOutcome`] keeps everything a response carried: status, headers,
//! raw body text, and the body parsed as JSON. The platform-specific headers
//! (call budget, retry delay, pagination) are parsed once on construction.

use std::collections::HashMap;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::clients::errors::HttpError;

/// Longest `Retry-After` delay honoured; larger values are clamped to it.
pub const MAX_RETRY_AFTER: Duration = Duration::from_secs(600);

/// Call budget parsed from `X-Shopify-Shop-Api-Call-Limit` (`current/maximum`).
///
/// ```rust
/// use shopify_client_core::clients::ApiCallLimit;
///
/// let limit = ApiCallLimit::parse("32/40").unwrap();
/// assert_eq!(limit.request_count, 32);
/// assert_eq!(limit.bucket_size, 40);
/// assert_eq!(limit.remaining(), 8);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ApiCallLimit {
    /// Calls currently counted against the bucket.
    pub request_count: u32,
    /// Bucket capacity.
    pub bucket_size: u32,
}

impl ApiCallLimit {
    /// Parses a header value such as `40/80`.
    #[must_use]
    pub fn parse(header_value: &str) -> Option<Self> {
        let (current, maximum) = header_value.trim().split_once('/')?;
        Some(Self {
            request_count: current.trim().parse().ok()?,
            bucket_size: maximum.trim().parse().ok()?,
        })
    }

    /// Calls left before the bucket is full.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.bucket_size.saturating_sub(self.request_count)
    }
}

/// Cursor pagination parsed from the `Link` header.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PaginationInfo {
    /// The `page_info` value for the previous page, if available.
    pub prev_page_info: Option<String>,
    /// The `page_info` value for the next page, if available.
    pub next_page_info: Option<String>,
}

impl PaginationInfo {
    /// Parses `<url>; rel="next", <url>; rel="previous"`.
    #[must_use]
    pub fn parse_link_header(header_value: &str) -> Self {
        let mut result = Self::default();

        for link in header_value.split(',') {
            let mut parts = link.split(';').map(str::trim);
            let Some(target) = parts.next() else {
                continue;
            };
            let target = target.trim_start_matches('<').trim_end_matches('>');
            let rel = parts.find_map(|part| part.strip_prefix("rel=").map(|r| r.trim_matches('"')));

            let page_info = url::Url::parse(target).ok().and_then(|url| {
                url.query_pairs()
                    .find(|(key, _)| key == "page_info")
                    .map(|(_, value)| value.into_owned())
            });

            match (rel, page_info) {
                (Some("next"), Some(page_info)) => result.next_page_info = Some(page_info),
                (Some("previous"), Some(page_info)) => result.prev_page_info = Some(page_info),
                _ => {}
            }
        }

        result
    }
}

/// Everything received in answer to one attempt.
///
/// `T` is the type the body was decoded into; the default keeps it as JSON.
#[derive(Clone, Debug)]
pub struct ResponseOutcome<T = Value> {
    /// HTTP status code.
    pub status: u16,
    /// Headers, names lower-cased, values in arrival order.
    pub headers: HashMap<String, Vec<String>>,
    /// The body exactly as received.
    pub raw_body: String,
    /// The decoded body.
    pub result: T,
    /// Parsed `X-Shopify-Shop-Api-Call-Limit`.
    pub api_call_limit: Option<ApiCallLimit>,
    /// Parsed `Retry-After`, at most [`MAX_RETRY_AFTER`].
    pub retry_after: Option<Duration>,
    /// Parsed `Link` pagination.
    pub pagination: PaginationInfo,
}

impl ResponseOutcome {
    /// Builds an outcome, parsing the body leniently as JSON.
    ///
    /// An empty or non-JSON body becomes `Value::Null`; the text is still
    /// available in `raw_body`.
    #[must_use]
    pub fn new(status: u16, headers: HashMap<String, Vec<String>>, raw_body: String) -> Self {
        let result = if raw_body.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&raw_body).unwrap_or(Value::Null)
        };

        let first = |name: &str| {
            headers
                .get(name)
                .and_then(|values| values.first())
                .map(String::as_str)
        };

        let api_call_limit = first("x-shopify-shop-api-call-limit").and_then(ApiCallLimit::parse);
        let retry_after = first("retry-after")
            .and_then(|value| value.trim().parse::<f64>().ok())
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            .map(|delay| delay.min(MAX_RETRY_AFTER));
        let pagination = first("link")
            .map(PaginationInfo::parse_link_header)
            .unwrap_or_default();

        Self {
            status,
            headers,
            raw_body,
            result,
            api_call_limit,
            retry_after,
            pagination,
        }
    }

    /// Decodes the element named `root`, or the whole body when `root` is
    /// `None`, into `U`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Deserialize`] if the element is missing or has the
    /// wrong shape.
    pub fn into_root<U: DeserializeOwned>(self, root: Option<&str>) -> Result<ResponseOutcome<U>, HttpError> {
        let value = match root {
            Some(root) => match self.result {
                Value::Object(mut map) => map.remove(root).unwrap_or(Value::Null),
                _ => Value::Null,
            },
            None => self.result,
        };
        let result = serde_json::from_value(value)?;

        Ok(ResponseOutcome {
            status: self.status,
            headers: self.headers,
            raw_body: self.raw_body,
            result,
            api_call_limit: self.api_call_limit,
            retry_after: self.retry_after,
            pagination: self.pagination,
        })
    }
}

impl<T> ResponseOutcome<T> {
    /// Returns `true` for a 2xx status.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status >= 200 && self.status <= 299
    }

    /// Returns the first value of a header (name matched in lower case).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the `X-Request-Id` header value.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-request-id")
    }

    /// Returns the `X-Shopify-API-Deprecated-Reason` header value.
    #[must_use]
    pub fn deprecation_reason(&self) -> Option<&str> {
        self.header("x-shopify-api-deprecated-reason")
    }

    /// Maps the decoded body, keeping the metadata.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ResponseOutcome<U> {
        ResponseOutcome {
            status: self.status,
            headers: self.headers,
            raw_body: self.raw_body,
            result: f(self.result),
            api_call_limit: self.api_call_limit,
            retry_after: self.retry_after,
            pagination: self.pagination,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    fn headers(pairs: &[(&str, &str)]) -> HashMap<String, Vec<String>> {
        let mut map: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in pairs {
            map.entry((*name).to_string())
                .or_default()
                .push((*value).to_string());
        }
        map
    }

    #[test]
    fn test_is_ok_only_for_2xx() {
        assert!(ResponseOutcome::new(200, HashMap::new(), String::new()).is_ok());
        assert!(ResponseOutcome::new(299, HashMap::new(), String::new()).is_ok());
        for status in [199, 300, 404, 429, 500] {
            assert!(!ResponseOutcome::new(status, HashMap::new(), String::new()).is_ok());
        }
    }

    #[test]
    fn test_api_call_limit_parsing() {
        assert_eq!(
            ApiCallLimit::parse(" 1/40 "),
            Some(ApiCallLimit {
                request_count: 1,
                bucket_size: 40
            })
        );
        for invalid in ["invalid", "40", "40/", "/80", "abc/def", "1/2/3"] {
            assert!(ApiCallLimit::parse(invalid).is_none(), "{invalid}");
        }
    }

    #[test]
    fn test_link_header_parsing() {
        let link = r#"<https://shop.myshopify.com/admin/api/2025-10/products.json?limit=5&page_info=abc123>; rel="next", <https://shop.myshopify.com/admin/api/2025-10/products.json?page_info=xyz789>; rel="previous""#;
        let info = PaginationInfo::parse_link_header(link);
        assert_eq!(info.next_page_info.as_deref(), Some("abc123"));
        assert_eq!(info.prev_page_info.as_deref(), Some("xyz789"));

        let info = PaginationInfo::parse_link_header("garbage");
        assert_eq!(info, PaginationInfo::default());
    }

    #[test]
    fn test_headers_are_parsed_on_construction() {
        let outcome = ResponseOutcome::new(
            429,
            headers(&[
                ("x-shopify-shop-api-call-limit", "40/40"),
                ("retry-after", "2.0"),
                ("x-request-id", "req-42"),
            ]),
            r#"{"errors":"Exceeded 2 calls per second for api client."}"#.to_string(),
        );

        assert_eq!(
            outcome.api_call_limit,
            Some(ApiCallLimit {
                request_count: 40,
                bucket_size: 40
            })
        );
        assert_eq!(outcome.retry_after, Some(Duration::from_secs(2)));
        assert_eq!(outcome.request_id(), Some("req-42"));
        assert_eq!(outcome.header("X-Request-Id"), Some("req-42"));
    }

    #[test]
    fn test_negative_retry_after_is_ignored() {
        let outcome = ResponseOutcome::new(429, headers(&[("retry-after", "-1")]), String::new());
        assert!(outcome.retry_after.is_none());
    }

    #[test]
    fn test_huge_retry_after_is_clamped() {
        for value in ["1e30", "184467440737095516160", "86400"] {
            let outcome = ResponseOutcome::new(200, headers(&[("retry-after", value)]), "{}".to_string());
            assert_eq!(outcome.retry_after, Some(MAX_RETRY_AFTER), "{value}");
        }

        for value in ["inf", "NaN", "1e400"] {
            let outcome = ResponseOutcome::new(429, headers(&[("retry-after", value)]), String::new());
            assert!(outcome.retry_after.is_none(), "{value}");
        }
    }

    #[test]
    fn test_non_json_body_is_kept_raw() {
        let outcome = ResponseOutcome::new(502, HashMap::new(), "<html>Bad Gateway</html>".to_string());
        assert_eq!(outcome.result, Value::Null);
        assert_eq!(outcome.raw_body, "<html>Bad Gateway</html>");
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Product {
        id: u64,
        title: String,
    }

    #[test]
    fn test_into_root_extracts_named_element() {
        let body = json!({"product": {"id": 1, "title": "Hat"}}).to_string();
        let outcome = ResponseOutcome::new(200, HashMap::new(), body)
            .into_root::<Product>(Some("product"))
            .unwrap();
        assert_eq!(
            outcome.result,
            Product {
                id: 1,
                title: "Hat".to_string()
            }
        );
    }

    #[test]
    fn test_into_root_missing_element_fails() {
        let outcome = ResponseOutcome::new(200, HashMap::new(), "{}".to_string());
        let result = outcome.into_root::<Product>(Some("product"));
        assert!(matches!(result, Err(HttpError::Deserialize(_))));
    }

    #[test]
    fn test_into_root_without_root_decodes_whole_body() {
        let outcome = ResponseOutcome::new(200, HashMap::new(), r#"{"count": 7}"#.to_string())
            .into_root::<HashMap<String, u32>>(None)
            .unwrap();
        assert_eq!(outcome.result["count"], 7);
    }
}
