//! Query parameters of an inbound signed request.
//!
//! Signed requests arrive either as a raw query string or as parameters a web
//! framework has already decoded. [`QueryParams`] normalizes both shapes so
//! the signature check sees exactly the same data either way.

use std::collections::{BTreeMap, HashMap};

/// An ordered multimap of decoded query parameters.
///
/// Keys keep their first-seen order; repeated keys collect every value in
/// arrival order.
///
/// ```rust
/// use shopify_client_core::auth::QueryParams;
///
/// let params = QueryParams::parse("?shop=a.myshopify.com&ids=1&ids=2&note=hi+there");
/// assert_eq!(params.get("shop"), Some("a.myshopify.com"));
/// assert_eq!(params.get_all("ids"), Some(&["1".to_string(), "2".to_string()][..]));
/// assert_eq!(params.get("note"), Some("hi there"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: Vec<(String, Vec<String>)>,
}

impl QueryParams {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a raw query string. A leading `?` is ignored, `+` decodes to a
    /// space, and percent escapes are decoded.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        url::form_urlencoded::parse(raw.as_bytes())
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect()
    }

    /// Appends one value for `key`.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    /// Returns the first value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_all(key)
            .and_then(<[String]>::first)
            .map(String::as_str)
    }

    /// Returns every value for `key`.
    #[must_use]
    pub fn get_all(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
    }

    /// Returns `true` if `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Iterates over keys and their values in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    /// Returns `true` if there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.append(key, value);
        }
        params
    }
}

impl From<&str> for QueryParams {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<&String> for QueryParams {
    fn from(raw: &String) -> Self {
        Self::parse(raw)
    }
}

impl From<String> for QueryParams {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<HashMap<String, String>> for QueryParams {
    fn from(map: HashMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl From<&HashMap<String, String>> for QueryParams {
    fn from(map: &HashMap<String, String>) -> Self {
        map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

impl From<BTreeMap<String, String>> for QueryParams {
    fn from(map: BTreeMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl From<HashMap<String, Vec<String>>> for QueryParams {
    fn from(map: HashMap<String, Vec<String>>) -> Self {
        Self {
            entries: map.into_iter().collect(),
        }
    }
}

impl From<Vec<(String, String)>> for QueryParams {
    fn from(pairs: Vec<(String, String)>) -> Self {
        pairs.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decodes_percent_and_plus() {
        let params = QueryParams::parse("path_prefix=%2Fapps%2Fawesome&name=a+b%26c");
        assert_eq!(params.get("path_prefix"), Some("/apps/awesome"));
        assert_eq!(params.get("name"), Some("a b&c"));
    }

    #[test]
    fn test_parse_handles_empty_and_valueless_keys() {
        assert!(QueryParams::parse("").is_empty());
        assert!(QueryParams::parse("?").is_empty());
        let params = QueryParams::parse("flag&x=1");
        assert_eq!(params.get("flag"), Some(""));
        assert_eq!(params.get("x"), Some("1"));
    }

    #[test]
    fn test_repeated_keys_keep_order() {
        let params = QueryParams::parse("a=2&b=1&a=1");
        assert_eq!(params.get_all("a").unwrap(), ["2", "1"]);
        let keys: Vec<&str> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["a", "b"]);
    }

    #[test]
    fn test_from_map_matches_parse() {
        let mut map = HashMap::new();
        map.insert("shop".to_string(), "x.myshopify.com".to_string());
        let from_map = QueryParams::from(map);
        let parsed = QueryParams::parse("shop=x.myshopify.com");
        assert_eq!(from_map, parsed);
    }
}
