//! Integration tests for configuration and session values.

use std::time::Duration;

use shopify_client_core::auth::{AuthScopes, AuthorizationScope, StateParam};
use shopify_client_core::{
    ApiKey, ApiSecretKey, ApiVersion, ConfigError, HostUrl, HttpClient, RestClient, Session,
    ShopDomain, ShopifyConfig,
};

fn base_builder() -> shopify_client_core::ShopifyConfigBuilder {
    ShopifyConfig::builder()
        .api_key(ApiKey::new("test-key").unwrap())
        .api_secret_key(ApiSecretKey::new("test-secret").unwrap())
}

// ============================================================================
// ShopifyConfig
// ============================================================================

#[test]
fn test_config_defaults() {
    let config = base_builder().build().unwrap();

    assert_eq!(config.api_key().as_ref(), "test-key");
    assert_eq!(config.api_version(), &ApiVersion::latest());
    assert!(config.scopes().is_empty());
    assert!(config.host().is_none());
    assert!(config.old_api_secret_key().is_none());
    assert!(config.user_agent_prefix().is_none());
    assert!(config.request_timeout().is_none());
}

#[test]
fn test_config_builder_sets_every_field() {
    let config = base_builder()
        .old_api_secret_key(ApiSecretKey::new("old-secret").unwrap())
        .scopes("read_products, write_orders".parse().unwrap())
        .host(HostUrl::new("https://proxy.example.com/").unwrap())
        .api_version("2025-04".parse().unwrap())
        .user_agent_prefix("MyApp/1.0")
        .request_timeout(Duration::from_secs(10))
        .build()
        .unwrap();

    assert_eq!(config.scopes().to_string(), "read_products,write_orders");
    assert_eq!(config.host().map(HostUrl::origin), Some("https://proxy.example.com"));
    assert_eq!(config.api_version().to_string(), "2025-04");
    assert_eq!(config.user_agent_prefix(), Some("MyApp/1.0"));
    assert_eq!(config.request_timeout(), Some(Duration::from_secs(10)));
}

#[test]
fn test_config_requires_credentials() {
    let missing_secret = ShopifyConfig::builder()
        .api_key(ApiKey::new("key").unwrap())
        .build();
    assert_eq!(
        missing_secret.unwrap_err(),
        ConfigError::MissingRequiredField {
            field: "api_secret_key"
        }
    );

    assert_eq!(ApiKey::new("").unwrap_err(), ConfigError::EmptyApiKey);
    assert_eq!(ApiSecretKey::new("").unwrap_err(), ConfigError::EmptyApiSecretKey);
}

#[test]
fn test_secrets_are_masked_in_debug_output() {
    let config = base_builder().build().unwrap();
    assert!(!format!("{config:?}").contains("test-secret"));

    let session = Session::new(ShopDomain::new("my-store").unwrap(), "shpat_secret");
    assert!(!format!("{session:?}").contains("shpat_secret"));
}

// ============================================================================
// Domain Values
// ============================================================================

#[test]
fn test_shop_domain_normalization() {
    let short = ShopDomain::new("My-Store").unwrap();
    let full = ShopDomain::new("my-store.myshopify.com").unwrap();

    assert_eq!(short, full);
    assert_eq!(short.shop_name(), "my-store");
    assert_eq!(short.to_string(), "my-store.myshopify.com");

    for invalid in ["", "shop.example.com", "-shop", "sh op", "shop_1"] {
        assert!(
            matches!(ShopDomain::new(invalid), Err(ConfigError::InvalidShopDomain { .. })),
            "{invalid}"
        );
    }
}

#[test]
fn test_host_url_validation() {
    let local = HostUrl::new("http://127.0.0.1:8080/some/path").unwrap();
    assert_eq!(local.origin(), "http://127.0.0.1:8080");
    assert_eq!(local.scheme(), "http");

    for invalid in ["", "proxy.example.com", "ftp://proxy.example.com", "https://"] {
        assert!(HostUrl::new(invalid).is_err(), "{invalid}");
    }
}

#[test]
fn test_api_version_support_window() {
    assert!(ApiVersion::latest().is_supported());
    assert!(ApiVersion::Unstable.is_supported());
    assert!(ApiVersion::release(2025, 1).unwrap().is_supported());
    assert!(!ApiVersion::release(2024, 10).unwrap().is_supported());

    assert!(ApiVersion::release(2025, 2).is_err());
    assert!("2025-1".parse::<ApiVersion>().is_err());
    assert!("latest".parse::<ApiVersion>().is_err());
}

#[test]
fn test_scopes() {
    let granted: AuthScopes = "write_products,read_orders".parse().unwrap();
    let wanted: AuthScopes = [AuthorizationScope::ReadProducts, AuthorizationScope::ReadOrders]
        .into_iter()
        .collect();

    assert!(granted.covers(&wanted));
    assert!(!wanted.covers(&granted));
    assert!("read products".parse::<AuthScopes>().is_err());
    assert!("read_nothing".parse::<AuthorizationScope>().is_err());
}

#[test]
fn test_state_param_is_random() {
    let first = StateParam::new();
    let second = StateParam::new();

    assert_ne!(first, second);
    assert!(first.matches(first.as_ref()));
    assert!(!first.matches(second.as_ref()));
}

// ============================================================================
// Client Construction
// ============================================================================

#[test]
fn test_clients_follow_config() {
    let config = base_builder()
        .host(HostUrl::new("http://localhost:3000").unwrap())
        .api_version(ApiVersion::release(2025, 7).unwrap())
        .user_agent_prefix("MyApp/1.0")
        .build()
        .unwrap();
    let session = Session::new(ShopDomain::new("my-store").unwrap(), "token");

    let rest = RestClient::new(&session, Some(&config)).unwrap();
    let http = rest.http_client();

    assert_eq!(http.base_uri(), "http://localhost:3000");
    assert_eq!(http.base_path(), "/admin/api/2025-07");
    assert_eq!(
        http.default_headers().get("Host").map(String::as_str),
        Some("my-store.myshopify.com")
    );
    assert!(http.default_headers()["User-Agent"].starts_with("MyApp/1.0 | "));
}

#[test]
fn test_session_without_token_sends_no_token_header() {
    let session = Session::new(ShopDomain::new("my-store").unwrap(), "");
    let client = HttpClient::new("/admin/api/2025-10", &session, None).unwrap();

    assert!(!session.is_active());
    assert_eq!(client.base_uri(), "https://my-store.myshopify.com");
    assert!(!client.default_headers().contains_key("X-Shopify-Access-Token"));
    assert!(!client.default_headers().contains_key("Host"));
}
