//! Integration tests for inbound request verification.
//!
//! These tests cover OAuth callback and app proxy signatures, webhook
//! signatures, shop domain validation, and authorization URL construction.

use std::collections::HashMap;

use shopify_client_core::auth::hmac::compute_signature_base64;
use shopify_client_core::auth::{sign, QueryParams, SignatureMode};
use shopify_client_core::{
    ApiKey, ApiSecretKey, AuthorizationRequest, AuthorizationValidator, ShopDomain, ShopifyConfig,
};

const SECRET: &str = "3467219a2f96ab7d2e95b8b9b3cd0514";
const FIXTURE_HMAC: &str = "1f2b427c24b6a0e2a9004a71ea16d3d5a213db5058218e57e9d5fb44d601b903";

fn validator() -> AuthorizationValidator {
    AuthorizationValidator::new(ApiSecretKey::new(SECRET).unwrap())
}

fn fixture_query() -> String {
    format!(
        "code=cda84da98ee07b1231068a6ba51f7101&hmac={FIXTURE_HMAC}\
         &shop=doppler-dev01.myshopify.com&timestamp=1540772285"
    )
}

/// Signs `query` in `mode` and appends the signature parameter.
fn signed(query: &str, mode: SignatureMode) -> String {
    let signature = sign(&QueryParams::parse(query), SECRET, mode);
    format!("{query}&{}={signature}", mode.signature_key())
}

// ============================================================================
// OAuth Callback Signatures
// ============================================================================

#[test]
fn test_known_fixture_is_authentic() {
    assert!(validator().is_authentic_request(fixture_query()));
}

#[test]
fn test_fixture_order_does_not_matter() {
    let reordered = format!(
        "timestamp=1540772285&shop=doppler-dev01.myshopify.com&hmac={FIXTURE_HMAC}\
         &code=cda84da98ee07b1231068a6ba51f7101"
    );
    assert!(validator().is_authentic_request(reordered));
}

#[test]
fn test_fixture_from_decoded_map() {
    let params: HashMap<String, String> = QueryParams::parse(&fixture_query())
        .iter()
        .map(|(key, values)| (key.to_string(), values[0].clone()))
        .collect();
    assert!(validator().is_authentic_request(params));
}

#[test]
fn test_flipping_any_character_breaks_signature() {
    let query = fixture_query();
    let validator = validator();

    for (index, c) in query.char_indices() {
        // Separators change the parameter structure rather than a value.
        if matches!(c, '&' | '=') {
            continue;
        }
        let replacement = if c == 'x' { 'y' } else { 'x' };
        let mut tampered = query.clone();
        tampered.replace_range(index..index + c.len_utf8(), &replacement.to_string());

        assert!(
            !validator.is_authentic_request(tampered.as_str()),
            "tampered query still verified: {tampered}"
        );
    }
}

#[test]
fn test_signed_round_trip() {
    let query = signed(
        "shop=some-shop.myshopify.com&timestamp=1700000000&host=YWRtaW4",
        SignatureMode::OAuthCallback,
    );
    assert!(validator().is_authentic_request(query));
}

#[test]
fn test_missing_or_duplicate_hmac_fails() {
    let validator = validator();
    assert!(!validator.is_authentic_request("code=1&shop=a.myshopify.com"));

    let query = signed("code=1&shop=a.myshopify.com", SignatureMode::OAuthCallback);
    let duplicated = format!("{query}&hmac=00");
    assert!(!validator.is_authentic_request(duplicated));
}

#[test]
fn test_wrong_secret_fails() {
    let other = AuthorizationValidator::new(ApiSecretKey::new("other-secret").unwrap());
    assert!(!other.is_authentic_request(fixture_query()));
}

#[test]
fn test_previous_secret_is_accepted_during_rotation() {
    let config = ShopifyConfig::builder()
        .api_key(ApiKey::new("key").unwrap())
        .api_secret_key(ApiSecretKey::new("new-secret").unwrap())
        .old_api_secret_key(ApiSecretKey::new(SECRET).unwrap())
        .build()
        .unwrap();

    let rotating = AuthorizationValidator::from_config(&config);
    assert!(rotating.is_authentic_request(fixture_query()));
}

// ============================================================================
// App Proxy Signatures
// ============================================================================

#[test]
fn test_proxy_round_trip() {
    let query = signed(
        "shop=some-shop.myshopify.com&path_prefix=%2Fapps%2Fawesome&timestamp=1317327555\
         &extra=1&extra=2",
        SignatureMode::AppProxy,
    );
    assert!(validator().is_authentic_proxy_request(query.as_str()));
}

#[test]
fn test_proxy_signature_is_not_an_oauth_signature() {
    let query = signed("shop=some-shop.myshopify.com&timestamp=1", SignatureMode::AppProxy);
    let validator = validator();

    assert!(validator.is_authentic_proxy_request(query.as_str()));
    assert!(!validator.is_authentic_request(query.as_str()));
}

#[test]
fn test_proxy_joins_repeated_values_with_commas() {
    let params = QueryParams::parse("extra=1&extra=2&shop=s");
    assert_eq!(
        SignatureMode::AppProxy.canonical_message(&params),
        "extra=1,2shop=s"
    );
}

// ============================================================================
// Webhooks
// ============================================================================

#[test]
fn test_webhook_signature() {
    let body = br#"{"id":1,"email":"jon@example.com"}"#;
    let header = compute_signature_base64(body, SECRET);
    let validator = validator();

    assert!(validator.is_authentic_webhook(body, &header));
    assert!(!validator.is_authentic_webhook(b"{\"id\":2}", &header));
    assert!(!validator.is_authentic_webhook(body, ""));
}

// ============================================================================
// Shop Domains
// ============================================================================

#[test]
fn test_valid_shop_domains() {
    for domain in [
        "foo.myshopify.com",
        "my-shop-1.myshopify.com",
        "https://foo.myshopify.com",
        "http://foo.myshopify.com/",
        "FOO.MYSHOPIFY.COM",
    ] {
        assert!(AuthorizationValidator::is_valid_shop_domain(domain), "{domain}");
    }
}

#[test]
fn test_invalid_shop_domains() {
    for domain in [
        "",
        "foo",
        "myshopify.com",
        ".myshopify.com",
        "foo.myshopify.com.evil.com",
        "foo.myshopify.io",
        "https://google.com",
        "foo.myshopify.com:443",
        "foo.myshopify.com/admin",
        "foo.myshopify.com?x=1",
        "-foo.myshopify.com",
        "foo_bar.myshopify.com",
        "ftp://foo.myshopify.com",
    ] {
        assert!(!AuthorizationValidator::is_valid_shop_domain(domain), "{domain}");
    }
}

// ============================================================================
// Authorization URL
// ============================================================================

#[test]
fn test_build_authorization_url() {
    let shop = ShopDomain::new("test-shop").unwrap();
    let url = AuthorizationValidator::build_authorization_url(
        ["read_customers", "write_customers"],
        &shop,
        "abc",
        "http://example.com",
        Some("xyz"),
        &["per-user"],
    );

    assert!(url.starts_with("https://test-shop.myshopify.com/admin/oauth/authorize?"));
    assert!(url.contains("client_id=abc"));
    assert!(url.contains("scope=read_customers,write_customers"));
    assert!(url.contains("redirect_uri=http://example.com"));
    assert!(url.contains("state=xyz"));
    assert!(url.contains("grant_options[]=per-user"));
}

#[test]
fn test_authorization_url_without_state_or_grant_options() {
    let shop = ShopDomain::new("test-shop").unwrap();
    let url = AuthorizationRequest::new(shop, "abc", "https://app.example.com/callback")
        .scope("read_products")
        .url();

    assert!(url.contains("scope=read_products"));
    assert!(!url.contains("state="));
    assert!(!url.contains("grant_options"));
}

#[test]
fn test_authorization_url_escapes_values() {
    let shop = ShopDomain::new("test-shop").unwrap();
    let url = AuthorizationRequest::new(shop, "abc", "https://app.example.com/cb?next=a b")
        .state("s&t")
        .url();

    assert!(url.contains("redirect_uri=https://app.example.com/cb%3Fnext%3Da%20b"));
    assert!(url.contains("state=s%26t"));
}
