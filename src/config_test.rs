use super::*;

#[test]
fn default_config_uses_api_prefix() {
    let config = ClientConfig::default();
    assert_eq!(config.api_base, "/api");
    assert!(config.push_url.is_none());
}

#[test]
fn normalized_strips_trailing_slashes() {
    let config = ClientConfig { api_base: "https://school.example/api//".to_owned(), push_url: None }.normalized();
    assert_eq!(config.api_base, "https://school.example/api");
}

#[test]
fn normalized_restores_default_for_empty_base() {
    let config = ClientConfig { api_base: "/".to_owned(), push_url: None }.normalized();
    assert_eq!(config.api_base, "/api");
}

#[test]
fn overrides_deserialize_with_missing_fields() {
    let config: ClientConfig = serde_json::from_str(r#"{"pushUrl":"wss://push.example/ws"}"#).expect("config");
    assert_eq!(config.api_base, "/api");
    assert_eq!(config.push_url.as_deref(), Some("wss://push.example/ws"));
}

#[test]
fn derive_push_url_follows_page_scheme() {
    assert_eq!(derive_push_url("https://app.example/visits", "app.example"), "wss://app.example/socket");
    assert_eq!(derive_push_url("http://localhost:3000/", "localhost:3000"), "ws://localhost:3000/socket");
}

#[test]
fn push_endpoint_appends_token() {
    let config = ClientConfig::default();
    assert_eq!(
        config.push_endpoint("http://localhost:3000/", "localhost:3000", "tok"),
        "ws://localhost:3000/socket?token=tok"
    );

    let config = ClientConfig { api_base: "/api".to_owned(), push_url: Some("wss://push.example/ws?v=2".to_owned()) };
    assert_eq!(config.push_endpoint("", "", "tok"), "wss://push.example/ws?v=2&token=tok");
}
