use super::*;

#[test]
fn from_status_prefers_message_then_error_field() {
    let err = ApiError::from_status(400, r#"{"message":"Title is required","error":"bad"}"#);
    assert_eq!(err, ApiError::Status { status: 400, message: Some("Title is required".to_owned()) });

    let err = ApiError::from_status(400, r#"{"error":"File too large"}"#);
    assert_eq!(err.user_message(), "File too large");
}

#[test]
fn from_status_ignores_non_json_and_blank_messages() {
    assert_eq!(ApiError::from_status(502, "<html>bad gateway</html>"), ApiError::Status { status: 502, message: None });
    assert_eq!(ApiError::from_status(400, r#"{"message":"  "}"#), ApiError::Status { status: 400, message: None });
}

#[test]
fn user_message_falls_back_per_status() {
    assert!(ApiError::from_status(401, "").user_message().contains("sign in"));
    assert!(ApiError::from_status(404, "").user_message().contains("no longer exists"));
    assert!(ApiError::from_status(503, "").user_message().contains("server had a problem"));
    assert_eq!(ApiError::from_status(409, "").user_message(), "Request failed (409).");
}

#[test]
fn network_and_decode_errors_hide_internals() {
    let err = ApiError::Network("TypeError: Failed to fetch".to_owned());
    assert!(!err.user_message().contains("TypeError"));
    assert_eq!(err.to_string(), "network error: TypeError: Failed to fetch");
    assert!(ApiError::Decode("missing field".to_owned()).user_message().contains("unexpected"));
}
