//! Integration tests for error mapping across the transport boundary.

use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;
use integrations_typewriter::error::{
    map_http_status, map_http_status_with_body, AuthenticationError, ConfigurationError,
    ContentError, NetworkError, RateLimitError, RequestError, ResourceError, ResponseError,
    ServerError, StreamError, TypewriterError,
};
use integrations_typewriter::transport::{HttpResponse, ResponseParser, TransportError};
use integrations_typewriter::types::GenerateContentResponse;
use integrations_typewriter::TypewriterConfig;
use serde_json::json;

fn response(status: u16, headers: &[(&str, &str)], body: serde_json::Value) -> HttpResponse {
    HttpResponse {
        status,
        headers: headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>(),
        body: Bytes::from(body.to_string()),
    }
}

#[test]
fn test_retryable_classification() {
    let retryable: Vec<TypewriterError> = vec![
        NetworkError::Timeout.into(),
        NetworkError::ConnectionFailed { message: "refused".to_string() }.into(),
        RateLimitError::QuotaExceeded { retry_after: None }.into(),
        ServerError::ServiceUnavailable { retry_after: None }.into(),
        ServerError::ModelOverloaded { model: "m".to_string() }.into(),
        StreamError::Interrupted { message: "reset".to_string() }.into(),
    ];
    for error in retryable {
        assert!(error.is_retryable(), "{error} should be retryable");
    }

    let permanent: Vec<TypewriterError> = vec![
        AuthenticationError::InvalidApiKey.into(),
        ConfigurationError::MissingApiKey.into(),
        RequestError::validation("bad").into(),
        ContentError::RecitationBlocked.into(),
        StreamError::Truncated.into(),
        ServerError::InternalError { message: "boom".to_string() }.into(),
    ];
    for error in permanent {
        assert!(!error.is_retryable(), "{error} should not be retryable");
    }
}

#[test]
fn test_retry_after_header_applied_to_rate_limit() {
    let error = ResponseParser::parse_error_response(&response(
        429,
        &[("Retry-After", "12")],
        json!({"error": {"code": 429, "message": "slow down"}}),
    ));
    assert!(matches!(
        error,
        TypewriterError::RateLimit(RateLimitError::TooManyRequests { .. })
    ));
    assert_eq!(error.retry_after(), Some(Duration::from_secs(12)));
}

#[test]
fn test_retry_after_header_applied_to_unavailable() {
    let error = ResponseParser::parse_error_response(&response(
        503,
        &[("retry-after", "3"), ("x-request-id", "abc")],
        json!({"error": {"code": 503, "message": "The service is currently unavailable."}}),
    ));
    assert_eq!(error.retry_after(), Some(Duration::from_secs(3)));
}

#[test]
fn test_overloaded_model() {
    let error = map_http_status(503, "models/gemini-test is overloaded");
    match error {
        TypewriterError::Server(ServerError::ModelOverloaded { model }) => {
            assert_eq!(model, "models/gemini-test");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_validation_details_from_body() {
    let body = json!({
        "error": {
            "code": 400,
            "message": "Invalid JSON payload",
            "status": "INVALID_ARGUMENT",
            "details": [
                {"field": "contents[0].parts", "description": "must not be empty"},
                {"fieldPath": "generationConfig.temperature", "message": "out of range"},
                {"unrelated": true}
            ]
        }
    });
    let error = map_http_status_with_body(400, body.to_string().as_bytes());

    match error {
        TypewriterError::Request(RequestError::ValidationError { message, details }) => {
            assert_eq!(message, "Invalid JSON payload");
            assert_eq!(details.len(), 2);
            assert_eq!(details[0].field, "contents[0].parts");
            assert_eq!(details[1].field, "generationConfig.temperature");
            assert_eq!(details[1].description, "out of range");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_plain_text_error_body() {
    let error = map_http_status_with_body(404, b"model 'gemini-nope' was not found");
    match error {
        TypewriterError::Resource(ResourceError::ModelNotFound { model }) => {
            assert_eq!(model, "gemini-nope");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_unknown_status_keeps_code() {
    let error = map_http_status(418, "teapot");
    assert!(error.to_string().contains("HTTP 418"));
}

#[test]
fn test_transport_status_maps_like_response() {
    let error: TypewriterError = TransportError::Status {
        status: 401,
        headers: HashMap::new(),
        body: Bytes::from_static(b"{\"error\":{\"code\":401,\"message\":\"API key not valid\"}}"),
    }
    .into();
    assert!(matches!(
        error,
        TypewriterError::Authentication(AuthenticationError::InvalidApiKey)
    ));

    let error: TypewriterError = TransportError::Connection("refused".to_string()).into();
    assert!(matches!(
        error,
        TypewriterError::Network(NetworkError::ConnectionFailed { .. })
    ));
}

#[test]
fn test_success_body_parse_failure() {
    let result: Result<GenerateContentResponse, _> =
        ResponseParser::parse_response(HttpResponse {
            status: 200,
            headers: HashMap::new(),
            body: Bytes::from_static(b"not json"),
        });
    assert!(matches!(
        result,
        Err(TypewriterError::Response(ResponseError::DeserializationError { .. }))
    ));
}

#[test]
fn test_config_errors() {
    let missing_key = TypewriterConfig::builder().build().unwrap_err();
    assert!(matches!(
        missing_key,
        TypewriterError::Configuration(ConfigurationError::MissingApiKey)
    ));

    let bad_url = TypewriterConfig::builder().base_url("not a url").err().unwrap();
    assert!(matches!(
        bad_url,
        TypewriterError::Configuration(ConfigurationError::InvalidBaseUrl { .. })
    ));
}

#[test]
fn test_error_display() {
    let error: TypewriterError = StreamError::Truncated.into();
    assert_eq!(
        error.to_string(),
        "Stream error: Stream ended before the response was complete"
    );
}
