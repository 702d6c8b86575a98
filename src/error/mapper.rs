//! Error mapping utilities for HTTP status codes and API responses.

use serde::Deserialize;
use super::categories::*;
use super::types::TypewriterError;

/// Structured API error response from Gemini.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    /// The error payload.
    pub error: ApiErrorDetail,
}

/// Detailed error information from API.
#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    /// HTTP status code echoed in the body.
    #[serde(default)]
    pub code: i32,
    /// Human-readable message.
    pub message: String,
    /// Canonical status name, such as `INVALID_ARGUMENT`.
    #[serde(default)]
    pub status: String,
    /// Structured details.
    #[serde(default)]
    pub details: Vec<serde_json::Value>,
}

/// Maps HTTP status codes and response body to appropriate `TypewriterError` variants.
///
/// The body is parsed as a structured Gemini error when possible and falls
/// back to the raw text otherwise.
pub fn map_http_status_with_body(status: u16, body: &[u8]) -> TypewriterError {
    let (message, error_details) = match serde_json::from_slice::<ApiErrorResponse>(body) {
        Ok(error_response) => (error_response.error.message.clone(), Some(error_response.error)),
        Err(_) => (String::from_utf8_lossy(body).to_string(), None),
    };

    match status {
        400 => {
            let details = error_details
                .as_ref()
                .map(|e| parse_validation_details(&e.details))
                .unwrap_or_default();

            TypewriterError::Request(RequestError::ValidationError { message, details })
        }

        401 => TypewriterError::Authentication(AuthenticationError::InvalidApiKey),

        403 => {
            let quota = message.to_lowercase().contains("quota")
                || error_details
                    .as_ref()
                    .is_some_and(|d| d.status.eq_ignore_ascii_case("PERMISSION_DENIED"));
            if quota {
                TypewriterError::Authentication(AuthenticationError::QuotaExceeded)
            } else {
                TypewriterError::Authentication(AuthenticationError::InvalidApiKey)
            }
        }

        404 => TypewriterError::Resource(ResourceError::ModelNotFound {
            model: extract_resource_name(&message),
        }),

        415 => TypewriterError::Request(RequestError::UnsupportedMediaType {
            mime_type: extract_mime_type(&message),
        }),

        // retry_after is filled in from headers by the response parser
        429 => TypewriterError::RateLimit(RateLimitError::TooManyRequests { retry_after: None }),

        500 => TypewriterError::Server(ServerError::InternalError { message }),

        503 => {
            if message.to_lowercase().contains("overload") {
                TypewriterError::Server(ServerError::ModelOverloaded {
                    model: extract_resource_name(&message),
                })
            } else {
                TypewriterError::Server(ServerError::ServiceUnavailable { retry_after: None })
            }
        }

        _ => TypewriterError::Server(ServerError::InternalError {
            message: format!("HTTP {status}: {message}"),
        }),
    }
}

/// Maps a status code with a plain-text message.
pub fn map_http_status(status: u16, message: &str) -> TypewriterError {
    map_http_status_with_body(status, message.as_bytes())
}

/// Extracts a resource name from an error message (simple heuristic).
fn extract_resource_name(message: &str) -> String {
    if let Some(found) = message
        .split_whitespace()
        .find(|s| s.starts_with("models/"))
    {
        return found
            .trim_matches(|c: char| !c.is_alphanumeric() && c != '/' && c != '-' && c != '_' && c != '.')
            .to_string();
    }

    for quote in ['\'', '"'] {
        if let Some(start) = message.find(quote) {
            if let Some(end) = message[start + 1..].find(quote) {
                return message[start + 1..start + 1 + end].to_string();
            }
        }
    }

    "unknown".to_string()
}

/// Extracts a MIME type from an error message.
fn extract_mime_type(message: &str) -> String {
    message
        .split_whitespace()
        .filter_map(|word| word.trim_matches(|c: char| !c.is_alphanumeric() && c != '/').parse::<mime::Mime>().ok())
        .map(|m| m.essence_str().to_string())
        .next()
        .unwrap_or_else(|| "unknown".to_string())
}

/// Parses validation details from error response details array.
fn parse_validation_details(details: &[serde_json::Value]) -> Vec<ValidationDetail> {
    details
        .iter()
        .filter_map(|detail| {
            let obj = detail.as_object()?;
            let field = obj
                .get("field")
                .or_else(|| obj.get("fieldPath"))
                .and_then(|v| v.as_str())
                .unwrap_or("unknown");
            let description = obj
                .get("description")
                .or_else(|| obj.get("message"))
                .and_then(|v| v.as_str())
                .filter(|d| !d.is_empty())?;

            Some(ValidationDetail {
                field: field.to_string(),
                description: description.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_http_status_401() {
        let error = map_http_status(401, "Invalid API key");
        assert!(matches!(
            error,
            TypewriterError::Authentication(AuthenticationError::InvalidApiKey)
        ));
    }

    #[test]
    fn test_map_http_status_403_quota() {
        let error = map_http_status(403, "Quota exhausted for project");
        assert!(matches!(
            error,
            TypewriterError::Authentication(AuthenticationError::QuotaExceeded)
        ));
    }

    #[test]
    fn test_map_http_status_429() {
        let error = map_http_status(429, "Rate limit exceeded");
        assert!(matches!(
            error,
            TypewriterError::RateLimit(RateLimitError::TooManyRequests { .. })
        ));
    }

    #[test]
    fn test_map_http_status_503_overloaded() {
        let error = map_http_status(503, "The model is overloaded");
        assert!(matches!(
            error,
            TypewriterError::Server(ServerError::ModelOverloaded { .. })
        ));

        let error = map_http_status(503, "Service unavailable");
        assert!(matches!(
            error,
            TypewriterError::Server(ServerError::ServiceUnavailable { .. })
        ));
    }

    #[test]
    fn test_map_http_status_with_body_structured() {
        let body = r#"{"error":{"code":400,"message":"Invalid parameter","status":"INVALID_ARGUMENT","details":[{"field":"contents","description":"must not be empty"}]}}"#;
        let error = map_http_status_with_body(400, body.as_bytes());
        match error {
            TypewriterError::Request(RequestError::ValidationError { message, details }) => {
                assert_eq!(message, "Invalid parameter");
                assert_eq!(details.len(), 1);
                assert_eq!(details[0].field, "contents");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_map_http_status_404_model() {
        let body = r#"{"error":{"message":"Model 'gemini-fake' not found"}}"#;
        match map_http_status_with_body(404, body.as_bytes()) {
            TypewriterError::Resource(ResourceError::ModelNotFound { model }) => {
                assert_eq!(model, "gemini-fake");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_extract_resource_name_with_path() {
        let name = extract_resource_name("Model models/gemini-2.5-flash-lite not found");
        assert_eq!(name, "models/gemini-2.5-flash-lite");
    }

    #[test]
    fn test_extract_mime_type() {
        assert_eq!(extract_mime_type("Unsupported media type: image/bmp"), "image/bmp");
        assert_eq!(extract_mime_type("nothing here"), "unknown");
    }
}
