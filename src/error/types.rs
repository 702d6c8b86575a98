//! Main error type for the typewriter client.

use std::time::Duration;
use thiserror::Error;
use super::categories::*;
use crate::transport::{HttpResponse, ResponseParser, TransportError};

/// Result type alias for typewriter operations.
pub type TypewriterResult<T> = Result<T, TypewriterError>;

/// Top-level error type for the typewriter integration.
#[derive(Error, Debug, Clone)]
pub enum TypewriterError {
    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// The API key was rejected.
    #[error("Authentication error: {0}")]
    Authentication(#[from] AuthenticationError),

    /// The request was invalid.
    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    /// Rate or quota limits were hit.
    #[error("Rate limit error: {0}")]
    RateLimit(#[from] RateLimitError),

    /// The server could not be reached.
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    /// The server failed.
    #[error("Server error: {0}")]
    Server(#[from] ServerError),

    /// The response could not be understood.
    #[error("Response error: {0}")]
    Response(#[from] ResponseError),

    /// Generation was blocked.
    #[error("Content error: {0}")]
    Content(#[from] ContentError),

    /// A streamed response broke off.
    #[error("Stream error: {0}")]
    Stream(#[from] StreamError),

    /// A named resource does not exist.
    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),
}

impl TypewriterError {
    /// Returns true if this error is retryable.
    ///
    /// The renderer never retries; callers use this to decide whether offering
    /// a "try again" action makes sense.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TypewriterError::RateLimit(_)
                | TypewriterError::Network(_)
                | TypewriterError::Stream(StreamError::Interrupted { .. })
                | TypewriterError::Server(
                    ServerError::ServiceUnavailable { .. } | ServerError::ModelOverloaded { .. }
                )
        )
    }

    /// Returns the retry-after duration if available.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            TypewriterError::RateLimit(e) => e.retry_after(),
            TypewriterError::Server(ServerError::ServiceUnavailable { retry_after }) => *retry_after,
            _ => None,
        }
    }
}

impl From<TransportError> for TypewriterError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout => TypewriterError::Network(NetworkError::Timeout),
            TransportError::Connection(message) => {
                TypewriterError::Network(NetworkError::ConnectionFailed { message })
            }
            TransportError::Status { status, headers, body } => {
                ResponseParser::parse_error_response(&HttpResponse { status, headers, body })
            }
            TransportError::Request(message) => {
                TypewriterError::Stream(StreamError::Interrupted { message })
            }
        }
    }
}

impl From<serde_json::Error> for TypewriterError {
    fn from(err: serde_json::Error) -> Self {
        TypewriterError::Response(ResponseError::DeserializationError {
            message: err.to_string(),
        })
    }
}

impl From<url::ParseError> for TypewriterError {
    fn from(err: url::ParseError) -> Self {
        TypewriterError::Configuration(ConfigurationError::InvalidBaseUrl {
            url: err.to_string(),
        })
    }
}
