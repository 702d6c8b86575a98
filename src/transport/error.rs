//! Transport layer error types.

use std::collections::HashMap;

use bytes::Bytes;

/// Transport error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// The connection could not be established.
    #[error("Connection error: {0}")]
    Connection(String),
    /// The request timed out.
    #[error("Timeout")]
    Timeout,
    /// Failure while a request or response body was in flight.
    #[error("Request error: {0}")]
    Request(String),
    /// Non-success status returned before any body was streamed.
    #[error("HTTP status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response headers, kept for `Retry-After` and request ids.
        headers: HashMap<String, String>,
        /// Error response body.
        body: Bytes,
    },
}
