//! Backend-specific error types
//!
//! `BackendError` covers failures of the wrapped vendor call itself. The
//! interception layer propagates these verbatim - an audit failure is never
//! allowed to mask one.

use sealtrace_foundation::Error as FoundationError;
use thiserror::Error;

/// Errors raised by a backend invocation
#[derive(Error, Debug, Clone)]
pub enum BackendError {
    /// API key is missing or invalid
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// Invalid request (bad parameters)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid response from the backend API
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Model not found or not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Server error (5xx)
    #[error("Server error: {0}")]
    ServerError(String),

    /// Network error (connection failed, DNS, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Streaming error
    #[error("Stream error: {0}")]
    StreamError(String),

    /// Unknown error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl BackendError {
    /// Create from HTTP status code and body
    pub fn from_http_status(status: u16, body: &str) -> Self {
        match status {
            401 | 403 => BackendError::Authentication(body.to_string()),
            429 => BackendError::RateLimited(body.to_string()),
            400 => BackendError::InvalidRequest(body.to_string()),
            404 => BackendError::ModelNotAvailable(body.to_string()),
            500..=599 => BackendError::ServerError(body.to_string()),
            _ => BackendError::Unknown(format!("HTTP {}: {}", status, body)),
        }
    }
}

// ============================================================================
// sealtrace_foundation::Error conversion
// ============================================================================

impl From<BackendError> for FoundationError {
    fn from(err: BackendError) -> Self {
        FoundationError::Backend(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_http_status() {
        assert!(matches!(
            BackendError::from_http_status(401, "bad key"),
            BackendError::Authentication(_)
        ));
        assert!(matches!(
            BackendError::from_http_status(429, ""),
            BackendError::RateLimited(_)
        ));
        assert!(matches!(
            BackendError::from_http_status(404, "no such model"),
            BackendError::ModelNotAvailable(_)
        ));
        assert!(matches!(
            BackendError::from_http_status(503, ""),
            BackendError::ServerError(_)
        ));
        assert!(matches!(
            BackendError::from_http_status(418, ""),
            BackendError::Unknown(_)
        ));
    }
}
