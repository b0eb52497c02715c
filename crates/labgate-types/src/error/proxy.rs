//! Proxy-related errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by the upstream proxy layer.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum ProxyError {
    /// Request validation failed (missing question, empty experiment input)
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// Rate limited by upstream (429), surfaced after retries exhaust
    #[error("{message}")]
    RateLimited { message: String, quota_info: Option<String> },

    /// Upstream replied with an error, HTTP or application-level
    #[error("Upstream error ({status}): {message}")]
    Upstream { status: u16, message: String, details: Option<String> },

    /// Upstream service cannot be reached (connection refused, DNS, ...)
    #[error("Upstream unavailable: {message}")]
    UpstreamUnavailable {
        message: String,
        details: Option<String>,
        suggestion: Option<String>,
    },

    /// Overall request deadline exceeded
    #[error("Request timeout after {duration_secs}s")]
    Timeout { duration_secs: u64 },

    /// Internal proxy error (bugs, unexpected states)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ProxyError {
    /// Check if this is a client error (4xx caused by the caller's input).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidRequest { .. })
    }

    /// Get the inbound HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidRequest { .. } => 400,
            Self::RateLimited { .. } => 429,
            Self::Upstream { status, .. } => *status,
            Self::UpstreamUnavailable { .. } => 503,
            Self::Timeout { .. } => 504,
            Self::Internal { .. } => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_codes() {
        assert_eq!(
            ProxyError::InvalidRequest { message: "Question is required".to_string() }
                .http_status_code(),
            400
        );

        assert_eq!(
            ProxyError::RateLimited { message: "quota".to_string(), quota_info: None }
                .http_status_code(),
            429
        );

        assert_eq!(
            ProxyError::Upstream { status: 502, message: "bad".to_string(), details: None }
                .http_status_code(),
            502
        );

        assert_eq!(ProxyError::Timeout { duration_secs: 120 }.http_status_code(), 504);
    }

    #[test]
    fn test_upstream_status_passthrough() {
        let err = ProxyError::Upstream { status: 418, message: "teapot".to_string(), details: None };
        assert_eq!(err.http_status_code(), 418);
    }

    #[test]
    fn test_is_client_error() {
        assert!(ProxyError::InvalidRequest { message: "missing".to_string() }.is_client_error());
        assert!(!ProxyError::Timeout { duration_secs: 120 }.is_client_error());
        assert!(!ProxyError::Internal { message: "boom".to_string() }.is_client_error());
    }

    #[test]
    fn test_error_serialization() {
        let err = ProxyError::UpstreamUnavailable {
            message: "Chat server is not available".to_string(),
            details: Some("The chat server at http://localhost:8000 is not running".to_string()),
            suggestion: None,
        };

        let json = serde_json::to_string(&err).expect("serialize");
        assert!(json.contains("UpstreamUnavailable"));
        assert!(json.contains("localhost:8000"));

        let deserialized: ProxyError = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(err, deserialized);
    }

    #[test]
    fn test_error_display() {
        let err = ProxyError::Timeout { duration_secs: 120 };
        let msg = format!("{}", err);
        assert!(msg.contains("120"));
    }
}
