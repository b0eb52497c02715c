//! JSON error body for the inbound API.

use serde::{Deserialize, Serialize};

use super::ProxyError;

/// Structured error payload returned alongside a non-2xx status.
///
/// `details` carries a human-readable hint (never a stack trace or internal
/// exception text), `suggestion` an operator action, `quotaInfo` rate-limit
/// context for the UI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(rename = "quotaInfo", skip_serializing_if = "Option::is_none")]
    pub quota_info: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into(), details: None, suggestion: None, quota_info: None }
    }
}

impl From<&ProxyError> for ErrorBody {
    fn from(err: &ProxyError) -> Self {
        match err {
            ProxyError::InvalidRequest { message } => Self::new(message.clone()),
            ProxyError::RateLimited { message, quota_info } => Self {
                error: message.clone(),
                details: None,
                suggestion: None,
                quota_info: quota_info.clone(),
            },
            ProxyError::Upstream { message, details, .. } => Self {
                error: message.clone(),
                details: details.clone(),
                suggestion: None,
                quota_info: None,
            },
            ProxyError::UpstreamUnavailable { message, details, suggestion } => Self {
                error: message.clone(),
                details: details.clone(),
                suggestion: suggestion.clone(),
                quota_info: None,
            },
            ProxyError::Timeout { .. } => Self {
                error: "Request timeout".to_string(),
                details: Some(
                    "The server took too long to respond. Please try again with a simpler \
                     question or check if the server is processing a large PDF."
                        .to_string(),
                ),
                suggestion: None,
                quota_info: None,
            },
            ProxyError::Internal { message } => Self::new(message.clone()),
        }
    }
}
