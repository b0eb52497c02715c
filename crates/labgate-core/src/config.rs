//! Upstream endpoint configuration.
//!
//! Base URLs for the two upstream collaborators come from the environment,
//! with validated localhost defaults.

use tracing::warn;

pub const CHAT_SERVER_URL_ENV: &str = "CHAT_SERVER_URL";
pub const EXPERIMENT_SERVER_URL_ENV: &str = "EXPERIMENT_SERVER_URL";

const DEFAULT_CHAT_SERVER_URL: &str = "http://localhost:8000";
const DEFAULT_EXPERIMENT_SERVER_URL: &str = "http://localhost:8001";

/// Base URLs of the chat and experiment-generation services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub chat_base_url: String,
    pub experiment_base_url: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            chat_base_url: DEFAULT_CHAT_SERVER_URL.to_string(),
            experiment_base_url: DEFAULT_EXPERIMENT_SERVER_URL.to_string(),
        }
    }
}

impl ProxyConfig {
    /// Resolve from `CHAT_SERVER_URL` / `EXPERIMENT_SERVER_URL`.
    pub fn from_env() -> Self {
        Self {
            chat_base_url: sanitize_base_url(
                std::env::var(CHAT_SERVER_URL_ENV).ok(),
                CHAT_SERVER_URL_ENV,
                DEFAULT_CHAT_SERVER_URL,
            ),
            experiment_base_url: sanitize_base_url(
                std::env::var(EXPERIMENT_SERVER_URL_ENV).ok(),
                EXPERIMENT_SERVER_URL_ENV,
                DEFAULT_EXPERIMENT_SERVER_URL,
            ),
        }
    }
}

fn sanitize_base_url(raw: Option<String>, env_key: &str, default: &str) -> String {
    let Some(raw) = raw else {
        return default.to_string();
    };

    let base_url = raw.trim().trim_end_matches('/').to_string();
    if base_url.is_empty() {
        warn!("{} is empty, using {}", env_key, default);
        return default.to_string();
    }
    if url::Url::parse(&base_url).is_err() {
        warn!("{} is not a valid URL, using {}", env_key, default);
        return default.to_string();
    }
    base_url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_uses_default() {
        assert_eq!(sanitize_base_url(None, CHAT_SERVER_URL_ENV, DEFAULT_CHAT_SERVER_URL), DEFAULT_CHAT_SERVER_URL);
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let url = sanitize_base_url(
            Some("http://chat.internal:8000/".to_string()),
            CHAT_SERVER_URL_ENV,
            DEFAULT_CHAT_SERVER_URL,
        );
        assert_eq!(url, "http://chat.internal:8000");
    }

    #[test]
    fn test_empty_and_invalid_fall_back() {
        assert_eq!(
            sanitize_base_url(Some("  ".to_string()), CHAT_SERVER_URL_ENV, DEFAULT_CHAT_SERVER_URL),
            DEFAULT_CHAT_SERVER_URL
        );
        assert_eq!(
            sanitize_base_url(
                Some("not a url".to_string()),
                EXPERIMENT_SERVER_URL_ENV,
                DEFAULT_EXPERIMENT_SERVER_URL
            ),
            DEFAULT_EXPERIMENT_SERVER_URL
        );
    }
}
