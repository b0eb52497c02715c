//! Test helpers for labgate-server unit tests.

use labgate_core::config::ProxyConfig;

use crate::state::AppState;

/// Create an `AppState` with both proxies pointed at `base_url`.
pub fn test_app_state(base_url: &str) -> AppState {
    let config = ProxyConfig {
        chat_base_url: base_url.trim_end_matches('/').to_string(),
        experiment_base_url: base_url.trim_end_matches('/').to_string(),
    };
    AppState::new(&config)
}
