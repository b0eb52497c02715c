//! Application State
//!
//! Holds the two proxies shared by all inbound handlers. Each request is
//! handled independently — the proxies keep no per-request state.

use std::sync::Arc;

use labgate_core::config::ProxyConfig;
use labgate_core::proxy::{ChatProxy, ExperimentProxy};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<ChatProxy>,
    pub experiment: Arc<ExperimentProxy>,
}

impl AppState {
    pub fn new(config: &ProxyConfig) -> Self {
        // One connection pool serves both upstreams.
        let http_client = reqwest::Client::new();
        Self {
            chat: Arc::new(ChatProxy::new(http_client.clone(), config.chat_base_url.clone())),
            experiment: Arc::new(ExperimentProxy::new(
                http_client,
                config.experiment_base_url.clone(),
            )),
        }
    }
}
