//! Labgate Server - Headless Gateway Daemon
//!
//! A pure Rust HTTP server that fronts the education platform's two
//! upstream services with retrying, timeout-bounded proxy endpoints:
//! - `POST /api/chat` → chat/RAG service
//! - `POST /api/generate-experiment` → experiment generator
//!
//! Access via: http://localhost:8080

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod api;
mod state;
#[cfg(test)]
mod test_helpers;

use labgate_core::config::ProxyConfig;
use state::AppState;

const DEFAULT_PORT: u16 = 8080;

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let port: u16 = std::env::var("LABGATE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    let config = ProxyConfig::from_env();
    info!("chat upstream: {}", config.chat_base_url);
    info!("experiment upstream: {}", config.experiment_base_url);

    let state = AppState::new(&config);
    let app = build_router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("server listening on http://{}", addr);
    info!("API available at http://localhost:{}/api/", port);

    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api::router())
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
        .with_state(state)
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, axum::Json(serde_json::json!({"status": "ok"})))
}
