//! API Routes
//!
//! Inbound JSON endpoints consumed by the web UI.

mod chat;
mod experiment;

#[cfg(test)]
mod experiment_tests;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::post;
use axum::Router;

use labgate_types::error::{ErrorBody, ProxyError};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/chat", post(chat::chat_handler))
        .route("/generate-experiment", post(experiment::generate_experiment))
}

/// Maps a proxy error onto the inbound wire contract: the taxonomy's
/// status code plus a structured JSON body.
pub(crate) fn error_response(err: &ProxyError) -> Response {
    let status = StatusCode::from_u16(err.http_status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorBody::from(err))).into_response()
}
