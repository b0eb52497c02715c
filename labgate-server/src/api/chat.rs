//! `POST /api/chat` — notes-chat proxy endpoint.

use axum::extract::State;
use axum::response::{IntoResponse, Json, Response};

use labgate_types::chat::ChatRequest;

use crate::state::AppState;

use super::error_response;

pub async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Response {
    match state.chat.handle(&request).await {
        Ok(reply) => Json(reply).into_response(),
        Err(err) => {
            tracing::error!("chat request failed: {}", err);
            error_response(&err)
        },
    }
}
