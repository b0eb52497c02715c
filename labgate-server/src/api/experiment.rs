//! `POST /api/generate-experiment` — experiment generation endpoint.

use axum::extract::State;
use axum::response::{IntoResponse, Json, Response};

use labgate_types::error::ProxyError;
use labgate_types::experiment::ExperimentRequest;

use crate::state::AppState;

use super::error_response;

pub async fn generate_experiment(
    State(state): State<AppState>,
    Json(request): Json<ExperimentRequest>,
) -> Response {
    // Boundary validation: the proxy itself assumes usable input.
    if request.is_empty() {
        return error_response(&ProxyError::InvalidRequest {
            message: "Please provide a title, description, or files".to_string(),
        });
    }

    match state.experiment.handle(&request).await {
        Ok(experiment) => Json(experiment).into_response(),
        Err(err) => {
            tracing::error!("experiment generation failed: {}", err);
            error_response(&err)
        },
    }
}
