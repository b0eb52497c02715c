use axum::body::to_bytes;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use labgate_types::error::ErrorBody;
use labgate_types::experiment::{ExperimentRequest, ExperimentResponse};

use super::experiment::generate_experiment;
use crate::test_helpers::test_app_state;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn test_empty_request_is_rejected_at_the_boundary() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let state = test_app_state(&server.uri());
    let response = generate_experiment(State(state), Json(ExperimentRequest::default())).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = body_json(response).await;
    assert_eq!(body.error, "Please provide a title, description, or files");
}

#[tokio::test]
async fn test_generation_returns_full_experiment_schema() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "html_code": "<div/>",
            "config": {"params": {"speed": 2}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let state = test_app_state(&server.uri());
    let request = ExperimentRequest { title: "Orbits".to_string(), ..Default::default() };
    let response = generate_experiment(State(state), Json(request)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let experiment: ExperimentResponse = body_json(response).await;
    assert_eq!(experiment.title, "Orbits");
    assert!(!experiment.id.is_empty());
    assert!(!experiment.parameters.is_empty());
    assert!(!experiment.instructions.is_empty());
}

#[tokio::test]
async fn test_generator_rejection_maps_to_500() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": false, "error": "prompt too vague"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let state = test_app_state(&server.uri());
    let request = ExperimentRequest { title: "x".to_string(), ..Default::default() };
    let response = generate_experiment(State(state), Json(request)).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: ErrorBody = body_json(response).await;
    assert_eq!(body.error, "prompt too vague");
}

#[tokio::test]
async fn test_upstream_client_error_passes_through() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(413).set_body_string("payload too large"))
        .expect(1)
        .mount(&server)
        .await;

    let state = test_app_state(&server.uri());
    let request = ExperimentRequest { title: "x".to_string(), ..Default::default() };
    let response = generate_experiment(State(state), Json(request)).await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
