//! Health check handlers

use axum::{extract::State, Json};

use crate::config::{API_TITLE, CREATOR_NAME, CREATOR_WEBSITE, DATASET_SOURCE};
use crate::models::HealthResponse;
use crate::AppState;

/// Liveness check
///
/// The server only starts after both models loaded, so an answer here
/// always means the models are ready.
#[utoipa::path(
    get,
    path = "/health",
    operation_id = "health",
    tag = "Health",
    responses(
        (status = 200, description = "Service status", body = HealthResponse)
    )
)]
pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        models_loaded: true,
        service: API_TITLE.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        creator: CREATOR_NAME.to_string(),
        website: CREATOR_WEBSITE.to_string(),
        dataset: DATASET_SOURCE.to_string(),
        model_fingerprint: state.detector.models().fingerprint().to_string(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}

/// Service root, same body as `/health`
#[utoipa::path(
    get,
    path = "/",
    operation_id = "root",
    tag = "Health",
    responses(
        (status = 200, description = "Service status", body = HealthResponse)
    )
)]
pub async fn root(state: State<AppState>) -> Json<HealthResponse> {
    check(state).await
}
