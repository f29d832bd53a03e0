//! Fraud check handler

use axum::{extract::State, Json};
use chrono::Datelike;

use crate::error::ErrorBody;
use crate::extract::ValidatedJson;
use crate::models::{CarListing, FraudVerdict};
use crate::{AppResult, AppState};

/// Check a car listing for odometer fraud
#[utoipa::path(
    post,
    path = "/api/check",
    operation_id = "check_car",
    tag = "Fraud Detection",
    request_body = CarListing,
    responses(
        (status = 200, description = "Fraud detection result", body = FraudVerdict),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 408, description = "Request timed out"),
        (status = 413, description = "Request body too large", body = ErrorBody),
        (status = 500, description = "Prediction failed", body = ErrorBody)
    )
)]
pub async fn check(
    State(state): State<AppState>,
    ValidatedJson(listing): ValidatedJson<CarListing>,
) -> AppResult<Json<FraudVerdict>> {
    let current_year = chrono::Utc::now().year();
    let detector = state.detector.clone();

    // Tree evaluation is CPU work; keep it off the async workers
    let verdict = tokio::task::spawn_blocking(move || detector.check(&listing, current_year))
        .await??;

    tracing::info!(
        fraud_score = verdict.fraud_score,
        is_suspicious = verdict.is_suspicious,
        expected_km = verdict.expected_km,
        "Fraud check"
    );

    Ok(Json(verdict))
}
