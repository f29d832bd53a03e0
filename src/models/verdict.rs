//! Fraud check and health responses

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response body of `POST /api/check`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FraudVerdict {
    /// Fraud probability as a percentage (0 - 100)
    #[schema(minimum = 0, maximum = 100)]
    pub fraud_score: u8,

    /// Decision: probability at or above the model threshold
    pub is_suspicious: bool,

    /// Mileage the regressor expects for a comparable car
    #[schema(minimum = 0)]
    pub expected_km: i64,

    /// Explanations shown to the user, may be empty
    pub reasons: Vec<String>,
}

/// Response body of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub models_loaded: bool,
    pub service: String,
    pub version: String,
    pub creator: String,
    pub website: String,
    pub dataset: String,
    /// SHA-256 over both model artifacts
    pub model_fingerprint: String,
    /// Unix seconds
    pub timestamp: i64,
}
