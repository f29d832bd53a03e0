//! HTTP handlers

pub mod health;
pub mod check;
pub mod docs;

use crate::AppError;

/// Fallback for unknown routes
pub async fn not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}
