//! Model artifacts and the handle the request path evaluates them through
//!
//! The trained models are loaded once at startup and shared read-only.
//! Request handlers only ever see the [`MileageModels`] trait object, so
//! tests can swap in a mock.

pub mod engine;
pub mod loader;

use std::path::PathBuf;

use crate::detection::{ClassifierRow, RegressorRow};
use crate::gbdt::GbdtError;

pub use engine::GbdtModels;
pub use loader::{fingerprint, ClassifierArtifact};

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid model artifact: {0}")]
    Invalid(String),

    #[error(transparent)]
    Gbdt(#[from] GbdtError),
}

/// The pair of trained models behind a fraud check
pub trait MileageModels: Send + Sync {
    /// Expected mileage as `ln(1 + km)`
    fn predict_log_km(&self, row: &RegressorRow<'_>) -> Result<f64, ModelError>;

    /// Probability (0.0 - 1.0) that the reported mileage is fraudulent
    fn fraud_probability(&self, row: &ClassifierRow) -> Result<f64, ModelError>;

    /// Probability at or above which a listing is flagged
    fn threshold(&self) -> f64;

    /// Stable identifier of the loaded artifacts
    fn fingerprint(&self) -> &str;
}
