//! Fraud detection
//!
//! Turns a validated [`CarListing`] into a [`FraudVerdict`] in four steps:
//! expected mileage from the regressor, comparison features, fraud
//! probability from the classifier, and explanations.

pub mod features;
pub mod reasons;

use std::sync::Arc;

use crate::config::DetectionConfig;
use crate::inference::{MileageModels, ModelError};
use crate::models::{CarListing, FraudVerdict};

pub use features::{car_age, ClassifierRow, RegressorRow, CLASSIFIER_FEATURES, REGRESSOR_FEATURES};
pub use reasons::generate_reasons;

/// Runs fraud checks against a shared, read-only set of models
#[derive(Clone)]
pub struct FraudDetector {
    models: Arc<dyn MileageModels>,
    settings: DetectionConfig,
}

impl FraudDetector {
    pub fn new(models: Arc<dyn MileageModels>, settings: DetectionConfig) -> Self {
        Self { models, settings }
    }

    pub fn models(&self) -> &dyn MileageModels {
        self.models.as_ref()
    }

    /// Check one listing; `current_year` anchors the age features
    ///
    /// The listing must already be validated.
    pub fn check(&self, listing: &CarListing, current_year: i32) -> Result<FraudVerdict, ModelError> {
        let reg_row = RegressorRow::from_listing(listing, current_year);
        let predicted_log = self.models.predict_log_km(&reg_row)?;

        let expected = predicted_log.exp_m1();
        if !expected.is_finite() {
            return Err(crate::gbdt::GbdtError::NonFinite(expected).into());
        }
        let expected_km = (expected.trunc() as i64).max(0);

        let class_row = ClassifierRow::new(listing.reported_km, expected_km, predicted_log, reg_row.age);
        let fraud_prob = self.models.fraud_probability(&class_row)?;
        if !(0.0..=1.0).contains(&fraud_prob) {
            return Err(ModelError::Invalid(format!(
                "fraud probability {} is outside 0.0 - 1.0",
                fraud_prob
            )));
        }

        let fraud_score = (fraud_prob * 100.0).round_ties_even() as u8;
        let is_suspicious = fraud_prob >= self.models.threshold();

        let reasons = generate_reasons(
            class_row.smart_ratio,
            class_row.market_km_diff,
            expected_km,
            is_suspicious,
            &self.settings,
        );

        tracing::debug!(
            make = %listing.make,
            model = %listing.model,
            expected_km,
            smart_ratio = class_row.smart_ratio,
            fraud_prob,
            is_suspicious,
            "Fraud check completed"
        );

        Ok(FraudVerdict {
            fraud_score,
            is_suspicious,
            expected_km,
            reasons,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::listing::sample_listing;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Deterministic stand-in for the trained models
    ///
    /// Expected mileage is 15,000 km per year of age (half a km added so
    /// `expm1` truncates back to the whole number); fraud probability is
    /// `1 - smart_ratio`, clamped.
    #[derive(Default)]
    pub(crate) struct MockModels {
        pub calls: AtomicUsize,
        pub fail: bool,
    }

    impl MileageModels for MockModels {
        fn predict_log_km(&self, row: &RegressorRow<'_>) -> Result<f64, ModelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ModelError::Invalid("mock failure".to_string()));
            }
            Ok(((row.age * 15_000) as f64 + 0.5).ln_1p())
        }

        fn fraud_probability(&self, row: &ClassifierRow) -> Result<f64, ModelError> {
            Ok((1.0 - row.smart_ratio).clamp(0.0, 1.0))
        }

        fn threshold(&self) -> f64 {
            0.5
        }

        fn fingerprint(&self) -> &str {
            "mock"
        }
    }

    fn detector(models: Arc<MockModels>) -> FraudDetector {
        FraudDetector::new(models, DetectionConfig::default())
    }

    #[test]
    fn test_rolled_back_odometer_flagged() {
        let models = Arc::new(MockModels::default());
        let verdict = detector(models.clone()).check(&sample_listing(), 2026).unwrap();

        // 14 years * 15,000 km
        assert_eq!(verdict.expected_km, 210_000);
        assert!(verdict.is_suspicious);
        assert_eq!(verdict.fraud_score, 93);
        assert_eq!(verdict.reasons.len(), 2);
        assert!(verdict.reasons[0].contains("Samo 7%"));
        assert!(verdict.reasons[1].contains("195,000 km manje"));
        assert_eq!(models.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_plausible_mileage_clean() {
        let mut listing = sample_listing();
        listing.reported_km = 220_000;

        let verdict = detector(Arc::new(MockModels::default()))
            .check(&listing, 2026)
            .unwrap();
        assert!(!verdict.is_suspicious);
        assert_eq!(verdict.fraud_score, 0);
        assert!(verdict.reasons.is_empty());
    }

    #[test]
    fn test_check_is_idempotent() {
        let detector = detector(Arc::new(MockModels::default()));
        let listing = sample_listing();

        let first = detector.check(&listing, 2026).unwrap();
        let second = detector.check(&listing, 2026).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_model_failure_surfaces() {
        let models = Arc::new(MockModels {
            fail: true,
            ..Default::default()
        });
        let err = detector(models).check(&sample_listing(), 2026).unwrap_err();
        assert!(err.to_string().contains("mock failure"));
    }

    struct ExplodingRegressor;

    impl MileageModels for ExplodingRegressor {
        fn predict_log_km(&self, _row: &RegressorRow<'_>) -> Result<f64, ModelError> {
            Ok(1_000.0)
        }

        fn fraud_probability(&self, _row: &ClassifierRow) -> Result<f64, ModelError> {
            Ok(0.0)
        }

        fn threshold(&self) -> f64 {
            0.5
        }

        fn fingerprint(&self) -> &str {
            "exploding"
        }
    }

    #[test]
    fn test_overflowing_expected_mileage_is_an_error() {
        let detector = FraudDetector::new(Arc::new(ExplodingRegressor), DetectionConfig::default());
        assert!(detector.check(&sample_listing(), 2026).is_err());
    }

    #[test]
    fn test_with_gbdt_models() {
        use crate::gbdt::Ensemble;
        use crate::inference::engine::tests::{CLASSIFIER_JSON, REGRESSOR_JSON};
        use crate::inference::{ClassifierArtifact, GbdtModels};

        let regressor: Ensemble = serde_json::from_str(REGRESSOR_JSON).unwrap();
        let classifier: ClassifierArtifact = serde_json::from_str(CLASSIFIER_JSON).unwrap();
        let models = GbdtModels::from_parts(regressor, classifier.ensemble, 0.42).unwrap();
        let detector = FraudDetector::new(Arc::new(models), DetectionConfig::default());

        // Age 14 -> log km 12.0 -> expm1 = 162,753
        let verdict = detector.check(&sample_listing(), 2026).unwrap();
        assert_eq!(verdict.expected_km, 12f64.exp_m1().trunc() as i64);
        assert!(verdict.is_suspicious);
        assert_eq!(verdict.fraud_score, 88);
    }
}
