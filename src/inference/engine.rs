//! GBDT-backed implementation of [`MileageModels`]

use std::path::Path;

use super::loader::{fingerprint, parse_classifier, parse_regressor, read_artifact};
use super::{MileageModels, ModelError};
use crate::detection::{ClassifierRow, RegressorRow, CLASSIFIER_FEATURES, REGRESSOR_FEATURES};
use crate::gbdt::{Ensemble, Objective};

/// Mileage regressor and fraud classifier evaluated in-process
#[derive(Debug)]
pub struct GbdtModels {
    regressor: Ensemble,
    classifier: Ensemble,
    threshold: f64,
    fingerprint: String,
}

impl GbdtModels {
    /// Load both artifacts from disk
    ///
    /// `default_threshold` applies when the classifier artifact has none.
    pub fn load(
        regressor_path: &Path,
        classifier_path: &Path,
        default_threshold: f64,
    ) -> Result<Self, ModelError> {
        tracing::info!("Loading regression model from: {}", regressor_path.display());
        let regressor_bytes = read_artifact(regressor_path)?;
        let regressor = parse_regressor(regressor_path, &regressor_bytes)?;

        tracing::info!("Loading classification model from: {}", classifier_path.display());
        let classifier_bytes = read_artifact(classifier_path)?;
        let artifact = parse_classifier(classifier_path, &classifier_bytes)?;

        let threshold = artifact.threshold.unwrap_or(default_threshold);
        let mut models = Self::from_parts(regressor, artifact.ensemble, threshold)?;
        models.fingerprint = fingerprint(&[&regressor_bytes, &classifier_bytes]);

        tracing::info!(
            regressor_trees = models.regressor.tree_count(),
            classifier_trees = models.classifier.tree_count(),
            threshold = models.threshold,
            fingerprint = %models.fingerprint,
            "Models loaded successfully"
        );

        Ok(models)
    }

    /// Assemble from already-built ensembles, checking they fit the service
    pub fn from_parts(
        regressor: Ensemble,
        classifier: Ensemble,
        threshold: f64,
    ) -> Result<Self, ModelError> {
        if regressor.objective() != Objective::Regression {
            return Err(ModelError::Invalid(
                "mileage regressor must use the reg:squarederror objective".to_string(),
            ));
        }
        if classifier.objective() != Objective::BinaryLogistic {
            return Err(ModelError::Invalid(
                "fraud classifier must use the binary:logistic objective".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ModelError::Invalid(format!(
                "threshold {} is outside 0.0 - 1.0",
                threshold
            )));
        }

        regressor.require_features(&REGRESSOR_FEATURES)?;
        classifier.require_features(&CLASSIFIER_FEATURES)?;

        Ok(Self {
            regressor,
            classifier,
            threshold,
            fingerprint: "<memory>".to_string(),
        })
    }
}

impl MileageModels for GbdtModels {
    fn predict_log_km(&self, row: &RegressorRow<'_>) -> Result<f64, ModelError> {
        Ok(self.regressor.predict(&row.values())?)
    }

    fn fraud_probability(&self, row: &ClassifierRow) -> Result<f64, ModelError> {
        Ok(self.classifier.predict(&row.values())?)
    }

    fn threshold(&self) -> f64 {
        self.threshold
    }

    fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;

    pub(crate) const REGRESSOR_JSON: &str = r#"{
        "objective": "reg:squarederror",
        "base_score": 11.5,
        "feature_names": ["year", "price", "horsepower", "make", "model",
                          "fuelType", "gearbox", "offerType", "age", "age_squared"],
        "categories": {
            "make": {"BMW": 0, "Volkswagen": 1},
            "model": {"320": 0, "Golf": 1},
            "fuelType": {"Diesel": 0, "Petrol": 1},
            "gearbox": {"Manual": 0, "Automatic": 1},
            "offerType": {"Used": 0, "New": 1}
        },
        "trees": [
            {"nodes": [
                {"feature": 8, "threshold": 4.0, "left": 1, "right": 2},
                {"leaf": -1.0},
                {"leaf": 0.5}
            ]}
        ]
    }"#;

    pub(crate) const CLASSIFIER_JSON: &str = r#"{
        "threshold": 0.42,
        "ensemble": {
            "objective": "binary:logistic",
            "feature_names": ["smart_ratio", "age", "market_km_diff", "log_diff"],
            "trees": [
                {"nodes": [
                    {"feature": 0, "threshold": 0.7, "left": 1, "right": 2},
                    {"leaf": 2.0},
                    {"leaf": -2.0}
                ]}
            ]
        }
    }"#;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_from_disk() {
        let regressor = write_temp(REGRESSOR_JSON);
        let classifier = write_temp(CLASSIFIER_JSON);

        let models = GbdtModels::load(regressor.path(), classifier.path(), 0.5).unwrap();
        assert_eq!(models.threshold(), 0.42);
        assert_eq!(models.fingerprint().len(), 64);
    }

    #[test]
    fn test_default_threshold_applies() {
        let regressor = write_temp(REGRESSOR_JSON);
        let classifier = write_temp(&CLASSIFIER_JSON.replace(r#""threshold": 0.42,"#, ""));

        let models = GbdtModels::load(regressor.path(), classifier.path(), 0.5).unwrap();
        assert_eq!(models.threshold(), 0.5);
    }

    #[test]
    fn test_missing_artifact_fails() {
        let classifier = write_temp(CLASSIFIER_JSON);
        let err = GbdtModels::load(Path::new("/nonexistent/regressor.json"), classifier.path(), 0.5)
            .unwrap_err();
        assert!(matches!(err, ModelError::Io { .. }));
    }

    #[test]
    fn test_swapped_artifacts_rejected() {
        let regressor: Ensemble = serde_json::from_str(REGRESSOR_JSON).unwrap();
        let classifier: super::super::ClassifierArtifact =
            serde_json::from_str(CLASSIFIER_JSON).unwrap();

        let err = GbdtModels::from_parts(classifier.ensemble, regressor, 0.5).unwrap_err();
        assert!(matches!(err, ModelError::Invalid(_)));
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        let regressor: Ensemble = serde_json::from_str(REGRESSOR_JSON).unwrap();
        let classifier: super::super::ClassifierArtifact =
            serde_json::from_str(CLASSIFIER_JSON).unwrap();

        assert!(GbdtModels::from_parts(regressor, classifier.ensemble, 1.5).is_err());
    }

    #[test]
    fn test_feature_order_mismatch_rejected() {
        let regressor = write_temp(&REGRESSOR_JSON.replace(
            r#"["year", "price", "horsepower""#,
            r#"["price", "year", "horsepower""#,
        ));
        let classifier = write_temp(CLASSIFIER_JSON);

        let err = GbdtModels::load(regressor.path(), classifier.path(), 0.5).unwrap_err();
        assert!(matches!(err, ModelError::Gbdt(_)));
    }
}
