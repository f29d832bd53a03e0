//! Artifact loading from disk

use std::fs;
use std::path::Path;

use serde::Deserialize;
use sha2::{Digest, Sha256};

use super::ModelError;
use crate::gbdt::Ensemble;

/// On-disk layout of the classifier: the ensemble plus the decision
/// threshold chosen during training
#[derive(Debug, Deserialize)]
pub struct ClassifierArtifact {
    #[serde(default)]
    pub threshold: Option<f64>,
    pub ensemble: Ensemble,
}

pub(crate) fn read_artifact(path: &Path) -> Result<Vec<u8>, ModelError> {
    fs::read(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn parse_regressor(path: &Path, bytes: &[u8]) -> Result<Ensemble, ModelError> {
    serde_json::from_slice(bytes).map_err(|source| ModelError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn parse_classifier(path: &Path, bytes: &[u8]) -> Result<ClassifierArtifact, ModelError> {
    serde_json::from_slice(bytes).map_err(|source| ModelError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// SHA-256 over the concatenated artifact bytes, hex encoded
pub fn fingerprint(parts: &[&[u8]]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_stable() {
        let a = fingerprint(&[b"regressor", b"classifier"]);
        let b = fingerprint(&[b"regressor", b"classifier"]);
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, fingerprint(&[b"regressor", b"classifier2"]));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = read_artifact(Path::new("/nonexistent/model.json")).unwrap_err();
        assert!(matches!(err, ModelError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/model.json"));
    }

    #[test]
    fn test_classifier_threshold_optional() {
        let json = br#"{"ensemble": {"objective": "binary:logistic", "feature_names": ["a"],
                        "trees": [{"nodes": [{"leaf": 0.0}]}]}}"#;
        let artifact = parse_classifier(Path::new("c.json"), json).unwrap();
        assert_eq!(artifact.threshold, None);
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let err = parse_regressor(Path::new("r.json"), b"not json").unwrap_err();
        assert!(matches!(err, ModelError::Parse { .. }));
    }
}
