//! Tree ensembles with named features and categorical encodings

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::tree::{Node, Tree};
use super::GbdtError;

/// Output transform applied to the summed margin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Objective {
    #[serde(rename = "reg:squarederror")]
    Regression,
    #[serde(rename = "binary:logistic")]
    BinaryLogistic,
}

/// One input cell, before categorical encoding
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureValue<'a> {
    Num(f64),
    Cat(&'a str),
}

#[derive(Debug, Deserialize)]
struct TreeNodes {
    nodes: Vec<Node>,
}

#[derive(Debug, Deserialize)]
struct RawEnsemble {
    objective: Objective,
    #[serde(default)]
    base_score: f64,
    feature_names: Vec<String>,
    #[serde(default)]
    categories: HashMap<String, HashMap<String, f64>>,
    trees: Vec<TreeNodes>,
}

/// A validated tree ensemble
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawEnsemble")]
pub struct Ensemble {
    objective: Objective,
    base_score: f64,
    feature_names: Vec<String>,
    /// Per-feature category table, `None` for numeric features
    encodings: Vec<Option<HashMap<String, f64>>>,
    trees: Vec<Tree>,
}

impl TryFrom<RawEnsemble> for Ensemble {
    type Error = GbdtError;

    fn try_from(raw: RawEnsemble) -> Result<Self, Self::Error> {
        let trees = raw
            .trees
            .into_iter()
            .enumerate()
            .map(|(i, t)| {
                Tree::new(t.nodes).map_err(|e| match e {
                    GbdtError::InvalidTree { reason, .. } => GbdtError::InvalidTree { tree: i, reason },
                    other => other,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ensemble::new(raw.objective, raw.base_score, raw.feature_names, raw.categories, trees)
    }
}

impl Ensemble {
    pub fn new(
        objective: Objective,
        base_score: f64,
        feature_names: Vec<String>,
        mut categories: HashMap<String, HashMap<String, f64>>,
        trees: Vec<Tree>,
    ) -> Result<Self, GbdtError> {
        if trees.is_empty() {
            return Err(GbdtError::InvalidEnsemble("no trees".to_string()));
        }
        if !base_score.is_finite() {
            return Err(GbdtError::InvalidEnsemble("base_score is not finite".to_string()));
        }

        for (i, name) in feature_names.iter().enumerate() {
            if feature_names[..i].contains(name) {
                return Err(GbdtError::InvalidEnsemble(format!("duplicate feature '{}'", name)));
            }
        }

        if let Some(unknown) = categories.keys().find(|k| !feature_names.contains(*k)) {
            return Err(GbdtError::InvalidEnsemble(format!(
                "categories given for unknown feature '{}'",
                unknown
            )));
        }

        for (i, tree) in trees.iter().enumerate() {
            if let Some(max) = tree.max_feature() {
                if max >= feature_names.len() {
                    return Err(GbdtError::InvalidTree {
                        tree: i,
                        reason: format!(
                            "splits on feature {} but only {} features are declared",
                            max,
                            feature_names.len()
                        ),
                    });
                }
            }
        }

        let encodings = feature_names
            .iter()
            .map(|name| categories.remove(name))
            .collect();

        Ok(Self {
            objective,
            base_score,
            feature_names,
            encodings,
            trees,
        })
    }

    pub fn objective(&self) -> Objective {
        self.objective
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    #[cfg(test)]
    pub(crate) fn is_categorical(&self, index: usize) -> bool {
        matches!(self.encodings.get(index), Some(Some(_)))
    }

    /// Fail unless the declared features are exactly `expected`, in order
    pub fn require_features(&self, expected: &[&str]) -> Result<(), GbdtError> {
        let matches = self.feature_names.len() == expected.len()
            && self.feature_names.iter().zip(expected).all(|(a, b)| a == b);

        if matches {
            Ok(())
        } else {
            Err(GbdtError::FeatureMismatch(format!(
                "model expects {:?}, service provides {:?}",
                self.feature_names, expected
            )))
        }
    }

    /// Turn a row into the numeric vector the trees split on
    ///
    /// Unknown categories become NaN and follow each split's default direction.
    pub fn encode(&self, row: &[FeatureValue<'_>]) -> Result<Vec<f64>, GbdtError> {
        if row.len() != self.feature_names.len() {
            return Err(GbdtError::FeatureMismatch(format!(
                "expected {} features, got {}",
                self.feature_names.len(),
                row.len()
            )));
        }

        row.iter()
            .zip(&self.encodings)
            .zip(&self.feature_names)
            .map(|((value, encoding), name)| match (value, encoding) {
                (FeatureValue::Num(x), None) => Ok(*x),
                (FeatureValue::Cat(s), Some(table)) => {
                    Ok(table.get(*s).copied().unwrap_or(f64::NAN))
                }
                (FeatureValue::Num(_), Some(_)) => Err(GbdtError::FeatureMismatch(format!(
                    "feature '{}' is categorical but got a number",
                    name
                ))),
                (FeatureValue::Cat(_), None) => Err(GbdtError::FeatureMismatch(format!(
                    "feature '{}' is numeric but got a category",
                    name
                ))),
            })
            .collect()
    }

    /// Raw additive score: base score plus every tree's leaf
    pub fn predict_margin(&self, row: &[FeatureValue<'_>]) -> Result<f64, GbdtError> {
        let features = self.encode(row)?;
        let margin = self.base_score
            + self.trees.iter().map(|t| t.predict(&features)).sum::<f64>();
        Ok(margin)
    }

    /// Margin passed through the objective's output transform
    pub fn predict(&self, row: &[FeatureValue<'_>]) -> Result<f64, GbdtError> {
        let margin = self.predict_margin(row)?;
        let output = match self.objective {
            Objective::Regression => margin,
            Objective::BinaryLogistic => sigmoid(margin),
        };

        if output.is_finite() {
            Ok(output)
        } else {
            Err(GbdtError::NonFinite(output))
        }
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
