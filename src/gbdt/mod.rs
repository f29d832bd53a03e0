//! Gradient Boosted Decision Tree evaluator
//!
//! Evaluates tree ensembles exported from the training pipeline as JSON.
//! Only inference lives here: no fitting, no pruning.
//!
//! # Model Format
//!
//! ```json
//! {
//!   "objective": "binary:logistic",
//!   "base_score": 0.0,
//!   "feature_names": ["smart_ratio", "age"],
//!   "categories": {},
//!   "trees": [
//!     {
//!       "nodes": [
//!         {"feature": 0, "threshold": 0.7, "left": 1, "right": 2, "default_left": true},
//!         {"leaf": 1.5},
//!         {"leaf": -2.0}
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! # Routing
//!
//! - Node 0 is the root; children always have a larger index than their parent
//! - `value < threshold` goes left, anything else goes right
//! - Missing values (NaN, unknown categories) follow `default_left`
//! - The margin is `base_score` plus the sum of the reached leaves
//! - `binary:logistic` ensembles report `sigmoid(margin)`

pub mod ensemble;
pub mod tree;

pub use ensemble::{Ensemble, FeatureValue, Objective};
pub use tree::{Node, Tree};

/// Errors raised while building or evaluating an ensemble
#[derive(Debug, thiserror::Error)]
pub enum GbdtError {
    #[error("tree {tree}: {reason}")]
    InvalidTree { tree: usize, reason: String },

    #[error("invalid ensemble: {0}")]
    InvalidEnsemble(String),

    #[error("feature mismatch: {0}")]
    FeatureMismatch(String),

    #[error("model produced a non-finite value ({0})")]
    NonFinite(f64),
}
