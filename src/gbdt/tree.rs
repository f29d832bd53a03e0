//! Decision tree nodes and traversal

use serde::{Deserialize, Serialize};

use super::GbdtError;

fn default_left() -> bool {
    true
}

/// A single tree node, addressed by its index in [`Tree::nodes`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Leaf {
        leaf: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        #[serde(default = "default_left")]
        default_left: bool,
    },
}

impl Node {
    pub fn leaf(value: f64) -> Self {
        Node::Leaf { leaf: value }
    }

    pub fn split(feature: usize, threshold: f64, left: usize, right: usize) -> Self {
        Node::Split {
            feature,
            threshold,
            left,
            right,
            default_left: true,
        }
    }

    /// Same split, but missing values go right
    #[cfg(test)]
    pub(crate) fn split_missing_right(feature: usize, threshold: f64, left: usize, right: usize) -> Self {
        Node::Split {
            feature,
            threshold,
            left,
            right,
            default_left: false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawTree {
    nodes: Vec<Node>,
}

/// A validated regression tree
///
/// Construction guarantees a non-empty node list whose children always
/// point forward, so traversal always terminates on a leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTree")]
pub struct Tree {
    nodes: Vec<Node>,
}

impl TryFrom<RawTree> for Tree {
    type Error = GbdtError;

    fn try_from(raw: RawTree) -> Result<Self, Self::Error> {
        Tree::new(raw.nodes)
    }
}

impl Tree {
    pub fn new(nodes: Vec<Node>) -> Result<Self, GbdtError> {
        let invalid = |reason: String| GbdtError::InvalidTree { tree: 0, reason };

        if nodes.is_empty() {
            return Err(invalid("tree has no nodes".to_string()));
        }

        for (idx, node) in nodes.iter().enumerate() {
            match node {
                Node::Leaf { leaf } => {
                    if !leaf.is_finite() {
                        return Err(invalid(format!("node {} has a non-finite leaf", idx)));
                    }
                }
                Node::Split { threshold, left, right, .. } => {
                    if threshold.is_nan() {
                        return Err(invalid(format!("node {} has a NaN threshold", idx)));
                    }
                    for child in [*left, *right] {
                        if child <= idx || child >= nodes.len() {
                            return Err(invalid(format!(
                                "node {} points to invalid child {}",
                                idx, child
                            )));
                        }
                    }
                }
            }
        }

        Ok(Self { nodes })
    }

    #[cfg(test)]
    pub(crate) fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Highest feature index referenced by a split, if any
    pub fn max_feature(&self) -> Option<usize> {
        self.nodes
            .iter()
            .filter_map(|n| match n {
                Node::Split { feature, .. } => Some(*feature),
                Node::Leaf { .. } => None,
            })
            .max()
    }

    /// Walk from the root to a leaf and return its value
    ///
    /// Features beyond the end of the slice are treated as missing.
    pub fn predict(&self, features: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { leaf } => return *leaf,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    default_left,
                } => {
                    let value = features.get(*feature).copied().unwrap_or(f64::NAN);
                    idx = if value.is_nan() {
                        if *default_left { *left } else { *right }
                    } else if value < *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}
