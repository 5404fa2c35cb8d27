//! Regression-tree ensembles stored as flat node arrays.
//!
//! Each tree is a `Vec` of nodes with the root at index 0. A split sends a row
//! to `left` when `row[feature] <= threshold`, otherwise to `right`. Children
//! always sit at a higher index than their parent, which is what a depth-first
//! export produces and what rules out cycles.

use crate::domain::model::{FeatureVector, FEATURE_COUNT};
use crate::domain::ports::PricingModel;
use crate::utils::error::{PricingError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Gradient boosting: leaf values are added.
    #[default]
    Sum,
    /// Bagged forests: leaf values are averaged.
    Mean,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        gain: Option<f64>,
    },
    Leaf {
        value: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

impl RegressionTree {
    fn check_structure(&self) -> std::result::Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split { left, right, .. } = node {
                for child in [*left, *right] {
                    if child <= idx || child >= self.nodes.len() {
                        return Err(format!(
                            "node {} points to child {} (tree has {} nodes)",
                            idx,
                            child,
                            self.nodes.len()
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    fn evaluate(&self, row: &[f64; FEATURE_COUNT]) -> Result<f64> {
        let mut idx = 0;
        // A path visits each node at most once; more steps means a cycle.
        for _ in 0..self.nodes.len() {
            let node = self.nodes.get(idx).ok_or_else(|| {
                PricingError::invocation(format!(
                    "tree references node {} but has {} nodes",
                    idx,
                    self.nodes.len()
                ))
            })?;
            match node {
                TreeNode::Leaf { value } => return Ok(*value),
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    let x = row.get(*feature).ok_or_else(|| {
                        PricingError::invocation(format!(
                            "tree splits on feature index {} but rows have {} features",
                            feature, FEATURE_COUNT
                        ))
                    })?;
                    idx = if *x <= *threshold { *left } else { *right };
                }
            }
        }
        Err(PricingError::invocation(format!(
            "tree has no reachable leaf within {} nodes",
            self.nodes.len()
        )))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsemble {
    #[serde(default)]
    pub base_score: f64,
    #[serde(default)]
    pub aggregation: Aggregation,
    pub trees: Vec<RegressionTree>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_importances: Option<Vec<f64>>,
}

impl TreeEnsemble {
    /// Structural checks run once when the artifact is loaded. `evaluate`
    /// still reports bad indices on ensembles built in code.
    pub fn check_structure(&self) -> std::result::Result<(), String> {
        if self.trees.is_empty() {
            return Err("ensemble has no trees".to_string());
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.check_structure()
                .map_err(|reason| format!("tree {}: {}", i, reason))?;
        }
        Ok(())
    }

    fn predict_row(&self, row: &FeatureVector) -> Result<f64> {
        let values = row.to_row();
        let mut total = 0.0;
        for tree in &self.trees {
            total += tree.evaluate(&values)?;
        }
        let combined = match self.aggregation {
            Aggregation::Sum => total,
            Aggregation::Mean => total / self.trees.len() as f64,
        };
        Ok(self.base_score + combined)
    }

    /// Total split gain per feature, normalised to sum to 1.
    fn gain_importances(&self) -> Option<Vec<f64>> {
        let mut totals = vec![0.0; FEATURE_COUNT];
        let mut seen_gain = false;

        for node in self.trees.iter().flat_map(|t| &t.nodes) {
            if let TreeNode::Split {
                feature,
                gain: Some(gain),
                ..
            } = node
            {
                let slot = totals.get_mut(*feature)?;
                *slot += gain.max(0.0);
                seen_gain = true;
            }
        }

        let sum: f64 = totals.iter().sum();
        if !seen_gain || sum <= 0.0 {
            return None;
        }
        Some(totals.into_iter().map(|g| g / sum).collect())
    }
}

impl PricingModel for TreeEnsemble {
    fn predict(&self, batch: &[FeatureVector]) -> Result<Vec<f64>> {
        batch.iter().map(|row| self.predict_row(row)).collect()
    }

    fn feature_importances(&self) -> Option<Vec<f64>> {
        self.feature_importances
            .clone()
            .or_else(|| self.gain_importances())
    }

    fn kind(&self) -> &str {
        "tree_ensemble"
    }
}
