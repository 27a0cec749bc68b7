//! Random forest inference
//!
//! Inference-only. Each tree is stored as the flattened node arrays a fitted
//! scikit-learn estimator exposes (`tree_.children_left`, `tree_.feature`, ...).
//!
//! - internal node: go left when `x[feature] <= threshold`
//! - leaf (`children_left == -1`): `value` holds per-class weights
//!
//! Forest probability is the mean of the per-tree normalized leaf weights.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::engine::Classifier;
use super::{read_artifact, ModelError};

const LEAF: i64 = -1;

/// One fitted decision tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<Vec<f64>>,
}

/// Fitted random forest classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    pub classes: Vec<String>,
    pub n_features: usize,
    pub trees: Vec<DecisionTree>,
}

impl DecisionTree {
    fn validate(&self, index: usize, n_features: usize, n_classes: usize) -> Result<(), ModelError> {
        let n_nodes = self.children_left.len();
        let invalid = |msg: String| ModelError::InvalidArtifact(format!("tree {}: {}", index, msg));

        if n_nodes == 0 {
            return Err(invalid("no nodes".to_string()));
        }
        if self.children_right.len() != n_nodes
            || self.feature.len() != n_nodes
            || self.threshold.len() != n_nodes
            || self.value.len() != n_nodes
        {
            return Err(invalid("node arrays differ in length".to_string()));
        }

        for node in 0..n_nodes {
            if self.value[node].len() != n_classes {
                return Err(invalid(format!(
                    "node {} has {} class weights, expected {}",
                    node,
                    self.value[node].len(),
                    n_classes
                )));
            }

            let (left, right) = (self.children_left[node], self.children_right[node]);
            if left == LEAF {
                continue;
            }

            // Children must come after their parent, so every walk terminates
            for child in [left, right] {
                if child <= node as i64 || child >= n_nodes as i64 {
                    return Err(invalid(format!("node {} has out-of-range child {}", node, child)));
                }
            }

            let feature = self.feature[node];
            if feature < 0 || feature as usize >= n_features {
                return Err(invalid(format!("node {} splits on unknown feature {}", node, feature)));
            }
        }

        Ok(())
    }

    /// Class weights of the leaf `row` lands in, normalized to sum 1
    fn leaf_distribution(&self, row: &[f64]) -> Vec<f64> {
        let mut node = 0usize;
        while self.children_left[node] != LEAF {
            let feature = self.feature[node] as usize;
            node = if row[feature] <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }

        let weights = &self.value[node];
        let total: f64 = weights.iter().sum();
        if total > 0.0 {
            weights.iter().map(|w| w / total).collect()
        } else {
            vec![0.0; weights.len()]
        }
    }
}

impl RandomForest {
    pub fn new(classes: Vec<String>, n_features: usize, trees: Vec<DecisionTree>) -> Result<Self, ModelError> {
        let forest = Self { classes, n_features, trees };
        forest.validate()?;
        Ok(forest)
    }

    /// Load a forest exported as JSON
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let (forest, fingerprint): (Self, String) = read_artifact(path)?;
        forest.validate()?;

        tracing::info!(
            path = %path.display(),
            trees = forest.trees.len(),
            features = forest.n_features,
            classes = ?forest.classes,
            sha256 = %fingerprint,
            "Random forest loaded"
        );
        Ok(forest)
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.classes.is_empty() {
            return Err(ModelError::InvalidArtifact("forest has no classes".to_string()));
        }
        if self.n_features == 0 {
            return Err(ModelError::InvalidArtifact("forest has no features".to_string()));
        }
        if self.trees.is_empty() {
            return Err(ModelError::InvalidArtifact("forest has no trees".to_string()));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(i, self.n_features, self.classes.len())?;
        }
        Ok(())
    }
}

impl Classifier for RandomForest {
    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_proba(&self, row: &[f64]) -> Result<Vec<f64>, ModelError> {
        if row.len() != self.n_features {
            return Err(ModelError::DimensionMismatch {
                component: "RandomForestClassifier",
                expected: self.n_features,
                actual: row.len(),
            });
        }

        let mut proba = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            for (acc, p) in proba.iter_mut().zip(tree.leaf_distribution(row)) {
                *acc += p;
            }
        }

        let n_trees = self.trees.len() as f64;
        proba.iter_mut().for_each(|p| *p /= n_trees);
        Ok(proba)
    }
}
