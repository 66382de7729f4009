//! Scoring primitives stored inside a model artifact
//!
//! Every predictor is immutable after deserialization and scores rows without
//! interior state, so one instance can serve concurrent requests.

use serde::{Deserialize, Serialize};

use super::error::ModelError;

/// Learned scoring function
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Predictor {
    Linear(LinearModel),
    TreeEnsemble(TreeEnsemble),
}

impl Predictor {
    /// Check internal consistency once, right after loading
    pub fn validate(&self) -> Result<(), ModelError> {
        match self {
            Predictor::Linear(model) => {
                if model.weights.is_empty() {
                    return Err(ModelError::InvalidModel(
                        "linear model has no weights".to_string(),
                    ));
                }
                Ok(())
            }
            Predictor::TreeEnsemble(ensemble) => ensemble.validate(),
        }
    }

    /// Number of input features the predictor reads
    pub fn arity(&self) -> Arity {
        match self {
            Predictor::Linear(model) => Arity::Exact(model.weights.len()),
            Predictor::TreeEnsemble(ensemble) => Arity::AtLeast(ensemble.min_features()),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Predictor::Linear(_) => "linear",
            Predictor::TreeEnsemble(_) => "tree_ensemble",
        }
    }

    /// Score a single row. The caller guarantees the row width matches `arity`.
    pub fn score(&self, row: &[f64]) -> f64 {
        match self {
            Predictor::Linear(model) => model.score(row),
            Predictor::TreeEnsemble(ensemble) => ensemble.score(row),
        }
    }
}

/// Feature-count requirement of a predictor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(&self, width: usize) -> bool {
        match *self {
            Arity::Exact(n) => width == n,
            Arity::AtLeast(n) => width >= n,
        }
    }

    pub fn minimum(&self) -> usize {
        match *self {
            Arity::Exact(n) | Arity::AtLeast(n) => n,
        }
    }
}

/// `bias + weights · x`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    pub weights: Vec<f64>,
    #[serde(default)]
    pub bias: f64,
}

impl LinearModel {
    fn score(&self, row: &[f64]) -> f64 {
        self.bias
            + self
                .weights
                .iter()
                .zip(row)
                .map(|(w, x)| w * x)
                .sum::<f64>()
    }
}

/// Sum of regression trees (LightGBM-style dump)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEnsemble {
    #[serde(default)]
    pub base_score: f64,
    pub trees: Vec<Tree>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        split_feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        /// Branch taken for NaN inputs
        #[serde(default)]
        default_left: bool,
    },
    Leaf {
        leaf_value: f64,
    },
}

impl TreeEnsemble {
    fn validate(&self) -> Result<(), ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::InvalidModel(
                "tree ensemble has no trees".to_string(),
            ));
        }
        for (t, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(ModelError::InvalidModel(format!("tree {t} has no nodes")));
            }
            for (i, node) in tree.nodes.iter().enumerate() {
                if let TreeNode::Split { left, right, .. } = *node {
                    // Children always point forward, so traversal terminates.
                    for child in [left, right] {
                        if child <= i || child >= tree.nodes.len() {
                            return Err(ModelError::InvalidModel(format!(
                                "tree {t} node {i} has invalid child {child}"
                            )));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn min_features(&self) -> usize {
        self.trees
            .iter()
            .flat_map(|tree| tree.nodes.iter())
            .filter_map(|node| match node {
                TreeNode::Split { split_feature, .. } => Some(split_feature + 1),
                TreeNode::Leaf { .. } => None,
            })
            .max()
            .unwrap_or(0)
    }

    fn score(&self, row: &[f64]) -> f64 {
        self.base_score + self.trees.iter().map(|tree| tree.score(row)).sum::<f64>()
    }
}

impl Tree {
    fn score(&self, row: &[f64]) -> f64 {
        let mut index = 0;
        loop {
            match self.nodes[index] {
                TreeNode::Leaf { leaf_value } => return leaf_value,
                TreeNode::Split {
                    split_feature,
                    threshold,
                    left,
                    right,
                    default_left,
                } => {
                    let x = row[split_feature];
                    let go_left = if x.is_nan() {
                        default_left
                    } else {
                        x <= threshold
                    };
                    index = if go_left { left } else { right };
                }
            }
        }
    }
}

/// Standard scaler: `(x - mean) / scale`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl Scaler {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.mean.len() != self.scale.len() {
            return Err(ModelError::InvalidModel(format!(
                "scaler mean has {} entries but scale has {}",
                self.mean.len(),
                self.scale.len()
            )));
        }
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.mean.len()
    }

    /// Scale a row into a new buffer; the input is left untouched
    pub fn transform(&self, row: &[f64]) -> Result<Vec<f64>, ModelError> {
        if row.len() != self.mean.len() {
            return Err(ModelError::FeatureShapeMismatch {
                expected: self.mean.len(),
                actual: row.len(),
            });
        }
        Ok(row
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| {
                let scale = if *scale == 0.0 { 1.0 } else { *scale };
                (x - mean) / scale
            })
            .collect())
    }
}
