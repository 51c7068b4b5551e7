//! Random-forest evaluation over scikit-learn's exported tree arrays.
//!
//! Each tree is the `tree_` attribute of a fitted `DecisionTreeClassifier`:
//! parallel node arrays where `children_left[i] == -1` marks a leaf, internal
//! nodes send `x[feature[i]] <= threshold[i]` left, and `value[i]` holds the
//! per-class weight at the node. Class probabilities are the mean of each
//! tree's normalized leaf distribution.

use serde::{Deserialize, Serialize};

use elicit_core::SymptomId;

use crate::classifier::DiagnosisModel;
use crate::error::EngineError;

const LEAF: i64 = -1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeArrays {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// `value[node][class]`.
    pub value: Vec<Vec<f64>>,
}

/// On-disk form of a fitted forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestArtifact {
    pub classes: Vec<String>,
    pub feature_names: Vec<SymptomId>,
    pub trees: Vec<TreeArrays>,
}

#[derive(Debug, Clone)]
pub struct RandomForestModel {
    classes: Vec<String>,
    feature_names: Vec<SymptomId>,
    trees: Vec<TreeArrays>,
}

impl RandomForestModel {
    /// Check the arrays are consistent before any prediction walks them.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ModelUnavailable`] describing the first
    /// structural problem found.
    pub fn new(artifact: ForestArtifact) -> Result<Self, EngineError> {
        let ForestArtifact {
            classes,
            feature_names,
            trees,
        } = artifact;

        if trees.is_empty() {
            return Err(invalid("forest has no trees"));
        }
        for (t, tree) in trees.iter().enumerate() {
            validate_tree(tree, feature_names.len(), classes.len())
                .map_err(|reason| invalid(format!("tree {t}: {reason}")))?;
        }

        Ok(Self {
            classes,
            feature_names,
            trees,
        })
    }

    #[must_use]
    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }
}

impl DiagnosisModel for RandomForestModel {
    fn feature_names(&self) -> &[SymptomId] {
        &self.feature_names
    }

    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn predict_proba(&self, features: &[u8]) -> Result<Vec<f64>, EngineError> {
        if features.len() != self.feature_names.len() {
            return Err(invalid(format!(
                "expected {} features, got {}",
                self.feature_names.len(),
                features.len()
            )));
        }

        let mut totals = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            let leaf = &tree.value[leaf_for(tree, features)];
            let weight: f64 = leaf.iter().sum();
            if weight > 0.0 {
                for (total, value) in totals.iter_mut().zip(leaf) {
                    *total += value / weight;
                }
            }
        }

        #[allow(clippy::cast_precision_loss)]
        let n = self.trees.len() as f64;
        Ok(totals.into_iter().map(|total| total / n).collect())
    }
}

/// Walk from the root to a leaf. Validation guarantees termination.
fn leaf_for(tree: &TreeArrays, features: &[u8]) -> usize {
    let mut node = 0_usize;
    while tree.children_left[node] != LEAF {
        let feature = usize::try_from(tree.feature[node]).unwrap_or_default();
        let x = f64::from(features[feature]);
        let next = if x <= tree.threshold[node] {
            tree.children_left[node]
        } else {
            tree.children_right[node]
        };
        node = usize::try_from(next).unwrap_or_default();
    }
    node
}

fn validate_tree(tree: &TreeArrays, n_features: usize, n_classes: usize) -> Result<(), String> {
    let n = tree.children_left.len();
    if n == 0 {
        return Err("no nodes".into());
    }
    if tree.children_right.len() != n
        || tree.feature.len() != n
        || tree.threshold.len() != n
        || tree.value.len() != n
    {
        return Err("node arrays have different lengths".into());
    }

    for node in 0..n {
        if tree.value[node].len() != n_classes {
            return Err(format!(
                "node {node} has {} class values, expected {n_classes}",
                tree.value[node].len()
            ));
        }
        let (left, right) = (tree.children_left[node], tree.children_right[node]);
        if left == LEAF {
            if right != LEAF {
                return Err(format!("node {node} has only one child"));
            }
            continue;
        }
        // Children always come after their parent in scikit-learn's layout,
        // which also rules out cycles.
        for child in [left, right] {
            let valid = usize::try_from(child).is_ok_and(|c| c > node && c < n);
            if !valid {
                return Err(format!("node {node} has invalid child {child}"));
            }
        }
        let feature_ok = usize::try_from(tree.feature[node]).is_ok_and(|f| f < n_features);
        if !feature_ok {
            return Err(format!(
                "node {node} splits on feature {} of {n_features}",
                tree.feature[node]
            ));
        }
        if !tree.threshold[node].is_finite() {
            return Err(format!("node {node} has a non-finite threshold"));
        }
    }
    Ok(())
}

fn invalid(reason: impl Into<String>) -> EngineError {
    EngineError::ModelUnavailable(reason.into())
}
