//! Native Tree-Ensemble Model
//!
//! Evaluates decision trees and random forests exported as JSON, no runtime
//! dependency needed. Split semantics follow the usual CART convention:
//! `x[feature] <= threshold` goes left.
//!
//! ```json
//! {
//!   "format_version": 1,
//!   "model_type": "random_forest",
//!   "feature_names": ["Transaction_Amount", "..."],
//!   "output": { "type": "probability" },
//!   "trees": [ { "nodes": [
//!     { "feature": 0, "threshold": 500.0, "left": 1, "right": 2 },
//!     { "value": [90.0, 10.0] },
//!     { "value": [20.0, 80.0] }
//!   ] } ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::logic::error::ScoringError;
use crate::logic::features::{TransactionFeatures, FEATURE_COUNT};
use super::contract::{ArtifactKind, ClassLabel, ModelInfo, OutputContract, ScoringModel};

/// Artifact format versions this build can evaluate
pub const SUPPORTED_FORMAT_VERSION: u32 = 1;

// ============================================================================
// ARTIFACT SCHEMA
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeModelType {
    DecisionTree,
    RandomForest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Per-class weights `[class 0, class 1]`
    Leaf { value: Vec<f64> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEnsembleArtifact {
    pub format_version: u32,
    pub model_type: TreeModelType,
    #[serde(default)]
    pub name: Option<String>,
    pub feature_names: Vec<String>,
    #[serde(default)]
    pub output: OutputContract,
    pub trees: Vec<Tree>,
}

impl TreeEnsembleArtifact {
    /// Structural checks; returns a description of the first problem found
    pub fn check(&self) -> Result<(), String> {
        if self.format_version != SUPPORTED_FORMAT_VERSION {
            return Err(format!(
                "unsupported format_version {} (supported: {})",
                self.format_version, SUPPORTED_FORMAT_VERSION
            ));
        }

        if self.feature_names.len() != FEATURE_COUNT {
            return Err(format!(
                "model declares {} features, expected {}",
                self.feature_names.len(), FEATURE_COUNT
            ));
        }

        if self.trees.is_empty() {
            return Err("ensemble has no trees".to_string());
        }

        if self.model_type == TreeModelType::DecisionTree && self.trees.len() != 1 {
            return Err(format!("decision_tree must contain exactly 1 tree, found {}", self.trees.len()));
        }

        for (t, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(format!("tree {} has no nodes", t));
            }

            for (n, node) in tree.nodes.iter().enumerate() {
                match node {
                    TreeNode::Split { feature, threshold, left, right } => {
                        if *feature >= self.feature_names.len() {
                            return Err(format!("tree {} node {}: feature index {} out of range", t, n, feature));
                        }
                        if !threshold.is_finite() {
                            return Err(format!("tree {} node {}: threshold is not finite", t, n));
                        }
                        // Children after parent keeps traversal acyclic
                        for child in [*left, *right] {
                            if child <= n || child >= tree.nodes.len() {
                                return Err(format!("tree {} node {}: child index {} out of range", t, n, child));
                            }
                        }
                    }
                    TreeNode::Leaf { value } => {
                        if value.len() != 2 {
                            return Err(format!("tree {} node {}: leaf must hold 2 class weights, found {}", t, n, value.len()));
                        }
                        let total: f64 = value.iter().sum();
                        if value.iter().any(|w| !w.is_finite() || *w < 0.0) || !total.is_finite() || total <= 0.0 {
                            return Err(format!("tree {} node {}: leaf weights must be non-negative with a finite positive sum", t, n));
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

// ============================================================================
// MODEL
// ============================================================================

#[derive(Debug, Clone)]
pub struct TreeEnsembleModel {
    info: ModelInfo,
    model_type: TreeModelType,
    trees: Vec<Tree>,
}

impl TreeEnsembleModel {
    /// Validate an artifact and wrap it as a model
    pub fn from_artifact(
        artifact: TreeEnsembleArtifact,
        source: &str,
        sha256: String,
    ) -> Result<Self, ScoringError> {
        artifact.check().map_err(|msg| ScoringError::incompatible(source, msg))?;

        let name = artifact.name.clone().unwrap_or_else(|| match artifact.model_type {
            TreeModelType::DecisionTree => "decision_tree".to_string(),
            TreeModelType::RandomForest => format!("random_forest[{}]", artifact.trees.len()),
        });

        Ok(Self {
            info: ModelInfo {
                name,
                source: source.to_string(),
                kind: ArtifactKind::TreeEnsemble,
                feature_names: artifact.feature_names,
                output: artifact.output,
                sha256,
                loaded_at: chrono::Utc::now(),
            },
            model_type: artifact.model_type,
            trees: artifact.trees,
        })
    }

    /// Parse and validate from JSON bytes
    pub fn from_json_slice(bytes: &[u8], source: &str, sha256: String) -> Result<Self, ScoringError> {
        let artifact: TreeEnsembleArtifact = serde_json::from_slice(bytes)
            .map_err(|e| ScoringError::incompatible(source, format!("invalid tree-ensemble artifact: {}", e)))?;
        Self::from_artifact(artifact, source, sha256)
    }

    pub fn model_type(&self) -> TreeModelType {
        self.model_type
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    /// Mean normalized class weights over all trees
    fn class_distribution(&self, features: &TransactionFeatures) -> [f64; 2] {
        let row = features.as_array();
        let mut total = [0.0f64; 2];

        for tree in &self.trees {
            let leaf = leaf_for(tree, row);
            let sum = leaf[0] + leaf[1];
            total[0] += leaf[0] / sum;
            total[1] += leaf[1] / sum;
        }

        let n = self.trees.len() as f64;
        [total[0] / n, total[1] / n]
    }
}

/// Walk one tree to its leaf
///
/// Indices were checked at load, so every step moves strictly forward.
fn leaf_for<'a>(tree: &'a Tree, row: &[f64; FEATURE_COUNT]) -> &'a [f64] {
    let mut index = 0;
    loop {
        match &tree.nodes[index] {
            TreeNode::Split { feature, threshold, left, right } => {
                index = if row[*feature] <= *threshold { *left } else { *right };
            }
            TreeNode::Leaf { value } => return value,
        }
    }
}

impl ScoringModel for TreeEnsembleModel {
    fn info(&self) -> &ModelInfo {
        &self.info
    }

    fn predict(&self, features: &TransactionFeatures) -> Result<ClassLabel, ScoringError> {
        let dist = self.class_distribution(features);
        Ok(if dist[1] > dist[0] { 1 } else { 0 })
    }

    fn predict_proba(&self, features: &TransactionFeatures) -> Option<Result<f64, ScoringError>> {
        Some(Ok(self.class_distribution(features)[1]))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::FEATURE_LAYOUT;

    fn names() -> Vec<String> {
        FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect()
    }

    fn stump(feature: usize, threshold: f64, left: [f64; 2], right: [f64; 2]) -> Tree {
        Tree {
            nodes: vec![
                TreeNode::Split { feature, threshold, left: 1, right: 2 },
                TreeNode::Leaf { value: left.to_vec() },
                TreeNode::Leaf { value: right.to_vec() },
            ],
        }
    }

    fn artifact(model_type: TreeModelType, trees: Vec<Tree>) -> TreeEnsembleArtifact {
        TreeEnsembleArtifact {
            format_version: SUPPORTED_FORMAT_VERSION,
            model_type,
            name: None,
            feature_names: names(),
            output: OutputContract::Probability,
            trees,
        }
    }

    #[test]
    fn test_split_routes_left_on_equal() {
        let model = TreeEnsembleModel::from_artifact(
            artifact(TreeModelType::DecisionTree, vec![stump(0, 500.0, [9.0, 1.0], [1.0, 3.0])]),
            "test",
            String::new(),
        ).unwrap();

        let at = TransactionFeatures::build(500.0, 0.0, 1.0, 0.0, 0.0);
        let above = TransactionFeatures::build(500.5, 0.0, 1.0, 0.0, 0.0);

        assert!((model.predict_proba(&at).unwrap().unwrap() - 0.1).abs() < 1e-12);
        assert!((model.predict_proba(&above).unwrap().unwrap() - 0.75).abs() < 1e-12);
        assert_eq!(model.predict(&at).unwrap(), 0);
        assert_eq!(model.predict(&above).unwrap(), 1);
    }

    #[test]
    fn test_forest_averages_normalized_leaves() {
        let model = TreeEnsembleModel::from_artifact(
            artifact(TreeModelType::RandomForest, vec![
                stump(3, 0.5, [1.0, 0.0], [0.0, 4.0]),
                stump(4, 10.0, [3.0, 1.0], [1.0, 1.0]),
            ]),
            "test",
            String::new(),
        ).unwrap();

        // Tree 1 -> 1.0, tree 2 -> 0.25
        let f = TransactionFeatures::build(1.0, 0.0, 1.0, 0.9, 5.0);
        let p = model.predict_proba(&f).unwrap().unwrap();
        assert!((p - 0.625).abs() < 1e-12);
        assert_eq!(model.predict(&f).unwrap(), 1);
        assert_eq!(model.tree_count(), 2);
        assert_eq!(model.info().name, "random_forest[2]");
    }

    #[test]
    fn test_tie_predicts_class_zero() {
        let model = TreeEnsembleModel::from_artifact(
            artifact(TreeModelType::DecisionTree, vec![Tree { nodes: vec![TreeNode::Leaf { value: vec![2.0, 2.0] }] }]),
            "test",
            String::new(),
        ).unwrap();

        let f = TransactionFeatures::build(1.0, 0.0, 1.0, 0.5, 0.0);
        assert_eq!(model.predict(&f).unwrap(), 0);
    }

    #[test]
    fn test_rejects_bad_structure() {
        let cases = vec![
            TreeEnsembleArtifact { format_version: 2, ..artifact(TreeModelType::DecisionTree, vec![stump(0, 1.0, [1.0, 0.0], [0.0, 1.0])]) },
            TreeEnsembleArtifact { feature_names: names()[..4].to_vec(), ..artifact(TreeModelType::DecisionTree, vec![stump(0, 1.0, [1.0, 0.0], [0.0, 1.0])]) },
            artifact(TreeModelType::RandomForest, vec![]),
            artifact(TreeModelType::DecisionTree, vec![stump(0, 1.0, [1.0, 0.0], [0.0, 1.0]), stump(0, 1.0, [1.0, 0.0], [0.0, 1.0])]),
            artifact(TreeModelType::DecisionTree, vec![stump(7, 1.0, [1.0, 0.0], [0.0, 1.0])]),
            artifact(TreeModelType::DecisionTree, vec![Tree { nodes: vec![TreeNode::Split { feature: 0, threshold: 1.0, left: 0, right: 5 }] }]),
            artifact(TreeModelType::DecisionTree, vec![Tree { nodes: vec![TreeNode::Leaf { value: vec![1.0, 0.0, 0.0] }] }]),
            artifact(TreeModelType::DecisionTree, vec![Tree { nodes: vec![TreeNode::Leaf { value: vec![0.0, 0.0] }] }]),
        ];

        for case in cases {
            let err = TreeEnsembleModel::from_artifact(case, "bad.json", String::new()).unwrap_err();
            assert_eq!(err.kind(), crate::logic::error::ErrorKind::IncompatibleModel, "{}", err);
        }
    }

    #[test]
    fn test_rejects_leaf_weights_overflowing_sum() {
        // Each weight is finite, their sum is not
        let overflow = artifact(TreeModelType::DecisionTree, vec![Tree {
            nodes: vec![TreeNode::Leaf { value: vec![1e308, 1e308] }],
        }]);

        let err = TreeEnsembleModel::from_artifact(overflow, "overflow.json", String::new()).unwrap_err();
        assert_eq!(err.kind(), crate::logic::error::ErrorKind::IncompatibleModel);
        assert!(err.to_string().contains("finite positive sum"));
    }

    #[test]
    fn test_parse_json_artifact() {
        let json = r#"{
            "format_version": 1,
            "model_type": "decision_tree",
            "feature_names": ["Transaction_Amount","Transaction_Time","Account_Age_Days","Merchant_Risk_Score","Transaction_Velocity"],
            "output": {"type": "label", "legitimate_label": 1},
            "trees": [{"nodes": [
                {"feature": 3, "threshold": 0.7, "left": 1, "right": 2},
                {"value": [0.0, 5.0]},
                {"value": [5.0, 0.0]}
            ]}]
        }"#;

        let model = TreeEnsembleModel::from_json_slice(json.as_bytes(), "dt.json", String::new()).unwrap();
        assert_eq!(model.info().output, OutputContract::Label { legitimate_label: 1 });
        assert_eq!(model.model_type(), TreeModelType::DecisionTree);

        let safe = TransactionFeatures::build(10.0, 0.0, 30.0, 0.2, 1.0);
        assert_eq!(model.predict(&safe).unwrap(), 1);
    }

    #[test]
    fn test_garbage_json_is_incompatible() {
        let err = TreeEnsembleModel::from_json_slice(b"\x80\x04\x95 not json", "rf.pkl", String::new()).unwrap_err();
        assert_eq!(err.kind(), crate::logic::error::ErrorKind::IncompatibleModel);
    }
}
