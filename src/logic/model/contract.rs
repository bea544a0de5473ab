//! Scoring Model Contract
//!
//! The capability every loaded classifier exposes to the decision engine.
//! Label semantics are declared per model, never assumed globally.

use serde::{Deserialize, Serialize};

use crate::logic::error::ScoringError;
use crate::logic::features::layout::LayoutInfo;
use crate::logic::features::TransactionFeatures;

// ============================================================================
// OUTPUT CONTRACT
// ============================================================================

/// How a model's output maps to a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputContract {
    /// `predict_proba` gives P(class 1 = fraud); compared to the threshold
    Probability,
    /// Only `predict` is consulted; `legitimate_label` means Legitimate
    Label {
        #[serde(default = "default_legitimate_label")]
        legitimate_label: ClassLabel,
    },
}

fn default_legitimate_label() -> ClassLabel {
    1
}

impl Default for OutputContract {
    fn default() -> Self {
        OutputContract::Probability
    }
}

/// Binary class label as emitted by the model (0 or 1)
pub type ClassLabel = u8;

/// Artifact format a model was loaded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    TreeEnsemble,
    Onnx,
    /// Constructed in code (stubs, tests)
    InMemory,
}

// ============================================================================
// MODEL INFO
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub source: String,
    pub kind: ArtifactKind,
    /// Column names in the order the model was trained on
    pub feature_names: Vec<String>,
    pub output: OutputContract,
    /// Hex SHA-256 of the artifact bytes (empty for in-memory models)
    pub sha256: String,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

impl ModelInfo {
    /// Info for a model built in code against the current layout
    pub fn in_memory(name: impl Into<String>, output: OutputContract) -> Self {
        Self {
            name: name.into(),
            source: "<memory>".to_string(),
            kind: ArtifactKind::InMemory,
            feature_names: LayoutInfo::current().feature_names,
            output,
            sha256: String::new(),
            loaded_at: chrono::Utc::now(),
        }
    }

    /// Layout the model was trained on
    pub fn layout(&self) -> LayoutInfo {
        LayoutInfo::declared(&self.feature_names)
    }
}

// ============================================================================
// SCORING MODEL TRAIT
// ============================================================================

/// Trait for loaded classifiers (native trees, ONNX, stubs)
///
/// Implementations are read-only after construction and shared across
/// callers, hence `Send + Sync` with `&self` methods.
pub trait ScoringModel: Send + Sync {
    fn info(&self) -> &ModelInfo;

    /// Hard class label for one feature row
    fn predict(&self, features: &TransactionFeatures) -> Result<ClassLabel, ScoringError>;

    /// Probability of class 1, or `None` if the model has no probability output
    fn predict_proba(&self, features: &TransactionFeatures) -> Option<Result<f64, ScoringError>>;
}

impl std::fmt::Debug for dyn ScoringModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ScoringModel({})", self.info().name)
    }
}
