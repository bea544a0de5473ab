//! Model Module - Scoring Model Capability
//!
//! Models sit behind `ScoringModel`, apart from the decision rule.
//! Native trees, ONNX sessions and test stubs are interchangeable.

pub mod contract;
pub mod loader;
pub mod threshold;
pub mod tree;
#[cfg(feature = "onnx")]
pub mod onnx;

// Re-export common types
pub use contract::{ArtifactKind, ClassLabel, ModelInfo, OutputContract, ScoringModel};
pub use loader::{load_model, sha256_hex, ModelSlot};
pub use threshold::Threshold;
pub use tree::{TreeEnsembleArtifact, TreeEnsembleModel, TreeModelType};
