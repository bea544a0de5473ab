//! Model Loader
//!
//! Reads an artifact from disk, verifies its checksum and builds the model
//! matching its extension. `ModelSlot` makes loading happen once per slot.

use std::path::Path;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use sha2::{Digest, Sha256};

use crate::logic::config::ScoringConfig;
use crate::logic::error::ScoringError;
use super::contract::ScoringModel;
use super::tree::TreeEnsembleModel;

/// Hex SHA-256 of artifact bytes
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Load an artifact, dispatching on file extension
///
/// - missing/unreadable file → `MissingModel`
/// - checksum, format or shape problems → `IncompatibleModel`
pub fn load_model(path: &Path, expected_sha256: Option<&str>) -> Result<Arc<dyn ScoringModel>, ScoringError> {
    let source = path.display().to_string();
    log::info!("Loading scoring model from: {}", source);

    let bytes = std::fs::read(path).map_err(|e| ScoringError::missing(source.clone(), e))?;
    let checksum = sha256_hex(&bytes);

    if let Some(expected) = expected_sha256 {
        if !checksum.eq_ignore_ascii_case(expected.trim()) {
            return Err(ScoringError::incompatible(
                source,
                format!("checksum mismatch: expected {}, got {}", expected, checksum),
            ));
        }
        log::info!("Model checksum verified ({})", checksum);
    }

    let extension = path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let model: Arc<dyn ScoringModel> = match extension.as_str() {
        "json" => Arc::new(TreeEnsembleModel::from_json_slice(&bytes, &source, checksum)?),
        #[cfg(feature = "onnx")]
        "onnx" => {
            let sidecar = super::onnx::load_sidecar(path)?;
            Arc::new(super::onnx::OnnxModel::from_bytes(&bytes, &source, checksum, sidecar)?)
        }
        #[cfg(not(feature = "onnx"))]
        "onnx" => {
            return Err(ScoringError::incompatible(source, "built without the `onnx` feature"));
        }
        "pkl" | "joblib" => {
            return Err(ScoringError::incompatible(
                source,
                "pickled models cannot be loaded; export to .onnx or tree-ensemble .json",
            ));
        }
        other => {
            return Err(ScoringError::incompatible(source, format!("unknown artifact extension {:?}", other)));
        }
    };

    let info = model.info();
    log::info!(
        "Model loaded: {} ({:?}, contract {:?}, sha256 {})",
        info.name, info.kind, info.output, info.sha256
    );

    Ok(model)
}

// ============================================================================
// LOAD-ONCE SLOT
// ============================================================================

/// Holds at most one model; concurrent loaders load it once
///
/// A failed load leaves the slot empty, so a later explicit call may retry.
#[derive(Default)]
pub struct ModelSlot {
    cell: OnceCell<Arc<dyn ScoringModel>>,
}

impl ModelSlot {
    pub const fn new() -> Self {
        Self { cell: OnceCell::new() }
    }

    /// Slot that already holds a model
    pub fn with_model(model: Arc<dyn ScoringModel>) -> Self {
        let slot = Self::new();
        // Fresh cell, cannot already be set
        let _ = slot.cell.set(model);
        slot
    }

    /// Return the loaded model, loading it from config first if needed
    pub fn get_or_load(&self, config: &ScoringConfig) -> Result<Arc<dyn ScoringModel>, ScoringError> {
        self.get_or_load_with(|| load_model(&config.model_path, config.expected_sha256.as_deref()))
    }

    /// Same as `get_or_load` with a custom loader
    pub fn get_or_load_with<F>(&self, load: F) -> Result<Arc<dyn ScoringModel>, ScoringError>
    where
        F: FnOnce() -> Result<Arc<dyn ScoringModel>, ScoringError>,
    {
        self.cell.get_or_try_init(load).map(Arc::clone)
    }

    /// Loaded model or `ModelUnavailable`
    pub fn get(&self) -> Result<Arc<dyn ScoringModel>, ScoringError> {
        self.cell.get().cloned().ok_or(ScoringError::ModelUnavailable)
    }

    /// Borrow the loaded model without cloning the handle
    pub fn peek(&self) -> Option<&Arc<dyn ScoringModel>> {
        self.cell.get()
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl std::fmt::Debug for ModelSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelSlot")
            .field("model", &self.cell.get().map(|m| m.info().name.clone()))
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================
