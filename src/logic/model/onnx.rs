//! ONNX Model - ONNX Runtime Integration
//!
//! Runs classifiers exported to ONNX (e.g. skl2onnx with `zipmap=False`).
//! Input is one `float32 [1, 5]` row; outputs are an `int64` label tensor and
//! a `float32 [1, 2]` probability tensor.
//!
//! An optional sidecar `<artifact>.meta.json` declares what the graph itself
//! cannot: feature names, output contract and output tensor names.

use std::path::Path;

use ndarray::Array2;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use ort::session::{Session, builder::GraphOptimizationLevel};
use ort::value::Tensor;

use crate::logic::error::ScoringError;
use crate::logic::features::{LayoutInfo, TransactionFeatures, FEATURE_COUNT};
use super::contract::{ArtifactKind, ClassLabel, ModelInfo, OutputContract, ScoringModel};

pub const DEFAULT_LABEL_OUTPUT: &str = "output_label";
pub const DEFAULT_PROBABILITY_OUTPUT: &str = "output_probability";

// ============================================================================
// SIDECAR METADATA
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OnnxSidecar {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    #[serde(default)]
    pub output: Option<OutputContract>,
    #[serde(default)]
    pub label_output: Option<String>,
    #[serde(default)]
    pub probability_output: Option<String>,
}

/// Sidecar location for an artifact path
pub fn sidecar_path(model_path: &Path) -> std::path::PathBuf {
    model_path.with_extension("meta.json")
}

/// Load sidecar if present; a present but unparseable sidecar is an error
pub fn load_sidecar(model_path: &Path) -> Result<OnnxSidecar, ScoringError> {
    let path = sidecar_path(model_path);
    let source = model_path.display().to_string();

    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("No sidecar at {}, using canonical layout", path.display());
            return Ok(OnnxSidecar::default());
        }
        Err(e) => return Err(ScoringError::incompatible(source, format!("failed to read sidecar: {}", e))),
    };

    serde_json::from_str(&content)
        .map_err(|e| ScoringError::incompatible(source, format!("failed to parse sidecar: {}", e)))
}

// ============================================================================
// MODEL
// ============================================================================

pub struct OnnxModel {
    info: ModelInfo,
    session: Mutex<Session>,
    label_output: Option<String>,
    probability_output: Option<String>,
}

impl std::fmt::Debug for OnnxModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxModel")
            .field("info", &self.info)
            .field("label_output", &self.label_output)
            .field("probability_output", &self.probability_output)
            .finish()
    }
}

impl OnnxModel {
    /// Build a session from artifact bytes
    pub fn from_bytes(
        model_bytes: &[u8],
        source: &str,
        sha256: String,
        sidecar: OnnxSidecar,
    ) -> Result<Self, ScoringError> {
        log::info!("Loading ONNX model from memory ({} bytes)", model_bytes.len());

        let session = Session::builder()
            .map_err(|e| ScoringError::incompatible(source, format!("session builder error: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| ScoringError::incompatible(source, format!("optimization error: {}", e)))?
            .commit_from_memory(model_bytes)
            .map_err(|e| ScoringError::incompatible(source, format!("failed to load model: {}", e)))?;

        if session.inputs.len() != 1 {
            return Err(ScoringError::incompatible(
                source,
                format!("expected 1 input tensor, graph has {}", session.inputs.len()),
            ));
        }

        let output_names: Vec<String> = session.outputs.iter().map(|o| o.name.clone()).collect();
        let find = |name: String| output_names.iter().any(|n| *n == name).then_some(name);

        let label_output = find(sidecar.label_output.clone().unwrap_or_else(|| DEFAULT_LABEL_OUTPUT.to_string()));
        let probability_output = find(sidecar.probability_output.clone().unwrap_or_else(|| DEFAULT_PROBABILITY_OUTPUT.to_string()));

        let output = sidecar.output.unwrap_or_default();
        match output {
            OutputContract::Probability if probability_output.is_none() => {
                return Err(ScoringError::incompatible(
                    source,
                    format!("probability contract but graph outputs are {:?}", output_names),
                ));
            }
            OutputContract::Label { .. } if label_output.is_none() => {
                return Err(ScoringError::incompatible(
                    source,
                    format!("label contract but graph outputs are {:?}", output_names),
                ));
            }
            _ => {}
        }

        let feature_names = sidecar.feature_names.unwrap_or_else(|| LayoutInfo::current().feature_names);
        if feature_names.len() != FEATURE_COUNT {
            return Err(ScoringError::incompatible(
                source,
                format!("sidecar declares {} features, expected {}", feature_names.len(), FEATURE_COUNT),
            ));
        }

        log::info!("ONNX model loaded successfully (outputs: {:?})", output_names);

        Ok(Self {
            info: ModelInfo {
                name: sidecar.name.unwrap_or_else(|| "onnx".to_string()),
                source: source.to_string(),
                kind: ArtifactKind::Onnx,
                feature_names,
                output,
                sha256,
                loaded_at: chrono::Utc::now(),
            },
            session: Mutex::new(session),
            label_output,
            probability_output,
        })
    }

    /// Run the graph and hand the requested output tensor to `read`
    fn run_output<T, R, F>(
        &self,
        features: &TransactionFeatures,
        output_name: &str,
        read: F,
    ) -> Result<R, ScoringError>
    where
        T: ort::tensor::PrimitiveTensorElementType + std::fmt::Debug,
        F: FnOnce(&[T]) -> Result<R, ScoringError>,
    {
        let row: Vec<f32> = features.as_slice().iter().map(|&v| v as f32).collect();
        let input_array = Array2::<f32>::from_shape_vec((1, FEATURE_COUNT), row)
            .map_err(|e| ScoringError::schema(format!("array error: {}", e)))?;

        let input_tensor = Tensor::from_array(input_array)
            .map_err(|e| ScoringError::schema(format!("tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session.run(ort::inputs![input_tensor])
            .map_err(|e| ScoringError::schema(format!("inference failed: {}", e)))?;

        let output = outputs.get(output_name)
            .ok_or_else(|| ScoringError::incompatible(&self.info.source, format!("missing output {}", output_name)))?;

        let (_, data) = output.try_extract_tensor::<T>()
            .map_err(|e| ScoringError::incompatible(&self.info.source, format!("extract error on {}: {}", output_name, e)))?;

        read(data)
    }
}

impl ScoringModel for OnnxModel {
    fn info(&self) -> &ModelInfo {
        &self.info
    }

    fn predict(&self, features: &TransactionFeatures) -> Result<ClassLabel, ScoringError> {
        let name = self.label_output.as_deref()
            .ok_or_else(|| ScoringError::incompatible(&self.info.source, "graph has no label output"))?;

        self.run_output::<i64, _, _>(features, name, |data| match data.first() {
            Some(0) => Ok(0),
            Some(1) => Ok(1),
            other => Err(ScoringError::incompatible(
                &self.info.source,
                format!("label output is not binary: {:?}", other),
            )),
        })
    }

    fn predict_proba(&self, features: &TransactionFeatures) -> Option<Result<f64, ScoringError>> {
        let name = self.probability_output.as_deref()?;

        // Index 1 is the positive (fraud) class
        Some(self.run_output::<f32, _, _>(features, name, |data| {
            data.get(1).map(|&p| p as f64).ok_or_else(|| ScoringError::incompatible(
                &self.info.source,
                format!("probability output has {} values, expected 2", data.len()),
            ))
        }))
    }
}
