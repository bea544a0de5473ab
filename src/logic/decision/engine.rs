//! Decision Engine
//!
//! Pure decision rule: no I/O, no state.
//! Input: ScoringModel, TransactionFeatures, Threshold
//! Output: Verdict

use std::sync::Arc;

use crate::logic::error::ScoringError;
use crate::logic::features::layout::describe_order_diff;
use crate::logic::features::TransactionFeatures;
use crate::logic::model::{ModelInfo, OutputContract, ScoringModel, Threshold};
use super::types::Verdict;

// ============================================================================
// SCHEMA CHECK
// ============================================================================

/// Vector must match both the current layout and the model's declared layout
pub fn check_schema(info: &ModelInfo, features: &TransactionFeatures) -> Result<(), ScoringError> {
    features.validate().map_err(ScoringError::schema)?;

    let declared = info.layout();
    if declared.hash != features.layout_hash() {
        let diffs = describe_order_diff(&info.feature_names);
        return Err(ScoringError::schema(format!(
            "model {} expects layout {:08x}, vector has {:08x}: {}",
            info.name,
            declared.hash,
            features.layout_hash(),
            diffs.join("; ")
        )));
    }

    Ok(())
}

// ============================================================================
// MAIN SCORING FUNCTION
// ============================================================================

/// Score one feature vector
///
/// - `Probability`: Fraudulent iff `p > threshold`, `risk_score = p`
/// - `Label { legitimate_label }`: Legitimate iff label == legitimate_label
pub fn score(
    model: &dyn ScoringModel,
    features: &TransactionFeatures,
    threshold: Threshold,
) -> Result<Verdict, ScoringError> {
    let info = model.info();
    check_schema(info, features)?;

    match info.output {
        OutputContract::Probability => {
            let p = model.predict_proba(features).ok_or_else(|| {
                ScoringError::incompatible(
                    info.source.clone(),
                    "model declares a probability contract but has no probability output",
                )
            })??;

            if !p.is_finite() || !(0.0..=1.0).contains(&p) {
                return Err(ScoringError::schema(format!(
                    "model {} returned {} for this input, not a probability",
                    info.name, p
                )));
            }

            if threshold.is_exceeded_by(p) {
                Ok(Verdict::fraudulent(Some(p)))
            } else {
                Ok(Verdict::legitimate(Some(p)))
            }
        }
        OutputContract::Label { legitimate_label } => {
            let label = model.predict(features)?;

            if label > 1 {
                return Err(ScoringError::schema(format!(
                    "model {} returned label {}, expected 0 or 1",
                    info.name, label
                )));
            }

            if label == legitimate_label {
                Ok(Verdict::legitimate(None))
            } else {
                Ok(Verdict::fraudulent(None))
            }
        }
    }
}

// ============================================================================
// ENGINE
// ============================================================================

/// A model bound to a threshold
#[derive(Clone)]
pub struct DecisionEngine {
    model: Arc<dyn ScoringModel>,
    threshold: Threshold,
}

impl DecisionEngine {
    pub fn new(model: Arc<dyn ScoringModel>, threshold: Threshold) -> Self {
        Self { model, threshold }
    }

    pub fn model(&self) -> &Arc<dyn ScoringModel> {
        &self.model
    }

    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    pub fn score(&self, features: &TransactionFeatures) -> Result<Verdict, ScoringError> {
        let verdict = score(self.model.as_ref(), features, self.threshold)?;
        log::debug!(
            "Verdict {} from {} (threshold {}) for {}",
            verdict,
            self.model.info().name,
            self.threshold,
            features.to_log_entry()
        );
        Ok(verdict)
    }
}

impl std::fmt::Debug for DecisionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecisionEngine")
            .field("model", &self.model.info().name)
            .field("threshold", &self.threshold)
            .finish()
    }
}
