//! Fraud Scorer - the object a presentation layer holds
//!
//! Bundles configuration, a load-once model slot and the decision rule.
//! Counters are per instance and only feed `status()`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::logic::config::ScoringConfig;
use crate::logic::decision::{self, Verdict};
use crate::logic::error::ScoringError;
use crate::logic::features::{InputBounds, TransactionFeatures};
use crate::logic::model::{ModelInfo, ModelSlot, ScoringModel};

/// Scorer status for UI / health output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorerStatus {
    pub model_loaded: bool,
    pub model_name: String,
    pub threshold: f64,
    pub scoring_count: u64,
    pub error_count: u64,
    pub avg_latency_us: f64,
}

pub struct FraudScorer {
    config: ScoringConfig,
    slot: ModelSlot,
    scoring_count: AtomicU64,
    error_count: AtomicU64,
    latency_sum_us: AtomicU64,
}

impl FraudScorer {
    /// Scorer with an empty slot; call `init()` before scoring
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            config,
            slot: ModelSlot::new(),
            scoring_count: AtomicU64::new(0),
            error_count: AtomicU64::new(0),
            latency_sum_us: AtomicU64::new(0),
        }
    }

    /// Scorer around an already constructed model
    pub fn with_model(config: ScoringConfig, model: Arc<dyn ScoringModel>) -> Self {
        Self {
            slot: ModelSlot::with_model(model),
            ..Self::new(config)
        }
    }

    /// Load the configured artifact (no-op once loaded)
    pub fn init(&self) -> Result<&ModelInfo, ScoringError> {
        match self.slot.get_or_load(&self.config) {
            Ok(_) => self.model_info(),
            Err(e) => {
                log::warn!("Scoring model init failed: {}", e);
                Err(e)
            }
        }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn input_bounds(&self) -> InputBounds {
        self.config.input_bounds()
    }

    pub fn is_model_loaded(&self) -> bool {
        self.slot.is_loaded()
    }

    pub fn model_info(&self) -> Result<&ModelInfo, ScoringError> {
        self.slot_model().map(|m| m.info())
    }

    fn slot_model(&self) -> Result<&Arc<dyn ScoringModel>, ScoringError> {
        self.slot.peek().ok_or(ScoringError::ModelUnavailable)
    }

    /// Score a built vector with the configured threshold
    pub fn score(&self, features: &TransactionFeatures) -> Result<Verdict, ScoringError> {
        let start = Instant::now();

        let result = self.slot_model()
            .and_then(|model| decision::score(model.as_ref(), features, self.config.threshold));

        self.latency_sum_us.fetch_add(start.elapsed().as_micros() as u64, Ordering::Relaxed);
        self.scoring_count.fetch_add(1, Ordering::Relaxed);

        match &result {
            Ok(verdict) => log::debug!("Scored transaction: {}", verdict),
            Err(e) => {
                self.error_count.fetch_add(1, Ordering::Relaxed);
                log::warn!("Scoring failed ({}): {}", e.kind(), e);
            }
        }

        result
    }

    /// Build from five raw inputs, then score
    pub fn score_raw(
        &self,
        transaction_amount: f64,
        transaction_time: f64,
        account_age_days: f64,
        merchant_risk_score: f64,
        transaction_velocity: f64,
    ) -> Result<Verdict, ScoringError> {
        let features = TransactionFeatures::build(
            transaction_amount,
            transaction_time,
            account_age_days,
            merchant_risk_score,
            transaction_velocity,
        );
        self.score(&features)
    }

    pub fn status(&self) -> ScorerStatus {
        let count = self.scoring_count.load(Ordering::Relaxed);
        let sum = self.latency_sum_us.load(Ordering::Relaxed);

        ScorerStatus {
            model_loaded: self.is_model_loaded(),
            model_name: self.model_info()
                .map(|info| info.name.clone())
                .unwrap_or_else(|_| "None".to_string()),
            threshold: self.config.threshold.value(),
            scoring_count: count,
            error_count: self.error_count.load(Ordering::Relaxed),
            avg_latency_us: if count > 0 { sum as f64 / count as f64 } else { 0.0 },
        }
    }
}

impl std::fmt::Debug for FraudScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FraudScorer")
            .field("config", &self.config)
            .field("slot", &self.slot)
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================
