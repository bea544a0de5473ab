//! Fraud Scoring Core
//!
//! Five transaction fields in, a Legitimate/Fraudulent verdict out.
//!
//! ```ignore
//! use fraud_scoring_core::{FraudScorer, ScoringConfig};
//!
//! let scorer = FraudScorer::new(ScoringConfig::from_env()?);
//! scorer.init()?;
//! let verdict = scorer.score_raw(100.0, 36000.0, 150.0, 0.5, 2.0)?;
//! ```

pub mod constants;
pub mod logic;

pub use logic::config::ScoringConfig;
pub use logic::decision::{score, Decision, DecisionEngine, Verdict};
pub use logic::error::{ConfigError, ErrorKind, ScoringError};
pub use logic::features::{InputBounds, TransactionFeatures, TransactionFeaturesBuilder};
pub use logic::model::{load_model, ModelInfo, ModelSlot, OutputContract, ScoringModel, Threshold};
pub use logic::scorer::{FraudScorer, ScorerStatus};
