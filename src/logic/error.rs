//! Error Types
//!
//! Closed set of failure categories for loading and scoring.
//! Callers branch on `ErrorKind`, not on message text.

use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SCORING ERRORS
// ============================================================================

/// Failure category, for callers that only need to branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MissingModel,
    IncompatibleModel,
    SchemaMismatch,
    ModelUnavailable,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MissingModel => "missing_model",
            ErrorKind::IncompatibleModel => "incompatible_model",
            ErrorKind::SchemaMismatch => "schema_mismatch",
            ErrorKind::ModelUnavailable => "model_unavailable",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ScoringError {
    /// Artifact absent or unreadable
    #[error("model artifact missing at {path}: {message}")]
    MissingModel { path: String, message: String },

    /// Artifact read but failed a shape/version/checksum check
    #[error("model artifact at {path} is incompatible: {message}")]
    IncompatibleModel { path: String, message: String },

    /// Feature vector does not match what the model expects
    #[error("feature schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// Scoring requested before a model finished loading
    #[error("no scoring model has been loaded")]
    ModelUnavailable,
}

impl ScoringError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScoringError::MissingModel { .. } => ErrorKind::MissingModel,
            ScoringError::IncompatibleModel { .. } => ErrorKind::IncompatibleModel,
            ScoringError::SchemaMismatch { .. } => ErrorKind::SchemaMismatch,
            ScoringError::ModelUnavailable => ErrorKind::ModelUnavailable,
        }
    }

    pub(crate) fn missing(path: impl Into<String>, message: impl std::fmt::Display) -> Self {
        ScoringError::MissingModel { path: path.into(), message: message.to_string() }
    }

    pub(crate) fn incompatible(path: impl Into<String>, message: impl std::fmt::Display) -> Self {
        ScoringError::IncompatibleModel { path: path.into(), message: message.to_string() }
    }

    pub(crate) fn schema(message: impl std::fmt::Display) -> Self {
        ScoringError::SchemaMismatch { message: message.to_string() }
    }
}

// ============================================================================
// CONFIG ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("threshold must be a finite value in [0, 1], got {0}")]
    InvalidThreshold(f64),

    #[error("velocity upper bound must be finite and > 0, got {0}")]
    InvalidVelocityMax(f64),

    #[error("invalid value for {name}: {value:?}")]
    InvalidEnv { name: String, value: String },

    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

// ============================================================================
// TESTS
// ============================================================================
