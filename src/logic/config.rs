//! Scoring Configuration
//!
//! Everything that differs between deployments: model path, threshold,
//! velocity bound and the expected artifact checksum.
//!
//! Precedence: defaults < config file (`FRAUD_CONFIG`) < individual env vars.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{self, DEFAULT_MODEL_PATH, DEFAULT_VELOCITY_MAX};
use crate::logic::error::ConfigError;
use crate::logic::features::InputBounds;
use crate::logic::model::Threshold;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Model artifact path (`.json` tree ensemble or `.onnx`)
    pub model_path: PathBuf,

    /// Fraud threshold for probabilistic models
    pub threshold: Threshold,

    /// Upper bound for Transaction_Velocity input
    pub velocity_max: f64,

    /// Hex SHA-256 the artifact must match (None = no check)
    pub expected_sha256: Option<String>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            threshold: Threshold::default(),
            velocity_max: DEFAULT_VELOCITY_MAX,
            expected_sha256: None,
        }
    }
}

impl ScoringConfig {
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            ..Default::default()
        }
    }

    pub fn with_threshold(mut self, threshold: Threshold) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_velocity_max(mut self, velocity_max: f64) -> Self {
        self.velocity_max = velocity_max;
        self
    }

    pub fn with_expected_sha256(mut self, sha256: impl Into<String>) -> Self {
        self.expected_sha256 = Some(sha256.into());
        self
    }

    /// Load from a JSON file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: display.clone(), source })?;

        let config: Self = serde_json::from_str(&content)
            .map_err(|source| ConfigError::Parse { path: display, source })?;

        config.validate()?;
        Ok(config)
    }

    /// Build from environment (file first, then per-key overrides)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(constants::get_raw)
    }

    /// Same as `from_env`, reading variables through `lookup`
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let mut config = match get(constants::ENV_CONFIG_FILE) {
            Some(file) => Self::from_file(Path::new(&file))?,
            None => Self::default(),
        };

        if let Some(path) = get(constants::ENV_MODEL_PATH) {
            config.model_path = PathBuf::from(path);
        }

        if let Some(raw) = get(constants::ENV_THRESHOLD) {
            config.threshold = parse_env(constants::ENV_THRESHOLD, &raw)
                .and_then(Threshold::new)?;
        }

        if let Some(raw) = get(constants::ENV_VELOCITY_MAX) {
            config.velocity_max = parse_env(constants::ENV_VELOCITY_MAX, &raw)?;
        }

        if let Some(sha) = get(constants::ENV_MODEL_SHA256) {
            config.expected_sha256 = Some(sha.to_lowercase());
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // Threshold is validated on construction; re-check in case of struct literal use
        Threshold::new(self.threshold.value())?;

        if !self.velocity_max.is_finite() || self.velocity_max <= 0.0 {
            return Err(ConfigError::InvalidVelocityMax(self.velocity_max));
        }

        Ok(())
    }

    /// UI-side input bounds for this deployment
    pub fn input_bounds(&self) -> InputBounds {
        InputBounds::new(self.velocity_max)
    }
}

fn parse_env(name: &str, raw: &str) -> Result<f64, ConfigError> {
    raw.parse::<f64>().map_err(|_| ConfigError::InvalidEnv {
        name: name.to_string(),
        value: raw.to_string(),
    })
}
