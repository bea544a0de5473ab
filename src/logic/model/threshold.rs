//! Decision Threshold
//!
//! Probability cutoff above which a probabilistic model's output is fraud.
//! Configuration, not a constant in the decision rule.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_THRESHOLD;
use crate::logic::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Threshold(f64);

impl Threshold {
    /// Must be finite and within [0, 1]
    pub fn new(value: f64) -> Result<Self, ConfigError> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ConfigError::InvalidThreshold(value))
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Strict comparison: a probability equal to the threshold does not exceed it
    pub fn is_exceeded_by(&self, probability: f64) -> bool {
        probability > self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self(DEFAULT_THRESHOLD)
    }
}

impl TryFrom<f64> for Threshold {
    type Error = ConfigError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Threshold> for f64 {
    fn from(threshold: Threshold) -> Self {
        threshold.0
    }
}

impl std::fmt::Display for Threshold {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_threshold() {
        assert_eq!(Threshold::default().value(), 0.35);
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(Threshold::new(-0.01).is_err());
        assert!(Threshold::new(1.01).is_err());
        assert!(Threshold::new(f64::NAN).is_err());
        assert!(Threshold::new(0.0).is_ok());
        assert!(Threshold::new(1.0).is_ok());
    }

    #[test]
    fn test_strict_comparison() {
        let t = Threshold::default();
        assert!(!t.is_exceeded_by(0.35));
        assert!(t.is_exceeded_by(0.3500000001));
        assert!(!t.is_exceeded_by(0.2));
    }

    #[test]
    fn test_serde_validates() {
        let t: Threshold = serde_json::from_str("0.5").unwrap();
        assert_eq!(t.value(), 0.5);
        assert!(serde_json::from_str::<Threshold>("7.0").is_err());
        assert_eq!(serde_json::to_string(&t).unwrap(), "0.5");
    }
}
