//! Input Bounds
//!
//! The range limits a presentation layer enforces before building a vector.
//! `TransactionFeatures::build` never calls this.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{DEFAULT_VELOCITY_MAX, MIN_ACCOUNT_AGE_DAYS, SECONDS_PER_DAY};
use super::layout::{FEATURE_LAYOUT, IDX_AMOUNT, IDX_TIME, IDX_ACCOUNT_AGE, IDX_MERCHANT_RISK, IDX_VELOCITY};
use super::vector::TransactionFeatures;

/// A single out-of-range field
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("{field} = {value} is outside {allowed}")]
pub struct BoundsViolation {
    pub field: &'static str,
    pub value: f64,
    pub allowed: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputBounds {
    /// Upper bound for transactions per hour
    pub velocity_max: f64,
}

impl Default for InputBounds {
    fn default() -> Self {
        Self { velocity_max: DEFAULT_VELOCITY_MAX }
    }
}

impl InputBounds {
    pub fn new(velocity_max: f64) -> Self {
        Self { velocity_max }
    }

    /// Every violated field, in layout order (empty = all in range)
    pub fn check(&self, features: &TransactionFeatures) -> Vec<BoundsViolation> {
        let mut violations = Vec::new();

        for (index, &value) in features.as_array().iter().enumerate() {
            let (ok, allowed) = match index {
                IDX_AMOUNT => (value > 0.0, "(0, inf)".to_string()),
                IDX_TIME => ((0.0..=SECONDS_PER_DAY).contains(&value), format!("[0, {}]", SECONDS_PER_DAY)),
                IDX_ACCOUNT_AGE => (value >= MIN_ACCOUNT_AGE_DAYS, format!("[{}, inf)", MIN_ACCOUNT_AGE_DAYS)),
                IDX_MERCHANT_RISK => ((0.0..=1.0).contains(&value), "[0, 1]".to_string()),
                IDX_VELOCITY => ((0.0..=self.velocity_max).contains(&value), format!("[0, {}]", self.velocity_max)),
                _ => (true, String::new()),
            };

            if !ok || !value.is_finite() {
                violations.push(BoundsViolation {
                    field: FEATURE_LAYOUT[index],
                    value,
                    allowed,
                });
            }
        }

        violations
    }

    pub fn is_within(&self, features: &TransactionFeatures) -> bool {
        self.check(features).is_empty()
    }
}
