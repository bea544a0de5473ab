//! Transaction Features - Core data structure for model input
//!
//! **Versioned feature vector with layout validation**
//!
//! Uses centralized layout from `layout.rs` for:
//! - Consistent feature ordering
//! - Version tracking
//! - Layout hash for compatibility checks

use serde::{Deserialize, Serialize};
use super::layout::{
    FEATURE_COUNT, FEATURE_VERSION, FEATURE_LAYOUT,
    IDX_AMOUNT, IDX_TIME, IDX_ACCOUNT_AGE, IDX_MERCHANT_RISK, IDX_VELOCITY,
    layout_hash, validate_layout, LayoutMismatchError,
};

// ============================================================================
// VERSIONED FEATURE VECTOR
// ============================================================================

/// Versioned transaction feature vector
///
/// Immutable once built. Values are stored in `FEATURE_LAYOUT` order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionFeatures {
    /// Feature layout version
    version: u8,
    /// CRC32 hash of the feature layout (for mismatch detection)
    layout_hash: u32,
    /// Feature values in order defined by FEATURE_LAYOUT
    values: [f64; FEATURE_COUNT],
}

impl TransactionFeatures {
    /// Package five raw inputs into the fixed layout
    ///
    /// Performs no range validation, see `InputBounds` for that.
    pub fn build(
        transaction_amount: f64,
        transaction_time: f64,
        account_age_days: f64,
        merchant_risk_score: f64,
        transaction_velocity: f64,
    ) -> Self {
        let mut values = [0.0; FEATURE_COUNT];
        values[IDX_AMOUNT] = transaction_amount;
        values[IDX_TIME] = transaction_time;
        values[IDX_ACCOUNT_AGE] = account_age_days;
        values[IDX_MERCHANT_RISK] = merchant_risk_score;
        values[IDX_VELOCITY] = transaction_velocity;
        Self::from_values(values)
    }

    /// Create from a raw row already in layout order
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self {
            version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            values,
        }
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn layout_hash(&self) -> u32 {
        self.layout_hash
    }

    /// Get values as array reference
    pub fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    /// Get values as slice
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Get feature by index
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Get feature by name
    pub fn get_by_name(&self, name: &str) -> Option<f64> {
        super::layout::feature_index(name).and_then(|i| self.get(i))
    }

    pub fn transaction_amount(&self) -> f64 {
        self.values[IDX_AMOUNT]
    }

    pub fn transaction_time(&self) -> f64 {
        self.values[IDX_TIME]
    }

    pub fn account_age_days(&self) -> f64 {
        self.values[IDX_ACCOUNT_AGE]
    }

    pub fn merchant_risk_score(&self) -> f64 {
        self.values[IDX_MERCHANT_RISK]
    }

    pub fn transaction_velocity(&self) -> f64 {
        self.values[IDX_VELOCITY]
    }

    /// Validate that this vector is compatible with current layout
    pub fn validate(&self) -> Result<(), LayoutMismatchError> {
        validate_layout(self.version, self.layout_hash)
    }

    /// Check if this vector is compatible with current layout
    pub fn is_compatible(&self) -> bool {
        self.validate().is_ok()
    }

    /// Get feature names for this vector
    pub fn feature_names(&self) -> &'static [&'static str] {
        FEATURE_LAYOUT
    }

    /// Convert to JSON-serializable format for logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        serde_json::json!({
            "feature_version": self.version,
            "layout_hash": self.layout_hash,
            "values": self.values,
            "named_values": FEATURE_LAYOUT.iter()
                .zip(self.values.iter())
                .map(|(name, value)| (name.to_string(), *value))
                .collect::<std::collections::BTreeMap<_, _>>(),
        })
    }
}

impl From<[f64; FEATURE_COUNT]> for TransactionFeatures {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        Self::from_values(values)
    }
}

// ============================================================================
// BUILDER PATTERN
// ============================================================================

/// Builder for creating TransactionFeatures with named setters
///
/// Unset fields stay at 0.0.
#[derive(Debug, Clone, Default)]
pub struct TransactionFeaturesBuilder {
    values: [f64; FEATURE_COUNT],
}

impl TransactionFeaturesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transaction_amount(mut self, value: f64) -> Self {
        self.values[IDX_AMOUNT] = value;
        self
    }

    pub fn transaction_time(mut self, value: f64) -> Self {
        self.values[IDX_TIME] = value;
        self
    }

    pub fn account_age_days(mut self, value: f64) -> Self {
        self.values[IDX_ACCOUNT_AGE] = value;
        self
    }

    pub fn merchant_risk_score(mut self, value: f64) -> Self {
        self.values[IDX_MERCHANT_RISK] = value;
        self
    }

    pub fn transaction_velocity(mut self, value: f64) -> Self {
        self.values[IDX_VELOCITY] = value;
        self
    }

    /// Set feature by schema name; unknown names are ignored
    pub fn set(mut self, name: &str, value: f64) -> Self {
        if let Some(index) = super::layout::feature_index(name) {
            self.values[index] = value;
        } else {
            log::warn!("Ignoring unknown feature name: {}", name);
        }
        self
    }

    pub fn build(self) -> TransactionFeatures {
        TransactionFeatures::from_values(self.values)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_places_fields_in_layout_order() {
        let f = TransactionFeatures::build(100.0, 36000.0, 150.0, 0.5, 2.0);
        assert_eq!(f.as_array(), &[100.0, 36000.0, 150.0, 0.5, 2.0]);
        assert_eq!(f.get_by_name("Account_Age_Days"), Some(150.0));
        assert_eq!(f.transaction_velocity(), 2.0);
    }

    #[test]
    fn test_build_does_not_validate() {
        let f = TransactionFeatures::build(-5.0, 90000.0, 0.0, 3.0, 999.0);
        assert_eq!(f.transaction_amount(), -5.0);
        assert!(f.is_compatible());
    }

    #[test]
    fn test_builder_matches_build() {
        let built = TransactionFeaturesBuilder::new()
            .transaction_velocity(2.0)
            .merchant_risk_score(0.5)
            .account_age_days(150.0)
            .transaction_time(36000.0)
            .transaction_amount(100.0)
            .build();

        assert_eq!(built, TransactionFeatures::build(100.0, 36000.0, 150.0, 0.5, 2.0));
    }

    #[test]
    fn test_builder_set_by_name() {
        let f = TransactionFeaturesBuilder::new()
            .set("Merchant_Risk_Score", 0.9)
            .set("Not_A_Feature", 1.0)
            .build();

        assert_eq!(f.merchant_risk_score(), 0.9);
        assert_eq!(f.transaction_amount(), 0.0);
    }

    #[test]
    fn test_stale_vector_fails_validation() {
        let json = format!(
            r#"{{"version":{},"layout_hash":{},"values":[1.0,2.0,3.0,0.1,1.0]}}"#,
            FEATURE_VERSION,
            layout_hash().wrapping_add(7)
        );
        let stale: TransactionFeatures = serde_json::from_str(&json).unwrap();
        assert!(!stale.is_compatible());
    }

    #[test]
    fn test_to_log_entry() {
        let f = TransactionFeatures::build(100.0, 36000.0, 150.0, 0.5, 2.0);
        let log = f.to_log_entry();
        assert_eq!(log["feature_version"], FEATURE_VERSION);
        assert_eq!(log["named_values"]["Transaction_Amount"], 100.0);
        assert!(log["layout_hash"].as_u64().is_some());
    }
}
