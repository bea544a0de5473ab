//! Feature Layout - Centralized Feature Definition
//!
//! **CRITICAL: This file controls the feature schema**
//!
//! ## Rules (NEVER break these):
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION
//!
//! Names are the column names the classifier was trained on and must stay
//! verbatim. A reordered vector still "works" numerically and silently
//! produces wrong verdicts, so every model declares its own column list and
//! the engine compares hashes before scoring.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
/// MUST be incremented when layout changes
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in exact order they appear in the vector
pub const FEATURE_LAYOUT: &[&str] = &[
    "Transaction_Amount",    // 0: amount, > 0
    "Transaction_Time",      // 1: seconds since midnight, [0, 86400]
    "Account_Age_Days",      // 2: days, >= 1
    "Merchant_Risk_Score",   // 3: [0, 1]
    "Transaction_Velocity",  // 4: transactions per hour, [0, velocity_max]
];

/// Total number of features
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 5;

pub const IDX_AMOUNT: usize = 0;
pub const IDX_TIME: usize = 1;
pub const IDX_ACCOUNT_AGE: usize = 2;
pub const IDX_MERCHANT_RISK: usize = 3;
pub const IDX_VELOCITY: usize = 4;

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 over a version byte and an ordered list of names
pub fn compute_hash<S: AsRef<str>>(version: u8, names: &[S]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[version]);

    for name in names {
        hasher.update(name.as_ref().as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

/// Compute CRC32 hash of the current feature layout
pub fn compute_layout_hash() -> u32 {
    compute_hash(FEATURE_VERSION, FEATURE_LAYOUT)
}

/// Get layout hash
pub fn layout_hash() -> u32 {
    compute_layout_hash()
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information for serialization/logging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
            feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Layout a model declares it was trained on
    pub fn declared(feature_names: &[String]) -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: compute_hash(FEATURE_VERSION, feature_names),
            feature_count: feature_names.len(),
            feature_names: feature_names.to_vec(),
        }
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Error when feature layout doesn't match expected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutMismatchError {
    pub expected_version: u8,
    pub expected_hash: u32,
    pub actual_version: u8,
    pub actual_hash: u32,
}

impl std::fmt::Display for LayoutMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Feature layout mismatch: expected v{} (hash: {:08x}), got v{} (hash: {:08x})",
            self.expected_version,
            self.expected_hash,
            self.actual_version,
            self.actual_hash
        )
    }
}

impl std::error::Error for LayoutMismatchError {}

/// Validate that incoming data matches current layout
pub fn validate_layout(incoming_version: u8, incoming_hash: u32) -> Result<(), LayoutMismatchError> {
    let current_hash = layout_hash();

    if incoming_version != FEATURE_VERSION || incoming_hash != current_hash {
        return Err(LayoutMismatchError {
            expected_version: FEATURE_VERSION,
            expected_hash: current_hash,
            actual_version: incoming_version,
            actual_hash: incoming_hash,
        });
    }

    Ok(())
}

/// Names that differ position-by-position from the current layout
pub fn describe_order_diff(names: &[String]) -> Vec<String> {
    let mut diffs = Vec::new();

    if names.len() != FEATURE_COUNT {
        diffs.push(format!("expected {} features, model declares {}", FEATURE_COUNT, names.len()));
    }

    for (i, expected) in FEATURE_LAYOUT.iter().enumerate() {
        match names.get(i) {
            Some(actual) if actual == expected => {}
            Some(actual) => diffs.push(format!("position {}: expected {}, model declares {}", i, expected, actual)),
            None => diffs.push(format!("position {}: expected {}, model declares nothing", i, expected)),
        }
    }

    diffs
}

// ============================================================================
// FEATURE INDEX LOOKUP
// ============================================================================

/// Get feature index by name
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}

/// Get feature name by index
pub fn feature_name(index: usize) -> Option<&'static str> {
    FEATURE_LAYOUT.get(index).copied()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_count() {
        assert_eq!(FEATURE_COUNT, 5);
        assert_eq!(FEATURE_LAYOUT.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_layout_hash_consistency() {
        assert_eq!(compute_layout_hash(), compute_layout_hash());
        assert_ne!(layout_hash(), 0);
    }

    #[test]
    fn test_layout_hash_detects_reorder() {
        let mut swapped: Vec<&str> = FEATURE_LAYOUT.to_vec();
        swapped.swap(IDX_AMOUNT, IDX_VELOCITY);
        assert_ne!(compute_hash(FEATURE_VERSION, &swapped), layout_hash());
    }

    #[test]
    fn test_layout_hash_includes_version() {
        assert_ne!(compute_hash(FEATURE_VERSION + 1, FEATURE_LAYOUT), layout_hash());
    }

    #[test]
    fn test_validate_layout() {
        assert!(validate_layout(FEATURE_VERSION, layout_hash()).is_ok());
        assert!(validate_layout(FEATURE_VERSION + 1, layout_hash()).is_err());

        let err = validate_layout(FEATURE_VERSION, layout_hash().wrapping_add(1)).unwrap_err();
        assert_eq!(err.expected_hash, layout_hash());
        assert!(err.to_string().contains("mismatch"));
    }

    #[test]
    fn test_declared_layout_matches_current() {
        let names: Vec<String> = FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect();
        assert_eq!(LayoutInfo::declared(&names), LayoutInfo::current());
        assert!(describe_order_diff(&names).is_empty());
    }

    #[test]
    fn test_describe_order_diff() {
        let mut names: Vec<String> = FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect();
        names.swap(0, 1);
        let diffs = describe_order_diff(&names);
        assert_eq!(diffs.len(), 2);
        assert!(diffs[0].contains("position 0"));
    }

    #[test]
    fn test_feature_index() {
        assert_eq!(feature_index("Transaction_Amount"), Some(IDX_AMOUNT));
        assert_eq!(feature_index("Merchant_Risk_Score"), Some(IDX_MERCHANT_RISK));
        assert_eq!(feature_index("Transaction_Velocity"), Some(IDX_VELOCITY));
        assert_eq!(feature_index("transaction_amount"), None);
        assert_eq!(feature_name(IDX_TIME), Some("Transaction_Time"));
        assert_eq!(feature_name(5), None);
    }
}
