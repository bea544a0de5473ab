//! Central Configuration Constants
//!
//! Single source of truth for all scoring defaults.
//! Deployments override them through environment variables.

/// Default model artifact path (native tree-ensemble JSON)
pub const DEFAULT_MODEL_PATH: &str = "rf_fraud_model.json";

/// Default fraud threshold (strict `>` on class-1 probability)
pub const DEFAULT_THRESHOLD: f64 = 0.35;

/// Default upper bound for transactions per hour
pub const DEFAULT_VELOCITY_MAX: f64 = 50.0;

/// Maximum seconds since midnight
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Minimum account age in days
pub const MIN_ACCOUNT_AGE_DAYS: f64 = 1.0;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable names
pub const ENV_MODEL_PATH: &str = "FRAUD_MODEL_PATH";
pub const ENV_THRESHOLD: &str = "FRAUD_THRESHOLD";
pub const ENV_VELOCITY_MAX: &str = "FRAUD_VELOCITY_MAX";
pub const ENV_MODEL_SHA256: &str = "FRAUD_MODEL_SHA256";
pub const ENV_CONFIG_FILE: &str = "FRAUD_CONFIG";

// ============================================
// Helper to read from env
// ============================================

/// Read an env value, trimmed (None when unset or blank)
///
/// Parsing is left to the caller so a malformed value surfaces as an error.
pub fn get_raw(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
