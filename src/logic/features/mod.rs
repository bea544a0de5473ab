//! Features Module - Transaction Feature Vector
//!
//! Fixed-order, versioned input schema for the classifier.

pub mod layout;
pub mod vector;
pub mod bounds;

#[cfg(test)]
mod tests;

// Re-export common types
pub use layout::{LayoutInfo, LayoutMismatchError, FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION};
pub use vector::{TransactionFeatures, TransactionFeaturesBuilder};
pub use bounds::{BoundsViolation, InputBounds};
