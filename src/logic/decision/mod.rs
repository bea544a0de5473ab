//! Decision Module
//!
//! Turns model output into a Legitimate/Fraudulent verdict.
//!
//! ## Structure
//! - `types`: Decision, Verdict
//! - `engine`: schema check + decision rule
//!
//! ## Usage
//! ```ignore
//! use fraud_scoring_core::logic::decision::{score, Decision};
//!
//! let verdict = score(model.as_ref(), &features, Threshold::default())?;
//! match verdict.decision {
//!     Decision::Legitimate => println!("OK"),
//!     Decision::Fraudulent => println!("Review"),
//! }
//! ```

pub mod types;
pub mod engine;


pub use types::{Decision, Verdict};
pub use engine::{check_schema, score, DecisionEngine};
