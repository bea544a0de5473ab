//! Logic Module - Scoring Core
//!
//! - `features/` - Transaction feature schema (layout, vector, bounds)
//! - `model/` - Scoring model capability (contract, loaders, threshold)
//! - `decision/` - Verdict rule
//! - `scorer` - Façade for presentation layers

pub mod config;
pub mod error;

pub mod features;
pub mod model;
pub mod decision;
pub mod scorer;
