//! Runtime orchestration layer for the cloud cost calculator.
//!
//! Runs the billing sources named in the configuration through parsing,
//! normalization, enrichment and scoring.

pub mod pipeline;

pub use cost_core as core;
pub use cost_data as data;
