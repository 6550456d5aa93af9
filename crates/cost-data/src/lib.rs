//! Billing ingestion layer.
//!
//! Parses provider billing CSV exports, normalizes instance-hours into
//! average instances per hour and merges the result with the inventory.

pub mod enrichment;
pub mod normalizer;
pub mod parser;

pub use cost_core as core;
