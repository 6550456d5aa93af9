//! Shared domain types for the cloud cost calculator.
//!
//! Holds the billing and report models, the error taxonomy, the JSON
//! configuration, CLI settings, the billing-period calendar and the
//! synthetic-unit rule table.

pub mod config;
pub mod error;
pub mod models;
pub mod period;
pub mod settings;
pub mod units;

pub use error::{CostError, Result};
