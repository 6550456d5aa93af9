//! Presentation layer for the cloud cost calculator.
//!
//! Renders scored report rows as a console table and as an `.xlsx` workbook.

pub mod console;
pub mod excel;

pub use cost_core as core;
