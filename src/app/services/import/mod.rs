//! Battle-report import parser
//!
//! This module orchestrates the full import pipeline: delimiter detection,
//! header normalization and classification, per-field type coercion, date
//! validation and derivation. It turns a pasted or uploaded text blob into
//! records plus a field-mapping report and date warnings.
//!
//! ## Architecture
//!
//! - [`parser`] - Core parsing orchestration over lines and rows
//! - [`result`] - Import result and statistics structures
//!
//! ## Usage
//!
//! ```rust
//! use tower_importer::app::services::import::parse_battle_report;
//! use tower_importer::config::ImportOptions;
//!
//! let text = "Battle Date\tTier\tWave\nOct 14, 2025 13:14\t12\t7639";
//! let result = parse_battle_report(text, &ImportOptions::default());
//!
//! assert_eq!(result.records.len(), 1);
//! assert_eq!(result.stats.rejected_rows, 0);
//! ```
//!
//! The parser never fails on malformed input: bad rows become entries in
//! the result's error list and parsing continues.

pub mod parser;
pub mod result;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use parser::parse_battle_report;
pub use result::{ImportResult, ImportStats};
