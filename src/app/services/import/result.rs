//! Import result and statistics structures

use serde::{Deserialize, Serialize};

use crate::app::models::{DateValidationWarning, FieldMappingReport, Record};

/// Result of one import call
#[derive(Debug, Clone)]
pub struct ImportResult {
    /// Successfully parsed records, in input row order
    pub records: Vec<Record>,

    /// Row counts and per-row error strings
    pub stats: ImportStats,

    /// Classification of every input header against the known corpus
    pub field_mappings: FieldMappingReport,

    /// One warning per record whose battle date failed validation
    pub date_warnings: Vec<DateValidationWarning>,

    /// The input had no battle-date column at all
    pub missing_battle_date_column: bool,
}

/// Row-level parsing statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportStats {
    /// Total number of data rows encountered
    pub total_rows: usize,

    /// Number of records successfully parsed
    pub records_parsed: usize,

    /// Number of rows rejected for structural problems
    pub rejected_rows: usize,

    /// Per-row error strings for rejected rows
    pub errors: Vec<String>,
}

impl ImportStats {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Fraction of data rows that parsed, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_rows == 0 {
            0.0
        } else {
            (self.records_parsed as f64 / self.total_rows as f64) * 100.0
        }
    }
}
