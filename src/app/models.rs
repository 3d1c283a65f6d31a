//! Data models for battle report imports
//!
//! This module contains the core data structures for representing imported
//! battle records: the per-field tagged value union, the record with its
//! cached projections, and the report structures surfaced to callers after
//! a parse (field-mapping classifications and date-validation warnings).

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::app::services::date_validation::BattleDateError;
use crate::constants::fields;

// =============================================================================
// Fields
// =============================================================================

/// Runtime type tag of a field value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Plain numeric value (possibly parsed from shorthand notation)
    Number,
    /// Elapsed time stored as seconds
    Duration,
    /// Calendar date and time
    Date,
    /// Free text
    String,
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DataType::Number => "number",
            DataType::Duration => "duration",
            DataType::Date => "date",
            DataType::String => "string",
        };
        write!(f, "{}", name)
    }
}

/// Coerced field value, tagged by kind.
///
/// The variant always matches the field's [`DataType`]: durations are
/// seconds, dates are naive local times.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Duration(f64),
    Date(NaiveDateTime),
    Text(String),
}

impl FieldValue {
    /// The type tag for this value
    pub fn data_type(&self) -> DataType {
        match self {
            FieldValue::Number(_) => DataType::Number,
            FieldValue::Duration(_) => DataType::Duration,
            FieldValue::Date(_) => DataType::Date,
            FieldValue::Text(_) => DataType::String,
        }
    }

    /// Numeric view: numbers and durations (seconds)
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) | FieldValue::Duration(n) => Some(*n),
            _ => None,
        }
    }

    /// Date view
    pub fn as_date(&self) -> Option<NaiveDateTime> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Text view
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// One imported or derived attribute of a record
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Coerced value
    pub value: FieldValue,

    /// Original text as seen in the input. For derived fields this is a
    /// re-encoded canonical string so re-export round-trips.
    pub raw_value: String,

    /// Human-facing formatted string (locale-aware)
    pub display_value: String,

    /// Header text exactly as supplied, preserved for export fidelity
    pub original_key: String,
}

impl Field {
    /// The type tag of this field's value
    pub fn data_type(&self) -> DataType {
        self.value.data_type()
    }
}

// =============================================================================
// Records
// =============================================================================

/// One parsed battle run.
///
/// The cached scalar projections (`tier`, `wave`, ...) are derived once at
/// construction from `fields` and exist to avoid repeated field lookups
/// downstream; they are never independently mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Opaque unique identifier, assigned at parse time, never reused
    pub id: Uuid,

    /// Best-known date for the run
    pub timestamp: NaiveDateTime,

    /// Internal field key -> field
    pub fields: HashMap<String, Field>,

    /// Tier as displayed (may carry a `+` suffix, e.g. `"10+"`)
    pub tier: String,

    /// Highest wave reached
    pub wave: u32,

    /// Coins earned during the run
    pub coins_earned: f64,

    /// Cells earned during the run
    pub cells_earned: f64,

    /// Wall-clock duration of the run in seconds
    pub real_time: f64,

    /// Run type label (e.g. `"Farming"`, `"Tournament"`)
    pub run_type: String,
}

impl Record {
    /// Build a record from its fields, computing the cached projections
    pub fn new(timestamp: NaiveDateTime, field_map: HashMap<String, Field>) -> Self {
        let tier = field_map
            .get(fields::TIER)
            .map(|f| f.display_value.clone())
            .unwrap_or_default();
        let wave = field_map
            .get(fields::WAVE)
            .and_then(|f| f.value.as_number())
            .map(|n| n.round().max(0.0) as u32)
            .unwrap_or(0);
        let coins_earned = field_map
            .get(fields::COINS_EARNED)
            .and_then(|f| f.value.as_number())
            .unwrap_or(0.0);
        let cells_earned = field_map
            .get(fields::CELLS_EARNED)
            .and_then(|f| f.value.as_number())
            .unwrap_or(0.0);
        let real_time = field_map
            .get(fields::REAL_TIME)
            .and_then(|f| f.value.as_number())
            .unwrap_or(0.0);
        let run_type = field_map
            .get(fields::RUN_TYPE)
            .map(|f| f.display_value.clone())
            .unwrap_or_default();

        Self {
            id: Uuid::new_v4(),
            timestamp,
            fields: field_map,
            tier,
            wave,
            coins_earned,
            cells_earned,
            real_time,
            run_type,
        }
    }

    /// Look up a field by internal key
    pub fn field(&self, key: &str) -> Option<&Field> {
        self.fields.get(key)
    }

    /// The battle-date field, if the record has one
    pub fn battle_date(&self) -> Option<&Field> {
        self.fields.get(fields::BATTLE_DATE)
    }
}

// =============================================================================
// Field Mapping Report
// =============================================================================

/// How a header was matched against the known-field corpus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchMethod {
    /// Identical after normalization and identical raw spelling
    Exact,
    /// Same field, different case or separator convention
    CaseVariation,
    /// Close edit-distance match on normalized forms
    Levenshtein,
}

/// Classification of one input header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MappingStatus {
    /// Header maps to a known field
    ExactMatch,
    /// Header looks like a variant of a known field
    SimilarField,
    /// Header has no close counterpart in the corpus
    NewField,
}

/// Classification result for one input header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Header text as supplied
    pub header: String,

    /// Internal field key the header normalizes to
    pub field_key: String,

    /// Match classification
    pub status: MappingStatus,

    /// Existing field the header probably means, when similar
    pub suggestion: Option<String>,

    /// Similarity method that produced the match
    pub method: Option<MatchMethod>,

    /// Header names an internal `_`-prefixed field
    pub internal: bool,
}

/// Per-import classification of every input header.
///
/// Produced once per parse call; not persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldMappingReport {
    pub mappings: Vec<FieldMapping>,
}

impl FieldMappingReport {
    /// Headers with no counterpart in the known corpus
    pub fn new_fields(&self) -> impl Iterator<Item = &FieldMapping> {
        self.mappings
            .iter()
            .filter(|m| m.status == MappingStatus::NewField)
    }

    /// Headers that look like variants of known fields
    pub fn similar_fields(&self) -> impl Iterator<Item = &FieldMapping> {
        self.mappings
            .iter()
            .filter(|m| m.status == MappingStatus::SimilarField)
    }
}

// =============================================================================
// Date Validation Warnings
// =============================================================================

/// Where a replacement date for a broken battle date can come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FixSource {
    /// Derived from the paired internal `_date`/`_time` fields
    InternalFields,
    /// Caller-supplied date (e.g. a date-picker value)
    FallbackDate,
}

/// One record whose battle date failed validation.
///
/// Carries enough context (tier/wave/duration) for a human to locate the
/// row, plus a fixability verdict and the exact replacement value when one
/// is derivable. The fix is reported, never applied automatically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateValidationWarning {
    /// 1-based data row number the record came from
    pub row_number: usize,

    /// Offending date text exactly as imported
    pub raw_value: String,

    /// Typed validation error
    pub error: BattleDateError,

    /// Tier of the affected run, for identification
    pub tier: String,

    /// Wave of the affected run, for identification
    pub wave: u32,

    /// Displayed duration of the affected run, for identification
    pub duration: String,

    /// Whether a deterministic replacement date exists
    pub is_fixable: bool,

    /// Source of the replacement date, when fixable
    pub fix_source: Option<FixSource>,

    /// The replacement date, when fixable
    pub derived_date: Option<NaiveDateTime>,
}
