//! Detecting and fixing unusable record dates
//!
//! A record's battle date can be missing (column absent) or invalid
//! (flagged by validation or unparseable). When that happens a replacement
//! may still be derivable: the internal `_date`/`_time` pair written by
//! this app on a previous export is deterministic and user-authored, so it
//! outranks a caller-supplied fallback date. Applying a fix is a pure
//! transformation returning a new record value.

use chrono::NaiveDateTime;
use tracing::debug;

use super::date_format::{
    combine_iso_fragments, format_battle_date_localized, format_canonical_battle_date,
};
use super::date_validation::BattleDateError;
use crate::app::models::{Field, FieldValue, FixSource, Record};
use crate::config::ImportFormatSettings;
use crate::constants::fields;

/// Why a record's date is unusable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateIssueKind {
    /// No battle-date field at all
    Missing,
    /// Battle-date field present but unparseable or flagged by validation
    Invalid,
}

/// Verdict on one record's date
#[derive(Debug, Clone, PartialEq)]
pub struct DateIssueReport {
    /// The problem, or `None` when the date is usable
    pub issue: Option<DateIssueKind>,

    /// Whether a deterministic replacement exists
    pub is_fixable: bool,

    /// Where the replacement comes from, when fixable
    pub fix_source: Option<FixSource>,

    /// The replacement date, when fixable
    pub derived_date: Option<NaiveDateTime>,
}

impl DateIssueReport {
    fn no_issue() -> Self {
        Self {
            issue: None,
            is_fixable: false,
            fix_source: None,
            derived_date: None,
        }
    }
}

/// Decide whether a record's date is usable and, if not, whether a
/// replacement is derivable.
///
/// Fix priority: the internal `_date`+`_time` pair when both are present
/// and jointly constructible, then the caller-supplied fallback date,
/// otherwise unfixable.
pub fn detect_date_issue(
    record: &Record,
    validation_error: Option<&BattleDateError>,
    fallback_date: Option<NaiveDateTime>,
) -> DateIssueReport {
    let battle_date = record.battle_date();
    let date_is_usable = battle_date
        .map(|field| matches!(field.value, FieldValue::Date(_)))
        .unwrap_or(false)
        && validation_error.is_none();
    if date_is_usable {
        return DateIssueReport::no_issue();
    }

    let issue = if battle_date.is_none() {
        DateIssueKind::Missing
    } else {
        DateIssueKind::Invalid
    };

    if let Some(derived) = derive_from_internal_fields(record) {
        debug!(?issue, %derived, "date derivable from internal fields");
        return DateIssueReport {
            issue: Some(issue),
            is_fixable: true,
            fix_source: Some(FixSource::InternalFields),
            derived_date: Some(derived),
        };
    }

    if let Some(fallback) = fallback_date {
        return DateIssueReport {
            issue: Some(issue),
            is_fixable: true,
            fix_source: Some(FixSource::FallbackDate),
            derived_date: Some(fallback),
        };
    }

    DateIssueReport {
        issue: Some(issue),
        is_fixable: false,
        fix_source: None,
        derived_date: None,
    }
}

/// Combine the internal `_date`/`_time` pair, when both fields exist and
/// parse
pub fn derive_from_internal_fields(record: &Record) -> Option<NaiveDateTime> {
    let date_raw = &record.field(fields::DATE)?.raw_value;
    let time_raw = &record.field(fields::TIME)?.raw_value;
    combine_iso_fragments(date_raw, time_raw)
}

/// Apply a replacement date, producing a new record value.
///
/// The result carries a freshly-built canonical battle-date field, an
/// updated timestamp and recomputed projections. The input record is
/// untouched; the fixed record keeps its identity.
pub fn apply_date_fix(
    record: &Record,
    date: NaiveDateTime,
    settings: &ImportFormatSettings,
) -> Record {
    let mut fields_map = record.fields.clone();
    let original_key = fields_map
        .get(fields::BATTLE_DATE)
        .map(|field| field.original_key.clone())
        .unwrap_or_else(|| "Battle Date".to_string());

    fields_map.insert(
        fields::BATTLE_DATE.to_string(),
        Field {
            value: FieldValue::Date(date),
            raw_value: format_canonical_battle_date(date),
            display_value: format_battle_date_localized(date, settings),
            original_key,
        },
    );

    let mut fixed = Record::new(date, fields_map);
    fixed.id = record.id;
    fixed
}
