//! Core import parsing orchestration
//!
//! Splits raw text into a header row and data rows, builds one typed field
//! per populated column, resolves each record's timestamp, and collects
//! date-validation warnings with their fixability verdict. Per-row
//! problems never abort the call: the contract is "parse everything
//! parseable, report everything that wasn't".

use chrono::{Local, NaiveDateTime};
use std::collections::HashMap;
use tracing::{debug, info};

use super::result::{ImportResult, ImportStats};
use crate::app::models::{DateValidationWarning, Field, FieldValue, Record};
use crate::app::services::date_format::{format_iso_date, format_iso_time};
use crate::app::services::date_issue::detect_date_issue;
use crate::app::services::date_validation::{validate_battle_date, ValidationOptions};
use crate::app::services::delimiter::detect_delimiter;
use crate::app::services::field_builder::build_field;
use crate::app::services::field_keys::header_to_field_key;
use crate::app::services::similarity::classify_fields;
use crate::config::ImportOptions;
use crate::constants::fields;

/// Parse a battle-report text blob into records plus reports.
///
/// The first non-empty line is the header row; its delimiter is detected
/// unless `options.delimiter` is set. Rows with strictly more values than
/// headers are rejected (counted and reported, parsing continues). Row
/// order in the output always matches row order in the input.
pub fn parse_battle_report(text: &str, options: &ImportOptions) -> ImportResult {
    let mut stats = ImportStats::new();
    let mut records = Vec::new();
    let mut date_warnings = Vec::new();

    let mut lines = text.lines().filter(|line| !line.trim().is_empty());
    let Some(header_line) = lines.next() else {
        debug!("import text contained no header row");
        return ImportResult {
            records,
            stats,
            field_mappings: Default::default(),
            date_warnings,
            missing_battle_date_column: true,
        };
    };

    let delimiter = options
        .delimiter
        .unwrap_or_else(|| detect_delimiter(header_line));

    // Header -> field-key map is built once; legacy names migrate here
    let headers: Vec<String> = split_row(header_line, delimiter);
    let header_keys: Vec<String> = headers.iter().map(|h| header_to_field_key(h)).collect();
    let battle_date_column = header_keys.iter().position(|k| k == fields::BATTLE_DATE);
    let field_mappings = classify_fields(&headers, &options.known_fields);

    let validation = ValidationOptions::default();

    for (index, line) in lines.enumerate() {
        let row_number = index + 1;
        stats.total_rows += 1;

        let values = split_row(line, delimiter);
        if values.len() > headers.len() {
            stats.rejected_rows += 1;
            stats.errors.push(format!(
                "Row {}: {} values for {} headers",
                row_number,
                values.len(),
                headers.len()
            ));
            continue;
        }

        let mut field_map: HashMap<String, Field> = HashMap::new();
        for (column, value) in values.iter().enumerate() {
            if value.trim().is_empty() {
                continue;
            }
            let field = build_field(&headers[column], value, &options.format);
            field_map.insert(header_keys[column].clone(), field);
        }

        let timestamp = resolve_timestamp(&field_map, options.fallback_date);

        let mut battle_date_error = None;
        if let Some(column) = battle_date_column {
            let cell = values.get(column).map(String::as_str).unwrap_or_default();
            if let Err(error) = validate_battle_date(cell, &options.format, &validation) {
                // The warning carries the cell exactly as imported, before
                // trimming and quote stripping
                let raw = line
                    .split(delimiter)
                    .nth(column)
                    .unwrap_or_default()
                    .to_string();
                battle_date_error = Some((raw, error));
            }
        }

        // A battle date that failed validation must not seed the internal
        // fragments, or the issue detector would hand the rejected value
        // back as its own replacement
        if battle_date_error.is_none() {
            synthesize_internal_fields(&mut field_map);
        }
        let record = Record::new(timestamp, field_map);

        if let Some((raw_value, error)) = battle_date_error {
            // Warnings are always collected, even when internal fields
            // make an autofix available; the fix itself is only
            // reported, never applied here.
            let issue = detect_date_issue(&record, Some(&error), options.fallback_date);
            date_warnings.push(DateValidationWarning {
                row_number,
                raw_value,
                error,
                tier: record.tier.clone(),
                wave: record.wave,
                duration: record
                    .field(fields::REAL_TIME)
                    .map(|f| f.display_value.clone())
                    .unwrap_or_default(),
                is_fixable: issue.is_fixable,
                fix_source: issue.fix_source,
                derived_date: issue.derived_date,
            });
        }

        records.push(record);
        stats.records_parsed += 1;
    }

    info!(
        records = stats.records_parsed,
        rejected = stats.rejected_rows,
        warnings = date_warnings.len(),
        "parsed battle report"
    );

    ImportResult {
        records,
        stats,
        field_mappings,
        date_warnings,
        missing_battle_date_column: battle_date_column.is_none(),
    }
}

/// Split one row on the delimiter, trimming whitespace and stripping
/// surrounding quote characters (naive, no escape handling)
fn split_row(line: &str, delimiter: char) -> Vec<String> {
    line.split(delimiter)
        .map(|value| value.trim().trim_matches('"').to_string())
        .collect()
}

/// Resolve a record's timestamp by priority: battle-date field, then the
/// internal `_date`/`_time` pair, then the caller's fallback, then now
fn resolve_timestamp(
    field_map: &HashMap<String, Field>,
    fallback_date: Option<NaiveDateTime>,
) -> NaiveDateTime {
    if let Some(date) = field_map
        .get(fields::BATTLE_DATE)
        .and_then(|field| field.value.as_date())
    {
        return date;
    }

    if let (Some(date_field), Some(time_field)) =
        (field_map.get(fields::DATE), field_map.get(fields::TIME))
    {
        if let Some(combined) = crate::app::services::date_format::combine_iso_fragments(
            &date_field.raw_value,
            &time_field.raw_value,
        ) {
            return combined;
        }
    }

    fallback_date.unwrap_or_else(|| Local::now().naive_local())
}

/// Derive the internal `_date`/`_time` fields from a valid battle date
/// when the input did not carry them. Their raw value is the re-encoded
/// canonical fragment so a later export round-trips.
fn synthesize_internal_fields(field_map: &mut HashMap<String, Field>) {
    let Some(date) = field_map
        .get(fields::BATTLE_DATE)
        .and_then(|field| field.value.as_date())
    else {
        return;
    };

    if !field_map.contains_key(fields::DATE) {
        let encoded = format_iso_date(date.date());
        field_map.insert(
            fields::DATE.to_string(),
            Field {
                value: FieldValue::Text(encoded.clone()),
                raw_value: encoded.clone(),
                display_value: encoded,
                original_key: fields::DATE.to_string(),
            },
        );
    }

    if !field_map.contains_key(fields::TIME) {
        let encoded = format_iso_time(date.time());
        field_map.insert(
            fields::TIME.to_string(),
            Field {
                value: FieldValue::Text(encoded.clone()),
                raw_value: encoded.clone(),
                display_value: encoded,
                original_key: fields::TIME.to_string(),
            },
        );
    }
}
