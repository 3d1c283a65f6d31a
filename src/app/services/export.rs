//! Canonical export codec
//!
//! Renders a record set back to delimited text. Column order is stable:
//! the internal `_date`/`_time` pair first, then the battle date, then the
//! remaining columns alphabetically by their original header. Canonical
//! output uses period decimals and English month names so a stored file
//! survives any later locale change; localized output follows the caller's
//! display settings.

use std::collections::HashMap;
use tracing::{info, warn};

use super::date_format::{format_battle_date_localized, format_canonical_battle_date};
use super::field_builder::{encode_notes, format_duration};
use super::number_format::{format_number, format_number_full, has_magnitude_suffix};
use crate::app::models::{Field, FieldValue, Record};
use crate::config::{ExportOptions, ImportFormatSettings, OutputFormat};
use crate::constants::{fields, INTERNAL_FIELD_ORDER, MAX_CONFLICT_EXAMPLES};

/// Result of one export call
#[derive(Debug, Clone)]
pub struct ExportResult {
    /// Rendered delimited text, header row first
    pub csv_content: String,

    /// Fields whose rendered values contained the delimiter
    pub conflicts: Vec<DelimiterConflict>,

    /// Number of exported columns
    pub field_count: usize,

    /// Number of exported data rows
    pub row_count: usize,
}

/// A field whose rendered values clash with the export delimiter.
///
/// Reported as a warning only; conflicting values are exported verbatim and
/// choosing a different delimiter is up to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct DelimiterConflict {
    /// Original header of the affected column
    pub header: String,

    /// Up to [`MAX_CONFLICT_EXAMPLES`] conflicting values
    pub examples: Vec<String>,

    /// Total number of affected rows
    pub affected_rows: usize,
}

/// Render records as delimited text.
///
/// The column set is the union of field keys across all records; a record
/// missing a column exports an empty cell there. Row order matches record
/// order.
pub fn export_records(records: &[Record], options: &ExportOptions) -> ExportResult {
    let columns = collect_columns(records, options);
    let settings = match options.output_format {
        OutputFormat::Canonical => ImportFormatSettings::canonical(),
        OutputFormat::Localized => options.display_format.clone(),
    };

    let delimiter = options.delimiter.to_string();
    let mut conflicts: HashMap<String, DelimiterConflict> = HashMap::new();
    let mut lines = Vec::with_capacity(records.len() + 1);

    lines.push(
        columns
            .iter()
            .map(|c| c.header.as_str())
            .collect::<Vec<_>>()
            .join(&delimiter),
    );

    for record in records {
        let mut cells = Vec::with_capacity(columns.len());
        for column in &columns {
            let rendered = record
                .field(&column.key)
                .map(|field| render_value(&column.key, field, &settings, options))
                .unwrap_or_default();

            if rendered.contains(options.delimiter) {
                let conflict =
                    conflicts
                        .entry(column.key.clone())
                        .or_insert_with(|| DelimiterConflict {
                            header: column.header.clone(),
                            examples: Vec::new(),
                            affected_rows: 0,
                        });
                conflict.affected_rows += 1;
                if conflict.examples.len() < MAX_CONFLICT_EXAMPLES {
                    conflict.examples.push(rendered.clone());
                }
            }
            cells.push(rendered);
        }
        lines.push(cells.join(&delimiter));
    }

    let mut conflicts: Vec<DelimiterConflict> = conflicts.into_values().collect();
    conflicts.sort_by(|a, b| a.header.cmp(&b.header));
    for conflict in &conflicts {
        warn!(
            header = %conflict.header,
            rows = conflict.affected_rows,
            "field values contain the export delimiter"
        );
    }

    info!(
        rows = records.len(),
        columns = columns.len(),
        "exported records"
    );

    ExportResult {
        csv_content: lines.join("\n"),
        conflicts,
        field_count: columns.len(),
        row_count: records.len(),
    }
}

struct Column {
    key: String,
    header: String,
}

/// Assemble the ordered column list: internal fields in their fixed order,
/// the battle date, then everything else alphabetically by original header
fn collect_columns(records: &[Record], options: &ExportOptions) -> Vec<Column> {
    // key -> header from the first record carrying the field
    let mut headers: HashMap<&str, &str> = HashMap::new();
    for record in records {
        for (key, field) in &record.fields {
            headers
                .entry(key.as_str())
                .or_insert(field.original_key.as_str());
        }
    }

    let mut columns = Vec::new();
    if options.include_app_fields {
        for key in INTERNAL_FIELD_ORDER {
            if let Some(header) = headers.remove(key) {
                columns.push(Column {
                    key: key.to_string(),
                    header: header.to_string(),
                });
            }
        }
    }

    if let Some(header) = headers.remove(fields::BATTLE_DATE) {
        columns.push(Column {
            key: fields::BATTLE_DATE.to_string(),
            header: header.to_string(),
        });
    }

    let mut rest: Vec<Column> = headers
        .into_iter()
        .filter(|(key, _)| options.include_app_fields || !key.starts_with('_'))
        .map(|(key, header)| Column {
            key: key.to_string(),
            header: header.to_string(),
        })
        .collect();
    rest.sort_by(|a, b| a.header.cmp(&b.header));
    columns.extend(rest);
    columns
}

/// Render one field value for export.
///
/// Numbers whose original text carried a magnitude suffix re-encode through
/// the shorthand formatter (their precision is only the mantissa's); exact
/// numbers render at full precision. Notes re-encode their escapes so the
/// output survives re-import.
fn render_value(
    key: &str,
    field: &Field,
    settings: &ImportFormatSettings,
    options: &ExportOptions,
) -> String {
    match &field.value {
        FieldValue::Number(value) => {
            if has_magnitude_suffix(&field.raw_value) {
                format_number(*value, settings)
            } else {
                format_number_full(*value, settings)
            }
        }
        FieldValue::Duration(seconds) => format_duration(*seconds),
        FieldValue::Date(date) => match options.output_format {
            OutputFormat::Canonical => format_canonical_battle_date(*date),
            OutputFormat::Localized => format_battle_date_localized(*date, settings),
        },
        FieldValue::Text(text) => {
            if key == fields::NOTES {
                encode_notes(text)
            } else {
                text.clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::services::import::parse_battle_report;
    use crate::config::{DateFormat, ImportOptions, OutputFormat};

    fn import(text: &str) -> Vec<Record> {
        parse_battle_report(text, &ImportOptions::default()).records
    }

    #[test]
    fn test_column_order() {
        let records = import(
            "Battle Date\tTier\tCoins Earned\tNotes\n\
             Oct 14, 2025 13:14\t12\t43.91T\tgood run",
        );
        let result = export_records(&records, &ExportOptions::default());

        let header = result.csv_content.lines().next().unwrap();
        assert_eq!(header, "_date\t_time\tBattle Date\tCoins Earned\tNotes\tTier");
        assert_eq!(result.field_count, 6);
        assert_eq!(result.row_count, 1);
    }

    #[test]
    fn test_app_fields_can_be_excluded() {
        let records = import("Battle Date\tTier\nOct 14, 2025 13:14\t12");
        let result = export_records(&records, &ExportOptions::default().without_app_fields());

        let header = result.csv_content.lines().next().unwrap();
        assert_eq!(header, "Battle Date\tTier");
    }

    #[test]
    fn test_canonical_value_rendering() {
        let records = import(
            "Battle Date\tWave\tCoins Earned\tReal Time\n\
             Oct 14, 2025 13:14\t7639\t43.91T\t7h 23m 52s",
        );
        let result = export_records(&records, &ExportOptions::default().without_app_fields());

        let row = result.csv_content.lines().nth(1).unwrap();
        assert_eq!(row, "Oct 14, 2025 13:14\t43.91T\t7h 23m 52s\t7639");
    }

    #[test]
    fn test_exact_values_keep_full_precision() {
        let records = import("Wave\tCoins Earned\n1234567\t43.91T");
        let result = export_records(&records, &ExportOptions::default());

        // The exact wave count must not collapse into shorthand
        let row = result.csv_content.lines().nth(1).unwrap();
        assert_eq!(row, "43.91T\t1234567");
    }

    #[test]
    fn test_localized_rendering() {
        let records = import("Battle Date\tCoins Earned\nOct 14, 2025 13:14\t43.91T");
        let display = ImportFormatSettings::default()
            .with_decimal_separator(',')
            .with_thousands_separator(Some('.'))
            .with_date_format(DateFormat::German);
        let options = ExportOptions::default()
            .without_app_fields()
            .with_output_format(OutputFormat::Localized)
            .with_display_format(display);
        let result = export_records(&records, &options);

        let row = result.csv_content.lines().nth(1).unwrap();
        assert_eq!(row, "Okt. 14, 2025 13:14\t43,91T");
    }

    #[test]
    fn test_canonical_output_ignores_display_locale() {
        let records = import("Battle Date\tCoins Earned\nOct 14, 2025 13:14\t43.91T");
        let display = ImportFormatSettings::default()
            .with_decimal_separator(',')
            .with_date_format(DateFormat::French);
        let options = ExportOptions::default()
            .without_app_fields()
            .with_display_format(display);
        let result = export_records(&records, &options);

        let row = result.csv_content.lines().nth(1).unwrap();
        assert_eq!(row, "Oct 14, 2025 13:14\t43.91T");
    }

    #[test]
    fn test_notes_are_escape_encoded() {
        let records = import("Tier\tNotes\n12\tdied%2C retried");
        let result = export_records(&records, &ExportOptions::default().with_delimiter(','));

        let row = result.csv_content.lines().nth(1).unwrap();
        assert_eq!(row, "died%2C retried,12");
        assert!(result.conflicts.is_empty());
    }

    #[test]
    fn test_delimiter_conflicts_are_reported_not_fixed() {
        let records = import(
            "Tier\tKilled By\n\
             12\tDeath Wave, Elite\n\
             11\tRay, Boss\n\
             10\tRay, Boss\n\
             9\tRay, Boss\n\
             8\tRay",
        );
        let result = export_records(&records, &ExportOptions::default().with_delimiter(','));

        assert_eq!(result.conflicts.len(), 1);
        let conflict = &result.conflicts[0];
        assert_eq!(conflict.header, "Killed By");
        assert_eq!(conflict.affected_rows, 4);
        assert_eq!(conflict.examples.len(), MAX_CONFLICT_EXAMPLES);
        assert_eq!(conflict.examples[0], "Death Wave, Elite");

        // Values are exported verbatim despite the clash
        assert!(result.csv_content.contains("Death Wave, Elite"));
    }

    #[test]
    fn test_missing_fields_export_empty_cells() {
        let records = import(
            "Tier\tWave\tKilled By\n\
             12\t7639\tRay\n\
             11\t5120\t",
        );
        let result = export_records(&records, &ExportOptions::default());

        let rows: Vec<&str> = result.csv_content.lines().collect();
        assert_eq!(rows[0], "Killed By\tTier\tWave");
        assert_eq!(rows[1], "Ray\t12\t7639");
        assert_eq!(rows[2], "\t11\t5120");
    }

    #[test]
    fn test_round_trip_preserves_values_across_locales() {
        let source = "Battle Date\tTier\tWave\tCoins Earned\n\
                      Oct 14, 2025 13:14\t12\t7639\t43.91T";
        let first = parse_battle_report(source, &ImportOptions::default());
        let exported = export_records(&first.records, &ExportOptions::default());

        // Canonical text re-imports identically even under a European locale
        // default, because canonical numbers carry no grouping
        let second = parse_battle_report(&exported.csv_content, &ImportOptions::default());
        assert_eq!(second.records.len(), 1);
        assert_eq!(second.records[0].wave, 7639);
        assert_eq!(second.records[0].coins_earned, 43.91e12);
        assert_eq!(second.records[0].timestamp, first.records[0].timestamp);
    }

    #[test]
    fn test_empty_record_set() {
        let result = export_records(&[], &ExportOptions::default());
        assert_eq!(result.csv_content, "");
        assert_eq!(result.row_count, 0);
        assert_eq!(result.field_count, 0);
    }
}
