//! End-to-end import pipeline tests
//!
//! Exercises the full parse path through the public API: delimiter
//! detection, header normalization, typed field building, timestamp
//! resolution and date-validation reporting.

use chrono::NaiveDate;
use tower_importer::app::models::{DataType, FixSource, MappingStatus};
use tower_importer::config::{DateFormat, ImportFormatSettings, ImportOptions};
use tower_importer::constants::STANDARD_FIELD_KEYS;
use tower_importer::parse_battle_report;

fn options_with_corpus() -> ImportOptions {
    ImportOptions::default()
        .with_known_fields(STANDARD_FIELD_KEYS.iter().map(|s| s.to_string()).collect())
}

#[test]
fn imports_a_standard_game_export() {
    let text = "Battle Date\tTier\tWave\tCoins Earned\tCells Earned\tReal Time\tKilled By\tNotes\n\
                Oct 14, 2025 13:14\t12\t7639\t43.91T\t15.2K\t7h 23m 52s\tDeath Wave\tgood run\n\
                Oct 15, 2025 09:02\t11\t5120\t12.05T\t9.8K\t5h 1m 7s\tRay\tdied early";
    let result = parse_battle_report(text, &options_with_corpus());

    assert_eq!(result.records.len(), 2);
    assert_eq!(result.stats.success_rate(), 100.0);
    assert!(result.date_warnings.is_empty());
    assert!(!result.missing_battle_date_column);

    let first = &result.records[0];
    assert_eq!(first.tier, "12");
    assert_eq!(first.wave, 7639);
    assert_eq!(first.coins_earned, 43.91e12);
    assert_eq!(first.cells_earned, 15_200.0);
    assert_eq!(
        first.timestamp,
        NaiveDate::from_ymd_opt(2025, 10, 14)
            .unwrap()
            .and_hms_opt(13, 14, 0)
            .unwrap()
    );

    // Internal fragments are synthesized from the battle date
    assert_eq!(first.field("_date").unwrap().raw_value, "2025-10-14");
    assert_eq!(first.field("_time").unwrap().raw_value, "13:14:00");

    // Every standard header maps exactly
    assert!(result
        .field_mappings
        .mappings
        .iter()
        .all(|m| m.status == MappingStatus::ExactMatch));
}

#[test]
fn imports_a_french_semicolon_export() {
    let format = ImportFormatSettings::default()
        .with_decimal_separator(',')
        .with_thousands_separator(Some(' '))
        .with_date_format(DateFormat::French);
    let text = "Battle Date;Tier;Wave;Coins Earned\n\
                oct. 14, 2025 13:14;12;7 639;43,91T";
    let options = options_with_corpus().with_format(format);
    let result = parse_battle_report(text, &options);

    assert_eq!(result.records.len(), 1);
    assert!(result.date_warnings.is_empty());
    let record = &result.records[0];
    assert_eq!(record.wave, 7639);
    assert_eq!(record.coins_earned, 43.91e12);
    assert_eq!(record.timestamp.format("%Y-%m-%d %H:%M").to_string(), "2025-10-14 13:14");
}

#[test]
fn reports_broken_dates_with_fix_verdicts() {
    let text = "Battle Date\tTier\tWave\t_date\t_time\n\
                Oct 14, 2025 25:14\t12\t7639\t2025-10-14\t13:14:00\n\
                totally wrong\t11\t5120\t\t\n\
                Oct 16, 2025 10:00\t10\t4000\t\t";
    let result = parse_battle_report(text, &ImportOptions::default());

    assert_eq!(result.records.len(), 3);
    assert_eq!(result.date_warnings.len(), 2);

    let fixable = &result.date_warnings[0];
    assert_eq!(fixable.error.code(), "invalid-hour");
    assert!(fixable.is_fixable);
    assert_eq!(fixable.fix_source, Some(FixSource::InternalFields));

    let broken = &result.date_warnings[1];
    assert_eq!(broken.error.code(), "invalid-format");
    assert!(!broken.is_fixable);

    // Broken rows still produce records; the fix is never applied silently
    assert_eq!(
        result.records[0].battle_date().unwrap().data_type(),
        DataType::String
    );
}

#[test]
fn flags_similar_and_new_headers() {
    let text = "Tier\tCoins earned\tTotal Damage Dealt\n12\t1.5K\t9.9q";
    let result = parse_battle_report(text, &options_with_corpus());

    let mappings = &result.field_mappings.mappings;
    assert_eq!(mappings[0].status, MappingStatus::ExactMatch);
    assert_eq!(mappings[1].status, MappingStatus::ExactMatch);
    assert_eq!(mappings[2].status, MappingStatus::NewField);

    let new_fields: Vec<_> = result.field_mappings.new_fields().collect();
    assert_eq!(new_fields.len(), 1);
    assert_eq!(new_fields[0].field_key, "totalDamageDealt");
}

#[test]
fn tolerates_partially_broken_input() {
    let text = "Tier\tWave\n12\t7639\ngarbage\trow\twith\textra\tvalues\n11\t5120";
    let result = parse_battle_report(text, &ImportOptions::default());

    assert_eq!(result.stats.total_rows, 3);
    assert_eq!(result.stats.rejected_rows, 1);
    assert_eq!(result.records.len(), 2);
    assert_eq!(result.stats.success_rate(), (2.0 / 3.0) * 100.0);
}
