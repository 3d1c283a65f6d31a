//! Test fixtures and helpers for import parser testing

use crate::config::ImportOptions;
use crate::constants::STANDARD_FIELD_KEYS;


/// A well-formed tab-separated export in the game's default format
pub fn standard_report() -> String {
    [
        "Battle Date\tTier\tWave\tCoins Earned\tCells Earned\tReal Time\tKilled By\tNotes",
        "Oct 14, 2025 13:14\t12\t7639\t43.91T\t15.2K\t7h 23m 52s\tDeath Wave\tgood run",
        "Oct 15, 2025 09:02\t11\t5120\t12.05T\t9.8K\t5h 1m 7s\tRay\t",
    ]
    .join("\n")
}

/// Import options seeded with the game's standard field corpus
pub fn standard_options() -> ImportOptions {
    ImportOptions::default()
        .with_known_fields(STANDARD_FIELD_KEYS.iter().map(|s| s.to_string()).collect())
}
