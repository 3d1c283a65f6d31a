//! Application constants for the tower importer
//!
//! This module contains the magnitude suffix table, canonical date formats,
//! field-key tables and default values used throughout the importer.

// =============================================================================
// Shorthand Magnitude Suffixes
// =============================================================================

/// Magnitude suffixes used by the game's shorthand number notation.
///
/// Ordered table of powers of 1000 from 10^3 (`K`) through 10^63 (`aj`).
/// Matching is case-sensitive: `q` = 10^15 while `Q` = 10^18. All entries
/// are exactly 1000x apart, which lets the formatter compute the suffix
/// index from `log10` instead of scanning the table.
pub const MAGNITUDE_SUFFIXES: &[&str] = &[
    "K", "M", "B", "T", "q", "Q", "s", "S", "O", "N", "D", "aa", "ab", "ac", "ad", "ae", "af",
    "ag", "ah", "ai", "aj",
];

/// Multipliers paired with [`MAGNITUDE_SUFFIXES`]. Kept as literals so the
/// values are the correctly rounded powers of ten rather than accumulated
/// float products.
const SUFFIX_MULTIPLIERS: &[f64] = &[
    1e3, 1e6, 1e9, 1e12, 1e15, 1e18, 1e21, 1e24, 1e27, 1e30, 1e33, 1e36, 1e39, 1e42, 1e45, 1e48,
    1e51, 1e54, 1e57, 1e60, 1e63,
];

/// Multiplier for the suffix at `index` in [`MAGNITUDE_SUFFIXES`]
pub fn suffix_multiplier(index: usize) -> f64 {
    SUFFIX_MULTIPLIERS[index]
}

/// Look up a suffix string, returning its multiplier (case-sensitive)
pub fn suffix_lookup(suffix: &str) -> Option<f64> {
    MAGNITUDE_SUFFIXES
        .iter()
        .position(|s| *s == suffix)
        .map(suffix_multiplier)
}

// =============================================================================
// Date and Time Formats
// =============================================================================

/// Canonical battle-date format written to storage, e.g. `"Oct 14, 2025 13:14"`.
///
/// English month abbreviation, unpadded day, 24-hour clock. This form is
/// locale-independent and must never change with the user's display locale.
pub const CANONICAL_BATTLE_DATE_FORMAT: &str = "%b %-d, %Y %H:%M";

/// Parse counterpart of [`CANONICAL_BATTLE_DATE_FORMAT`] (chrono accepts
/// unpadded days through `%d` when parsing)
pub const CANONICAL_BATTLE_DATE_PARSE_FORMAT: &str = "%b %d, %Y %H:%M";

/// ISO date fragment used by the internal `_date` field
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// ISO time fragment used by the internal `_time` field
pub const ISO_TIME_FORMAT: &str = "%H:%M:%S";

/// Filename-safe timestamp variant, e.g. `2025-10-14_13-14-00`
pub const FILENAME_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Battle dates before this are reported as `too-old` (the game did not
/// exist before 2020)
pub const MIN_BATTLE_DATE: (i32, u32, u32) = (2020, 1, 1);

/// Grace period for the future-date check, one day plus clock-skew allowance
pub const FUTURE_GRACE_HOURS: i64 = 26;

// =============================================================================
// Field Keys
// =============================================================================

/// Internal field keys referenced throughout the pipeline
pub mod fields {
    /// Primary per-record timestamp field
    pub const BATTLE_DATE: &str = "battleDate";

    /// Internal ISO date fragment paired with [`TIME`]
    pub const DATE: &str = "_date";

    /// Internal ISO time fragment paired with [`DATE`]
    pub const TIME: &str = "_time";

    /// Free-text notes, escape-encoded in storage
    pub const NOTES: &str = "notes";

    pub const TIER: &str = "tier";
    pub const WAVE: &str = "wave";
    pub const COINS_EARNED: &str = "coinsEarned";
    pub const CELLS_EARNED: &str = "cellsEarned";
    pub const REAL_TIME: &str = "realTime";
    pub const RUN_TYPE: &str = "runType";
}

/// Legacy internal field names migrated to their current spelling when seen
/// in imported headers
pub const LEGACY_FIELD_NAMES: &[(&str, &str)] = &[
    ("date", "_date"),
    ("time", "_time"),
    ("note", "notes"),
    ("runtype", "runType"),
];

/// Fixed ordering of internal fields at the front of exported files
pub const INTERNAL_FIELD_ORDER: &[&str] = &[fields::DATE, fields::TIME];

/// Field keys of the game's standard export columns, used to seed the
/// similarity classifier when no prior import corpus exists
pub const STANDARD_FIELD_KEYS: &[&str] = &[
    fields::BATTLE_DATE,
    fields::TIER,
    fields::WAVE,
    fields::COINS_EARNED,
    fields::CELLS_EARNED,
    fields::REAL_TIME,
    fields::RUN_TYPE,
    "gameTime",
    "killedBy",
    "coinsPerMinute",
    "rerollShardsEarned",
    "gameVersion",
    fields::NOTES,
];

// =============================================================================
// Parsing Defaults
// =============================================================================

/// Delimiter assumed when detection finds nothing (the game's primary
/// export format is tab-separated)
pub const DEFAULT_DELIMITER: char = '\t';

/// Delimiter candidates counted by the detector, in tie-break priority order
pub const DELIMITER_CANDIDATES: &[char] = &['\t', ',', ';'];

/// Minimum normalized similarity for a Levenshtein field match
pub const SIMILARITY_THRESHOLD: f64 = 0.85;

/// Score reported for a case/separator-variation field match
pub const CASE_VARIATION_SCORE: f64 = 0.95;

/// Maximum example values collected per delimiter-conflict field
pub const MAX_CONFLICT_EXAMPLES: usize = 3;
