//! Battle-date and ISO date/time codec
//!
//! The canonical battle-date textual form is fixed and locale-independent:
//! `"<EnglishMonthAbbrev> <day>, <year> <HH>:<mm>"` (24-hour). That form is
//! what storage holds regardless of the user's display locale. Parsing is
//! lenient and accepts the canonical form directly (generic parse) for the
//! default English scheme, plus a manual grammar resolving localized month
//! abbreviations for every other scheme.
//!
//! Strictness lives elsewhere: the import-time validator in
//! [`super::date_validation`] produces typed diagnostics; this codec just
//! answers "can this be a date".

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use std::sync::LazyLock;

use crate::config::{DateFormat, ImportFormatSettings};
use crate::constants::{
    CANONICAL_BATTLE_DATE_FORMAT, CANONICAL_BATTLE_DATE_PARSE_FORMAT, FILENAME_TIMESTAMP_FORMAT,
    ISO_DATE_FORMAT, ISO_TIME_FORMAT,
};

/// Manual battle-date grammar: `<month-token>[.] <day>[,] <year> <hour>:<minute>`
static BATTLE_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\p{L}+)\.?\s+(\d{1,2}),?\s+(\d{4})\s+(\d{1,2}):(\d{2})$").unwrap()
});

/// Accepted month-token spellings per scheme, lowercased and without the
/// trailing period. French and German lists carry unaccented variants so
/// keyboard-mangled exports still resolve.
const ENGLISH_MONTHS: [&[&str]; 12] = [
    &["jan"],
    &["feb"],
    &["mar"],
    &["apr"],
    &["may"],
    &["jun"],
    &["jul"],
    &["aug"],
    &["sep", "sept"],
    &["oct"],
    &["nov"],
    &["dec"],
];

const FRENCH_MONTHS: [&[&str]; 12] = [
    &["janv", "jan"],
    &["févr", "fevr", "fév", "fev"],
    &["mars"],
    &["avr"],
    &["mai"],
    &["juin"],
    &["juil"],
    &["août", "aout"],
    &["sept", "sep"],
    &["oct"],
    &["nov"],
    &["déc", "dec"],
];

const GERMAN_MONTHS: [&[&str]; 12] = [
    &["jan"],
    &["feb"],
    &["mär", "märz", "maerz", "mar"],
    &["apr"],
    &["mai"],
    &["jun", "juni"],
    &["jul", "juli"],
    &["aug"],
    &["sep", "sept"],
    &["okt"],
    &["nov"],
    &["dez"],
];

/// Month abbreviations used when rendering localized battle dates
const ENGLISH_DISPLAY: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const FRENCH_DISPLAY: [&str; 12] = [
    "janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.", "nov.",
    "déc.",
];
const GERMAN_DISPLAY: [&str; 12] = [
    "Jan.", "Feb.", "März", "Apr.", "Mai", "Juni", "Juli", "Aug.", "Sep.", "Okt.", "Nov.", "Dez.",
];

fn month_table(format: DateFormat) -> &'static [&'static [&'static str]; 12] {
    match format {
        DateFormat::MonthFirst | DateFormat::MonthFirstLowercase => &ENGLISH_MONTHS,
        DateFormat::French => &FRENCH_MONTHS,
        DateFormat::German => &GERMAN_MONTHS,
    }
}

/// Resolve a month token (with or without trailing period, any case)
/// against the scheme's month table, returning the 1-based month
pub fn resolve_month(token: &str, format: DateFormat) -> Option<u32> {
    let normalized = token.trim_end_matches('.').to_lowercase();
    month_table(format)
        .iter()
        .position(|spellings| spellings.contains(&normalized.as_str()))
        .map(|i| i as u32 + 1)
}

/// Format the canonical battle-date form, e.g. `"Oct 14, 2025 13:14"`.
///
/// This is the storage encoding; it never localizes.
pub fn format_canonical_battle_date(date: NaiveDateTime) -> String {
    date.format(CANONICAL_BATTLE_DATE_FORMAT).to_string()
}

/// Format a battle date for display in the given scheme
pub fn format_battle_date_localized(date: NaiveDateTime, settings: &ImportFormatSettings) -> String {
    let month_index = date.month0() as usize;
    let month = match settings.date_format {
        DateFormat::MonthFirst | DateFormat::MonthFirstLowercase => ENGLISH_DISPLAY[month_index],
        DateFormat::French => FRENCH_DISPLAY[month_index],
        DateFormat::German => GERMAN_DISPLAY[month_index],
    };
    let rendered = format!("{} {}", month, date.format("%-d, %Y %H:%M"));
    match settings.date_format {
        DateFormat::MonthFirstLowercase => rendered.to_lowercase(),
        _ => rendered,
    }
}

/// Structural pieces of a battle-date string, before any range checking
#[derive(Debug, Clone, PartialEq)]
pub struct BattleDateParts {
    pub month_token: String,
    pub day: u32,
    pub year: i32,
    pub hour: u32,
    pub minute: u32,
}

/// Split a battle-date string into its structural parts without judging
/// month names or ranges. `None` means the string does not match the
/// grammar at all.
pub fn battle_date_parts(raw: &str) -> Option<BattleDateParts> {
    let caps = BATTLE_DATE_RE.captures(raw.trim())?;
    Some(BattleDateParts {
        month_token: caps[1].to_string(),
        day: caps[2].parse().ok()?,
        year: caps[3].parse().ok()?,
        hour: caps[4].parse().ok()?,
        minute: caps[5].parse().ok()?,
    })
}

/// Parse a battle date in the configured scheme.
///
/// For the default English scheme the canonical form is tried via generic
/// date parsing first; all schemes then fall through to the manual
/// grammar, which resolves the month token against the scheme's table.
pub fn parse_battle_date(raw: &str, settings: &ImportFormatSettings) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if settings.date_format == DateFormat::MonthFirst {
        if let Ok(parsed) =
            NaiveDateTime::parse_from_str(trimmed, CANONICAL_BATTLE_DATE_PARSE_FORMAT)
        {
            return Some(parsed);
        }
    }

    let parts = battle_date_parts(trimmed)?;
    let month = resolve_month(&parts.month_token, settings.date_format)?;
    NaiveDate::from_ymd_opt(parts.year, month, parts.day)?.and_hms_opt(parts.hour, parts.minute, 0)
}

// =============================================================================
// ISO fragments
// =============================================================================

/// Format the ISO date fragment used by the internal `_date` field
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

/// Parse the ISO `yyyy-MM-dd` fragment
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), ISO_DATE_FORMAT).ok()
}

/// Format the ISO time fragment used by the internal `_time` field
pub fn format_iso_time(time: NaiveTime) -> String {
    time.format(ISO_TIME_FORMAT).to_string()
}

/// Parse the ISO `HH:mm:ss` fragment (seconds optional)
pub fn parse_iso_time(raw: &str) -> Option<NaiveTime> {
    let trimmed = raw.trim();
    NaiveTime::parse_from_str(trimmed, ISO_TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .ok()
}

/// Combine internal `_date` and `_time` fragments into a full date
pub fn combine_iso_fragments(date_raw: &str, time_raw: &str) -> Option<NaiveDateTime> {
    let date = parse_iso_date(date_raw)?;
    let time = parse_iso_time(time_raw)?;
    Some(date.and_time(time))
}

/// Filename-safe timestamp, e.g. `2025-10-14_13-14-00`
pub fn format_filename_timestamp(date: NaiveDateTime) -> String {
    date.format(FILENAME_TIMESTAMP_FORMAT).to_string()
}
