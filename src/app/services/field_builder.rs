//! Building one typed field from a header/value pair
//!
//! Type resolution is an ordered rule table: exact lower-cased header
//! matches first (so `_time` stays a string instead of matching the
//! `*time*` duration pattern), then the tier `"10+"` special case, then
//! substring patterns, then the numeric default. Coercion never fails a
//! row: an unparseable date degrades to a string field, an unparseable
//! number to 0.

use regex::Regex;
use std::sync::LazyLock;

use super::date_format::{format_battle_date_localized, parse_battle_date};
use super::number_format::{format_number, parse_number};
use crate::app::models::{DataType, Field, FieldValue};
use crate::config::ImportFormatSettings;

/// Duration grammar: day/hour/minute/second groups, all optional
static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(\d+)d)?\s*(?:(\d+)h)?\s*(?:(\d+)m)?\s*(?:(\d+)s)?$").unwrap()
});

/// Escape table for notes text in storage. Notes are free text and may
/// contain any delimiter or newline; they are stored encoded and decoded
/// on read.
const NOTES_ESCAPES: &[(char, &str)] = &[
    ('%', "%25"),
    ('\t', "%09"),
    ('\n', "%0A"),
    ('\r', "%0D"),
    (',', "%2C"),
    (';', "%3B"),
];

/// Resolve the data type for a header/value pair.
///
/// Exact lower-cased header matches take precedence, then the tier plus
/// suffix case, then substring patterns, then number.
pub fn resolve_data_type(original_key: &str, raw_value: &str) -> DataType {
    let lower = original_key.trim().to_lowercase();

    match lower.as_str() {
        // "date" and "time" are the legacy spellings of the internal
        // fragment fields; they hold ISO fragments, not durations or
        // battle dates
        "_date" | "_time" | "date" | "time" | "notes" | "note" | "run type" | "runtype"
        | "killed by" | "killedby" | "game version" | "gameversion" => return DataType::String,
        "battle date" | "battledate" => return DataType::Date,
        _ => {}
    }

    // A tier like "10+" (tournament tiers) stays textual
    if lower == "tier" && raw_value.trim().ends_with('+') {
        return DataType::String;
    }

    if lower.contains("time") {
        DataType::Duration
    } else if lower.contains("date") {
        DataType::Date
    } else {
        DataType::Number
    }
}

/// Build one typed field from an original header and raw string value
pub fn build_field(original_key: &str, raw_value: &str, settings: &ImportFormatSettings) -> Field {
    let raw = raw_value.trim();
    match resolve_data_type(original_key, raw) {
        DataType::Duration => {
            let seconds = parse_duration(raw);
            Field {
                value: FieldValue::Duration(seconds),
                raw_value: raw.to_string(),
                display_value: format_duration(seconds),
                original_key: original_key.to_string(),
            }
        }
        DataType::Date => match parse_battle_date(raw, settings) {
            Some(date) => Field {
                value: FieldValue::Date(date),
                raw_value: raw.to_string(),
                display_value: format_battle_date_localized(date, settings),
                original_key: original_key.to_string(),
            },
            // Unparseable date degrades to a string field
            None => Field {
                value: FieldValue::Text(raw.to_string()),
                raw_value: raw.to_string(),
                display_value: raw.to_string(),
                original_key: original_key.to_string(),
            },
        },
        DataType::Number => {
            let value = parse_number(raw, settings);
            Field {
                value: FieldValue::Number(value),
                raw_value: raw.to_string(),
                display_value: format_number(value, settings),
                original_key: original_key.to_string(),
            }
        }
        DataType::String => {
            let decoded = if is_notes_key(original_key) {
                decode_notes(raw)
            } else {
                raw.to_string()
            };
            Field {
                value: FieldValue::Text(decoded.clone()),
                raw_value: raw.to_string(),
                display_value: decoded,
                original_key: original_key.to_string(),
            }
        }
    }
}

fn is_notes_key(original_key: &str) -> bool {
    matches!(
        original_key.trim().to_lowercase().as_str(),
        "notes" | "note"
    )
}

// =============================================================================
// Durations
// =============================================================================

/// Parse a duration like `"1d 6h 23m 30s"` into seconds. All groups are
/// optional; anything outside the grammar coerces to 0.
pub fn parse_duration(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    let Some(caps) = DURATION_RE.captures(trimmed) else {
        return 0.0;
    };

    let part = |index: usize| -> f64 {
        caps.get(index)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .unwrap_or(0.0)
    };

    part(1) * 86_400.0 + part(2) * 3_600.0 + part(3) * 60.0 + part(4)
}

/// Format seconds as `"1d 6h 23m 30s"`, omitting zero-valued units
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    if total == 0 {
        return "0s".to_string();
    }

    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let secs = total % 60;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{}d", days));
    }
    if hours > 0 {
        parts.push(format!("{}h", hours));
    }
    if minutes > 0 {
        parts.push(format!("{}m", minutes));
    }
    if secs > 0 {
        parts.push(format!("{}s", secs));
    }
    parts.join(" ")
}

// =============================================================================
// Notes encoding
// =============================================================================

/// Encode notes text so it survives any delimiter and line splitting
pub fn encode_notes(text: &str) -> String {
    let mut encoded = String::with_capacity(text.len());
    for ch in text.chars() {
        match NOTES_ESCAPES.iter().find(|(c, _)| *c == ch) {
            Some((_, escape)) => encoded.push_str(escape),
            None => encoded.push(ch),
        }
    }
    encoded
}

/// Decode stored notes text. Inverse of [`encode_notes`]; `%25` is decoded
/// last so escaped percent signs cannot re-trigger other escapes.
pub fn decode_notes(text: &str) -> String {
    let mut decoded = text.to_string();
    for (ch, escape) in NOTES_ESCAPES.iter().rev() {
        decoded = decoded.replace(escape, &ch.to_string());
    }
    decoded
}
