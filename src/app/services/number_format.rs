//! Locale-aware number codec with game shorthand notation
//!
//! The game writes large values in shorthand: a mantissa followed by a
//! magnitude suffix (`43.91T`, `1aa`), with the mantissa localized to the
//! player's separators. Parsing accepts either a plain localized float or a
//! shorthand value; formatting is the inverse. Parsing is total: anything
//! unintelligible coerces to 0, matching the import pipeline's
//! parse-everything-parseable contract.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::config::ImportFormatSettings;
use crate::constants::{suffix_lookup, suffix_multiplier, MAGNITUDE_SUFFIXES};

/// Mantissa with an optional one-or-two-letter magnitude suffix
static SHORTHAND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([+-]?\d*\.?\d+)\s*([A-Za-z]{1,2})$").unwrap());

/// Trailing magnitude suffix of a raw value, if present
static TRAILING_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z]{1,2})$").unwrap());

/// Glyphs stripped from the front of a raw value before numeric parsing:
/// currency markers and the `x` multiplier prefix
const LEADING_GLYPHS: &[char] = &['$', '€', '£', '¥', 'x'];

/// Parse a localized, possibly shorthand number. Unparseable input
/// coerces to 0.
pub fn parse_number(raw: &str, settings: &ImportFormatSettings) -> f64 {
    let mut text = raw.trim();
    while let Some(rest) = text.strip_prefix(LEADING_GLYPHS) {
        text = rest.trim_start();
    }

    let mut normalized = text.to_string();
    if let Some(sep) = settings.thousands_separator {
        normalized = normalized.replace(sep, "");
    }
    if settings.decimal_separator != '.' {
        normalized = normalized.replace(settings.decimal_separator, ".");
    }

    if let Ok(value) = normalized.parse::<f64>() {
        return value;
    }

    if let Some(caps) = SHORTHAND_RE.captures(&normalized) {
        let mantissa: f64 = caps[1].parse().unwrap_or(0.0);
        if let Some(multiplier) = suffix_lookup(&caps[2]) {
            return mantissa * multiplier;
        }
    }

    debug!(raw, "unparseable number, coercing to 0");
    0.0
}

/// Format a number in shorthand notation using `settings`' separators.
///
/// Magnitudes below 1000 render as a rounded plain integer. Larger values
/// pick their suffix in O(1) from `log10` (all multipliers are exactly
/// 1000x apart), round the mantissa to 2 decimals and append the suffix
/// unmodified; the suffix is never localized. Values past the end of the
/// table saturate into the last bucket.
pub fn format_number(value: f64, settings: &ImportFormatSettings) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let abs = value.abs();
    if abs < 1000.0 {
        return format!("{}", value.round() as i64);
    }

    // The small offset keeps exact powers of 1000 in their own bucket when
    // log10 lands an ulp below the integer.
    let index = (((abs.log10() + 1e-9) / 3.0).floor() as i64 - 1)
        .clamp(0, MAGNITUDE_SUFFIXES.len() as i64 - 1) as usize;
    let mantissa = value / suffix_multiplier(index);
    let mut rendered = format!("{:.2}", mantissa);
    if settings.decimal_separator != '.' {
        rendered = rendered.replace('.', &settings.decimal_separator.to_string());
    }
    rendered.push_str(MAGNITUDE_SUFFIXES[index]);
    rendered
}

/// Format a number at full precision, without shorthand or grouping.
///
/// Used on export for values whose original text was an exact number; the
/// decimal separator follows `settings` so the canonical path can force a
/// period while localized export matches the display locale.
pub fn format_number_full(value: f64, settings: &ImportFormatSettings) -> String {
    let rendered = format!("{}", value);
    if settings.decimal_separator != '.' {
        rendered.replace('.', &settings.decimal_separator.to_string())
    } else {
        rendered
    }
}

/// Whether a raw value ends in a known magnitude suffix.
///
/// Such values are re-exported through the shorthand formatter rather than
/// at full precision, since their stored precision is only the mantissa's.
pub fn has_magnitude_suffix(raw: &str) -> bool {
    TRAILING_SUFFIX_RE
        .captures(raw.trim())
        .and_then(|caps| suffix_lookup(&caps[1]))
        .is_some()
}
