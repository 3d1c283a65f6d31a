//! Header normalization to internal field keys
//!
//! Imported headers are user-controlled text ("Battle Date", "coins earned",
//! "REAL_TIME"); internally every field is addressed by a camelCase key.
//! Headers starting with an underscore name app-internal fields and keep
//! their prefix. After normalization, legacy internal names are migrated to
//! their current spelling via a static table.

use crate::constants::LEGACY_FIELD_NAMES;

/// Convert an arbitrary header string to an internal camelCase field key.
///
/// Lower-cases the header, then title-cases each token that follows a
/// non-alphanumeric separator. A leading underscore survives as-is and only
/// the remainder is camelCased.
pub fn normalize_field_key(header: &str) -> String {
    let trimmed = header.trim();
    let (prefix, body) = match trimmed.strip_prefix('_') {
        Some(rest) => ("_", rest),
        None => ("", trimmed),
    };

    let mut key = String::with_capacity(trimmed.len());
    key.push_str(prefix);

    let mut at_boundary = false;
    for ch in body.to_lowercase().chars() {
        if ch.is_alphanumeric() {
            if at_boundary && key.len() > prefix.len() {
                key.extend(ch.to_uppercase());
            } else {
                key.push(ch);
            }
            at_boundary = false;
        } else {
            at_boundary = true;
        }
    }
    key
}

/// Substitute a legacy internal field name with its current spelling
pub fn migrate_legacy_key(key: &str) -> String {
    LEGACY_FIELD_NAMES
        .iter()
        .find(|(old, _)| *old == key)
        .map(|(_, new)| new.to_string())
        .unwrap_or_else(|| key.to_string())
}

/// Full header-to-key pipeline: normalize, then migrate legacy names
pub fn header_to_field_key(header: &str) -> String {
    migrate_legacy_key(&normalize_field_key(header))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case_headers() {
        assert_eq!(normalize_field_key("Battle Date"), "battleDate");
        assert_eq!(normalize_field_key("Coins Earned"), "coinsEarned");
        assert_eq!(normalize_field_key("Tier"), "tier");
    }

    #[test]
    fn test_screaming_snake_and_kebab() {
        assert_eq!(normalize_field_key("REAL_TIME"), "realTime");
        assert_eq!(normalize_field_key("cells-earned"), "cellsEarned");
        assert_eq!(normalize_field_key("  Killed   By "), "killedBy");
    }

    #[test]
    fn test_underscore_prefix_is_preserved() {
        assert_eq!(normalize_field_key("_date"), "_date");
        assert_eq!(normalize_field_key("_Battle Time"), "_battleTime");
    }

    #[test]
    fn test_existing_camel_case_is_flattened() {
        // Lower-casing comes first, so embedded capitals do not survive;
        // the similarity classifier handles re-linking such variants.
        assert_eq!(normalize_field_key("coinsEarned"), "coinsearned");
    }

    #[test]
    fn test_digits_are_token_characters() {
        assert_eq!(normalize_field_key("Wave 2 Bonus"), "wave2Bonus");
    }

    #[test]
    fn test_legacy_migration() {
        assert_eq!(header_to_field_key("Date"), "_date");
        assert_eq!(header_to_field_key("time"), "_time");
        assert_eq!(header_to_field_key("Note"), "notes");
        assert_eq!(header_to_field_key("Battle Date"), "battleDate");
    }
}
