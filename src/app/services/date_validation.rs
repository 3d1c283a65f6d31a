//! Strict, staged battle-date validation
//!
//! Distinct from the lenient codec in [`super::date_format`]: this runs at
//! import time to produce actionable diagnostics. Stages short-circuit on
//! the first failure, yielding exactly one typed error per bad date:
//! empty, structural mismatch, month resolution, hour range, minute range,
//! day validity (leap-aware), future date, too old. Each error carries a
//! human-readable suggestion for the UI.

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::date_format::{battle_date_parts, parse_battle_date, resolve_month};
use crate::config::{DateFormat, ImportFormatSettings};
use crate::constants::{FUTURE_GRACE_HOURS, MIN_BATTLE_DATE};

/// Typed battle-date validation error.
///
/// Exactly one is produced per invalid date; variants are ordered by the
/// validation stage that raises them.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "kebab-case")]
pub enum BattleDateError {
    #[error("battle date is empty")]
    Empty,

    #[error("'{raw}' does not match the expected battle date format")]
    InvalidFormat { raw: String },

    #[error("'{token}' is not a recognized month abbreviation")]
    InvalidMonth { token: String },

    #[error("hour {hour} is outside 0-23")]
    InvalidHour { hour: u32 },

    #[error("minute {minute} is outside 0-59")]
    InvalidMinute { minute: u32 },

    #[error("day {day} does not exist in {year}-{month:02}")]
    InvalidDay { year: i32, month: u32, day: u32 },

    #[error("battle date {date} is in the future")]
    FutureDate { date: NaiveDateTime },

    #[error("battle date {date} is before {minimum}")]
    TooOld {
        date: NaiveDateTime,
        minimum: NaiveDate,
    },
}

impl BattleDateError {
    /// Stable machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            BattleDateError::Empty => "empty",
            BattleDateError::InvalidFormat { .. } => "invalid-format",
            BattleDateError::InvalidMonth { .. } => "invalid-month",
            BattleDateError::InvalidHour { .. } => "invalid-hour",
            BattleDateError::InvalidMinute { .. } => "invalid-minute",
            BattleDateError::InvalidDay { .. } => "invalid-day",
            BattleDateError::FutureDate { .. } => "future-date",
            BattleDateError::TooOld { .. } => "too-old",
        }
    }

    /// Human-readable hint shown alongside the error
    pub fn suggestion(&self) -> String {
        match self {
            BattleDateError::Empty => {
                "Add a battle date, or supply a date when importing.".to_string()
            }
            BattleDateError::InvalidFormat { .. } => {
                "Expected a date like 'Oct 14, 2025 13:14'. Check the import date format setting."
                    .to_string()
            }
            BattleDateError::InvalidMonth { token } => format!(
                "'{}' is not a month in the selected import language; check the date format setting.",
                token
            ),
            BattleDateError::InvalidHour { .. } => {
                "Hours must be between 00 and 23 (24-hour clock).".to_string()
            }
            BattleDateError::InvalidMinute { .. } => {
                "Minutes must be between 00 and 59.".to_string()
            }
            BattleDateError::InvalidDay { month, .. } => {
                format!("Month {:02} does not have that many days.", month)
            }
            BattleDateError::FutureDate { .. } => {
                "The date is ahead of the current time; check the year.".to_string()
            }
            BattleDateError::TooOld { minimum, .. } => {
                format!("Dates before {} are assumed to be typos.", minimum)
            }
        }
    }
}

/// Knobs for one validation pass
#[derive(Debug, Clone)]
pub struct ValidationOptions {
    /// Skip the future-date stage
    pub skip_future_check: bool,

    /// Earliest acceptable battle date
    pub min_date: NaiveDate,

    /// Reference "now" for the future-date stage; the current local time
    /// when `None`
    pub now: Option<NaiveDateTime>,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        let (year, month, day) = MIN_BATTLE_DATE;
        Self {
            skip_future_check: false,
            min_date: NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN),
            now: None,
        }
    }
}

impl ValidationOptions {
    /// Disable the future-date stage
    pub fn without_future_check(mut self) -> Self {
        self.skip_future_check = true;
        self
    }

    /// Set the earliest acceptable battle date
    pub fn with_min_date(mut self, min_date: NaiveDate) -> Self {
        self.min_date = min_date;
        self
    }

    /// Pin the reference time used by the future-date stage
    pub fn with_now(mut self, now: NaiveDateTime) -> Self {
        self.now = Some(now);
        self
    }
}

/// Validate a battle-date string, returning the parsed date or the first
/// failing stage's typed error.
pub fn validate_battle_date(
    raw: &str,
    settings: &ImportFormatSettings,
    options: &ValidationOptions,
) -> Result<NaiveDateTime, BattleDateError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(BattleDateError::Empty);
    }

    // Fast path for the default English scheme: generic parsing, then a
    // re-check of the original string's hour/minute. Generic parsers can
    // normalize out-of-range components (25:14 rolling into the next day)
    // instead of rejecting them, and that must surface as invalid input.
    if settings.date_format == DateFormat::MonthFirst {
        if let Some(date) = parse_battle_date(trimmed, settings) {
            if let Some(parts) = battle_date_parts(trimmed) {
                if parts.hour > 23 {
                    return Err(BattleDateError::InvalidHour { hour: parts.hour });
                }
                if parts.minute > 59 {
                    return Err(BattleDateError::InvalidMinute {
                        minute: parts.minute,
                    });
                }
            }
            return check_semantics(date, options);
        }
    }

    let parts = match battle_date_parts(trimmed) {
        Some(parts) => parts,
        None => {
            return Err(BattleDateError::InvalidFormat {
                raw: trimmed.to_string(),
            })
        }
    };

    let month = resolve_month(&parts.month_token, settings.date_format).ok_or_else(|| {
        BattleDateError::InvalidMonth {
            token: parts.month_token.clone(),
        }
    })?;

    if parts.hour > 23 {
        return Err(BattleDateError::InvalidHour { hour: parts.hour });
    }
    if parts.minute > 59 {
        return Err(BattleDateError::InvalidMinute {
            minute: parts.minute,
        });
    }

    // chrono rejects impossible days, including Feb 29 off leap years
    let date = NaiveDate::from_ymd_opt(parts.year, month, parts.day)
        .ok_or(BattleDateError::InvalidDay {
            year: parts.year,
            month,
            day: parts.day,
        })?
        .and_hms_opt(parts.hour, parts.minute, 0)
        .ok_or(BattleDateError::InvalidHour { hour: parts.hour })?;

    check_semantics(date, options)
}

/// Future-date and minimum-age stages, shared by both paths
fn check_semantics(
    date: NaiveDateTime,
    options: &ValidationOptions,
) -> Result<NaiveDateTime, BattleDateError> {
    if !options.skip_future_check {
        let now = options.now.unwrap_or_else(|| Local::now().naive_local());
        let horizon = now + chrono::Duration::hours(FUTURE_GRACE_HOURS);
        if date > horizon {
            return Err(BattleDateError::FutureDate { date });
        }
    }

    let minimum = options.min_date;
    if date.date() < minimum {
        return Err(BattleDateError::TooOld { date, minimum });
    }

    Ok(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    fn options() -> ValidationOptions {
        // Pinned clock so future-date tests are deterministic
        ValidationOptions::default().with_now(dt(2025, 11, 1, 12, 0))
    }

    #[test]
    fn test_valid_canonical_date() {
        let settings = ImportFormatSettings::default();
        assert_eq!(
            validate_battle_date("Oct 14, 2025 13:14", &settings, &options()),
            Ok(dt(2025, 10, 14, 13, 14))
        );
    }

    #[test]
    fn test_empty_and_whitespace() {
        let settings = ImportFormatSettings::default();
        assert_eq!(
            validate_battle_date("", &settings, &options()),
            Err(BattleDateError::Empty)
        );
        assert_eq!(
            validate_battle_date("   ", &settings, &options()),
            Err(BattleDateError::Empty)
        );
    }

    #[test]
    fn test_invalid_format() {
        let settings = ImportFormatSettings::default();
        let err = validate_battle_date("yesterday", &settings, &options()).unwrap_err();
        assert_eq!(err.code(), "invalid-format");
    }

    #[test]
    fn test_invalid_month() {
        let settings = ImportFormatSettings::default();
        let err = validate_battle_date("Smarch 14, 2025 13:14", &settings, &options()).unwrap_err();
        assert_eq!(
            err,
            BattleDateError::InvalidMonth {
                token: "Smarch".to_string()
            }
        );
    }

    #[test]
    fn test_hour_out_of_range_is_not_normalized() {
        let settings = ImportFormatSettings::default();
        let err = validate_battle_date("Oct 14, 2025 25:14", &settings, &options()).unwrap_err();
        assert_eq!(err, BattleDateError::InvalidHour { hour: 25 });
    }

    #[test]
    fn test_minute_out_of_range() {
        let settings = ImportFormatSettings::default();
        let err = validate_battle_date("Oct 14, 2025 13:74", &settings, &options()).unwrap_err();
        assert_eq!(err, BattleDateError::InvalidMinute { minute: 74 });
    }

    #[test]
    fn test_hour_checked_before_minute() {
        let settings = ImportFormatSettings::default();
        let err = validate_battle_date("Oct 14, 2025 25:74", &settings, &options()).unwrap_err();
        assert_eq!(err.code(), "invalid-hour");
    }

    #[test]
    fn test_invalid_day_with_localized_scheme() {
        let settings =
            ImportFormatSettings::default().with_date_format(DateFormat::MonthFirstLowercase);
        let err = validate_battle_date("feb. 30, 2025 13:14", &settings, &options()).unwrap_err();
        assert_eq!(err.code(), "invalid-day");
    }

    #[test]
    fn test_leap_year_day() {
        let settings = ImportFormatSettings::default();
        assert!(validate_battle_date("Feb 29, 2024 10:00", &settings, &options()).is_ok());
        let err = validate_battle_date("Feb 29, 2025 10:00", &settings, &options()).unwrap_err();
        assert_eq!(err.code(), "invalid-day");
    }

    #[test]
    fn test_future_date() {
        let settings = ImportFormatSettings::default();
        let err = validate_battle_date("Oct 14, 2026 13:14", &settings, &options()).unwrap_err();
        assert_eq!(err.code(), "future-date");

        // Within the one-day grace period
        assert!(validate_battle_date("Nov 2, 2025 10:00", &settings, &options()).is_ok());

        // Skippable
        let skip = options().without_future_check();
        assert!(validate_battle_date("Oct 14, 2026 13:14", &settings, &skip).is_ok());
    }

    #[test]
    fn test_too_old() {
        let settings = ImportFormatSettings::default();
        let err = validate_battle_date("Oct 14, 2019 13:14", &settings, &options()).unwrap_err();
        assert_eq!(err.code(), "too-old");

        let relaxed = options().with_min_date(NaiveDate::from_ymd_opt(2019, 1, 1).unwrap());
        assert!(validate_battle_date("Oct 14, 2019 13:14", &settings, &relaxed).is_ok());
    }

    #[test]
    fn test_every_error_carries_a_suggestion() {
        let errors = vec![
            BattleDateError::Empty,
            BattleDateError::InvalidFormat {
                raw: "x".to_string(),
            },
            BattleDateError::InvalidMonth {
                token: "x".to_string(),
            },
            BattleDateError::InvalidHour { hour: 25 },
            BattleDateError::InvalidMinute { minute: 99 },
            BattleDateError::InvalidDay {
                year: 2025,
                month: 2,
                day: 30,
            },
            BattleDateError::FutureDate {
                date: dt(2030, 1, 1, 0, 0),
            },
            BattleDateError::TooOld {
                date: dt(2019, 1, 1, 0, 0),
                minimum: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            },
        ];
        for error in errors {
            assert!(!error.suggestion().is_empty(), "{:?}", error);
        }
    }
}
