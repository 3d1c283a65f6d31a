//! Configuration value objects for import and export.
//!
//! Locale configuration is never read from global state: every parse or
//! format call receives an immutable [`ImportFormatSettings`] describing how
//! the *input* text writes numbers and dates. The canonical storage form is
//! a fixed settings value ([`ImportFormatSettings::canonical`]) so stored
//! text is immune to later locale changes.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_DELIMITER;

/// Month-name scheme used by battle dates in imported text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateFormat {
    /// English month abbreviation first: `Oct 14, 2025 13:14` (the game's
    /// default export form and the canonical storage form)
    #[default]
    MonthFirst,
    /// Lowercased English month abbreviation: `oct 14, 2025 13:14`
    MonthFirstLowercase,
    /// French month abbreviation: `oct. 14, 2025 13:14`
    French,
    /// German month abbreviation: `Okt. 14, 2025 13:14`
    German,
}

impl DateFormat {
    /// Parse a CLI/storage spelling of the scheme name
    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "month-first" => Ok(Self::MonthFirst),
            "month-first-lowercase" => Ok(Self::MonthFirstLowercase),
            "french" => Ok(Self::French),
            "german" => Ok(Self::German),
            other => Err(format!(
                "unknown date format '{}' (expected month-first, month-first-lowercase, french or german)",
                other
            )),
        }
    }
}

/// How the imported text writes numbers and dates.
///
/// Immutable per parse call; the core only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportFormatSettings {
    /// Decimal separator, `.` or `,`
    pub decimal_separator: char,

    /// Thousands separator, if the input groups digits (`.`, `,` or space)
    pub thousands_separator: Option<char>,

    /// Month-name scheme for battle dates
    pub date_format: DateFormat,
}

impl Default for ImportFormatSettings {
    fn default() -> Self {
        Self {
            decimal_separator: '.',
            thousands_separator: Some(','),
            date_format: DateFormat::MonthFirst,
        }
    }
}

impl ImportFormatSettings {
    /// The canonical storage form: period decimal, no grouping, English
    /// month names. Locale-independent by construction.
    pub fn canonical() -> Self {
        Self {
            decimal_separator: '.',
            thousands_separator: None,
            date_format: DateFormat::MonthFirst,
        }
    }

    /// Set the decimal separator
    pub fn with_decimal_separator(mut self, sep: char) -> Self {
        self.decimal_separator = sep;
        self
    }

    /// Set or clear the thousands separator
    pub fn with_thousands_separator(mut self, sep: Option<char>) -> Self {
        self.thousands_separator = sep;
        self
    }

    /// Set the battle-date month scheme
    pub fn with_date_format(mut self, format: DateFormat) -> Self {
        self.date_format = format;
        self
    }
}

/// Options for one call to the import parser
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Field delimiter; auto-detected from the header row when `None`
    pub delimiter: Option<char>,

    /// How the input text writes numbers and dates
    pub format: ImportFormatSettings,

    /// User-supplied date applied when a record has no derivable date
    /// (e.g. a date-picker value)
    pub fallback_date: Option<NaiveDateTime>,

    /// Field keys observed in prior imports, the corpus for similarity
    /// classification of incoming headers
    pub known_fields: Vec<String>,
}

impl ImportOptions {
    /// Force a specific delimiter instead of auto-detecting
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Set the input format settings
    pub fn with_format(mut self, format: ImportFormatSettings) -> Self {
        self.format = format;
        self
    }

    /// Set the fallback date for records with broken dates
    pub fn with_fallback_date(mut self, date: NaiveDateTime) -> Self {
        self.fallback_date = Some(date);
        self
    }

    /// Set the known-field corpus for header classification
    pub fn with_known_fields(mut self, fields: Vec<String>) -> Self {
        self.known_fields = fields;
        self
    }
}

/// Numeric rendering mode for export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Period decimal, no grouping, English month names. Safe for
    /// persistent storage regardless of later locale changes.
    #[default]
    Canonical,
    /// Current display locale's separators and month names, for
    /// user-facing file export
    Localized,
}

impl OutputFormat {
    /// Parse a CLI spelling of the output format
    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "canonical" => Ok(Self::Canonical),
            "localized" => Ok(Self::Localized),
            other => Err(format!(
                "unknown output format '{}' (expected canonical or localized)",
                other
            )),
        }
    }
}

/// Options for one call to the export codec
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Field delimiter joining exported values
    pub delimiter: char,

    /// Include internal `_`-prefixed fields in the output
    pub include_app_fields: bool,

    /// Canonical (storage) or localized (user-facing) rendering
    pub output_format: OutputFormat,

    /// Display locale used when `output_format` is localized; ignored for
    /// canonical output
    pub display_format: ImportFormatSettings,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            include_app_fields: true,
            output_format: OutputFormat::Canonical,
            display_format: ImportFormatSettings::default(),
        }
    }
}

impl ExportOptions {
    /// Set the delimiter
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Exclude internal `_`-prefixed fields from the output
    pub fn without_app_fields(mut self) -> Self {
        self.include_app_fields = false;
        self
    }

    /// Set the output rendering mode
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Set the display locale for localized output
    pub fn with_display_format(mut self, format: ImportFormatSettings) -> Self {
        self.display_format = format;
        self
    }
}
