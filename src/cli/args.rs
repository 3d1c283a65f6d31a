//! Command-line argument definitions for the tower importer
//!
//! Defines the CLI surface with the clap derive API. The shared
//! locale/delimiter flags live in [`FormatArgs`] and are flattened into
//! every subcommand.

use chrono::NaiveDateTime;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::{DateFormat, ImportFormatSettings, ImportOptions, OutputFormat};
use crate::constants::STANDARD_FIELD_KEYS;
use crate::{Error, Result};

/// CLI arguments for the tower importer
///
/// Converts tower-defense battle report exports from free-form delimited
/// text into a canonical, locale-independent format and back.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "tower-importer",
    version,
    about = "Import, check and convert tower-defense battle report exports",
    long_about = "Parses battle report exports pasted from the game (tab, comma or \
                  semicolon separated), normalizes locale-dependent numbers and dates \
                  into a canonical storage form, validates battle dates with actionable \
                  diagnostics, and re-exports records for storage or display."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Parse a report and show what was imported
    Import(ImportArgs),
    /// Parse a report and re-export it in canonical or localized form
    Convert(ConvertArgs),
    /// Validate battle dates and report problems with suggested fixes
    Check(CheckArgs),
}

/// Locale and delimiter flags shared by every subcommand
#[derive(Debug, Clone, Parser)]
pub struct FormatArgs {
    /// Field delimiter of the input text
    ///
    /// Accepts `tab`, `comma`, `semicolon` or any single character.
    /// Auto-detected from the header row when omitted.
    #[arg(
        long = "delimiter",
        value_name = "DELIM",
        value_parser = parse_delimiter_arg,
        help = "Field delimiter (tab, comma, semicolon or a single character); auto-detected if omitted"
    )]
    pub delimiter: Option<char>,

    /// Decimal separator used by the input numbers
    #[arg(
        long = "decimal-separator",
        value_name = "CHAR",
        help = "Decimal separator of the input numbers (default: .)"
    )]
    pub decimal_separator: Option<char>,

    /// Thousands separator used by the input numbers
    ///
    /// Pass `none` for input that does not group digits.
    #[arg(
        long = "thousands-separator",
        value_name = "CHAR",
        help = "Thousands separator of the input numbers, or 'none' (default: ,)"
    )]
    pub thousands_separator: Option<String>,

    /// Month-name scheme of the input battle dates
    #[arg(
        long = "date-format",
        value_name = "SCHEME",
        default_value = "month-first",
        help = "Battle-date month scheme: month-first, month-first-lowercase, french or german"
    )]
    pub date_format: String,
}

impl FormatArgs {
    /// Resolve the flags into format settings
    pub fn to_settings(&self) -> Result<ImportFormatSettings> {
        let date_format = DateFormat::parse(&self.date_format).map_err(Error::configuration)?;

        let mut settings = ImportFormatSettings::default().with_date_format(date_format);
        if let Some(sep) = self.decimal_separator {
            settings = settings.with_decimal_separator(sep);
        }
        if let Some(raw) = &self.thousands_separator {
            let sep = match raw.as_str() {
                "none" | "" => None,
                s if s.chars().count() == 1 => s.chars().next(),
                other => {
                    return Err(Error::configuration(format!(
                        "Thousands separator must be a single character or 'none', got '{}'",
                        other
                    )))
                }
            };
            settings = settings.with_thousands_separator(sep);
        }
        Ok(settings)
    }
}

/// Arguments for the import command
#[derive(Debug, Clone, Parser)]
pub struct ImportArgs {
    /// Input file; reads stdin when omitted
    #[arg(
        short = 'i',
        long = "input",
        value_name = "FILE",
        help = "Input report file (stdin if omitted)"
    )]
    pub input: Option<PathBuf>,

    #[command(flatten)]
    pub format: FormatArgs,

    /// Date applied to records whose battle date is missing or broken
    ///
    /// Accepts `YYYY-MM-DD HH:MM` or a bare `YYYY-MM-DD` (midnight).
    #[arg(
        long = "fallback-date",
        value_name = "DATE",
        help = "Fallback date for records without a usable battle date (YYYY-MM-DD [HH:MM])"
    )]
    pub fallback_date: Option<String>,

    /// Output format for the import report
    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Report output format"
    )]
    pub report_format: ReportFormat,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Arguments for the convert command
#[derive(Debug, Clone, Parser)]
pub struct ConvertArgs {
    /// Input file; reads stdin when omitted
    #[arg(
        short = 'i',
        long = "input",
        value_name = "FILE",
        help = "Input report file (stdin if omitted)"
    )]
    pub input: Option<PathBuf>,

    /// Output file; writes stdout when omitted
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help = "Output file (stdout if omitted)"
    )]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub format: FormatArgs,

    /// Delimiter joining exported values
    #[arg(
        long = "output-delimiter",
        value_name = "DELIM",
        value_parser = parse_delimiter_arg,
        default_value = "tab",
        help = "Delimiter for the exported text (tab, comma, semicolon or a single character)"
    )]
    pub output_delimiter: char,

    /// Render numbers and dates in the input locale instead of canonical form
    ///
    /// Localized output follows the same locale flags as the input.
    #[arg(long = "localized", help = "Export in the display locale instead of canonical form")]
    pub localized: bool,

    /// Exclude the internal `_date`/`_time` columns from the output
    #[arg(long = "no-app-fields", help = "Exclude internal _-prefixed columns")]
    pub no_app_fields: bool,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Arguments for the check command
#[derive(Debug, Clone, Parser)]
pub struct CheckArgs {
    /// Input file; reads stdin when omitted
    #[arg(
        short = 'i',
        long = "input",
        value_name = "FILE",
        help = "Input report file (stdin if omitted)"
    )]
    pub input: Option<PathBuf>,

    #[command(flatten)]
    pub format: FormatArgs,

    /// Output format for the check report
    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Report output format"
    )]
    pub report_format: ReportFormat,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Report output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable output
    Human,
    /// JSON for scripting
    Json,
}

/// Parse a delimiter flag value: a named delimiter or a single character
fn parse_delimiter_arg(s: &str) -> std::result::Result<char, String> {
    match s {
        "tab" | "\\t" => Ok('\t'),
        "comma" => Ok(','),
        "semicolon" => Ok(';'),
        s if s.chars().count() == 1 => Ok(s.chars().next().unwrap()),
        other => Err(format!(
            "delimiter must be tab, comma, semicolon or a single character, got '{}'",
            other
        )),
    }
}

/// Parse a fallback-date flag value
fn parse_fallback_date(raw: &str) -> Result<NaiveDateTime> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M") {
        return Ok(date);
    }
    chrono::NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| {
            Error::configuration(format!(
                "Invalid fallback date '{}' (expected YYYY-MM-DD or YYYY-MM-DD HH:MM)",
                raw
            ))
        })
}

impl Args {
    /// Get the command if one was specified
    pub fn get_command(&self) -> Option<Commands> {
        self.command.clone()
    }
}

fn log_level_for(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

fn validate_input_path(input: Option<&PathBuf>) -> Result<()> {
    if let Some(path) = input {
        if !path.exists() {
            return Err(Error::configuration(format!(
                "Input file does not exist: {}",
                path.display()
            )));
        }
    }
    Ok(())
}

impl ImportArgs {
    /// Validate the arguments for consistency
    pub fn validate(&self) -> Result<()> {
        validate_input_path(self.input.as_ref())?;
        self.format.to_settings()?;
        if let Some(raw) = &self.fallback_date {
            parse_fallback_date(raw)?;
        }
        Ok(())
    }

    /// Build the parser options described by these arguments
    pub fn import_options(&self) -> Result<ImportOptions> {
        let mut options = ImportOptions::default()
            .with_format(self.format.to_settings()?)
            .with_known_fields(STANDARD_FIELD_KEYS.iter().map(|s| s.to_string()).collect());
        if let Some(delimiter) = self.format.delimiter {
            options = options.with_delimiter(delimiter);
        }
        if let Some(raw) = &self.fallback_date {
            options = options.with_fallback_date(parse_fallback_date(raw)?);
        }
        Ok(options)
    }

    /// Determine the log level from the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        log_level_for(self.verbose, self.quiet)
    }
}

impl ConvertArgs {
    /// Validate the arguments for consistency
    pub fn validate(&self) -> Result<()> {
        validate_input_path(self.input.as_ref())?;
        self.format.to_settings()?;
        Ok(())
    }

    /// Build the parser options described by these arguments
    pub fn import_options(&self) -> Result<ImportOptions> {
        let mut options = ImportOptions::default()
            .with_format(self.format.to_settings()?)
            .with_known_fields(STANDARD_FIELD_KEYS.iter().map(|s| s.to_string()).collect());
        if let Some(delimiter) = self.format.delimiter {
            options = options.with_delimiter(delimiter);
        }
        Ok(options)
    }

    /// Build the export options described by these arguments
    pub fn export_options(&self) -> Result<crate::config::ExportOptions> {
        let mut options = crate::config::ExportOptions::default()
            .with_delimiter(self.output_delimiter)
            .with_display_format(self.format.to_settings()?);
        if self.localized {
            options = options.with_output_format(OutputFormat::Localized);
        }
        if self.no_app_fields {
            options = options.without_app_fields();
        }
        Ok(options)
    }

    /// Determine the log level from the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        log_level_for(self.verbose, self.quiet)
    }
}

impl CheckArgs {
    /// Validate the arguments for consistency
    pub fn validate(&self) -> Result<()> {
        validate_input_path(self.input.as_ref())?;
        self.format.to_settings()?;
        Ok(())
    }

    /// Build the parser options described by these arguments
    pub fn import_options(&self) -> Result<ImportOptions> {
        let mut options = ImportOptions::default()
            .with_format(self.format.to_settings()?)
            .with_known_fields(STANDARD_FIELD_KEYS.iter().map(|s| s.to_string()).collect());
        if let Some(delimiter) = self.format.delimiter {
            options = options.with_delimiter(delimiter);
        }
        Ok(options)
    }

    /// Determine the log level from the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        log_level_for(self.verbose, self.quiet)
    }
}
