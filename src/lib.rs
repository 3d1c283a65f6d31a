//! Tower Importer Library
//!
//! A Rust library for converting tower-defense battle report exports from
//! free-form delimited text into a canonical, locale-independent record set,
//! and back again.
//!
//! This library provides tools for:
//! - Detecting the field delimiter of pasted or uploaded export text
//! - Normalizing arbitrary column headers to internal field keys
//! - Classifying unknown headers against previously seen fields
//! - Parsing locale-dependent numbers and game shorthand notation (`43.91T`)
//! - Validating battle dates with typed, actionable diagnostics
//! - Deriving replacement dates from companion fields when a date is broken
//! - Exporting records to canonical (storage) or localized (user-facing) text
//!
//! The core pipeline is synchronous, single-threaded and side-effect-free:
//! locale configuration is threaded explicitly as
//! [`ImportFormatSettings`], never read from global state.

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod date_format;
        pub mod date_issue;
        pub mod date_validation;
        pub mod delimiter;
        pub mod export;
        pub mod field_builder;
        pub mod field_keys;
        pub mod import;
        pub mod number_format;
        pub mod similarity;
    }
    pub mod adapters {
        pub mod filesystem;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{DataType, Field, FieldValue, Record};
pub use app::services::export::{export_records, ExportResult};
pub use app::services::import::{parse_battle_report, ImportResult};
pub use config::{DateFormat, ExportOptions, ImportFormatSettings, ImportOptions, OutputFormat};

/// Result type alias for the tower importer
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for importer operations.
///
/// The parse and export entry points never fail on malformed input
/// (per-row problems are collected inside their results); this enum covers
/// the surrounding I/O and configuration surface.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}
