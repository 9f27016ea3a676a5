//! Error types for bi-analytics.
//!
//! The engine itself signals "not found" and "insufficient data" through
//! `Option` returns. These errors cover the surfaces around it: config
//! loading, CSV ingestion, file I/O, and the CLI reporting an empty result.
//!
//! Errors serialize to structured JSON for machine consumers:
//! ```json
//! {
//!   "code": 22,
//!   "category": "input",
//!   "message": "CSV parse error on line 4: invalid value 'abc'",
//!   "recoverable": true,
//!   "context": { "line": 4 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for bi-analytics operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Configuration file errors.
    Config,
    /// Dataset and input file errors.
    Input,
    /// Analysis produced no usable result.
    Analysis,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Input => write!(f, "input"),
            ErrorCategory::Analysis => write!(f, "analysis"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for bi-analytics.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid configuration value for {field}: {message}")]
    InvalidConfig { field: String, message: String },

    // Input errors (20-29)
    #[error("CSV parse error on line {line}: {message}")]
    CsvParse { line: usize, message: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    // Analysis errors (30-39)
    #[error("{operation} produced no result for '{dataset}' (need at least {required} points)")]
    NoResult {
        operation: String,
        dataset: String,
        required: usize,
    },

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Configuration errors
    /// - 20-29: Input errors
    /// - 30-39: Analysis errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidConfig { .. } => 11,
            Error::CsvParse { .. } => 22,
            Error::InvalidInput(_) => 23,
            Error::NoResult { .. } => 30,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) | Error::InvalidConfig { .. } => ErrorCategory::Config,
            Error::CsvParse { .. } | Error::InvalidInput(_) => ErrorCategory::Input,
            Error::NoResult { .. } => ErrorCategory::Analysis,
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns whether this error is potentially recoverable by the caller.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Config(_) | Error::InvalidConfig { .. } => true,
            Error::CsvParse { .. } | Error::InvalidInput(_) => true,
            // More data is needed; retrying with the same input cannot help.
            Error::NoResult { .. } => false,
            Error::Io(_) => true,
            Error::Json(_) => true,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::Config(_) => {
                "Run 'bia config validate' to check the configuration file syntax."
            }
            Error::InvalidConfig { .. } => {
                "Fix the named field in analytics.json, or remove it to fall back to the default."
            }
            Error::CsvParse { .. } => {
                "Input must be 'timestamp,value[,date]' rows with epoch-millisecond timestamps."
            }
            Error::InvalidInput(_) => "Check the command arguments and input file.",
            Error::NoResult { .. } => {
                "The series is too short for this analysis. Supply more points or pick another analysis."
            }
            Error::Io(_) => "Check that the file exists and is readable.",
            Error::Json(_) => "Invalid JSON. Check syntax with 'jq .' or restore from backup.",
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::Config(_) => "Configuration Error",
            Error::InvalidConfig { .. } => "Invalid Configuration",
            Error::CsvParse { .. } => "CSV Parse Error",
            Error::InvalidInput(_) => "Invalid Input",
            Error::NoResult { .. } => "No Result",
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Parse Error",
        }
    }

    /// Format for a human reader: headline, reason, and fix.
    pub fn to_human(&self) -> String {
        format!(
            "✗ {}\n  Reason: {}\n  Fix: {}",
            self.headline(),
            self,
            self.remediation()
        )
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Whether the error is potentially recoverable.
    pub recoverable: bool,

    /// Additional structured context (e.g., line number, dataset).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        match err {
            Error::InvalidConfig { field, .. } => {
                context.insert("field".to_string(), serde_json::json!(field));
            }
            Error::CsvParse { line, .. } => {
                context.insert("line".to_string(), serde_json::json!(line));
            }
            Error::NoResult {
                operation,
                dataset,
                required,
            } => {
                context.insert("operation".to_string(), serde_json::json!(operation));
                context.insert("dataset".to_string(), serde_json::json!(dataset));
                context.insert("required_points".to_string(), serde_json::json!(required));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
            context,
        }
    }
}
