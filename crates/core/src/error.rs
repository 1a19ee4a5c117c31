//! Error types for the volscope system.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the volscope system.
///
/// Insufficient data is not an error: short series produce empty results.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required column is missing from the input.
    #[error("Missing required column '{column}' in {source_name}")]
    MissingColumn { column: String, source_name: String },

    /// A field could not be parsed.
    #[error("Invalid {column} value '{value}' at row {row}")]
    InvalidField {
        row: usize,
        column: String,
        value: String,
    },

    /// A closing price is not a finite number.
    #[error("Invalid close price {close} on {date}")]
    InvalidPrice { date: chrono::NaiveDate, close: f64 },

    /// Arithmetic on corrupt input (zero divisor, non-finite result).
    #[error("Degenerate arithmetic: {0}")]
    DegenerateArithmetic(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a missing column error.
    pub fn missing_column(column: impl Into<String>, source_name: impl Into<String>) -> Self {
        Error::MissingColumn {
            column: column.into(),
            source_name: source_name.into(),
        }
    }

    /// Create an invalid field error.
    pub fn invalid_field(row: usize, column: impl Into<String>, value: impl Into<String>) -> Self {
        Error::InvalidField {
            row,
            column: column.into(),
            value: value.into(),
        }
    }

    /// Create a degenerate arithmetic error.
    pub fn degenerate(msg: impl Into<String>) -> Self {
        Error::DegenerateArithmetic(msg.into())
    }

    /// Whether this error is a precondition failure on the input data.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Error::MissingColumn { .. } | Error::InvalidField { .. } | Error::InvalidPrice { .. }
        )
    }
}
