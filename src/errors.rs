use std::fmt;

use thiserror::Error;

/// Error type shared by the aggregation, recommendation and analytics engines.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InsightError {
    #[error("Invalid amount: {0} (a positive amount is required)")]
    InvalidAmount(i64),
    #[error("Invalid {field} range: start {start} is after end {end}")]
    InvalidRange {
        field: RangeField,
        start: String,
        end: String,
    },
    #[error("Insufficient data: {0}")]
    InsufficientData(String),
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Which filter a rejected range belonged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeField {
    Date,
    Amount,
    Period,
}

impl fmt::Display for RangeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RangeField::Date => "date",
            RangeField::Amount => "amount",
            RangeField::Period => "period",
        };
        f.write_str(label)
    }
}

impl InsightError {
    pub fn invalid_range(field: RangeField, start: impl fmt::Display, end: impl fmt::Display) -> Self {
        Self::InvalidRange {
            field,
            start: start.to_string(),
            end: end.to_string(),
        }
    }
}

impl From<std::io::Error> for InsightError {
    fn from(err: std::io::Error) -> Self {
        InsightError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for InsightError {
    fn from(err: serde_json::Error) -> Self {
        InsightError::Storage(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, InsightError>;
