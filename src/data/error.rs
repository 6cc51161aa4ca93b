//! Error types for data operations
//!
//! Structural failures (missing files, unparseable input) surface as
//! `DataError`; chart-type column requirements that cannot be met surface
//! as `TransformError`. Validation findings are never errors: they are
//! collected into a `ValidationResult`.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or building datasets
#[derive(Error, Debug)]
pub enum DataError {
    /// The input path does not exist
    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// IO error from std::io
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed delimited input
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed JSON text
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Well-formed input that does not describe a uniform table
    #[error("Parse error: {0}")]
    Parse(String),

    /// File has no header row
    #[error("Empty file")]
    EmptyFile,

    /// Too many rows for the eager reader
    #[error("Too many rows: {rows} (max {max_rows})")]
    TooManyRows { rows: usize, max_rows: usize },

    /// Values violate a dataset invariant (e.g. unequal column lengths)
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Polars error from the large-file loader
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error(transparent)]
    Transform(#[from] TransformError),
}

impl DataError {
    /// True for the parse-error family (malformed or non-tabular input)
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            DataError::Csv(_) | DataError::Json(_) | DataError::Parse(_) | DataError::EmptyFile
        )
    }
}

/// Result type alias for data operations
pub type DataResult<T> = Result<T, DataError>;

/// Raised when a dataset cannot supply the columns a chart type needs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    #[error("Unknown chart type: {0}")]
    UnknownChartType(String),

    #[error("Dataset contains no rows")]
    EmptyDataset,

    #[error("Time series charts need a temporal column")]
    NoTemporalColumn,

    #[error("No numeric column available for the y axis")]
    NoNumericColumn,
}
