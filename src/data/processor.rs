//! Dataset loading, validation and chart-oriented transformation.
//!
//! ## Column selection
//!
//! | chart type           | x                         | y                                |
//! |----------------------|---------------------------|----------------------------------|
//! | bar, line, pie       | first column, as labels   | first numeric column other than x |
//! | time_series          | first temporal column     | first numeric column other than x |
//!
//! First match wins; no attempt is made to pick the "best" candidate.

use crate::constants::{DEFAULT_MISSING_THRESHOLD, MAX_CSV_ROWS, MAX_CSV_SIZE_MB};
use crate::data::csv_parser::{self, detect_delimiter, read_sample};
use crate::data::error::{DataError, DataResult, TransformError};
use crate::data::infer::looks_like_number;
use crate::data::json_parser;
use crate::data::lazy_source;
use crate::perf::PerformanceMonitor;
use crate::types::{
    ChartData, ChartType, ChartValue, ColumnData, ColumnType, TabularDataset, ValidationResult,
    Value,
};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Tunables for loading and validation
#[derive(Clone, Debug, PartialEq)]
pub struct ProcessorConfig {
    /// Missing fraction above which a column draws a warning
    pub missing_threshold: f64,
    /// Row cap for the eager CSV reader
    pub max_eager_rows: usize,
    /// File size cap (MB) for the eager CSV reader
    pub max_eager_size_mb: u64,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            missing_threshold: DEFAULT_MISSING_THRESHOLD,
            max_eager_rows: MAX_CSV_ROWS,
            max_eager_size_mb: MAX_CSV_SIZE_MB,
        }
    }
}

/// Parses, validates and reshapes tabular data for charting.
///
/// Stateless apart from its configuration and an optional monitor handle;
/// every operation is a function of its inputs.
#[derive(Clone, Debug, Default)]
pub struct DataProcessor {
    config: ProcessorConfig,
    monitor: Option<PerformanceMonitor>,
}

impl DataProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ProcessorConfig) -> Self {
        Self {
            config,
            monitor: None,
        }
    }

    /// Time every operation into `monitor`
    pub fn with_monitor(mut self, monitor: PerformanceMonitor) -> Self {
        self.monitor = Some(monitor);
        self
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    fn instrument<T>(&self, operation: &str, f: impl FnOnce() -> T) -> T {
        match &self.monitor {
            Some(monitor) => monitor.track(operation, f),
            None => f(),
        }
    }

    // ========================================================================
    // Parsing
    // ========================================================================

    /// Read a delimited file with a header row.
    ///
    /// Files above the eager size or row cap are loaded through polars.
    pub fn parse_csv(&self, path: impl AsRef<Path>) -> DataResult<TabularDataset> {
        let path = path.as_ref();
        self.instrument("parse_csv", || {
            let metadata = std::fs::metadata(path).map_err(|_| DataError::NotFound {
                path: path.to_path_buf(),
            })?;

            let size_mb = metadata.len() / (1024 * 1024);
            let result = if size_mb > self.config.max_eager_size_mb {
                debug!(path = %path.display(), size_mb, "File exceeds eager size cap, using polars");
                self.load_large_csv(path)
            } else {
                match csv_parser::parse_csv_file(path, self.config.max_eager_rows) {
                    Err(DataError::TooManyRows { rows, max_rows }) => {
                        debug!(path = %path.display(), rows, max_rows, "Row cap exceeded, using polars");
                        self.load_large_csv(path)
                    }
                    other => other,
                }
            };

            if let Ok(dataset) = &result {
                debug!(
                    path = %path.display(),
                    rows = dataset.len(),
                    columns = dataset.column_count(),
                    "Parsed CSV"
                );
            }
            result
        })
    }

    fn load_large_csv(&self, path: &Path) -> DataResult<TabularDataset> {
        let sample = read_sample(path)?;
        lazy_source::load_csv_frame(path, detect_delimiter(path, &sample))
    }

    /// Parse a JSON array of uniform records
    pub fn parse_json(&self, text: &str) -> DataResult<TabularDataset> {
        self.instrument("parse_json", || json_parser::parse_json_content(text))
    }

    /// Read and parse a JSON file
    pub fn parse_json_file(&self, path: impl AsRef<Path>) -> DataResult<TabularDataset> {
        let path = path.as_ref();
        self.instrument("parse_json", || {
            if !path.exists() {
                return Err(DataError::NotFound {
                    path: path.to_path_buf(),
                });
            }
            json_parser::parse_json_file(path)
        })
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Run every check and collect the findings. No check short-circuits another.
    pub fn validate_data(&self, dataset: &TabularDataset) -> ValidationResult {
        self.instrument("validate_data", || self.run_checks(dataset))
    }

    fn run_checks(&self, dataset: &TabularDataset) -> ValidationResult {
        let mut result = ValidationResult::new();

        if dataset.is_empty() {
            result.add_error("dataset contains no rows");
        }

        if dataset.column_count() == 0 {
            result.add_error("dataset contains no columns");
        }

        let mut seen: HashMap<&str, usize> = HashMap::new();
        for name in dataset.column_names() {
            let count = seen.entry(name).or_insert(0);
            *count += 1;
            if *count == 2 {
                result.add_error(format!("duplicate column name: {}", name));
            }
        }

        if !dataset.is_empty() {
            for column in dataset.columns() {
                let missing = column.data().null_count() as f64 / dataset.len() as f64;
                if missing > self.config.missing_threshold {
                    result.add_warning(format!(
                        "Column '{}' has {:.0}% missing values",
                        column.name(),
                        missing * 100.0
                    ));
                    result.add_suggested_fix(format!(
                        "consider dropping or imputing column {}",
                        column.name()
                    ));
                }
            }
        }

        for column in dataset.columns() {
            if mixes_numeric_and_text(column.data()) {
                result.add_warning(format!(
                    "Column '{}' mixes numeric and non-numeric values",
                    column.name()
                ));
                result.add_suggested_fix(format!(
                    "clean non-numeric entries in column {} or treat it as text",
                    column.name()
                ));
            }
        }

        if dataset.column_count() > 0
            && !dataset
                .columns()
                .iter()
                .any(|c| c.column_type() == ColumnType::Numeric)
        {
            result.add_warning("dataset has no numeric column to plot");
            result.add_suggested_fix("add or convert a numeric column for the y axis");
        }

        result
    }

    // ========================================================================
    // Transformation
    // ========================================================================

    /// Shape a dataset into x/y pairs for the named chart type
    pub fn transform_for_chart(
        &self,
        dataset: &TabularDataset,
        chart_type: &str,
    ) -> Result<ChartData, TransformError> {
        let chart_type: ChartType = chart_type.parse()?;
        self.transform(dataset, chart_type)
    }

    /// Typed variant of [`transform_for_chart`](Self::transform_for_chart)
    pub fn transform(
        &self,
        dataset: &TabularDataset,
        chart_type: ChartType,
    ) -> Result<ChartData, TransformError> {
        self.instrument("transform_for_chart", || select_columns(dataset, chart_type))
    }
}

/// A text column where some values parse as numbers and some do not
fn mixes_numeric_and_text(data: &ColumnData) -> bool {
    if !matches!(data, ColumnData::Text(_) | ColumnData::Categorical { .. }) {
        return false;
    }
    let mut numeric = false;
    let mut text = false;
    for value in data.values() {
        if let Value::Text(s) = value {
            if looks_like_number(&s) {
                numeric = true;
            } else {
                text = true;
            }
            if numeric && text {
                return true;
            }
        }
    }
    false
}

fn select_columns(
    dataset: &TabularDataset,
    chart_type: ChartType,
) -> Result<ChartData, TransformError> {
    if dataset.is_empty() || dataset.column_count() == 0 {
        return Err(TransformError::EmptyDataset);
    }

    let columns = dataset.columns();
    let x_index = match chart_type {
        ChartType::Bar | ChartType::Line | ChartType::Pie => 0,
        ChartType::TimeSeries => columns
            .iter()
            .position(|c| c.column_type() == ColumnType::Temporal)
            .ok_or(TransformError::NoTemporalColumn)?,
    };

    let y_column = columns
        .iter()
        .enumerate()
        .find(|(i, c)| *i != x_index && c.column_type() == ColumnType::Numeric)
        .map(|(_, c)| c)
        .ok_or(TransformError::NoNumericColumn)?;

    let x_data = columns[x_index].data();
    let x_values = x_data
        .values()
        .map(|v| match (chart_type, v) {
            (_, Value::Null) => ChartValue::Missing,
            (ChartType::TimeSeries, Value::Temporal(t)) => ChartValue::Instant(t),
            (_, other) => ChartValue::Label(other.to_string()),
        })
        .collect();

    let y_values = y_column
        .data()
        .values()
        .map(|v| v.as_f64().unwrap_or(f64::NAN))
        .collect();

    Ok(ChartData::from_parts(x_values, y_values))
}
