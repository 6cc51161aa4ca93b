//! Core value types shared by the processor, optimizer, chart engine and monitor.
//!
//! Every type here is an immutable value once built: datasets are replaced,
//! never edited, by optimizer steps, and chart artifacts are rebuilt rather
//! than patched when their configuration changes.

use crate::constants::{DEFAULT_CHART_HEIGHT, DEFAULT_CHART_WIDTH, DEFAULT_COLOR_SCHEME};
use crate::data::{DataError, DataResult, TransformError};
use chrono::{DateTime, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

// ============================================================================
// Cell Values
// ============================================================================

/// A single decoded cell, independent of how its column is stored.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
    Temporal(NaiveDateTime),
}

impl Value {
    /// Numeric view of the cell (for chart y values)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Equality that treats two NaN floats as the same value.
    pub fn same_as(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Float(a), Value::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            _ => self == other,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => {
                // No trailing zeros for whole numbers
                if v.fract() == 0.0 && v.abs() < 1e15 {
                    write!(f, "{}", *v as i64)
                } else {
                    write!(f, "{}", v)
                }
            }
            Value::Text(s) => f.write_str(s),
            Value::Temporal(t) => {
                if t.num_seconds_from_midnight() == 0 && t.nanosecond() == 0 {
                    write!(f, "{}", t.format("%Y-%m-%d"))
                } else {
                    write!(f, "{}", t.format("%Y-%m-%d %H:%M:%S"))
                }
            }
        }
    }
}

// ============================================================================
// Columns
// ============================================================================

/// Logical type of a column, resolved once at parse time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Numeric,
    Text,
    Temporal,
}

impl ColumnType {
    pub fn label(&self) -> &'static str {
        match self {
            ColumnType::Numeric => "numeric",
            ColumnType::Text => "text",
            ColumnType::Temporal => "temporal",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Physical storage of one column. `None` marks a missing value.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnData {
    Int8(Vec<Option<i8>>),
    Int16(Vec<Option<i16>>),
    Int32(Vec<Option<i32>>),
    Int64(Vec<Option<i64>>),
    Float32(Vec<Option<f32>>),
    Float64(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
    /// Low-cardinality text: each code indexes into `categories`
    Categorical {
        categories: Vec<String>,
        codes: Vec<Option<u32>>,
    },
    Temporal(Vec<Option<NaiveDateTime>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Int8(v) => v.len(),
            ColumnData::Int16(v) => v.len(),
            ColumnData::Int32(v) => v.len(),
            ColumnData::Int64(v) => v.len(),
            ColumnData::Float32(v) => v.len(),
            ColumnData::Float64(v) => v.len(),
            ColumnData::Text(v) => v.len(),
            ColumnData::Categorical { codes, .. } => codes.len(),
            ColumnData::Temporal(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            ColumnData::Int8(_)
            | ColumnData::Int16(_)
            | ColumnData::Int32(_)
            | ColumnData::Int64(_)
            | ColumnData::Float32(_)
            | ColumnData::Float64(_) => ColumnType::Numeric,
            ColumnData::Text(_) | ColumnData::Categorical { .. } => ColumnType::Text,
            ColumnData::Temporal(_) => ColumnType::Temporal,
        }
    }

    /// Name of the physical representation (e.g. "int8", "categorical")
    pub fn representation(&self) -> &'static str {
        match self {
            ColumnData::Int8(_) => "int8",
            ColumnData::Int16(_) => "int16",
            ColumnData::Int32(_) => "int32",
            ColumnData::Int64(_) => "int64",
            ColumnData::Float32(_) => "float32",
            ColumnData::Float64(_) => "float64",
            ColumnData::Text(_) => "text",
            ColumnData::Categorical { .. } => "categorical",
            ColumnData::Temporal(_) => "temporal",
        }
    }

    /// Decode the value at `row`. Out-of-range rows decode as `Null`.
    pub fn value(&self, row: usize) -> Value {
        match self {
            ColumnData::Int8(v) => int_value(v.get(row).copied().flatten()),
            ColumnData::Int16(v) => int_value(v.get(row).copied().flatten()),
            ColumnData::Int32(v) => int_value(v.get(row).copied().flatten()),
            ColumnData::Int64(v) => int_value(v.get(row).copied().flatten()),
            ColumnData::Float32(v) => v
                .get(row)
                .copied()
                .flatten()
                .map_or(Value::Null, |x| Value::Float(x as f64)),
            ColumnData::Float64(v) => v
                .get(row)
                .copied()
                .flatten()
                .map_or(Value::Null, Value::Float),
            ColumnData::Text(v) => v
                .get(row)
                .cloned()
                .flatten()
                .map_or(Value::Null, Value::Text),
            ColumnData::Categorical { categories, codes } => codes
                .get(row)
                .copied()
                .flatten()
                .and_then(|code| categories.get(code as usize))
                .map_or(Value::Null, |s| Value::Text(s.clone())),
            ColumnData::Temporal(v) => v
                .get(row)
                .copied()
                .flatten()
                .map_or(Value::Null, Value::Temporal),
        }
    }

    /// Iterate over every decoded value in row order
    pub fn values(&self) -> impl Iterator<Item = Value> + '_ {
        (0..self.len()).map(move |row| self.value(row))
    }

    pub fn null_count(&self) -> usize {
        match self {
            ColumnData::Int8(v) => count_none(v),
            ColumnData::Int16(v) => count_none(v),
            ColumnData::Int32(v) => count_none(v),
            ColumnData::Int64(v) => count_none(v),
            ColumnData::Float32(v) => count_none(v),
            ColumnData::Float64(v) => count_none(v),
            ColumnData::Text(v) => count_none(v),
            ColumnData::Categorical { codes, .. } => count_none(codes),
            ColumnData::Temporal(v) => count_none(v),
        }
    }

    /// Build a new column holding only the given rows, in the given order.
    pub fn take(&self, rows: &[usize]) -> ColumnData {
        match self {
            ColumnData::Int8(v) => ColumnData::Int8(pick(v, rows)),
            ColumnData::Int16(v) => ColumnData::Int16(pick(v, rows)),
            ColumnData::Int32(v) => ColumnData::Int32(pick(v, rows)),
            ColumnData::Int64(v) => ColumnData::Int64(pick(v, rows)),
            ColumnData::Float32(v) => ColumnData::Float32(pick(v, rows)),
            ColumnData::Float64(v) => ColumnData::Float64(pick(v, rows)),
            ColumnData::Text(v) => ColumnData::Text(pick(v, rows)),
            ColumnData::Categorical { categories, codes } => ColumnData::Categorical {
                categories: categories.clone(),
                codes: pick(codes, rows),
            },
            ColumnData::Temporal(v) => ColumnData::Temporal(pick(v, rows)),
        }
    }

    /// Rough in-memory footprint in bytes
    pub fn byte_size(&self) -> usize {
        use std::mem::size_of;
        match self {
            ColumnData::Int8(v) => v.len() * size_of::<Option<i8>>(),
            ColumnData::Int16(v) => v.len() * size_of::<Option<i16>>(),
            ColumnData::Int32(v) => v.len() * size_of::<Option<i32>>(),
            ColumnData::Int64(v) => v.len() * size_of::<Option<i64>>(),
            ColumnData::Float32(v) => v.len() * size_of::<Option<f32>>(),
            ColumnData::Float64(v) => v.len() * size_of::<Option<f64>>(),
            ColumnData::Text(v) => v
                .iter()
                .map(|s| size_of::<Option<String>>() + s.as_ref().map_or(0, String::len))
                .sum(),
            ColumnData::Categorical { categories, codes } => {
                codes.len() * size_of::<Option<u32>>()
                    + categories
                        .iter()
                        .map(|s| size_of::<String>() + s.len())
                        .sum::<usize>()
            }
            ColumnData::Temporal(v) => v.len() * size_of::<Option<NaiveDateTime>>(),
        }
    }
}

fn int_value<T: Into<i64>>(v: Option<T>) -> Value {
    v.map_or(Value::Null, |x| Value::Int(x.into()))
}

fn count_none<T>(v: &[Option<T>]) -> usize {
    v.iter().filter(|x| x.is_none()).count()
}

fn pick<T: Clone>(v: &[Option<T>], rows: &[usize]) -> Vec<Option<T>> {
    rows.iter().map(|&r| v.get(r).cloned().flatten()).collect()
}

/// A named column
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Float column with no missing values
    pub fn numeric(name: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        Self::new(
            name,
            ColumnData::Float64(values.into_iter().map(Some).collect()),
        )
    }

    /// Integer column with no missing values
    pub fn integers(name: impl Into<String>, values: impl IntoIterator<Item = i64>) -> Self {
        Self::new(
            name,
            ColumnData::Int64(values.into_iter().map(Some).collect()),
        )
    }

    pub fn text<S: Into<String>>(name: impl Into<String>, values: impl IntoIterator<Item = S>) -> Self {
        Self::new(
            name,
            ColumnData::Text(values.into_iter().map(|s| Some(s.into())).collect()),
        )
    }

    pub fn temporal(
        name: impl Into<String>,
        values: impl IntoIterator<Item = NaiveDateTime>,
    ) -> Self {
        Self::new(
            name,
            ColumnData::Temporal(values.into_iter().map(Some).collect()),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn column_type(&self) -> ColumnType {
        self.data.column_type()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Same name, different storage
    pub fn with_data(&self, data: ColumnData) -> Column {
        Column::new(self.name.clone(), data)
    }
}

// ============================================================================
// Tabular Dataset
// ============================================================================

/// An immutable table of named, equal-length, typed columns.
///
/// Duplicate column names are representable so that validation can report
/// them; unequal column lengths are rejected at construction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TabularDataset {
    columns: Vec<Column>,
    row_count: usize,
}

impl TabularDataset {
    pub fn new(columns: Vec<Column>) -> DataResult<Self> {
        let row_count = columns.first().map_or(0, Column::len);
        if let Some(bad) = columns.iter().find(|c| c.len() != row_count) {
            return Err(DataError::InvalidData(format!(
                "column '{}' has {} rows, expected {}",
                bad.name(),
                bad.len(),
                row_count
            )));
        }
        Ok(Self { columns, row_count })
    }

    /// A dataset with no columns and no rows
    pub fn empty() -> Self {
        Self::default()
    }

    /// Crate-internal constructor for callers that already preserve lengths
    pub(crate) fn from_parts(columns: Vec<Column>, row_count: usize) -> Self {
        debug_assert!(columns.iter().all(|c| c.len() == row_count));
        Self { columns, row_count }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.row_count
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// First column with the given name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// Decoded values of one row, in column order
    pub fn row(&self, row: usize) -> Vec<Value> {
        self.columns.iter().map(|c| c.data().value(row)).collect()
    }

    /// New dataset holding only the given rows, in the given order
    pub fn take_rows(&self, rows: &[usize]) -> TabularDataset {
        let columns = self
            .columns
            .iter()
            .map(|c| c.with_data(c.data().take(rows)))
            .collect();
        Self::from_parts(columns, rows.len())
    }

    /// Same names, same length and the same decoded value in every cell,
    /// regardless of physical representation.
    pub fn logically_eq(&self, other: &TabularDataset) -> bool {
        self.row_count == other.row_count
            && self.columns.len() == other.columns.len()
            && self.columns.iter().zip(&other.columns).all(|(a, b)| {
                a.name() == b.name()
                    && a.data().values().zip(b.data().values()).all(|(x, y)| x.same_as(&y))
            })
    }

    /// Estimated bytes held by all columns
    pub fn memory_usage(&self) -> usize {
        self.columns.iter().map(|c| c.data().byte_size()).sum()
    }
}

// ============================================================================
// Validation
// ============================================================================

/// Findings collected by `DataProcessor::validate_data`.
///
/// `is_valid` is true exactly when no error has been added; warnings never
/// affect it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ValidationResult {
    is_valid: bool,
    errors: Vec<String>,
    warnings: Vec<String>,
    suggested_fixes: Vec<String>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            suggested_fixes: Vec::new(),
        }
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.is_valid = false;
    }

    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn add_suggested_fix(&mut self, fix: impl Into<String>) {
        self.suggested_fixes.push(fix.into());
    }

    /// Append another result's findings after this one's
    pub fn merge(&mut self, other: ValidationResult) {
        self.is_valid &= other.is_valid;
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self.suggested_fixes.extend(other.suggested_fixes);
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn suggested_fixes(&self) -> &[String] {
        &self.suggested_fixes
    }
}

// ============================================================================
// Chart Types
// ============================================================================

/// Types of charts available
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    #[default]
    Bar,
    Line,
    Pie,
    TimeSeries,
}

impl ChartType {
    /// Identifier used in requests and serialized output
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Bar => "bar",
            ChartType::Line => "line",
            ChartType::Pie => "pie",
            ChartType::TimeSeries => "time_series",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChartType::Bar => "Bar",
            ChartType::Line => "Line",
            ChartType::Pie => "Pie",
            ChartType::TimeSeries => "Time Series",
        }
    }

    pub fn all() -> &'static [ChartType] {
        &[
            ChartType::Bar,
            ChartType::Line,
            ChartType::Pie,
            ChartType::TimeSeries,
        ]
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartType {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "bar" => Ok(ChartType::Bar),
            "line" => Ok(ChartType::Line),
            "pie" => Ok(ChartType::Pie),
            "time_series" | "timeseries" => Ok(ChartType::TimeSeries),
            _ => Err(TransformError::UnknownChartType(s.to_string())),
        }
    }
}

/// One x-axis entry
#[derive(Clone, Debug, PartialEq)]
pub enum ChartValue {
    /// Ordinal/categorical label
    Label(String),
    Number(f64),
    Instant(NaiveDateTime),
    Missing,
}

impl ChartValue {
    pub fn is_instant(&self) -> bool {
        matches!(self, ChartValue::Instant(_))
    }

    pub fn as_instant(&self) -> Option<NaiveDateTime> {
        match self {
            ChartValue::Instant(t) => Some(*t),
            _ => None,
        }
    }
}

impl fmt::Display for ChartValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartValue::Label(s) => f.write_str(s),
            ChartValue::Number(n) => write!(f, "{}", Value::Float(*n)),
            ChartValue::Instant(t) => write!(f, "{}", Value::Temporal(*t)),
            ChartValue::Missing => Ok(()),
        }
    }
}

impl From<&str> for ChartValue {
    fn from(s: &str) -> Self {
        ChartValue::Label(s.to_string())
    }
}

impl From<String> for ChartValue {
    fn from(s: String) -> Self {
        ChartValue::Label(s)
    }
}

impl From<f64> for ChartValue {
    fn from(v: f64) -> Self {
        ChartValue::Number(v)
    }
}

impl From<NaiveDateTime> for ChartValue {
    fn from(t: NaiveDateTime) -> Self {
        ChartValue::Instant(t)
    }
}

/// Paired x/y sequences ready for rendering. Missing y values are `NaN`.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartData {
    x_values: Vec<ChartValue>,
    y_values: Vec<f64>,
}

impl ChartData {
    pub fn new(x_values: Vec<ChartValue>, y_values: Vec<f64>) -> DataResult<Self> {
        if x_values.len() != y_values.len() {
            return Err(DataError::InvalidData(format!(
                "x has {} values but y has {}",
                x_values.len(),
                y_values.len()
            )));
        }
        Ok(Self { x_values, y_values })
    }

    /// Build from anything convertible into x entries (labels, numbers, instants)
    pub fn from_pairs<X: Into<ChartValue>>(
        x_values: impl IntoIterator<Item = X>,
        y_values: impl IntoIterator<Item = f64>,
    ) -> DataResult<Self> {
        Self::new(
            x_values.into_iter().map(Into::into).collect(),
            y_values.into_iter().collect(),
        )
    }

    pub(crate) fn from_parts(x_values: Vec<ChartValue>, y_values: Vec<f64>) -> Self {
        debug_assert_eq!(x_values.len(), y_values.len());
        Self { x_values, y_values }
    }

    pub fn x_values(&self) -> &[ChartValue] {
        &self.x_values
    }

    pub fn y_values(&self) -> &[f64] {
        &self.y_values
    }

    pub fn len(&self) -> usize {
        self.x_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x_values.is_empty()
    }

    /// (x, y) pairs in order
    pub fn points(&self) -> impl Iterator<Item = (&ChartValue, f64)> + '_ {
        self.x_values.iter().zip(self.y_values.iter().copied())
    }

    /// Min and max of the finite y values, if any
    pub fn y_range(&self) -> Option<(f64, f64)> {
        self.y_values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

// ============================================================================
// Chart Configuration
// ============================================================================

/// Chart configuration.
///
/// Deserializes from any JSON object: recognized options are read, omitted
/// ones take their defaults, and unknown keys are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Named palette identifier (see `chart::palette`)
    pub color_scheme: String,
    pub width: u32,
    pub height: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            x_label: String::new(),
            y_label: String::new(),
            color_scheme: DEFAULT_COLOR_SCHEME.to_string(),
            width: DEFAULT_CHART_WIDTH,
            height: DEFAULT_CHART_HEIGHT,
        }
    }
}

impl ChartConfig {
    pub fn new(title: impl Into<String>) -> Self {
        Self::default().with_title(title)
    }

    /// Parse options from a JSON object, ignoring unknown keys
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_labels(mut self, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        self.x_label = x_label.into();
        self.y_label = y_label.into();
        self
    }

    pub fn with_color_scheme(mut self, color_scheme: impl Into<String>) -> Self {
        self.color_scheme = color_scheme.into();
        self
    }

    /// Set the size; zero dimensions are raised to one pixel
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width.max(1);
        self.height = height.max(1);
        self
    }
}

// ============================================================================
// Chart Artifact
// ============================================================================

/// The immutable output of a chart construction call.
///
/// The chart data is reference-counted so that a config update produces a
/// new artifact that shares, rather than copies, the original data.
#[derive(Clone, Debug)]
pub struct ChartArtifact {
    chart_type: ChartType,
    data: Arc<ChartData>,
    config: ChartConfig,
    rendered_content: String,
    created_at: DateTime<Utc>,
}

impl ChartArtifact {
    pub(crate) fn new(
        chart_type: ChartType,
        data: Arc<ChartData>,
        config: ChartConfig,
        rendered_content: String,
    ) -> Self {
        Self {
            chart_type,
            data,
            config,
            rendered_content,
            created_at: Utc::now(),
        }
    }

    pub fn chart_type(&self) -> ChartType {
        self.chart_type
    }

    pub fn data(&self) -> &ChartData {
        &self.data
    }

    /// Shared handle to the underlying data
    pub fn data_handle(&self) -> Arc<ChartData> {
        Arc::clone(&self.data)
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn rendered_content(&self) -> &str {
        &self.rendered_content
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// True when both artifacts point at the same `ChartData` allocation
    pub fn shares_data_with(&self, other: &ChartArtifact) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}
