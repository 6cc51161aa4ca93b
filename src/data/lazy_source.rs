//! Polars-backed loader for delimited files too large for the eager reader.
//!
//! The file is scanned lazily with every column read as a string, collected
//! once, and each column is passed through the same type inference the eager
//! reader uses. Both paths therefore type a file identically, however far
//! into it a column's values change shape.

use crate::data::error::DataResult;
use crate::data::infer::infer_column;
use crate::types::{Column, ColumnData, TabularDataset};
use polars::prelude::*;
use std::path::Path;

/// Load a delimited file through polars
pub fn load_csv_frame(path: &Path, delimiter: u8) -> DataResult<TabularDataset> {
    let start = std::time::Instant::now();

    // A zero-length schema sample reads every column as String
    let lf = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_separator(delimiter)
        .with_infer_schema_length(Some(0))
        .finish()?;

    let df = lf.collect()?;

    let columns = df
        .get_columns()
        .iter()
        .map(|col| Ok(Column::new(col.name().to_string(), column_from_frame(col)?)))
        .collect::<DataResult<Vec<_>>>()?;

    tracing::debug!(
        "Loaded CSV {} with {} rows x {} cols in {:?}",
        path.display(),
        df.height(),
        columns.len(),
        start.elapsed()
    );

    TabularDataset::new(columns)
}

/// Convert one string column into typed storage
fn column_from_frame(column: &polars::prelude::Column) -> DataResult<ColumnData> {
    let series = column.as_materialized_series().cast(&DataType::String)?;
    let values = series
        .str()?
        .into_iter()
        .map(|v| v.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string))
        .collect();
    Ok(infer_column(values))
}
