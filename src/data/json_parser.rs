//! JSON data parsing
//!
//! Parses JSON arrays of uniform objects into datasets: each object is a
//! row and each key is a column, in the order the first record lists them.

use crate::constants::JSON_WRAPPER_KEYS;
use crate::data::error::{DataError, DataResult};
use crate::data::infer::infer_column;
use crate::types::{Column, ColumnData, TabularDataset};
use serde_json::{Map, Value};
use std::path::Path;

/// Parse a JSON file into a dataset
pub fn parse_json_file(path: &Path) -> DataResult<TabularDataset> {
    let content = std::fs::read_to_string(path)?;
    parse_json_content(&content)
}

/// Parse JSON content from a string
pub fn parse_json_content(json: &str) -> DataResult<TabularDataset> {
    let value: Value = serde_json::from_str(json)?;
    let array = extract_array(&value)?;

    if array.is_empty() {
        return Ok(TabularDataset::empty());
    }

    let records: Vec<&Map<String, Value>> = array
        .iter()
        .enumerate()
        .map(|(i, v)| {
            v.as_object()
                .ok_or_else(|| DataError::Parse(format!("record {} is not an object", i)))
        })
        .collect::<DataResult<_>>()?;

    let keys: Vec<&String> = records[0].keys().collect();
    for (i, record) in records.iter().enumerate().skip(1) {
        if record.len() != keys.len() || !keys.iter().all(|k| record.contains_key(k.as_str())) {
            return Err(DataError::Parse(format!(
                "record {} has different keys than record 0",
                i
            )));
        }
    }

    let columns = keys
        .iter()
        .map(|key| {
            let cells: Vec<&Value> = records
                .iter()
                .map(|r| r.get(key.as_str()).unwrap_or(&Value::Null))
                .collect();
            Column::new(key.as_str(), column_from_json(&cells))
        })
        .collect();

    TabularDataset::new(columns)
}

/// Extract the array from JSON value, handling common wrapper patterns
fn extract_array(value: &Value) -> DataResult<&Vec<Value>> {
    match value {
        Value::Array(arr) => Ok(arr),
        Value::Object(obj) => JSON_WRAPPER_KEYS
            .iter()
            .find_map(|key| match obj.get(*key) {
                Some(Value::Array(arr)) => Some(arr),
                _ => None,
            })
            .ok_or_else(|| {
                DataError::Parse(
                    "JSON must be an array or have a data/rows/items/records/results array"
                        .to_string(),
                )
            }),
        _ => Err(DataError::Parse(
            "JSON must be an array of objects".to_string(),
        )),
    }
}

/// Build a typed column from the JSON values of one key
fn column_from_json(cells: &[&Value]) -> ColumnData {
    let present = || cells.iter().filter(|v| !v.is_null());

    if present().next().is_none() {
        return ColumnData::Text(vec![None; cells.len()]);
    }
    if present().all(|v| v.is_i64()) {
        return ColumnData::Int64(cells.iter().map(|v| v.as_i64()).collect());
    }
    if present().all(|v| v.is_number()) {
        return ColumnData::Float64(cells.iter().map(|v| v.as_f64()).collect());
    }

    // Strings (and mixtures) go through the same inference as CSV cells
    let values = cells
        .iter()
        .map(|v| match v {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        })
        .collect();
    infer_column(values)
}
