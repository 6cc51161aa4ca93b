//! Unit tests for DataProcessor.

use crate::helpers::{daily_dataset, floats_with_gaps, sales_dataset};
use chartboard::data::{DataError, DataProcessor, TransformError};
use chartboard::types::{ChartType, ChartValue, Column, TabularDataset};

#[test]
fn test_transform_preserves_length_for_every_chart_type() {
    let processor = DataProcessor::new();
    let sales = sales_dataset();
    for chart_type in ["bar", "line", "pie"] {
        let data = processor.transform_for_chart(&sales, chart_type).unwrap();
        assert_eq!(data.x_values().len(), sales.len());
        assert_eq!(data.y_values().len(), sales.len());
    }

    let series = daily_dataset(&[1.0, 2.0, 3.0]);
    for chart_type in ChartType::all() {
        let data = processor.transform(&series, *chart_type).unwrap();
        assert_eq!(data.len(), series.len());
    }
}

#[test]
fn test_zero_rows_is_never_valid() {
    let processor = DataProcessor::new();
    let header_only = TabularDataset::new(vec![
        Column::text("a", Vec::<String>::new()),
        Column::numeric("b", Vec::<f64>::new()),
    ])
    .unwrap();
    let result = processor.validate_data(&header_only);
    assert!(!result.is_valid());
    assert_eq!(result.errors(), ["dataset contains no rows"]);
}

#[test]
fn test_checks_do_not_short_circuit() {
    let ds = TabularDataset::new(vec![
        Column::text("name", ["a", "b", "c", "d"]),
        Column::text("name", ["1", "x", "2", "y"]),
        floats_with_gaps("score", &[None, None, Some(1.0), None]),
    ])
    .unwrap();
    let result = DataProcessor::new().validate_data(&ds);

    assert!(!result.is_valid());
    assert_eq!(result.errors(), ["duplicate column name: name"]);
    assert_eq!(
        result.warnings(),
        [
            "Column 'score' has 75% missing values",
            "Column 'name' mixes numeric and non-numeric values",
        ]
    );
    assert_eq!(result.suggested_fixes().len(), 2);
}

#[test]
fn test_no_numeric_column_warns() {
    let ds = TabularDataset::new(vec![Column::text("only", ["x", "y"])]).unwrap();
    let result = DataProcessor::new().validate_data(&ds);
    assert!(result.is_valid());
    assert_eq!(result.warnings(), ["dataset has no numeric column to plot"]);
}

#[test]
fn test_time_series_x_are_instants() {
    let data = DataProcessor::new()
        .transform_for_chart(&daily_dataset(&[5.0, 6.0]), "time_series")
        .unwrap();
    assert!(data.x_values().iter().all(ChartValue::is_instant));
}

#[test]
fn test_time_series_without_temporal_column() {
    assert_eq!(
        DataProcessor::new().transform_for_chart(&sales_dataset(), "time_series"),
        Err(TransformError::NoTemporalColumn)
    );
}

#[test]
fn test_parse_json_rejects_non_uniform_records() {
    let err = DataProcessor::new()
        .parse_json(r#"[{"a": 1}, {"b": 2}]"#)
        .unwrap_err();
    assert!(err.is_parse_error());
}

#[test]
fn test_parse_json_builds_columns_in_key_order() {
    let ds = DataProcessor::new()
        .parse_json(r#"[{"Category": "A", "Value": 10}, {"Category": "B", "Value": 25}]"#)
        .unwrap();
    assert_eq!(ds.column_names(), vec!["Category", "Value"]);
    let data = DataProcessor::new().transform(&ds, ChartType::Bar).unwrap();
    assert_eq!(data.y_values(), [10.0, 25.0]);
}

#[test]
fn test_parse_json_file_missing() {
    let err = DataProcessor::new()
        .parse_json_file("/nonexistent/records.json")
        .unwrap_err();
    assert!(matches!(err, DataError::NotFound { .. }));
}

#[test]
fn test_parse_json_null_column_is_not_plotted() {
    let processor = DataProcessor::new();
    let ds = processor
        .parse_json(r#"[{"name": "a", "notes": null, "v": 1}, {"name": "b", "notes": null, "v": 2}]"#)
        .unwrap();

    let data = processor.transform(&ds, ChartType::Bar).unwrap();
    assert_eq!(data.y_values(), [1.0, 2.0]);

    let only_nulls = processor
        .parse_json(r#"[{"name": "a", "notes": null}, {"name": "b", "notes": null}]"#)
        .unwrap();
    assert_eq!(
        processor.validate_data(&only_nulls).warnings(),
        ["dataset has no numeric column to plot"]
    );
}
