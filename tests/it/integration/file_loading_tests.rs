//! Loading datasets from disk through every reader.

use crate::helpers::write_fixture;
use chartboard::data::{DataError, DataProcessor, ProcessorConfig};
use chartboard::types::{ColumnType, Value};

fn wide_csv(rows: usize) -> String {
    let mut content = String::from("region,units,price,day\n");
    for i in 0..rows {
        content.push_str(&format!(
            "{},{},{}.5,2024-02-{:02}\n",
            ["North", "South"][i % 2],
            i * 3,
            i,
            i % 28 + 1
        ));
    }
    content
}

#[test]
fn test_parse_csv_file() {
    let file = write_fixture(&wide_csv(5), ".csv");
    let ds = DataProcessor::new().parse_csv(file.path()).unwrap();

    assert_eq!(ds.len(), 5);
    let types: Vec<ColumnType> = ds.columns().iter().map(|c| c.column_type()).collect();
    assert_eq!(
        types,
        vec![
            ColumnType::Text,
            ColumnType::Numeric,
            ColumnType::Numeric,
            ColumnType::Temporal
        ]
    );
}

#[test]
fn test_semicolon_file_with_currency() {
    let file = write_fixture("item;price\nTea;$1,200\nCake;$3.50\n", ".csv");
    let ds = DataProcessor::new().parse_csv(file.path()).unwrap();

    assert_eq!(ds.column_names(), vec!["item", "price"]);
    assert_eq!(ds.row(0)[1], Value::Float(1200.0));
    assert_eq!(ds.row(1)[1], Value::Float(3.5));
}

#[test]
fn test_tsv_extension() {
    let file = write_fixture("a\tb\n1\t2\n", ".tsv");
    let ds = DataProcessor::new().parse_csv(file.path()).unwrap();
    assert_eq!(ds.row(0), vec![Value::Int(1), Value::Int(2)]);
}

#[test]
fn test_row_cap_switches_to_polars() {
    let file = write_fixture(&wide_csv(40), ".csv");
    let eager = DataProcessor::new().parse_csv(file.path()).unwrap();
    let lazy = DataProcessor::with_config(ProcessorConfig {
        max_eager_rows: 10,
        ..ProcessorConfig::default()
    })
    .parse_csv(file.path())
    .unwrap();

    assert_eq!(lazy.len(), 40);
    assert!(lazy.logically_eq(&eager));
}

#[test]
fn test_empty_csv_file() {
    let file = write_fixture("", ".csv");
    let err = DataProcessor::new().parse_csv(file.path()).unwrap_err();
    assert!(matches!(err, DataError::EmptyFile));
}

#[test]
fn test_wrapped_json_file() {
    let file = write_fixture(
        r#"{"records": [{"day": "2024-01-01", "v": 1.5}, {"day": "2024-01-02", "v": null}]}"#,
        ".json",
    );
    let ds = DataProcessor::new().parse_json_file(file.path()).unwrap();

    assert_eq!(ds.len(), 2);
    assert_eq!(ds.columns()[0].column_type(), ColumnType::Temporal);
    assert_eq!(ds.row(1)[1], Value::Null);
}

#[test]
fn test_malformed_json_file() {
    let file = write_fixture("{not json", ".json");
    let err = DataProcessor::new().parse_json_file(file.path()).unwrap_err();
    assert!(err.is_parse_error());
}

#[test]
fn test_polars_path_tolerates_late_type_change() {
    let mut content = String::from("code,units\n");
    for i in 0..1200 {
        content.push_str(&format!("{},{}\n", i, i % 7));
    }
    for i in 0..300 {
        content.push_str(&format!("N/A,{}\n", i % 5));
    }
    let file = write_fixture(&content, ".csv");

    let eager = DataProcessor::new().parse_csv(file.path()).unwrap();
    let lazy = DataProcessor::with_config(ProcessorConfig {
        max_eager_rows: 10,
        ..ProcessorConfig::default()
    })
    .parse_csv(file.path())
    .unwrap();

    assert_eq!(lazy.len(), 1500);
    assert_eq!(lazy.columns()[0].column_type(), ColumnType::Text);
    assert_eq!(lazy.row(1499)[0], Value::Text("N/A".into()));
    assert!(lazy.logically_eq(&eager));
}

#[test]
fn test_non_utf8_csv_is_parse_error() {
    use std::io::Write;
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(b"item,v\nbad\xff,1\n").unwrap();
    file.flush().unwrap();

    let err = DataProcessor::new().parse_csv(file.path()).unwrap_err();
    assert!(err.is_parse_error());
}
