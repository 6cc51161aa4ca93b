//! Snapshot tests using the insta crate.
//!
//! Inline snapshots pin the serialized shape of values that leave the crate.
//!
//! To update snapshots after intentional changes:
//! ```sh
//! cargo insta test --accept
//! ```

use chartboard::data::DataProcessor;
use chartboard::perf::PerformanceMonitor;
use chartboard::types::{ChartConfig, TabularDataset};

#[test]
fn snapshot_chart_config_defaults() {
    insta::assert_json_snapshot!(ChartConfig::default(), @r#"
    {
      "title": "",
      "x_label": "",
      "y_label": "",
      "color_scheme": "default",
      "width": 800,
      "height": 600
    }
    "#);
}

#[test]
fn snapshot_empty_dataset_validation() {
    let result = DataProcessor::new().validate_data(&TabularDataset::empty());
    insta::assert_json_snapshot!(result, @r#"
    {
      "is_valid": false,
      "errors": [
        "dataset contains no rows",
        "dataset contains no columns"
      ],
      "warnings": [],
      "suggested_fixes": []
    }
    "#);
}

#[test]
fn snapshot_no_data_report() {
    let report = PerformanceMonitor::new().get_performance_summary();
    insta::assert_json_snapshot!(report, @r#"
    {
      "message": "no data"
    }
    "#);
}
