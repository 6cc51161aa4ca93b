//! End-to-end workflows: dataset in, chart artifact and performance summary out.

use crate::helpers::{daily_dataset, numbered_dataset, sales_dataset, write_fixture};
use chartboard::chart::ChartEngine;
use chartboard::data::{DataOptimizer, DataProcessor};
use chartboard::perf::PerformanceMonitor;
use chartboard::pipeline::Dashboard;
use chartboard::settings::Settings;
use chartboard::types::{ChartConfig, ChartType, ChartValue, Column, TabularDataset};
use std::path::Path;

#[test]
fn test_sales_bar_chart_end_to_end() {
    let processor = DataProcessor::new();
    let engine = ChartEngine::default();
    let dataset = sales_dataset();

    let report = processor.validate_data(&dataset);
    assert!(report.is_valid());
    assert!(report.errors().is_empty());

    let data = processor.transform_for_chart(&dataset, "bar").unwrap();
    let labels: Vec<ChartValue> = ["A", "B", "C", "D", "E"].into_iter().map(Into::into).collect();
    assert_eq!(data.x_values(), labels.as_slice());
    assert_eq!(data.y_values(), [10.0, 25.0, 15.0, 30.0, 20.0]);

    let chart = engine.create_bar_chart(data, ChartConfig::default()).unwrap();
    assert_eq!(chart.chart_type(), ChartType::Bar);
    assert!(!chart.rendered_content().is_empty());
}

#[test]
fn test_large_dataset_sampled_and_monitored() {
    let monitor = PerformanceMonitor::new();
    let processor = DataProcessor::new().with_monitor(monitor.clone());
    let engine = ChartEngine::default().with_monitor(monitor.clone());

    let dataset = numbered_dataset(15_000);
    let sampled = monitor.track("sample_large_dataset", || {
        DataOptimizer::sample_large_dataset(&dataset, 1000)
    });
    assert!(sampled.len() <= 1000);

    let data = processor.transform(&sampled, ChartType::Line).unwrap();
    engine.create_line_chart(data, ChartConfig::default()).unwrap();

    // sample + transform + create
    let report = monitor.get_performance_summary();
    let summary = report.summary().unwrap();
    assert_eq!(summary.total_operations, 3);
    assert_eq!(summary.operations_by_type["create_line_chart"], 1);
}

#[test]
fn test_dashboard_reduces_before_rendering() {
    let mut settings = Settings::default();
    settings.optimizer.max_points = 200;
    let dashboard = Dashboard::new(settings).unwrap();

    let chart = dashboard
        .chart_from_dataset(&numbered_dataset(5_000), "line", dashboard.default_config())
        .unwrap();
    assert_eq!(chart.data().len(), 200);

    let report = dashboard.monitor().get_performance_summary();
    let summary = report.summary().unwrap();
    for operation in [
        "optimize_dataset",
        "validate_data",
        "transform_for_chart",
        "create_line_chart",
    ] {
        assert_eq!(summary.operations_by_type[operation], 1, "{operation}");
    }
}

#[test]
fn test_dashboard_time_series() {
    let dashboard = Dashboard::default();
    let chart = dashboard
        .chart_from_dataset(
            &daily_dataset(&[3.0, 1.0, 4.0, 1.0, 5.0]),
            "time_series",
            ChartConfig::new("Daily"),
        )
        .unwrap();
    assert_eq!(chart.chart_type(), ChartType::TimeSeries);
    assert_eq!(chart.config().title, "Daily");
}

#[test]
fn test_dashboard_warnings_do_not_block() {
    let dataset = TabularDataset::new(vec![
        Column::text("code", ["1", "x", "3"]),
        Column::numeric("v", [1.0, 2.0, 3.0]),
    ])
    .unwrap();
    let chart = Dashboard::default()
        .chart_from_dataset(&dataset, "pie", ChartConfig::default())
        .unwrap();
    assert_eq!(chart.chart_type(), ChartType::Pie);
}

#[test]
fn test_dashboard_surfaces_each_error_kind() {
    let dashboard = Dashboard::default();

    let unknown = dashboard
        .chart_from_dataset(&sales_dataset(), "radar", ChartConfig::default())
        .unwrap_err();
    assert!(unknown.to_string().contains("radar"));

    let no_time = dashboard
        .chart_from_dataset(&sales_dataset(), "time_series", ChartConfig::default())
        .unwrap_err();
    assert!(no_time.to_string().contains("time_series"));

    let negative = TabularDataset::new(vec![
        Column::text("c", ["a", "b"]),
        Column::numeric("v", [1.0, -1.0]),
    ])
    .unwrap();
    let render = dashboard
        .chart_from_dataset(&negative, "pie", ChartConfig::default())
        .unwrap_err();
    assert!(format!("{render:#}").contains("Negative value"));
}

#[test]
fn test_dashboard_from_settings_file() {
    let file = write_fixture(
        r#"{"rendering": {"backend": "static", "fallback": null}, "optimizer": {"max_points": 3}}"#,
        ".json",
    );
    let dashboard = Dashboard::from_settings_file(file.path()).unwrap();
    assert_eq!(dashboard.engine().backend_name(), "static");

    let chart = dashboard
        .chart_from_dataset(&numbered_dataset(10), "line", dashboard.default_config())
        .unwrap();
    assert!(chart.rendered_content().contains("<svg"));
    assert_eq!(chart.data().len(), 3);

    let bad = write_fixture(r#"{"processing": {"missing_threshold": 4.0}}"#, ".json");
    let err = Dashboard::from_settings_file(bad.path()).unwrap_err();
    assert!(format!("{err:#}").contains("failed to load settings"));
}

#[test]
fn test_dashboard_load_json_file() {
    let dashboard = Dashboard::default();
    let file = write_fixture(
        r#"{"rows": [{"Category": "A", "Value": 3}, {"Category": "B", "Value": 4}]}"#,
        ".json",
    );
    let dataset = dashboard.load_json_file(file.path()).unwrap();
    let chart = dashboard
        .chart_from_dataset(&dataset, "pie", ChartConfig::default())
        .unwrap();
    assert_eq!(chart.chart_type(), ChartType::Pie);

    let err = dashboard
        .load_json_file(Path::new("/nonexistent/records.json"))
        .unwrap_err();
    assert!(format!("{err:#}").contains("failed to load"));
}
