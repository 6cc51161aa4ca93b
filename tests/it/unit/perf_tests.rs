//! Unit tests for perf module.

use chartboard::perf::{Classification, MonitorConfig, PerformanceMonitor, measure};
use std::time::Duration;

#[test]
fn test_summary_counts_every_operation() {
    let monitor = PerformanceMonitor::new();
    for i in 0..25 {
        monitor.track(if i % 2 == 0 { "even" } else { "odd" }, || i * 2);
    }

    let report = monitor.get_performance_summary();
    let summary = report.summary().unwrap();
    assert_eq!(summary.total_operations, 25);
    assert_eq!(summary.operations_by_type["even"], 13);
    assert_eq!(summary.operations_by_type["odd"], 12);
    assert!(summary.max_duration >= summary.average_duration);
}

#[test]
fn test_thresholds_are_overridable() {
    let monitor = PerformanceMonitor::with_config(MonitorConfig {
        warning_threshold: Duration::from_millis(1),
        error_threshold: Duration::from_millis(2),
        max_records: 10,
    });
    assert_eq!(
        monitor.record("fast", Duration::from_micros(500)),
        Classification::Normal
    );
    assert_eq!(
        monitor.record("slow", Duration::from_micros(1500)),
        Classification::Warning
    );
    assert_eq!(
        monitor.record("stuck", Duration::from_millis(3)),
        Classification::Error
    );

    let report = monitor.get_performance_summary();
    let summary = report.summary().unwrap();
    assert_eq!(summary.warning_count, 1);
    assert_eq!(summary.error_count, 1);
}

#[test]
fn test_reset_returns_to_no_data() {
    let monitor = PerformanceMonitor::new();
    monitor.record("op", Duration::from_millis(1));
    assert!(!monitor.get_performance_summary().is_no_data());
    monitor.reset();
    assert!(monitor.get_performance_summary().is_no_data());
}

#[test]
fn test_measure_returns_result() {
    let (value, elapsed) = measure(|| 21 * 2);
    assert_eq!(value, 42);
    assert!(elapsed < Duration::from_secs(5));
}

#[test]
fn test_global_monitor_is_shared() {
    let a = PerformanceMonitor::global();
    let b = PerformanceMonitor::global();
    assert!(std::ptr::eq(a, b));
}
