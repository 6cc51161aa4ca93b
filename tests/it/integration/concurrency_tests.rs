//! Concurrent use of the shared monitor and of immutable artifacts.

use crate::helpers::sales_dataset;
use chartboard::chart::ChartEngine;
use chartboard::data::DataProcessor;
use chartboard::perf::{MonitorConfig, PerformanceMonitor};
use chartboard::types::{ChartConfig, ChartType};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const THREADS: usize = 8;

#[test]
fn test_no_records_lost_under_concurrent_writers() {
    let monitor = PerformanceMonitor::new();
    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let monitor = monitor.clone();
            thread::spawn(move || {
                for i in 0..250 {
                    monitor.record(&format!("worker-{t}"), Duration::from_micros(i));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let report = monitor.get_performance_summary();
    let summary = report.summary().unwrap();
    assert_eq!(summary.total_operations, THREADS * 250);
    assert_eq!(summary.operations_by_type.len(), THREADS);
    assert!(summary.operations_by_type.values().all(|&n| n == 250));
}

#[test]
fn test_retention_cap_holds_under_concurrency() {
    let monitor = PerformanceMonitor::with_config(MonitorConfig {
        max_records: 100,
        ..MonitorConfig::default()
    });
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let monitor = monitor.clone();
            thread::spawn(move || {
                for _ in 0..50 {
                    monitor.record("op", Duration::from_micros(1));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(monitor.len(), 100);
    assert_eq!(monitor.evicted_count(), (THREADS * 50 - 100) as u64);
}

#[test]
fn test_pipeline_shared_across_threads() {
    let monitor = PerformanceMonitor::new();
    let processor = DataProcessor::new().with_monitor(monitor.clone());
    let engine = ChartEngine::default().with_monitor(monitor.clone());
    let dataset = Arc::new(sales_dataset());

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let (processor, engine, dataset) = (processor.clone(), engine.clone(), dataset.clone());
            thread::spawn(move || {
                let data = processor.transform(&dataset, ChartType::Bar).unwrap();
                engine
                    .create_bar_chart(data, ChartConfig::new(format!("chart {t}")))
                    .unwrap()
            })
        })
        .collect();

    let artifacts: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(artifacts.len(), THREADS);
    assert_eq!(monitor.len(), THREADS * 2);
}

#[test]
fn test_artifacts_are_readable_from_many_threads() {
    let engine = ChartEngine::default();
    let data = DataProcessor::new()
        .transform(&sales_dataset(), ChartType::Bar)
        .unwrap();
    let artifact = Arc::new(engine.create_bar_chart(data, ChartConfig::default()).unwrap());

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let (engine, artifact) = (engine.clone(), artifact.clone());
            thread::spawn(move || {
                let updated = engine
                    .update_chart_config(&artifact, ChartConfig::new(format!("view {i}")))
                    .unwrap();
                assert!(updated.shares_data_with(&artifact));
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(artifact.config().title, "");
}
