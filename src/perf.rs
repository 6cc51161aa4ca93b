//! Performance monitoring utilities.
//!
//! A [`PerformanceMonitor`] is a cheap, cloneable handle onto a shared,
//! bounded store of [`PerformanceRecord`]s. Every component that accepts a
//! monitor appends to the same store, from any thread, and
//! [`PerformanceMonitor::get_performance_summary`] aggregates whatever is
//! currently retained.
//!
//! ## Usage
//!
//! ```ignore
//! use chartboard::perf::PerformanceMonitor;
//!
//! let monitor = PerformanceMonitor::new();
//! let rows = monitor.track("parse_csv", || parse(path));
//!
//! {
//!     let _timer = monitor.start("render");  // Records on drop
//!     // ... work ...
//! }
//! ```
//!
//! ## Retention
//!
//! The store keeps at most `max_records` entries and evicts the oldest record
//! first once the cap is reached.

use crate::constants::{
    DEFAULT_ERROR_THRESHOLD_MS, DEFAULT_MAX_RECORDS, DEFAULT_WARNING_THRESHOLD_MS, NO_DATA_MESSAGE,
};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const NANOS_PER_SEC: u128 = 1_000_000_000;

// ============================================================================
// Records
// ============================================================================

/// How a recorded duration compares to the configured thresholds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Normal,
    Warning,
    Error,
}

/// One timed invocation
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PerformanceRecord {
    pub operation: String,
    #[serde(serialize_with = "serialize_secs")]
    pub duration: Duration,
    pub timestamp: DateTime<Utc>,
    pub classification: Classification,
}

/// Thresholds and retention for a monitor
#[derive(Clone, Debug, PartialEq)]
pub struct MonitorConfig {
    /// Durations above this are warnings
    pub warning_threshold: Duration,
    /// Durations above this are errors
    pub error_threshold: Duration,
    /// Cap on retained records
    pub max_records: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            warning_threshold: Duration::from_millis(DEFAULT_WARNING_THRESHOLD_MS),
            error_threshold: Duration::from_millis(DEFAULT_ERROR_THRESHOLD_MS),
            max_records: DEFAULT_MAX_RECORDS,
        }
    }
}

impl MonitorConfig {
    /// Classify a duration. Both thresholds are inclusive upper bounds.
    pub fn classify(&self, duration: Duration) -> Classification {
        if duration <= self.warning_threshold {
            Classification::Normal
        } else if duration <= self.error_threshold {
            Classification::Warning
        } else {
            Classification::Error
        }
    }
}

// ============================================================================
// Summary
// ============================================================================

/// Aggregates over the currently retained records
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PerformanceSummary {
    pub total_operations: usize,
    #[serde(serialize_with = "serialize_secs")]
    pub average_duration: Duration,
    #[serde(serialize_with = "serialize_secs")]
    pub max_duration: Duration,
    #[serde(serialize_with = "serialize_secs")]
    pub p95_duration: Duration,
    pub warning_count: usize,
    pub error_count: usize,
    pub operations_by_type: BTreeMap<String, usize>,
}

/// Result of [`PerformanceMonitor::get_performance_summary`]
///
/// Serializes either as `{"message": "no data"}` or as the summary fields.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PerformanceReport {
    NoData { message: &'static str },
    Summary(PerformanceSummary),
}

impl PerformanceReport {
    fn no_data() -> Self {
        PerformanceReport::NoData {
            message: NO_DATA_MESSAGE,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, PerformanceReport::NoData { .. })
    }

    pub fn summary(&self) -> Option<&PerformanceSummary> {
        match self {
            PerformanceReport::Summary(summary) => Some(summary),
            PerformanceReport::NoData { .. } => None,
        }
    }
}

fn serialize_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

// ============================================================================
// Monitor
// ============================================================================

static GLOBAL_MONITOR: Lazy<PerformanceMonitor> = Lazy::new(PerformanceMonitor::new);

struct MonitorInner {
    config: MonitorConfig,
    records: Mutex<VecDeque<PerformanceRecord>>,
    evicted: AtomicU64,
}

/// Shared, thread-safe store of performance records.
///
/// Cloning the handle shares the store.
#[derive(Clone)]
pub struct PerformanceMonitor {
    inner: Arc<MonitorInner>,
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PerformanceMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PerformanceMonitor")
            .field("config", &self.inner.config)
            .field("records", &self.len())
            .finish()
    }
}

impl PerformanceMonitor {
    /// Create a monitor with the default thresholds (1s / 5s) and cap
    pub fn new() -> Self {
        Self::with_config(MonitorConfig::default())
    }

    pub fn with_config(config: MonitorConfig) -> Self {
        Self {
            inner: Arc::new(MonitorInner {
                records: Mutex::new(VecDeque::with_capacity(config.max_records.min(1024))),
                config,
                evicted: AtomicU64::new(0),
            }),
        }
    }

    /// Process-wide monitor for callers that do not inject their own
    pub fn global() -> &'static PerformanceMonitor {
        &GLOBAL_MONITOR
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.inner.config
    }

    /// Time `f` and record the duration under `operation`.
    ///
    /// The wrapped operation's result, including any error it returns, is
    /// passed through untouched.
    pub fn track<T, F: FnOnce() -> T>(&self, operation: &str, f: F) -> T {
        let (result, elapsed) = measure(f);
        self.record(operation, elapsed);
        result
    }

    /// Start a timer that records when dropped
    pub fn start(&self, operation: impl Into<String>) -> OperationTimer {
        OperationTimer {
            monitor: self.clone(),
            operation: operation.into(),
            start: Instant::now(),
        }
    }

    /// Record an already-measured duration
    pub fn record(&self, operation: &str, duration: Duration) -> Classification {
        let config = &self.inner.config;
        let classification = config.classify(duration);

        match classification {
            Classification::Normal => {}
            Classification::Warning => warn!(
                operation,
                elapsed_ms = format!("{:.2}", duration.as_secs_f64() * 1000.0),
                threshold_ms = config.warning_threshold.as_millis() as u64,
                "Slow operation"
            ),
            Classification::Error => warn!(
                operation,
                elapsed_ms = format!("{:.2}", duration.as_secs_f64() * 1000.0),
                threshold_ms = config.error_threshold.as_millis() as u64,
                error = true,
                "Operation exceeded error threshold"
            ),
        }

        let record = PerformanceRecord {
            operation: operation.to_string(),
            duration,
            timestamp: Utc::now(),
            classification,
        };

        let cap = config.max_records.max(1);
        let mut records = self.inner.records.lock();
        while records.len() >= cap {
            records.pop_front();
            self.inner.evicted.fetch_add(1, Ordering::Relaxed);
        }
        records.push_back(record);

        classification
    }

    /// Aggregate the retained records, or the "no data" sentinel when empty
    pub fn get_performance_summary(&self) -> PerformanceReport {
        let records = self.inner.records.lock();
        if records.is_empty() {
            return PerformanceReport::no_data();
        }

        let total_operations = records.len();
        let mut total_nanos: u128 = 0;
        let mut max_duration = Duration::ZERO;
        let mut warning_count = 0;
        let mut error_count = 0;
        let mut operations_by_type = BTreeMap::new();
        let mut durations = Vec::with_capacity(total_operations);

        for record in records.iter() {
            total_nanos = total_nanos.saturating_add(record.duration.as_nanos());
            max_duration = max_duration.max(record.duration);
            durations.push(record.duration);
            match record.classification {
                Classification::Normal => {}
                Classification::Warning => warning_count += 1,
                Classification::Error => error_count += 1,
            }
            *operations_by_type
                .entry(record.operation.clone())
                .or_insert(0) += 1;
        }
        drop(records);

        // The mean of Durations always fits back into a Duration
        let average_nanos = total_nanos / total_operations as u128;
        let average_duration = Duration::new(
            (average_nanos / NANOS_PER_SEC) as u64,
            (average_nanos % NANOS_PER_SEC) as u32,
        );

        PerformanceReport::Summary(PerformanceSummary {
            total_operations,
            average_duration,
            max_duration,
            p95_duration: p95(&mut durations),
            warning_count,
            error_count,
            operations_by_type,
        })
    }

    /// Snapshot of the retained records, oldest first
    pub fn records(&self) -> Vec<PerformanceRecord> {
        self.inner.records.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.records.lock().is_empty()
    }

    /// Records dropped by the retention cap since creation or the last reset
    pub fn evicted_count(&self) -> u64 {
        self.inner.evicted.load(Ordering::Relaxed)
    }

    /// Drop every retained record
    pub fn reset(&self) {
        let mut records = self.inner.records.lock();
        debug!(records = records.len(), "Resetting performance monitor");
        records.clear();
        self.inner.evicted.store(0, Ordering::Relaxed);
    }
}

/// 95th percentile: the sample at `floor(len * 0.95)`, clamped to the last
fn p95(durations: &mut [Duration]) -> Duration {
    if durations.is_empty() {
        return Duration::ZERO;
    }
    durations.sort_unstable();
    let idx = ((durations.len() as f64) * 0.95).floor() as usize;
    durations[idx.min(durations.len() - 1)]
}

// ============================================================================
// Operation Timer
// ============================================================================

/// A scoped timer that records its duration on drop.
pub struct OperationTimer {
    monitor: PerformanceMonitor,
    operation: String,
    start: Instant,
}

impl OperationTimer {
    /// Get elapsed time without stopping the timer.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        self.monitor.record(&self.operation, self.start.elapsed());
    }
}

// ============================================================================
// Timing Utilities
// ============================================================================

/// Measure execution time of a closure and return both the result and elapsed time.
///
/// # Example
/// ```ignore
/// let (result, elapsed) = measure(|| expensive_computation());
/// ```
#[inline]
pub fn measure<T, F: FnOnce() -> T>(f: F) -> (T, Duration) {
    let start = Instant::now();
    let result = f();
    (result, start.elapsed())
}
