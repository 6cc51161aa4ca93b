//! Crate-wide defaults.
//!
//! Centralizes thresholds, caps and sizes so that `Settings` and the
//! component configs agree on what "default" means.

// ============================================================================
// Data Loading
// ============================================================================

/// Maximum file size in MB for the eager CSV reader; larger files go through polars
pub const MAX_CSV_SIZE_MB: u64 = 100;

/// Maximum number of data rows for the eager CSV reader; larger files go through polars
pub const MAX_CSV_ROWS: usize = 100_000;

/// Number of leading lines inspected when guessing a delimiter
pub const DELIMITER_SNIFF_LINES: usize = 5;

/// Keys under which a JSON object may wrap its record array
pub const JSON_WRAPPER_KEYS: [&str; 5] = ["data", "rows", "items", "records", "results"];

// ============================================================================
// Validation
// ============================================================================

/// Fraction of missing values above which a column draws a warning
pub const DEFAULT_MISSING_THRESHOLD: f64 = 0.20;

// ============================================================================
// Optimization
// ============================================================================

/// Default row budget for sampling before rendering
pub const DEFAULT_MAX_POINTS: usize = 1000;

/// Distinct/non-null ratio at or below which a text column becomes categorical
pub const DEFAULT_CATEGORICAL_RATIO: f64 = 0.5;

// ============================================================================
// Performance Monitoring
// ============================================================================

/// Operations slower than this are classified as warnings
pub const DEFAULT_WARNING_THRESHOLD_MS: u64 = 1_000;

/// Operations slower than this are classified as errors
pub const DEFAULT_ERROR_THRESHOLD_MS: u64 = 5_000;

/// Records kept before the oldest are evicted
pub const DEFAULT_MAX_RECORDS: usize = 10_000;

/// Sentinel message returned when no operation has been recorded
pub const NO_DATA_MESSAGE: &str = "no data";

// ============================================================================
// Chart Defaults
// ============================================================================

/// Default chart width in pixels
pub const DEFAULT_CHART_WIDTH: u32 = 800;

/// Default chart height in pixels
pub const DEFAULT_CHART_HEIGHT: u32 = 600;

/// Palette used when none (or an unknown one) is requested
pub const DEFAULT_COLOR_SCHEME: &str = "default";

/// Category labels are drawn under bars only up to this many points
pub const MAX_LABELED_CATEGORIES: usize = 30;

// ============================================================================
// Logging
// ============================================================================

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "chartboard=info";

/// Directory name under the platform config dir
pub const APP_DIR_NAME: &str = "chartboard";
