//! Chartboard turns tabular input into rendered chart artifacts.
//!
//! The pipeline is `DataOptimizer` (optional) → `DataProcessor::validate_data`
//! → `DataProcessor::transform_for_chart` → `ChartEngine::create_*`, and any
//! hop can be timed by a shared [`PerformanceMonitor`] handle.
//!
//! ```ignore
//! use chartboard::{ChartConfig, ChartEngine, DataProcessor};
//!
//! let processor = DataProcessor::new();
//! let dataset = processor.parse_csv("sales.csv")?;
//! let report = processor.validate_data(&dataset);
//! if report.is_valid() {
//!     let data = processor.transform_for_chart(&dataset, "bar")?;
//!     let chart = ChartEngine::default().create_bar_chart(data, ChartConfig::default())?;
//!     println!("{}", chart.rendered_content());
//! }
//! ```

pub mod chart;
pub mod constants;
pub mod data;
pub mod logging;
pub mod perf;
pub mod pipeline;
pub mod settings;
pub mod types;

pub use chart::{BackendKind, ChartEngine, RenderBackend, RenderError};
pub use data::{DataError, DataOptimizer, DataProcessor, DataResult, TransformError};
pub use perf::{
    Classification, MonitorConfig, PerformanceMonitor, PerformanceRecord, PerformanceReport,
    PerformanceSummary,
};
pub use pipeline::Dashboard;
pub use settings::{Settings, SettingsError};
pub use types::{
    ChartArtifact, ChartConfig, ChartData, ChartType, ChartValue, Column, ColumnData, ColumnType,
    TabularDataset, ValidationResult, Value,
};
