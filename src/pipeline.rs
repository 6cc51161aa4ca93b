//! Dashboard façade wiring the optimizer, processor and engine together.
//!
//! All three share one [`PerformanceMonitor`], so a single summary covers
//! every hop of a chart request.

use crate::chart::ChartEngine;
use crate::data::{DataOptimizer, DataProcessor};
use crate::perf::PerformanceMonitor;
use crate::settings::Settings;
use crate::types::{ChartArtifact, ChartConfig, ChartType, TabularDataset};
use anyhow::{Context, Result, bail};
use std::borrow::Cow;
use std::path::Path;
use tracing::{info, warn};

#[derive(Clone, Debug)]
pub struct Dashboard {
    settings: Settings,
    monitor: PerformanceMonitor,
    processor: DataProcessor,
    engine: ChartEngine,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::build(Settings::default())
    }
}

impl Dashboard {
    /// Validate `settings` and wire the components
    pub fn new(settings: Settings) -> Result<Self> {
        settings.validate().context("invalid dashboard settings")?;
        Ok(Self::build(settings))
    }

    /// Load settings from a file, then wire the components
    pub fn from_settings_file(path: &Path) -> Result<Self> {
        let settings = Settings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?;
        Ok(Self::build(settings))
    }

    fn build(settings: Settings) -> Self {
        let monitor = PerformanceMonitor::with_config(settings.monitor_config());
        let processor =
            DataProcessor::with_config(settings.processor_config()).with_monitor(monitor.clone());
        let engine = ChartEngine::from_kinds(settings.rendering.backend, settings.rendering.fallback)
            .with_monitor(monitor.clone());
        Self {
            settings,
            monitor,
            processor,
            engine,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn monitor(&self) -> &PerformanceMonitor {
        &self.monitor
    }

    pub fn processor(&self) -> &DataProcessor {
        &self.processor
    }

    pub fn engine(&self) -> &ChartEngine {
        &self.engine
    }

    /// Chart config carrying the configured default size
    pub fn default_config(&self) -> ChartConfig {
        self.settings.chart_config()
    }

    pub fn load_csv(&self, path: &Path) -> Result<TabularDataset> {
        self.processor
            .parse_csv(path)
            .with_context(|| format!("failed to load {}", path.display()))
    }

    pub fn load_json_file(&self, path: &Path) -> Result<TabularDataset> {
        self.processor
            .parse_json_file(path)
            .with_context(|| format!("failed to load {}", path.display()))
    }

    /// Sample and narrow a dataset that exceeds the point budget.
    /// Datasets within budget are borrowed unchanged.
    pub fn prepare<'a>(&self, dataset: &'a TabularDataset) -> Cow<'a, TabularDataset> {
        let max_points = self.settings.optimizer.max_points;
        if dataset.len() <= max_points {
            return Cow::Borrowed(dataset);
        }

        let config = self.settings.optimizer_config();
        let optimized = self.monitor.track("optimize_dataset", || {
            let sampled = DataOptimizer::sample_large_dataset(dataset, max_points);
            DataOptimizer::optimize_data_types_with(&sampled, &config)
        });
        info!(
            rows = dataset.len(),
            kept = optimized.len(),
            "Reduced dataset for rendering"
        );
        Cow::Owned(optimized)
    }

    /// Prepare, validate, transform and render in one call.
    ///
    /// Validation errors abort with their messages joined; warnings are
    /// logged and rendering proceeds.
    pub fn chart_from_dataset(
        &self,
        dataset: &TabularDataset,
        chart_type: &str,
        config: ChartConfig,
    ) -> Result<ChartArtifact> {
        let chart_type: ChartType = chart_type.parse()?;
        let dataset = self.prepare(dataset);

        let report = self.processor.validate_data(&dataset);
        if !report.is_valid() {
            bail!("dataset failed validation: {}", report.errors().join("; "));
        }
        for warning in report.warnings() {
            warn!(chart_type = chart_type.as_str(), "{}", warning);
        }

        let data = self
            .processor
            .transform(&dataset, chart_type)
            .with_context(|| format!("cannot build a {} chart from this dataset", chart_type))?;

        self.engine
            .create_chart(chart_type, data, config)
            .with_context(|| format!("failed to render {} chart", chart_type))
    }
}
