//! Chart construction.
//!
//! The engine checks each chart type's preconditions, asks its backend for
//! the serialized content and wraps the result in a fresh [`ChartArtifact`].
//! It holds no state between calls beyond its backend choice.

use crate::chart::backend::{BackendKind, RenderBackend};
use crate::chart::error::RenderError;
use crate::perf::PerformanceMonitor;
use crate::types::{ChartArtifact, ChartConfig, ChartData, ChartType, ChartValue};
use std::sync::Arc;
use tracing::{debug, warn};

/// Builds chart artifacts through a primary backend with an optional fallback
#[derive(Clone)]
pub struct ChartEngine {
    primary: Arc<dyn RenderBackend>,
    fallback: Option<Arc<dyn RenderBackend>>,
    monitor: Option<PerformanceMonitor>,
}

impl Default for ChartEngine {
    /// Interactive backend, falling back to static SVG
    fn default() -> Self {
        Self::from_kinds(BackendKind::Interactive, Some(BackendKind::Static))
    }
}

impl std::fmt::Debug for ChartEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartEngine")
            .field("primary", &self.primary.name())
            .field("fallback", &self.fallback.as_ref().map(|b| b.name()))
            .finish()
    }
}

impl ChartEngine {
    pub fn new(primary: Arc<dyn RenderBackend>, fallback: Option<Arc<dyn RenderBackend>>) -> Self {
        Self {
            primary,
            fallback,
            monitor: None,
        }
    }

    pub fn from_kinds(primary: BackendKind, fallback: Option<BackendKind>) -> Self {
        Self::new(primary.create(), fallback.map(BackendKind::create))
    }

    /// Time every chart construction into `monitor`
    pub fn with_monitor(mut self, monitor: PerformanceMonitor) -> Self {
        self.monitor = Some(monitor);
        self
    }

    pub fn backend_name(&self) -> &'static str {
        self.primary.name()
    }

    pub fn fallback_name(&self) -> Option<&'static str> {
        self.fallback.as_ref().map(|b| b.name())
    }

    pub fn create_bar_chart(
        &self,
        data: impl Into<Arc<ChartData>>,
        config: ChartConfig,
    ) -> Result<ChartArtifact, RenderError> {
        self.create_chart(ChartType::Bar, data, config)
    }

    pub fn create_line_chart(
        &self,
        data: impl Into<Arc<ChartData>>,
        config: ChartConfig,
    ) -> Result<ChartArtifact, RenderError> {
        self.create_chart(ChartType::Line, data, config)
    }

    /// Rejects negative y values; missing (NaN) values are skipped
    pub fn create_pie_chart(
        &self,
        data: impl Into<Arc<ChartData>>,
        config: ChartConfig,
    ) -> Result<ChartArtifact, RenderError> {
        self.create_chart(ChartType::Pie, data, config)
    }

    /// Requires every x entry to be an instant or missing, with at least one instant
    pub fn create_time_series(
        &self,
        data: impl Into<Arc<ChartData>>,
        config: ChartConfig,
    ) -> Result<ChartArtifact, RenderError> {
        self.create_chart(ChartType::TimeSeries, data, config)
    }

    /// Build an artifact of any chart type
    pub fn create_chart(
        &self,
        chart_type: ChartType,
        data: impl Into<Arc<ChartData>>,
        config: ChartConfig,
    ) -> Result<ChartArtifact, RenderError> {
        let data = data.into();
        let operation = format!("create_{}_chart", chart_type.as_str());
        match &self.monitor {
            Some(monitor) => monitor.track(&operation, || self.build(chart_type, data, config)),
            None => self.build(chart_type, data, config),
        }
    }

    /// Re-render an artifact's data with a new config.
    ///
    /// Returns a new artifact sharing the original's data; the original is
    /// left untouched.
    pub fn update_chart_config(
        &self,
        artifact: &ChartArtifact,
        new_config: ChartConfig,
    ) -> Result<ChartArtifact, RenderError> {
        let data = artifact.data_handle();
        let chart_type = artifact.chart_type();
        match &self.monitor {
            Some(monitor) => monitor.track("update_chart_config", || {
                self.build(chart_type, data, new_config)
            }),
            None => self.build(chart_type, data, new_config),
        }
    }

    fn build(
        &self,
        chart_type: ChartType,
        data: Arc<ChartData>,
        config: ChartConfig,
    ) -> Result<ChartArtifact, RenderError> {
        check_preconditions(&data, &config, chart_type)?;
        let content = self.render(&data, &config, chart_type)?;
        debug!(
            chart_type = chart_type.as_str(),
            points = data.len(),
            bytes = content.len(),
            "Created chart"
        );
        Ok(ChartArtifact::new(chart_type, data, config, content))
    }

    fn render(
        &self,
        data: &ChartData,
        config: &ChartConfig,
        chart_type: ChartType,
    ) -> Result<String, RenderError> {
        let err = match render_with(self.primary.as_ref(), data, config, chart_type) {
            Ok(content) => return Ok(content),
            Err(err) => err,
        };

        match &self.fallback {
            Some(fallback) if err.is_backend_failure() => {
                warn!(
                    backend = self.primary.name(),
                    fallback = fallback.name(),
                    error = %err,
                    "Primary backend failed, using fallback"
                );
                render_with(fallback.as_ref(), data, config, chart_type)
            }
            _ => Err(err),
        }
    }
}

/// Render and treat empty output as a backend failure
fn render_with(
    backend: &dyn RenderBackend,
    data: &ChartData,
    config: &ChartConfig,
    chart_type: ChartType,
) -> Result<String, RenderError> {
    let content = backend.render(data, config, chart_type)?;
    if content.trim().is_empty() {
        return Err(RenderError::backend(backend.name(), "produced empty output"));
    }
    Ok(content)
}

/// Per-chart-type checks, run before any backend is invoked
fn check_preconditions(
    data: &ChartData,
    config: &ChartConfig,
    chart_type: ChartType,
) -> Result<(), RenderError> {
    if config.width == 0 || config.height == 0 {
        return Err(RenderError::InvalidDimensions {
            width: config.width,
            height: config.height,
        });
    }
    if data.is_empty() {
        return Err(RenderError::EmptyData);
    }

    match chart_type {
        ChartType::Pie => {
            if let Some((index, value)) = data
                .y_values()
                .iter()
                .copied()
                .enumerate()
                .find(|(_, v)| *v < 0.0)
            {
                return Err(RenderError::NegativeValue { index, value });
            }
        }
        ChartType::TimeSeries => {
            if let Some(index) = data
                .x_values()
                .iter()
                .position(|x| !matches!(x, ChartValue::Instant(_) | ChartValue::Missing))
            {
                return Err(RenderError::NonTemporalX { index });
            }
            if !data.x_values().iter().any(ChartValue::is_instant) {
                return Err(RenderError::NoInstants);
            }
        }
        ChartType::Bar | ChartType::Line => {}
    }
    Ok(())
}
