//! Rendering backend abstraction.
//!
//! A backend turns chart data, a config and a chart type into a serialized
//! string. The engine checks chart-type preconditions before calling it, so
//! backends may assume non-empty data, non-negative pie values and instant
//! time-series x values.

use crate::chart::error::RenderError;
use crate::chart::html::HtmlBackend;
use crate::chart::svg::SvgBackend;
use crate::types::{ChartConfig, ChartData, ChartType};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The single capability the engine needs from a renderer
pub trait RenderBackend: Send + Sync {
    /// Short identifier used in logs and errors
    fn name(&self) -> &'static str;

    fn render(
        &self,
        data: &ChartData,
        config: &ChartConfig,
        chart_type: ChartType,
    ) -> Result<String, RenderError>;
}

/// Built-in backends
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Embeddable HTML with a JSON figure description
    #[default]
    Interactive,
    /// Standalone SVG markup
    Static,
}

impl BackendKind {
    pub fn create(self) -> Arc<dyn RenderBackend> {
        match self {
            BackendKind::Interactive => Arc::new(HtmlBackend),
            BackendKind::Static => Arc::new(SvgBackend),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BackendKind::Interactive => "interactive",
            BackendKind::Static => "static",
        }
    }
}
