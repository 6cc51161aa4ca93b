//! JSON-file configuration.
//!
//! Every field has a default, omitted sections or keys take their defaults,
//! and unknown keys are ignored so older binaries can read newer files.
//!
//! ```json
//! {
//!   "processing": { "missing_threshold": 0.2 },
//!   "performance": { "warning_threshold_ms": 500 },
//!   "rendering": { "backend": "static", "fallback": null },
//!   "optimizer": { "max_points": 2000 }
//! }
//! ```

use crate::chart::BackendKind;
use crate::constants::{
    APP_DIR_NAME, DEFAULT_CATEGORICAL_RATIO, DEFAULT_CHART_HEIGHT, DEFAULT_CHART_WIDTH,
    DEFAULT_ERROR_THRESHOLD_MS, DEFAULT_MAX_POINTS, DEFAULT_MAX_RECORDS,
    DEFAULT_MISSING_THRESHOLD, DEFAULT_WARNING_THRESHOLD_MS, MAX_CSV_ROWS, MAX_CSV_SIZE_MB,
};
use crate::data::{OptimizerConfig, ProcessorConfig};
use crate::perf::MonitorConfig;
use crate::types::ChartConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid setting: {0}")]
    Invalid(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingSettings {
    pub missing_threshold: f64,
    pub max_eager_rows: usize,
    pub max_eager_size_mb: u64,
}

impl Default for ProcessingSettings {
    fn default() -> Self {
        Self {
            missing_threshold: DEFAULT_MISSING_THRESHOLD,
            max_eager_rows: MAX_CSV_ROWS,
            max_eager_size_mb: MAX_CSV_SIZE_MB,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceSettings {
    pub warning_threshold_ms: u64,
    pub error_threshold_ms: u64,
    pub max_records: usize,
}

impl Default for PerformanceSettings {
    fn default() -> Self {
        Self {
            warning_threshold_ms: DEFAULT_WARNING_THRESHOLD_MS,
            error_threshold_ms: DEFAULT_ERROR_THRESHOLD_MS,
            max_records: DEFAULT_MAX_RECORDS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderingSettings {
    pub backend: BackendKind,
    /// `null` disables the fallback
    pub fallback: Option<BackendKind>,
    pub default_width: u32,
    pub default_height: u32,
}

impl Default for RenderingSettings {
    fn default() -> Self {
        Self {
            backend: BackendKind::Interactive,
            fallback: Some(BackendKind::Static),
            default_width: DEFAULT_CHART_WIDTH,
            default_height: DEFAULT_CHART_HEIGHT,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerSettings {
    /// Row budget before a dataset is sampled for rendering
    pub max_points: usize,
    pub categorical_ratio: f64,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            max_points: DEFAULT_MAX_POINTS,
            categorical_ratio: DEFAULT_CATEGORICAL_RATIO,
        }
    }
}

/// All tunables, grouped by component
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub processing: ProcessingSettings,
    pub performance: PerformanceSettings,
    pub rendering: RenderingSettings,
    pub optimizer: OptimizerSettings,
}

impl Settings {
    /// Read and validate a settings file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Read a settings file, falling back to defaults when it is missing or invalid
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Using default settings");
                Self::default()
            }
        }
    }

    /// Parse and validate settings JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let p = &self.processing;
        if !(p.missing_threshold > 0.0 && p.missing_threshold <= 1.0) {
            return Err(SettingsError::Invalid(format!(
                "processing.missing_threshold must be in (0, 1], got {}",
                p.missing_threshold
            )));
        }
        if p.max_eager_rows == 0 || p.max_eager_size_mb == 0 {
            return Err(SettingsError::Invalid(
                "processing eager limits must be positive".to_string(),
            ));
        }

        let perf = &self.performance;
        if perf.error_threshold_ms < perf.warning_threshold_ms {
            return Err(SettingsError::Invalid(format!(
                "performance.error_threshold_ms ({}) is below warning_threshold_ms ({})",
                perf.error_threshold_ms, perf.warning_threshold_ms
            )));
        }
        if perf.max_records == 0 {
            return Err(SettingsError::Invalid(
                "performance.max_records must be positive".to_string(),
            ));
        }

        let r = &self.rendering;
        if r.default_width == 0 || r.default_height == 0 {
            return Err(SettingsError::Invalid(format!(
                "rendering default size must be positive, got {}x{}",
                r.default_width, r.default_height
            )));
        }

        let o = &self.optimizer;
        if o.max_points == 0 {
            return Err(SettingsError::Invalid(
                "optimizer.max_points must be positive".to_string(),
            ));
        }
        if !(o.categorical_ratio > 0.0 && o.categorical_ratio <= 1.0) {
            return Err(SettingsError::Invalid(format!(
                "optimizer.categorical_ratio must be in (0, 1], got {}",
                o.categorical_ratio
            )));
        }
        Ok(())
    }

    pub fn processor_config(&self) -> ProcessorConfig {
        ProcessorConfig {
            missing_threshold: self.processing.missing_threshold,
            max_eager_rows: self.processing.max_eager_rows,
            max_eager_size_mb: self.processing.max_eager_size_mb,
        }
    }

    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            warning_threshold: Duration::from_millis(self.performance.warning_threshold_ms),
            error_threshold: Duration::from_millis(self.performance.error_threshold_ms),
            max_records: self.performance.max_records,
        }
    }

    pub fn optimizer_config(&self) -> OptimizerConfig {
        OptimizerConfig {
            categorical_ratio: self.optimizer.categorical_ratio,
        }
    }

    /// Chart config with the configured default size
    pub fn chart_config(&self) -> ChartConfig {
        ChartConfig::default()
            .with_size(self.rendering.default_width, self.rendering.default_height)
    }
}

/// `<config dir>/chartboard/settings.json`, when the platform has a config dir
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join("settings.json"))
}
