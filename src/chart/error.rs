//! Error types for chart rendering

use thiserror::Error;

/// Raised when chart data violates a chart type's rendering precondition,
/// or when a backend cannot produce output.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Chart data is empty")]
    EmptyData,

    /// Pie slices must be non-negative
    #[error("Negative value {value} at index {index} cannot be drawn as a pie slice")]
    NegativeValue { index: usize, value: f64 },

    /// Time series x entries must be instants (or missing)
    #[error("x value at index {index} is not a temporal instant")]
    NonTemporalX { index: usize },

    #[error("Time series has no temporal x values")]
    NoInstants,

    #[error("Invalid chart dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// The backend itself failed; the engine may retry on its fallback
    #[error("{backend} backend failed: {message}")]
    Backend {
        backend: &'static str,
        message: String,
    },
}

impl RenderError {
    pub fn backend(backend: &'static str, message: impl Into<String>) -> Self {
        RenderError::Backend {
            backend,
            message: message.into(),
        }
    }

    /// True when the failure came from the backend rather than the data
    pub fn is_backend_failure(&self) -> bool {
        matches!(self, RenderError::Backend { .. })
    }
}
