//! Watermark error types.

use std::fmt;

/// Errors that can occur while stamping a watermark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatermarkError {
    /// The embedded font could not be loaded
    FontError(String),

    /// Failed to render the watermark text
    RenderError(String),

    /// Neither the watermark text nor the fallback has any visible characters
    EmptyText,
}

impl fmt::Display for WatermarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FontError(msg) => write!(f, "Failed to load watermark font: {}", msg),
            Self::RenderError(msg) => write!(f, "Failed to render text watermark: {}", msg),
            Self::EmptyText => write!(f, "Watermark text is empty"),
        }
    }
}

impl std::error::Error for WatermarkError {}
