//! Render error types.

use thiserror::Error;

/// Errors that can occur while rasterizing a document onto a surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// Image bytes could not be decoded
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// Resize to the target surface failed
    #[error("Resize failed: {0}")]
    Resize(String),

    /// PDF could not be opened or its first page rendered
    #[error("Failed to render PDF page: {0}")]
    Pdf(String),

    /// The document has no page to render
    #[error("Document has no pages")]
    NoPages,

    /// This build cannot render the format
    #[error("Unsupported document: {0}")]
    Unsupported(String),

    /// The watermark could not be stamped; the surface is withheld
    #[error("Failed to stamp watermark: {0}")]
    Watermark(String),

    /// The blocking render task did not complete
    #[error("Render task failed: {0}")]
    Task(String),
}

impl RenderError {
    pub fn decode_failed(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn resize_failed(msg: impl Into<String>) -> Self {
        Self::Resize(msg.into())
    }
}
