//! Content-type dispatch between the image and paginated-document render paths.

/// Which rasterization path a fetched document takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStrategy {
    /// Decode as a raster image (the fallback for anything unrecognised).
    Image,
    /// Render the first page of a PDF.
    PaginatedDocument,
}

impl RenderStrategy {
    /// Pick a strategy from a declared content type. Never fails: missing or unknown
    /// types fall through to `Image` and the renderer reports decode errors itself.
    pub fn from_content_type(content_type: &str) -> Self {
        if content_type.to_ascii_lowercase().contains("pdf") {
            RenderStrategy::PaginatedDocument
        } else {
            RenderStrategy::Image
        }
    }

    /// Extension used when the raw document is saved to disk.
    pub fn download_extension(&self) -> &'static str {
        match self {
            RenderStrategy::Image => "jpg",
            RenderStrategy::PaginatedDocument => "pdf",
        }
    }

    /// Get the metric label for this strategy
    pub fn as_label(&self) -> &'static str {
        match self {
            RenderStrategy::Image => "image",
            RenderStrategy::PaginatedDocument => "pdf",
        }
    }
}
