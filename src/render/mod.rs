//! Raster renderer.
//!
//! Draws a fetched [`DocumentBlob`] onto a [`RenderSurface`]:
//! - images are decoded, oriented and scaled down to the configured maximum width
//! - paginated documents have their first page rasterized at a fixed scale
//!
//! Rendering is CPU bound and synchronous; async callers should move it onto
//! a blocking thread.

pub mod error;
pub mod pdf;
pub mod raster;
pub mod surface;

use std::sync::Arc;

pub use error::RenderError;
#[cfg(feature = "pdf")]
pub use pdf::MupdfRasterizer;
pub use pdf::{default_rasterizer, PdfRasterizer, UnsupportedRasterizer};
pub use raster::{render_image, target_dimensions};
pub use surface::RenderSurface;

use crate::config::ViewerConfig;
use crate::document::{DocumentBlob, RenderStrategy};
use crate::metrics::ViewerMetrics;

/// Only the first page of a paginated document is shown.
pub const FIRST_PAGE: usize = 0;

#[derive(Clone)]
pub struct Renderer {
    max_width: u32,
    pdf_scale: f32,
    rasterizer: Arc<dyn PdfRasterizer>,
}

impl Renderer {
    pub fn new(max_width: u32, pdf_scale: f32, rasterizer: Arc<dyn PdfRasterizer>) -> Self {
        Self {
            max_width,
            pdf_scale,
            rasterizer,
        }
    }

    pub fn from_config(config: &ViewerConfig) -> Self {
        Self::new(config.max_width, config.pdf_scale, default_rasterizer())
    }

    pub fn max_width(&self) -> u32 {
        self.max_width
    }

    pub fn pdf_scale(&self) -> f32 {
        self.pdf_scale
    }

    /// Draw the blob using the strategy its content type selects.
    pub fn render(&self, blob: &DocumentBlob) -> Result<RenderSurface, RenderError> {
        let strategy = blob.strategy();
        let result = match strategy {
            RenderStrategy::Image => render_image(&blob.bytes, self.max_width),
            RenderStrategy::PaginatedDocument => self
                .rasterizer
                .render_page(&blob.bytes, FIRST_PAGE, self.pdf_scale)
                .map(RenderSurface::from_pixels),
        };

        match &result {
            Ok(surface) => {
                ViewerMetrics::global().record_render(strategy.as_label(), "success");
                tracing::debug!(
                    strategy = strategy.as_label(),
                    width = surface.width(),
                    height = surface.height(),
                    "Rendered document"
                );
            }
            Err(e) => {
                ViewerMetrics::global().record_render(strategy.as_label(), "error");
                tracing::warn!(strategy = strategy.as_label(), error = %e, "Render failed");
            }
        }

        result
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("max_width", &self.max_width)
            .field("pdf_scale", &self.pdf_scale)
            .finish()
    }
}
