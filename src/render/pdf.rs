//! First-page rasterization for paginated documents.

use image::RgbaImage;

use super::RenderError;

/// Renders one page of a PDF into RGBA pixels.
///
/// `scale` multiplies the page's natural size in points.
pub trait PdfRasterizer: Send + Sync {
    fn render_page(&self, data: &[u8], page_index: usize, scale: f32)
        -> Result<RgbaImage, RenderError>;
}

/// Rasterizer backed by MuPDF.
#[cfg(feature = "pdf")]
#[derive(Debug, Default, Clone, Copy)]
pub struct MupdfRasterizer;

#[cfg(feature = "pdf")]
impl PdfRasterizer for MupdfRasterizer {
    fn render_page(
        &self,
        data: &[u8],
        page_index: usize,
        scale: f32,
    ) -> Result<RgbaImage, RenderError> {
        use mupdf::{Colorspace, Document, Matrix};

        let pdf = |e: mupdf::Error| RenderError::Pdf(e.to_string());

        let doc = Document::from_bytes(data, "application/pdf").map_err(pdf)?;
        let page_count = doc.page_count().map_err(pdf)?;
        if page_count <= 0 || page_index >= page_count as usize {
            return Err(RenderError::NoPages);
        }

        let page = doc.load_page(page_index as i32).map_err(pdf)?;
        let matrix = Matrix::new_scale(scale, scale);
        // No alpha: MuPDF fills the page white, matching how viewers show paper
        let pixmap = page
            .to_pixmap(&matrix, &Colorspace::device_rgb(), false, true)
            .map_err(pdf)?;

        let width = pixmap.width();
        let height = pixmap.height();
        let channels = pixmap.n() as usize;
        let samples = pixmap.samples();

        let mut rgba = Vec::with_capacity((width * height * 4) as usize);
        for pixel in samples.chunks_exact(channels) {
            match channels {
                1 | 2 => rgba.extend_from_slice(&[pixel[0], pixel[0], pixel[0], 255]),
                3 => rgba.extend_from_slice(&[pixel[0], pixel[1], pixel[2], 255]),
                _ => rgba.extend_from_slice(&[pixel[0], pixel[1], pixel[2], pixel[3]]),
            }
        }

        RgbaImage::from_raw(width, height, rgba)
            .ok_or_else(|| RenderError::Pdf("Pixmap size does not match samples".to_string()))
    }
}

/// Used when the crate is built without the `pdf` feature.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedRasterizer;

impl PdfRasterizer for UnsupportedRasterizer {
    fn render_page(
        &self,
        _data: &[u8],
        _page_index: usize,
        _scale: f32,
    ) -> Result<RgbaImage, RenderError> {
        Err(RenderError::Unsupported(
            "PDF rendering is not enabled in this build".to_string(),
        ))
    }
}

/// The best rasterizer this build has.
pub fn default_rasterizer() -> std::sync::Arc<dyn PdfRasterizer> {
    #[cfg(feature = "pdf")]
    {
        std::sync::Arc::new(MupdfRasterizer)
    }
    #[cfg(not(feature = "pdf"))]
    {
        std::sync::Arc::new(UnsupportedRasterizer)
    }
}
