//! The pixel buffer a document is drawn onto.

use image::{DynamicImage, ImageFormat, RgbaImage};
use std::io::Cursor;

use super::RenderError;

/// RGBA drawing surface. Width and height are always at least 1.
#[derive(Clone, PartialEq)]
pub struct RenderSurface {
    pixels: RgbaImage,
}

impl RenderSurface {
    /// A fully transparent surface; zero dimensions are clamped to 1.
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width.max(1), height.max(1)),
        }
    }

    /// Wrap drawn pixels. An empty buffer becomes a 1x1 blank surface.
    pub fn from_pixels(pixels: RgbaImage) -> Self {
        if pixels.width() == 0 || pixels.height() == 0 {
            return Self::blank(pixels.width(), pixels.height());
        }
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut RgbaImage {
        &mut self.pixels
    }

    pub fn into_pixels(self) -> RgbaImage {
        self.pixels
    }

    /// Encode the surface as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>, RenderError> {
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(self.pixels.clone())
            .write_to(&mut buffer, ImageFormat::Png)
            .map_err(|e| RenderError::Unsupported(format!("PNG encode failed: {}", e)))?;
        Ok(buffer.into_inner())
    }
}

impl std::fmt::Debug for RenderSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderSurface")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}
