//! Text rasterization for watermarks.
//!
//! Renders a single line of text, unrotated, into an RGBA image with a
//! transparent background. The alpha channel carries glyph coverage, so the
//! result doubles as a mask for the compositor.

use super::WatermarkError;
use ab_glyph::{Font, FontRef, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use std::sync::OnceLock;

/// Proportional sans-serif face, loaded once.
static DEFAULT_FONT: OnceLock<Option<FontRef<'static>>> = OnceLock::new();

const EMBEDDED_FONT_DATA: &[u8] = include_bytes!("fonts/DejaVuSans.ttf");

/// Padding added around measured text so antialiased edges are not clipped.
const TEXT_PADDING: u32 = 2;

fn get_default_font() -> Result<&'static FontRef<'static>, WatermarkError> {
    DEFAULT_FONT
        .get_or_init(|| FontRef::try_from_slice(EMBEDDED_FONT_DATA).ok())
        .as_ref()
        .ok_or_else(|| WatermarkError::FontError("embedded font is not a valid font file".to_string()))
}

/// RGB fill color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0)
    }
}

#[derive(Debug, Clone)]
pub struct TextRenderOptions {
    /// The text to render.
    pub text: String,
    /// Font size in pixels.
    pub font_size: f32,
    pub color: Color,
    /// Opacity (0.0 to 1.0), baked into the alpha channel.
    pub opacity: f32,
}

impl Default for TextRenderOptions {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_size: 12.0,
            color: Color::black(),
            opacity: 1.0,
        }
    }
}

/// Calculate the dimensions of rendered text.
///
/// Returns (width, height) in pixels, padding included.
pub fn measure_text(text: &str, font_size: f32) -> Result<(u32, u32), WatermarkError> {
    let font = get_default_font()?;
    let scaled_font = font.as_scaled(PxScale::from(font_size));

    let mut width = 0.0f32;
    let mut prev_glyph: Option<ab_glyph::GlyphId> = None;

    for c in text.chars() {
        let glyph_id = scaled_font.glyph_id(c);
        if let Some(prev) = prev_glyph {
            width += scaled_font.kern(prev, glyph_id);
        }
        width += scaled_font.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }

    Ok((
        width.ceil() as u32 + TEXT_PADDING,
        scaled_font.height().ceil() as u32 + TEXT_PADDING,
    ))
}

/// Render text to an RGBA image.
///
/// The top edge of the image is the top of the line box and the first glyph
/// starts at the left edge.
pub fn render_text(options: &TextRenderOptions) -> Result<RgbaImage, WatermarkError> {
    if options.text.trim().is_empty() {
        return Err(WatermarkError::EmptyText);
    }
    if !(options.font_size.is_finite() && options.font_size > 0.0) {
        return Err(WatermarkError::RenderError(format!(
            "invalid font size {}",
            options.font_size
        )));
    }

    let font = get_default_font()?;
    let scale = PxScale::from(options.font_size);
    let scaled_font = font.as_scaled(scale);

    let (width, height) = measure_text(&options.text, options.font_size)?;
    let (canvas_width, canvas_height) = (width.max(1), height.max(1));
    let mut image = RgbaImage::new(canvas_width, canvas_height);

    let alpha = options.opacity.clamp(0.0, 1.0) * 255.0;
    let baseline_y = scaled_font.ascent();

    let mut cursor_x = 0.0f32;
    let mut prev_glyph: Option<ab_glyph::GlyphId> = None;

    for c in options.text.chars() {
        let glyph_id = scaled_font.glyph_id(c);
        if let Some(prev) = prev_glyph {
            cursor_x += scaled_font.kern(prev, glyph_id);
        }

        let glyph = glyph_id.with_scale_and_position(scale, ab_glyph::point(cursor_x, baseline_y));

        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();

            outlined.draw(|px, py, coverage| {
                let x = px as i32 + bounds.min.x as i32;
                let y = py as i32 + bounds.min.y as i32;

                if x >= 0 && y >= 0 && x < canvas_width as i32 && y < canvas_height as i32 {
                    let pixel_alpha = (coverage.clamp(0.0, 1.0) * alpha) as u8;
                    let existing = image.get_pixel(x as u32, y as u32)[3];
                    // Overlapping glyph edges keep the stronger coverage
                    if pixel_alpha > existing {
                        image.put_pixel(
                            x as u32,
                            y as u32,
                            Rgba([
                                options.color.r,
                                options.color.g,
                                options.color.b,
                                pixel_alpha,
                            ]),
                        );
                    }
                }
            });
        }

        cursor_x += scaled_font.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }

    Ok(image)
}
