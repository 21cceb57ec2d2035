//! Watermark compositor for blending the tiled text onto a rendered surface.
//!
//! The text is rasterized once, unrotated, into a coverage mask. Every
//! surface pixel is then mapped back into the rotated pattern frame and
//! blended with each tile whose mask covers it, rows first then columns, so
//! overlapping tiles darken in the same order they were laid out.

use super::pattern::{PlacementPosition, WatermarkPattern};
use super::text_renderer::{render_text, Color, TextRenderOptions};
use super::WatermarkError;
use crate::metrics::ViewerMetrics;
use crate::render::RenderSurface;
use image::{Rgba, RgbaImage};

/// A mask repeated over the surface on a rotated grid.
#[derive(Clone)]
pub struct WatermarkLayer {
    /// The unrotated text stamp (RGBA, coverage in alpha).
    pub image: RgbaImage,
    pub pattern: WatermarkPattern,
    /// Opacity to apply on top of the stamp's own alpha (0.0 to 1.0).
    pub opacity: f32,
}

impl std::fmt::Debug for WatermarkLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatermarkLayer")
            .field("dimensions", &(self.image.width(), self.image.height()))
            .field("pattern", &self.pattern)
            .field("opacity", &self.opacity)
            .finish()
    }
}

impl WatermarkLayer {
    /// Rasterize `text` for a surface of the given width.
    pub fn for_text(text: &str, surface_width: u32) -> Result<Self, WatermarkError> {
        let pattern = WatermarkPattern::for_surface(surface_width);
        let image = render_text(&TextRenderOptions {
            text: text.to_string(),
            font_size: pattern.font_size() as f32,
            color: Color::black(),
            opacity: 1.0,
        })?;

        Ok(Self {
            image,
            pattern,
            opacity: pattern.opacity(),
        })
    }
}

/// Text actually stamped: `text` unless blank, otherwise `fallback`.
pub fn resolve_watermark_text<'a>(text: &'a str, fallback: &'a str) -> Result<&'a str, WatermarkError> {
    [text, fallback]
        .into_iter()
        .map(str::trim)
        .find(|t| !t.is_empty())
        .ok_or(WatermarkError::EmptyText)
}

/// Stamp the tiled diagonal watermark over the whole surface.
///
/// Returns the pattern that was applied.
pub fn stamp_watermark(
    surface: &mut RenderSurface,
    text: &str,
    fallback: &str,
) -> Result<WatermarkPattern, WatermarkError> {
    let text = resolve_watermark_text(text, fallback)?;
    let timer = ViewerMetrics::global().watermark_duration.start_timer();

    let layer = WatermarkLayer::for_text(text, surface.width())?;
    blend_tiled_layer(surface.pixels_mut(), &layer);

    let elapsed = timer.stop_and_record();
    tracing::debug!(
        font_size = layer.pattern.font_size(),
        width = surface.width(),
        height = surface.height(),
        elapsed_ms = elapsed * 1000.0,
        "Stamped watermark"
    );

    Ok(layer.pattern)
}

/// Blend a tiled layer onto the target image.
pub fn blend_tiled_layer(target: &mut RgbaImage, layer: &WatermarkLayer) {
    let (width, height) = target.dimensions();
    let pattern = &layer.pattern;

    let mask_w = layer.image.width() as f32;
    let mask_h = layer.image.height() as f32;
    let step_x = pattern.step_x().max(1) as f32;
    let step_y = pattern.step_y().max(1) as f32;
    let last_column = pattern.column_count(width) as i64 - 1;
    let last_row = pattern.row_count(height) as i64 - 1;
    let (sin, cos) = pattern.angle_degrees().to_radians().sin_cos();

    for py in 0..height {
        for px in 0..width {
            let dx = px as f32 + 0.5;
            let dy = py as f32 + 0.5;

            // Surface point in the pattern frame (inverse rotation)
            let u = dx * cos + dy * sin;
            let v = -dx * sin + dy * cos;

            let rows = covering_range(v, mask_h, step_y, last_row);
            let columns = covering_range(u, mask_w, step_x, last_column);
            if rows.is_empty() || columns.is_empty() {
                continue;
            }

            let mut pixel = *target.get_pixel(px, py);
            for row in rows {
                for column in columns.clone() {
                    let origin = pattern.origin(column as u32, row as u32);
                    if let Some(ink) = sample_stamp(&layer.image, u, v, origin) {
                        pixel = blend_pixels(pixel, ink, layer.opacity);
                    }
                }
            }
            target.put_pixel(px, py, pixel);
        }
    }
}

/// Grid indices `n` whose span `[(n - 1) * step, (n - 1) * step + extent)` may contain `pos`.
fn covering_range(pos: f32, extent: f32, step: f32, last: i64) -> std::ops::RangeInclusive<i64> {
    let lo = ((pos - extent) / step).floor() as i64 + 2;
    let hi = (pos / step).floor() as i64 + 1;
    lo.max(0)..=hi.min(last)
}

/// Bilinear sample of the stamp at pattern-frame point (`u`, `v`) for the tile at `origin`.
fn sample_stamp(stamp: &RgbaImage, u: f32, v: f32, origin: PlacementPosition) -> Option<Rgba<u8>> {
    let sx = u - origin.x as f32 - 0.5;
    let sy = v - origin.y as f32 - 0.5;
    let w = stamp.width() as i64;
    let h = stamp.height() as i64;

    if sx <= -1.0 || sy <= -1.0 || sx >= w as f32 || sy >= h as f32 {
        return None;
    }

    let x0 = sx.floor() as i64;
    let y0 = sy.floor() as i64;
    let fx = sx - x0 as f32;
    let fy = sy - y0 as f32;

    let texel = |x: i64, y: i64| -> Rgba<u8> {
        if x < 0 || y < 0 || x >= w || y >= h {
            Rgba([0, 0, 0, 0])
        } else {
            *stamp.get_pixel(x as u32, y as u32)
        }
    };

    let p00 = texel(x0, y0);
    let p10 = texel(x0 + 1, y0);
    let p01 = texel(x0, y0 + 1);
    let p11 = texel(x0 + 1, y0 + 1);

    let interpolate = |c: usize| -> u8 {
        let v = p00[c] as f32 * (1.0 - fx) * (1.0 - fy)
            + p10[c] as f32 * fx * (1.0 - fy)
            + p01[c] as f32 * (1.0 - fx) * fy
            + p11[c] as f32 * fx * fy;
        v.round().clamp(0.0, 255.0) as u8
    };

    let alpha = interpolate(3);
    if alpha == 0 {
        return None;
    }

    // Colour comes from whichever neighbour carries ink; the stamp is single-colour
    let ink = [p00, p10, p01, p11]
        .into_iter()
        .find(|p| p[3] > 0)
        .unwrap_or(p00);
    Some(Rgba([ink[0], ink[1], ink[2], alpha]))
}

/// Blend two pixels using alpha compositing with additional opacity.
///
/// Uses the "over" operator: result = foreground + background * (1 - foreground.alpha)
fn blend_pixels(background: Rgba<u8>, foreground: Rgba<u8>, opacity: f32) -> Rgba<u8> {
    let fg_alpha = (foreground[3] as f32 / 255.0) * opacity.clamp(0.0, 1.0);
    let bg_alpha = background[3] as f32 / 255.0;

    let out_alpha = fg_alpha + bg_alpha * (1.0 - fg_alpha);

    if out_alpha < 0.001 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend_channel = |fg: u8, bg: u8| -> u8 {
        let fg_f = fg as f32 / 255.0;
        let bg_f = bg as f32 / 255.0;
        let result = (fg_f * fg_alpha + bg_f * bg_alpha * (1.0 - fg_alpha)) / out_alpha;
        (result * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend_channel(foreground[0], background[0]),
        blend_channel(foreground[1], background[1]),
        blend_channel(foreground[2], background[2]),
        (out_alpha * 255.0).round() as u8,
    ])
}
