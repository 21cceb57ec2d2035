//! Image path of the raster renderer.
//!
//! Handles the transformation: decode → EXIF orientation → downscale to fit

use fast_image_resize::{FilterType, Image, PixelType, ResizeAlg, Resizer};
use image::io::Reader as ImageReader;
use image::DynamicImage;
use std::io::Cursor;
use std::num::NonZeroU32;

use super::{RenderError, RenderSurface};

/// Surface size for an image of the given natural size.
///
/// Never upscales and never returns a zero dimension. Images wider than
/// `max_width` get exactly `max_width` and a proportionally floored height.
/// A zero natural dimension is treated as `max_width`.
pub fn target_dimensions(natural_width: u32, natural_height: u32, max_width: u32) -> (u32, u32) {
    let max_width = max_width.max(1);
    let w = if natural_width == 0 { max_width } else { natural_width };
    let h = if natural_height == 0 { max_width } else { natural_height };

    if w <= max_width {
        return (w, h);
    }

    // floor(h * max_width / w) in integers, so 1201 wide lands on 1200 exactly
    let scaled_h = (h as u64 * max_width as u64 / w as u64) as u32;
    (max_width, scaled_h.max(1))
}

/// Decode an image blob and draw it onto a surface no wider than `max_width`.
pub fn render_image(data: &[u8], max_width: u32) -> Result<RenderSurface, RenderError> {
    let img = decode_image(data)?;
    let img = apply_orientation(img, read_orientation(data));

    let (target_w, target_h) = target_dimensions(img.width(), img.height(), max_width);

    let drawn = if target_w != img.width() || target_h != img.height() {
        resize_image(&img, target_w, target_h)?
    } else {
        img
    };

    Ok(RenderSurface::from_pixels(drawn.to_rgba8()))
}

/// Decode image data into a DynamicImage
fn decode_image(data: &[u8]) -> Result<DynamicImage, RenderError> {
    ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| RenderError::decode_failed(e.to_string()))?
        .decode()
        .map_err(|e| RenderError::decode_failed(e.to_string()))
}

/// EXIF orientation tag (1-8), or 1 when absent or unreadable.
pub fn read_orientation(data: &[u8]) -> u32 {
    let mut cursor = Cursor::new(data);
    exif::Reader::new()
        .read_from_container(&mut cursor)
        .ok()
        .and_then(|exif| {
            exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)
                .and_then(|field| field.value.get_uint(0))
        })
        .filter(|o| (1..=8).contains(o))
        .unwrap_or(1)
}

/// Rotate/flip so the pixels appear the way the camera intended.
pub fn apply_orientation(img: DynamicImage, orientation: u32) -> DynamicImage {
    match orientation {
        2 => img.fliph(),
        3 => img.rotate180(),
        4 => img.flipv(),
        5 => img.rotate90().fliph(),
        6 => img.rotate90(),
        7 => img.rotate270().fliph(),
        8 => img.rotate270(),
        _ => img,
    }
}

/// Resize image using fast-image-resize with Lanczos3 filter
fn resize_image(img: &DynamicImage, target_w: u32, target_h: u32) -> Result<DynamicImage, RenderError> {
    let src_width =
        NonZeroU32::new(img.width()).ok_or_else(|| RenderError::resize_failed("Source width is 0"))?;
    let src_height = NonZeroU32::new(img.height())
        .ok_or_else(|| RenderError::resize_failed("Source height is 0"))?;
    let dst_width =
        NonZeroU32::new(target_w).ok_or_else(|| RenderError::resize_failed("Target width is 0"))?;
    let dst_height =
        NonZeroU32::new(target_h).ok_or_else(|| RenderError::resize_failed("Target height is 0"))?;

    let src_image = Image::from_vec_u8(
        src_width,
        src_height,
        img.to_rgba8().into_raw(),
        PixelType::U8x4,
    )
    .map_err(|e| RenderError::resize_failed(format!("Failed to create source image: {:?}", e)))?;

    let mut dst_image = Image::new(dst_width, dst_height, PixelType::U8x4);

    let mut resizer = Resizer::new(ResizeAlg::Convolution(FilterType::Lanczos3));

    resizer
        .resize(&src_image.view(), &mut dst_image.view_mut())
        .map_err(|e| RenderError::resize_failed(format!("Resize operation failed: {:?}", e)))?;

    let rgba_image = image::RgbaImage::from_raw(target_w, target_h, dst_image.into_vec())
        .ok_or_else(|| RenderError::resize_failed("Failed to create output image buffer"))?;

    Ok(DynamicImage::ImageRgba8(rgba_image))
}
