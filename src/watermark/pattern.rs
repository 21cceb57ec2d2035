//! Geometry of the tiled diagonal watermark.
//!
//! The pattern lives in a frame rotated by [`WatermarkPattern::angle_degrees`]
//! about the surface origin. Tile origins are laid out on a regular grid in
//! that frame, starting one step before the surface and ending within one
//! step after it, so the rotated text still reaches every corner.

use crate::constants::{
    WATERMARK_ANGLE_DEGREES, WATERMARK_FONT_DIVISOR, WATERMARK_MIN_FONT_SIZE,
    WATERMARK_OPACITY, WATERMARK_STEP_X_FACTOR, WATERMARK_STEP_Y_FACTOR,
};

/// A single position where a stamp is drawn, in the rotated frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementPosition {
    pub x: i64,
    pub y: i64,
}

impl PlacementPosition {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatermarkPattern {
    font_size: u32,
    step_x: u32,
    step_y: u32,
    angle_degrees: f32,
    opacity: f32,
}

impl WatermarkPattern {
    /// Pattern for a surface of the given width.
    ///
    /// Font size is `max(12, floor(width / 24))`; horizontal spacing is eight
    /// font sizes and vertical spacing five.
    pub fn for_surface(width: u32) -> Self {
        let font_size = (width / WATERMARK_FONT_DIVISOR).max(WATERMARK_MIN_FONT_SIZE);
        Self {
            font_size,
            step_x: (font_size as f32 * WATERMARK_STEP_X_FACTOR).floor() as u32,
            step_y: (font_size as f32 * WATERMARK_STEP_Y_FACTOR).floor() as u32,
            angle_degrees: WATERMARK_ANGLE_DEGREES,
            opacity: WATERMARK_OPACITY,
        }
    }

    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    pub fn step_x(&self) -> u32 {
        self.step_x
    }

    pub fn step_y(&self) -> u32 {
        self.step_y
    }

    /// Rotation of the pattern frame; negative tilts the text upward to the right.
    pub fn angle_degrees(&self) -> f32 {
        self.angle_degrees
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Number of tile columns: x runs from `-step_x` while `x < width + step_x`.
    pub fn column_count(&self, width: u32) -> u32 {
        axis_count(width, self.step_x)
    }

    /// Number of tile rows: y runs from `-step_y` while `y < height + step_y`.
    pub fn row_count(&self, height: u32) -> u32 {
        axis_count(height, self.step_y)
    }

    /// Origin of the tile at `column`, `row`.
    pub fn origin(&self, column: u32, row: u32) -> PlacementPosition {
        PlacementPosition::new(
            (column as i64 - 1) * self.step_x as i64,
            (row as i64 - 1) * self.step_y as i64,
        )
    }

    /// Every tile origin, row by row, in drawing order.
    pub fn tile_origins(&self, width: u32, height: u32) -> Vec<PlacementPosition> {
        let columns = self.column_count(width);
        let rows = self.row_count(height);
        let mut origins = Vec::with_capacity((columns * rows) as usize);
        for row in 0..rows {
            for column in 0..columns {
                origins.push(self.origin(column, row));
            }
        }
        origins
    }
}

/// Count of `n >= 0` with `-step + n * step < extent + step`.
fn axis_count(extent: u32, step: u32) -> u32 {
    let step = step.max(1) as u64;
    ((extent as u64 + 3 * step - 1) / step) as u32
}
