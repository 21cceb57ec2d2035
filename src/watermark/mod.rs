//! Tiled diagonal text watermark.
//!
//! Every rendered document is stamped with the owning user's identifier (or a
//! brand fallback) repeated across the whole surface:
//!
//! - black text at 15% opacity, rotated -15°
//! - font size `max(12, floor(width / 24))` in a proportional sans-serif face
//! - tiles every eight font sizes across and five down, starting one step
//!   outside the surface on each side
//!
//! The stamp is baked into the surface pixels; there is no separate overlay
//! that could be stripped.

pub mod compositor;
pub mod error;
pub mod pattern;
pub mod text_renderer;

pub use compositor::{
    blend_tiled_layer, resolve_watermark_text, stamp_watermark, WatermarkLayer,
};
pub use error::WatermarkError;
pub use pattern::{PlacementPosition, WatermarkPattern};
pub use text_renderer::{measure_text, render_text, Color, TextRenderOptions};
