// Constants module - centralized default values for configuration
//
// This module defines all default values used throughout the codebase.
// Using constants instead of magic numbers keeps the viewer pipeline's
// fixed parameters in one place.

// =============================================================================
// API defaults
// =============================================================================

/// Default request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Proxy route serving identity documents
pub const DEFAULT_AADHAAR_PREFIX: &str = "/api/aadhaar";

/// Proxy route returning a user's profile
pub const DEFAULT_PROFILE_PATH: &str = "/api/user-profile";

/// Proxy route accepting debt decisions
pub const DEFAULT_DEBT_PATH: &str = "/api/updateuserdebt";

// =============================================================================
// Viewer defaults
// =============================================================================

/// Images wider than this are downscaled to fit
pub const DEFAULT_MAX_IMAGE_WIDTH: u32 = 1200;

/// Viewport scale applied to the first page of a PDF
pub const DEFAULT_PDF_SCALE: f32 = 1.5;

/// Watermark text used when the owning user has no identifier
pub const DEFAULT_FALLBACK_WATERMARK: &str = "19Pays";

// =============================================================================
// Watermark pattern
// =============================================================================

/// Opacity of the tiled watermark (0.0 to 1.0)
pub const WATERMARK_OPACITY: f32 = 0.15;

/// Rotation of the tile grid in degrees (negative is counter-clockwise on screen)
pub const WATERMARK_ANGLE_DEGREES: f32 = -15.0;

/// Smallest watermark font size in pixels
pub const WATERMARK_MIN_FONT_SIZE: u32 = 12;

/// Surface width is divided by this to derive the font size
pub const WATERMARK_FONT_DIVISOR: u32 = 24;

/// Horizontal tile step as a multiple of the font size
pub const WATERMARK_STEP_X_FACTOR: f32 = 8.0;

/// Vertical tile step as a multiple of the font size
pub const WATERMARK_STEP_Y_FACTOR: f32 = 5.0;

// =============================================================================
// Download defaults
// =============================================================================

/// File name prefix for downloaded identity documents
pub const DOWNLOAD_FILE_PREFIX: &str = "aadhaar";
