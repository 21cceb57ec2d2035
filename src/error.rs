// Error types module

use thiserror::Error;

use crate::client::ApiError;
use crate::config::ConfigError;
use crate::document::{DownloadError, FetchError};
use crate::profile::ProfileError;
use crate::render::RenderError;
use crate::session::SessionError;
use crate::watermark::WatermarkError;

/// Any failure the library can report, grouped by the stage that raised it.
#[derive(Debug, Error)]
pub enum PaydeskError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Watermark error: {0}")]
    Watermark(#[from] WatermarkError),

    #[error("Download error: {0}")]
    Download(#[from] DownloadError),

    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),
}

impl PaydeskError {
    /// True when the admin has to sign in again before retrying.
    pub fn requires_sign_in(&self) -> bool {
        matches!(
            self,
            PaydeskError::Session(_)
                | PaydeskError::Api(ApiError::Unauthorized | ApiError::SessionExpired)
                | PaydeskError::Fetch(FetchError::Unauthorized | FetchError::SessionExpired)
                | PaydeskError::Download(DownloadError::Unauthorized)
                | PaydeskError::Profile(ProfileError::Unauthorized | ProfileError::SessionExpired)
        )
    }
}

pub type Result<T> = std::result::Result<T, PaydeskError>;
