// Configuration module

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants::{
    DEFAULT_AADHAAR_PREFIX, DEFAULT_DEBT_PATH, DEFAULT_FALLBACK_WATERMARK,
    DEFAULT_MAX_IMAGE_WIDTH, DEFAULT_PDF_SCALE, DEFAULT_PROFILE_PATH,
    DEFAULT_REQUEST_TIMEOUT_SECS,
};

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Environment variable '{0}' is referenced but not set")]
    MissingEnvVar(String),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub viewer: ViewerConfig,
    #[serde(default)]
    pub download: DownloadConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_aadhaar_prefix() -> String {
    DEFAULT_AADHAAR_PREFIX.to_string()
}

fn default_profile_path() -> String {
    DEFAULT_PROFILE_PATH.to_string()
}

fn default_debt_path() -> String {
    DEFAULT_DEBT_PATH.to_string()
}

/// Where the same-origin proxy lives and how to talk to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Origin of the admin console proxy, e.g. `https://admin.example.com`
    pub base_url: String,

    /// Route prefix for identity documents (default: /api/aadhaar)
    #[serde(default = "default_aadhaar_prefix")]
    pub aadhaar_prefix: String,

    /// Route for profile lookups (default: /api/user-profile)
    #[serde(default = "default_profile_path")]
    pub profile_path: String,

    /// Route for debt decisions (default: /api/updateuserdebt)
    #[serde(default = "default_debt_path")]
    pub debt_path: String,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            aadhaar_prefix: default_aadhaar_prefix(),
            profile_path: default_profile_path(),
            debt_path: default_debt_path(),
            request_timeout: default_request_timeout(),
        }
    }
}

/// Admin session supplied from outside (the login flow is not part of this crate).
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn default_max_width() -> u32 {
    DEFAULT_MAX_IMAGE_WIDTH
}

fn default_pdf_scale() -> f32 {
    DEFAULT_PDF_SCALE
}

fn default_fallback_watermark() -> String {
    DEFAULT_FALLBACK_WATERMARK.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Images wider than this are downscaled (default: 1200)
    #[serde(default = "default_max_width")]
    pub max_width: u32,

    /// Viewport scale for the first PDF page (default: 1.5)
    #[serde(default = "default_pdf_scale")]
    pub pdf_scale: f32,

    /// Watermark text when the user identifier is missing (default: 19Pays)
    #[serde(default = "default_fallback_watermark")]
    pub fallback_watermark: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            max_width: default_max_width(),
            pdf_scale: default_pdf_scale(),
            fallback_watermark: default_fallback_watermark(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Build a configuration with defaults for everything except the proxy origin.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            api: ApiConfig::new(base_url),
            session: SessionConfig::default(),
            viewer: ViewerConfig::default(),
            download: DownloadConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, ConfigError> {
        // Replace ${VAR_NAME} with environment variable values
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        // Placeholders in whole-line comments are not substituted
        let yaml = yaml
            .lines()
            .map(|line| if line.trim_start().starts_with('#') { "" } else { line })
            .collect::<Vec<_>>()
            .join("\n");

        // First, check that all referenced environment variables exist
        for caps in re.captures_iter(&yaml) {
            let var_name = &caps[1];
            if std::env::var(var_name).is_err() {
                return Err(ConfigError::MissingEnvVar(var_name.to_string()));
            }
        }

        let substituted = re.replace_all(&yaml, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_default()
        });

        let mut config: Config = serde_yaml::from_str(&substituted)?;
        config.api.base_url = config.api.base_url.trim_end_matches('/').to_string();
        if let Some(token) = &config.session.token {
            if token.trim().is_empty() {
                config.session.token = None;
            }
        }

        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_with_env(&yaml)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = &self.api.base_url;
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "api.base_url '{}' must start with http:// or https://",
                base
            )));
        }

        for (name, route) in [
            ("api.aadhaar_prefix", &self.api.aadhaar_prefix),
            ("api.profile_path", &self.api.profile_path),
            ("api.debt_path", &self.api.debt_path),
        ] {
            if !route.starts_with('/') {
                return Err(ConfigError::Invalid(format!(
                    "{} '{}' does not start with /",
                    name, route
                )));
            }
        }

        if self.api.request_timeout == 0 {
            return Err(ConfigError::Invalid(
                "api.request_timeout must be > 0 seconds".to_string(),
            ));
        }

        if self.viewer.max_width == 0 {
            return Err(ConfigError::Invalid(
                "viewer.max_width must be > 0".to_string(),
            ));
        }

        if !(self.viewer.pdf_scale.is_finite() && self.viewer.pdf_scale > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "viewer.pdf_scale must be a positive number, got {}",
                self.viewer.pdf_scale
            )));
        }

        if self.viewer.fallback_watermark.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "viewer.fallback_watermark cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
