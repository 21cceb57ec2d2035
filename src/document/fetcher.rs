//! Authenticated retrieval of identity documents through the proxy.
//!
//! # Example
//!
//! ```ignore
//! use paydesk::document::{DocumentFetcher, DocumentReference};
//!
//! let fetcher = DocumentFetcher::new(client, "/api/aadhaar");
//! let reference = DocumentReference::new("kyc/abc123.png", Some("USR-42"), "19Pays");
//! let blob = fetcher.fetch(&reference).await?;
//! ```

use async_trait::async_trait;
use thiserror::Error;

use super::{DocumentBlob, DocumentReference};
use crate::client::{ApiClient, ApiError};
use crate::metrics::ViewerMetrics;

#[derive(Debug, Error)]
pub enum FetchError {
    /// No admin session; nothing was sent.
    #[error("Authorization required")]
    Unauthorized,

    /// The proxy answered 401 and the session has been invalidated.
    #[error("Session expired")]
    SessionExpired,

    #[error("Document path is empty")]
    EmptyPath,

    #[error("Failed to fetch document: {0}")]
    Transport(String),

    #[error("Failed to fetch document: upstream returned {status}: {body}")]
    Status { status: u16, body: String },
}

impl FetchError {
    fn as_label(&self) -> &'static str {
        match self {
            FetchError::Unauthorized => "unauthorized",
            FetchError::SessionExpired => "expired",
            FetchError::EmptyPath => "empty_path",
            FetchError::Transport(_) => "transport",
            FetchError::Status { .. } => "status",
        }
    }
}

impl From<ApiError> for FetchError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized => FetchError::Unauthorized,
            ApiError::SessionExpired => FetchError::SessionExpired,
            ApiError::Status { status, body } => FetchError::Status { status, body },
            ApiError::Transport(msg) | ApiError::Client(msg) => FetchError::Transport(msg),
        }
    }
}

/// Anything that can turn a reference into bytes. The viewer and the download
/// action depend on this rather than on the HTTP fetcher directly.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn fetch(&self, reference: &DocumentReference) -> Result<DocumentBlob, FetchError>;
}

/// Fetches documents from `<base_url><prefix>/<encoded path>`. Does not cache.
#[derive(Debug, Clone)]
pub struct DocumentFetcher {
    client: ApiClient,
    prefix: String,
}

impl DocumentFetcher {
    pub fn new(client: ApiClient, prefix: impl Into<String>) -> Self {
        Self {
            client,
            prefix: prefix.into().trim_end_matches('/').to_string(),
        }
    }

    /// Proxy-relative route for a reference.
    pub fn route(&self, reference: &DocumentReference) -> String {
        format!("{}/{}", self.prefix, reference.encoded_path())
    }

    async fn fetch_inner(&self, reference: &DocumentReference) -> Result<DocumentBlob, FetchError> {
        if reference.encoded_path().is_empty() {
            return Err(FetchError::EmptyPath);
        }

        let route = self.route(reference);
        let response = self.client.get(&route).await?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(format!("Failed to read body: {}", e)))?;

        tracing::info!(
            route = %route,
            content_type = %content_type,
            size = bytes.len(),
            "Fetched document"
        );

        Ok(DocumentBlob::new(bytes, content_type))
    }
}

#[async_trait]
impl DocumentSource for DocumentFetcher {
    async fn fetch(&self, reference: &DocumentReference) -> Result<DocumentBlob, FetchError> {
        let result = self.fetch_inner(reference).await;
        let metrics = ViewerMetrics::global();
        match &result {
            Ok(_) => metrics.record_fetch("success"),
            Err(e) => {
                tracing::warn!(path = reference.path(), error = %e, "Document fetch failed");
                metrics.record_fetch(e.as_label());
            }
        }
        result
    }
}
