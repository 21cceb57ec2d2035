//! Download variant: same fetch contract, saved as a named file, no rendering.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use super::{DocumentReference, DocumentSource, FetchError, RenderStrategy};
use crate::constants::DOWNLOAD_FILE_PREFIX;
use crate::session::AccessGate;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Authorization required")]
    Unauthorized,

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A document written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedDocument {
    pub path: PathBuf,
    pub content_type: String,
    pub size: usize,
}

/// `aadhaar_<watermark>_<millis>.<ext>`; path separators in the watermark become `_`.
pub fn download_file_name(watermark_text: &str, timestamp_millis: i64, strategy: RenderStrategy) -> String {
    let label: String = watermark_text
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!(
        "{}_{}_{}.{}",
        DOWNLOAD_FILE_PREFIX,
        label,
        timestamp_millis,
        strategy.download_extension()
    )
}

pub struct DownloadAction {
    gate: AccessGate,
    source: Arc<dyn DocumentSource>,
}

impl DownloadAction {
    pub fn new(gate: AccessGate, source: Arc<dyn DocumentSource>) -> Self {
        Self { gate, source }
    }

    /// Fetch the document and save it under `dir`.
    ///
    /// Refused without a network call when no admin session is present.
    pub async fn download(
        &self,
        reference: &DocumentReference,
        dir: &Path,
    ) -> Result<SavedDocument, DownloadError> {
        self.gate
            .authorize()
            .map_err(|_| DownloadError::Unauthorized)?;

        let blob = self.source.fetch(reference).await?;
        let name = download_file_name(
            reference.watermark_text(),
            chrono::Utc::now().timestamp_millis(),
            blob.strategy(),
        );
        let path = dir.join(name);

        tokio::fs::write(&path, &blob.bytes)
            .await
            .map_err(|source| DownloadError::Write {
                path: path.clone(),
                source,
            })?;

        tracing::info!(
            path = %path.display(),
            content_type = %blob.content_type,
            size = blob.len(),
            "Saved document"
        );

        Ok(SavedDocument {
            path,
            content_type: blob.content_type,
            size: blob.bytes.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentBlob;
    use crate::session::SessionController;
    use async_trait::async_trait;
    use rstest::rstest;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticSource {
        blob: DocumentBlob,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl DocumentSource for StaticSource {
        async fn fetch(&self, _reference: &DocumentReference) -> Result<DocumentBlob, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.blob.clone())
        }
    }

    fn source(content_type: &str) -> Arc<StaticSource> {
        Arc::new(StaticSource {
            blob: DocumentBlob::new(b"%PDF-1.4 fake".to_vec(), content_type),
            calls: AtomicUsize::new(0),
        })
    }

    #[rstest]
    #[case(RenderStrategy::PaginatedDocument, "aadhaar_USR-1_1700000000000.pdf")]
    #[case(RenderStrategy::Image, "aadhaar_USR-1_1700000000000.jpg")]
    fn test_file_name_pattern(#[case] strategy: RenderStrategy, #[case] expected: &str) {
        assert_eq!(download_file_name("USR-1", 1_700_000_000_000, strategy), expected);
    }

    #[test]
    fn test_file_name_strips_separators() {
        assert_eq!(
            download_file_name("../x", 1, RenderStrategy::Image),
            "aadhaar_.._x_1.jpg"
        );
    }

    #[tokio::test]
    async fn test_download_without_session_never_fetches() {
        let src = source("application/pdf");
        let action = DownloadAction::new(SessionController::default().gate(), src.clone());
        let dir = tempfile::tempdir().unwrap();
        let reference = DocumentReference::new("kyc/a.pdf", Some("USR-1"), "19Pays");

        let err = action.download(&reference, dir.path()).await.unwrap_err();
        assert!(matches!(err, DownloadError::Unauthorized));
        assert_eq!(src.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_download_pdf_writes_pdf_file() {
        let src = source("application/pdf");
        let action = DownloadAction::new(SessionController::from_raw(Some("t")).gate(), src);
        let dir = tempfile::tempdir().unwrap();
        let reference = DocumentReference::new("kyc/a.pdf", Some("USR-1"), "19Pays");

        let saved = action.download(&reference, dir.path()).await.unwrap();
        let name = saved.path.file_name().unwrap().to_str().unwrap().to_string();
        assert!(name.starts_with("aadhaar_USR-1_"));
        assert!(name.ends_with(".pdf"));
        assert_eq!(std::fs::read(&saved.path).unwrap(), b"%PDF-1.4 fake");
    }

    #[tokio::test]
    async fn test_download_other_type_uses_jpg() {
        let src = source("image/png");
        let action = DownloadAction::new(SessionController::from_raw(Some("t")).gate(), src);
        let dir = tempfile::tempdir().unwrap();
        let reference = DocumentReference::new("kyc/a.png", None, "19Pays");

        let saved = action.download(&reference, dir.path()).await.unwrap();
        let name = saved.path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("aadhaar_19Pays_"));
        assert!(name.ends_with(".jpg"));
    }
}
