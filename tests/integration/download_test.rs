// Download saves the raw bytes under the fixed naming pattern

use super::mock_proxy::{MockProxy, MockResponse};
use paydesk::document::{DocumentFetcher, DocumentReference, DownloadAction, DownloadError};
use paydesk::session::SessionController;
use std::sync::Arc;

fn action(proxy: &MockProxy, session: &SessionController) -> DownloadAction {
    let fetcher = DocumentFetcher::new(proxy.client(session), "/api/aadhaar");
    DownloadAction::new(session.gate(), Arc::new(fetcher))
}

#[tokio::test]
async fn test_pdf_download_keeps_bytes_and_extension() {
    let pdf = b"%PDF-1.7\n%fake".to_vec();
    let body = pdf.clone();
    let proxy = MockProxy::start(move |_| MockResponse::ok("application/pdf", body.clone())).await;
    let session = SessionController::from_raw(Some("t"));
    let dir = tempfile::tempdir().unwrap();

    let saved = action(&proxy, &session)
        .download(
            &DocumentReference::new("kyc/a.pdf", Some("USR-42"), "19Pays"),
            dir.path(),
        )
        .await
        .unwrap();

    let name = saved.path.file_name().unwrap().to_str().unwrap().to_string();
    let millis = name
        .strip_prefix("aadhaar_USR-42_")
        .and_then(|rest| rest.strip_suffix(".pdf"))
        .expect("name should follow aadhaar_<id>_<millis>.pdf");
    assert!(millis.parse::<i64>().is_ok());
    assert_eq!(std::fs::read(&saved.path).unwrap(), pdf);
    assert_eq!(saved.size, pdf.len());
}

#[tokio::test]
async fn test_image_download_uses_jpg_extension() {
    let proxy = MockProxy::start(|_| MockResponse::ok("image/png", vec![1u8, 2, 3])).await;
    let session = SessionController::from_raw(Some("t"));
    let dir = tempfile::tempdir().unwrap();

    let saved = action(&proxy, &session)
        .download(&DocumentReference::new("kyc/a.png", None, "19Pays"), dir.path())
        .await
        .unwrap();

    let name = saved.path.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("aadhaar_19Pays_"));
    assert!(name.ends_with(".jpg"));
}

#[tokio::test]
async fn test_download_without_session_sends_nothing() {
    let proxy = MockProxy::start(|_| MockResponse::ok("image/png", vec![1u8])).await;
    let session = SessionController::default();
    let dir = tempfile::tempdir().unwrap();

    let err = action(&proxy, &session)
        .download(&DocumentReference::new("kyc/a.png", None, "19Pays"), dir.path())
        .await
        .unwrap_err();

    assert!(matches!(err, DownloadError::Unauthorized));
    assert!(proxy.requests().is_empty());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
