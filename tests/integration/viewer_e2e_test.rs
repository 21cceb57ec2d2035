// End-to-end viewer tests against the mock proxy

use super::mock_proxy::{white_png, MockProxy, MockResponse};
use paydesk::document::{DocumentFetcher, DocumentReference, FetchError};
use paydesk::render::{Renderer, UnsupportedRasterizer};
use paydesk::session::SessionController;
use paydesk::viewer::{SecureViewer, ViewState};
use std::sync::Arc;

fn mount(proxy: &MockProxy, session: &SessionController) -> SecureViewer {
    let fetcher = DocumentFetcher::new(proxy.client(session), "/api/aadhaar");
    SecureViewer::mount(
        session.gate(),
        Arc::new(fetcher),
        Renderer::new(1200, 1.5, Arc::new(UnsupportedRasterizer)),
        "19Pays",
    )
}

#[tokio::test]
async fn test_image_document_is_scaled_and_watermarked() {
    let png = white_png(2400, 1600);
    let proxy = MockProxy::start(move |req| {
        if req.path == "/api/aadhaar/kyc/abc123.png" {
            MockResponse::ok("image/png", png.clone())
        } else {
            MockResponse::status(404, "no such document")
        }
    })
    .await;

    let session = SessionController::from_raw(Some("admin-token"));
    let viewer = mount(&proxy, &session);

    let state = viewer
        .load(&DocumentReference::new("kyc/abc123.png", Some("USR-42"), "19Pays"))
        .await;

    let surface = state.surface().expect("document should render").clone();
    assert_eq!(surface.dimensions(), (1200, 800));

    let pixels = surface.pixels();
    let marked = pixels.pixels().filter(|p| p[0] < 250).count();
    assert!(marked > 1000, "expected a tiled watermark, found {} marked pixels", marked);

    let requests = proxy.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].authorization.as_deref(), Some("Bearer admin-token"));
}

#[tokio::test]
async fn test_path_segments_are_percent_encoded() {
    let png = white_png(10, 10);
    let proxy = MockProxy::start(move |_| MockResponse::ok("image/png", png.clone())).await;
    let session = SessionController::from_raw(Some("t"));
    let viewer = mount(&proxy, &session);

    let state = viewer
        .load(&DocumentReference::new("kyc docs/a b.png", None, "19Pays"))
        .await;

    assert!(state.is_ready());
    assert_eq!(proxy.requests()[0].path, "/api/aadhaar/kyc%20docs/a%20b.png");
}

#[tokio::test]
async fn test_no_session_sends_nothing() {
    let proxy = MockProxy::start(|_| MockResponse::status(500, "unexpected")).await;
    let session = SessionController::default();
    let viewer = mount(&proxy, &session);

    let state = viewer
        .load(&DocumentReference::new("kyc/abc123.png", Some("USR-42"), "19Pays"))
        .await;

    assert!(matches!(state, ViewState::AuthorizationRequired));
    assert!(proxy.requests().is_empty());
}

#[tokio::test]
async fn test_upstream_error_passes_through() {
    let proxy = MockProxy::start(|_| MockResponse::status(404, "no such document")).await;
    let session = SessionController::from_raw(Some("t"));
    let viewer = mount(&proxy, &session);

    let state = viewer
        .load(&DocumentReference::new("kyc/gone.png", None, "19Pays"))
        .await;

    match state {
        ViewState::FetchFailed(FetchError::Status { status, body }) => {
            assert_eq!(status, 404);
            assert_eq!(body, "no such document");
        }
        other => panic!("unexpected state {:?}", other),
    }
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn test_pdf_without_renderer_fails_cleanly() {
    let proxy =
        MockProxy::start(|_| MockResponse::ok("application/pdf", b"%PDF-1.4\n".to_vec())).await;
    let session = SessionController::from_raw(Some("t"));
    let viewer = mount(&proxy, &session);

    let state = viewer
        .load(&DocumentReference::new("kyc/a.pdf", None, "19Pays"))
        .await;

    assert!(matches!(state, ViewState::RenderFailed(_)));
    assert!(viewer.current_surface().is_none());
}

#[cfg(feature = "pdf")]
#[tokio::test]
async fn test_pdf_renders_only_first_page() {
    let pdf = include_bytes!("../fixtures/two_page.pdf").to_vec();
    let proxy = MockProxy::start(move |_| MockResponse::ok("application/pdf", pdf.clone())).await;
    let session = SessionController::from_raw(Some("t"));
    let fetcher = DocumentFetcher::new(proxy.client(&session), "/api/aadhaar");
    let viewer = SecureViewer::mount(
        session.gate(),
        Arc::new(fetcher),
        Renderer::new(1200, 1.5, paydesk::render::default_rasterizer()),
        "19Pays",
    );

    let state = viewer
        .load(&DocumentReference::new("kyc/statement.pdf", Some("USR-9"), "19Pays"))
        .await;

    let surface = state.surface().expect("first page should render").clone();
    assert_eq!(surface.dimensions(), (918, 1188));

    // Page 2 is solid black; page 1 is white apart from its corner square
    let pixels = surface.pixels();
    let near_black = pixels.pixels().filter(|p| p[0] < 64).count();
    assert!(near_black < 150 * 150 + 1000, "page 2 leaked: {} dark pixels", near_black);
    assert!(pixels.get_pixel(459, 594)[0] > 150);
}
