// A 401 from the proxy expires the admin session exactly once

use super::mock_proxy::{MockProxy, MockResponse};
use paydesk::document::{DocumentFetcher, DocumentReference, DocumentSource, FetchError};
use paydesk::session::{SessionController, SessionExpiryListener, SessionToken};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Default)]
struct CountingListener {
    calls: AtomicUsize,
}

impl SessionExpiryListener for CountingListener {
    fn on_session_expired(&self, _reason: &str) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn test_overlapping_unauthorized_responses_expire_once() {
    let proxy = MockProxy::start(|_| {
        MockResponse::status(401, "token expired").delayed(Duration::from_millis(50))
    })
    .await;

    let session = SessionController::from_raw(Some("stale-token"));
    let listener = Arc::new(CountingListener::default());
    let _registration = session.register(listener.clone());

    let fetcher = Arc::new(DocumentFetcher::new(proxy.client(&session), "/api/aadhaar"));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let fetcher = fetcher.clone();
            tokio::spawn(async move {
                let reference = DocumentReference::new(format!("kyc/{}.png", i), None, "19Pays");
                fetcher.fetch(&reference).await
            })
        })
        .collect();

    let mut expired = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Err(FetchError::SessionExpired) => expired += 1,
            // Requests issued after the first expiry never leave the client
            Err(FetchError::Unauthorized) => {}
            other => panic!("unexpected result {:?}", other),
        }
    }

    assert!(expired >= 1);
    assert_eq!(listener.calls.load(Ordering::SeqCst), 1);
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_dropped_registration_is_not_notified() {
    let proxy = MockProxy::start(|_| MockResponse::status(401, "nope")).await;
    let session = SessionController::from_raw(Some("t"));
    let listener = Arc::new(CountingListener::default());

    let registration = session.register(listener.clone());
    drop(registration);
    assert_eq!(session.listener_count(), 0);

    let fetcher = DocumentFetcher::new(proxy.client(&session), "/api/aadhaar");
    let result = fetcher
        .fetch(&DocumentReference::new("kyc/a.png", None, "19Pays"))
        .await;

    assert!(matches!(result, Err(FetchError::SessionExpired)));
    assert_eq!(listener.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_late_unauthorized_after_sign_in_is_ignored() {
    let proxy = MockProxy::start(|request| {
        if request.path.contains("slow") {
            MockResponse::status(401, "token expired").delayed(Duration::from_millis(300))
        } else {
            MockResponse::status(401, "token expired")
        }
    })
    .await;

    let session = SessionController::from_raw(Some("old-token"));
    let listener = Arc::new(CountingListener::default());
    let _registration = session.register(listener.clone());
    let fetcher = Arc::new(DocumentFetcher::new(proxy.client(&session), "/api/aadhaar"));

    let slow = {
        let fetcher = fetcher.clone();
        tokio::spawn(async move {
            let reference = DocumentReference::new("kyc/slow.png", None, "19Pays");
            fetcher.fetch(&reference).await
        })
    };

    // Wait until the slow request is on the wire with the old token
    while !proxy.requests().iter().any(|r| r.path.contains("slow")) {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let fast = fetcher
        .fetch(&DocumentReference::new("kyc/fast.png", None, "19Pays"))
        .await;
    assert!(matches!(fast, Err(FetchError::SessionExpired)));
    assert!(!session.is_authenticated());

    session.sign_in(SessionToken::new("new-token").unwrap());

    let late = slow.await.unwrap();
    assert!(matches!(late, Err(FetchError::SessionExpired)));

    assert_eq!(listener.calls.load(Ordering::SeqCst), 1);
    assert!(session.is_authenticated());
    assert_eq!(session.token().unwrap().as_str(), "new-token");
    assert!(proxy
        .requests()
        .iter()
        .all(|r| r.authorization.as_deref() == Some("Bearer old-token")));
}
