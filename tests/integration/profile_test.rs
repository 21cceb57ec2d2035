// Profile lookups and debt decisions through the proxy

use super::mock_proxy::{MockProxy, MockResponse};
use paydesk::profile::{DebtDecision, ProfileClient, ProfileError};
use paydesk::session::SessionController;
use serde_json::json;

fn profiles(proxy: &MockProxy, session: &SessionController) -> ProfileClient {
    ProfileClient::new(proxy.client(session), &proxy.api_config())
}

#[tokio::test]
async fn test_fetch_profile_posts_ids_and_decodes_sections() {
    let proxy = MockProxy::start(|_| {
        MockResponse::json(json!({
            "status": true,
            "message": "Profile fetched",
            "result": {
                "Userresult": {"unique_id": "USR-42", "name": "asha", "IsAdimin": false},
                "kycdataresult": {"adharpath": "kyc/abc123.png", "aadhaar_linked": true},
                "Debtresult": {"amount": "250", "status": false}
            }
        }))
    })
    .await;
    let session = SessionController::from_raw(Some("t"));

    let profile = profiles(&proxy, &session).fetch("USR-42").await.unwrap();

    let sections = profile.sections();
    assert!(sections.user && sections.kyc && sections.debt);
    assert!(!sections.bank_account);

    let reference = profile.aadhaar_reference("19Pays").unwrap();
    assert_eq!(reference.path(), "kyc/abc123.png");
    assert_eq!(reference.watermark_text(), "USR-42");

    let requests = proxy.requests();
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/api/user-profile");
    assert_eq!(
        requests[0].json(),
        json!({"unique_id": "USR-42", "unique_user_id": "USR-42"})
    );
}

#[tokio::test]
async fn test_envelope_without_result_is_not_found() {
    let proxy = MockProxy::start(|_| {
        MockResponse::json(json!({"status": false, "message": "User not found"}))
    })
    .await;
    let session = SessionController::from_raw(Some("t"));

    let err = profiles(&proxy, &session).fetch("nobody").await.unwrap_err();
    assert!(matches!(err, ProfileError::NotFound(ref m) if m == "User not found"));
}

#[tokio::test]
async fn test_debt_decision_posts_status_flag() {
    let proxy = MockProxy::start(|_| {
        MockResponse::json(json!({"status": true, "message": "Debt updated"}))
    })
    .await;
    let session = SessionController::from_raw(Some("t"));
    let client = profiles(&proxy, &session);

    let outcome = client
        .decide_debt("USR-42", DebtDecision::Reject)
        .await
        .unwrap();
    assert_eq!(outcome.message.as_deref(), Some("Debt updated"));

    let requests = proxy.requests();
    assert_eq!(requests[0].path, "/api/updateuserdebt");
    assert_eq!(requests[0].json(), json!({"unique_id": "USR-42", "status": false}));
}

#[tokio::test]
async fn test_unauthorized_profile_expires_session() {
    let proxy = MockProxy::start(|_| MockResponse::status(401, "expired")).await;
    let session = SessionController::from_raw(Some("t"));

    let err = profiles(&proxy, &session).fetch("USR-42").await.unwrap_err();
    assert!(matches!(err, ProfileError::SessionExpired));
    assert!(!session.is_authenticated());
}
