//! User profile lookups and debt decisions.
//!
//! Both go through the same authenticated [`ApiClient`] as document fetches,
//! so a 401 here expires the session for the viewer too.

pub mod types;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use types::{
    BankAccountRecord, DebtRecord, IfscDetails, KycRecord, Location, ProfileSections,
    UserProfile, UserRecord,
};

use crate::client::{ApiClient, ApiError};
use crate::config::ApiConfig;
use types::ProfileEnvelope;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Authorization required")]
    Unauthorized,

    #[error("Session expired")]
    SessionExpired,

    #[error("User id is empty")]
    MissingId,

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected response body: {0}")]
    Decode(String),

    /// The envelope carried no profile.
    #[error("Profile not available: {0}")]
    NotFound(String),
}

impl From<ApiError> for ProfileError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized => ProfileError::Unauthorized,
            ApiError::SessionExpired => ProfileError::SessionExpired,
            ApiError::Status { status, body } => ProfileError::Status { status, body },
            ApiError::Transport(msg) | ApiError::Client(msg) => ProfileError::Transport(msg),
        }
    }
}

/// Admin verdict on a user's outstanding debt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebtDecision {
    Approve,
    Reject,
}

impl DebtDecision {
    /// Value of the `status` field sent upstream.
    pub fn as_status(self) -> bool {
        matches!(self, DebtDecision::Approve)
    }
}

impl std::str::FromStr for DebtDecision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "approve" | "approved" => Ok(DebtDecision::Approve),
            "reject" | "rejected" => Ok(DebtDecision::Reject),
            other => Err(format!("unknown debt decision '{}'", other)),
        }
    }
}

#[derive(Serialize)]
struct ProfileRequest<'a> {
    unique_id: &'a str,
    unique_user_id: &'a str,
}

#[derive(Serialize)]
struct DebtUpdateRequest<'a> {
    unique_id: &'a str,
    status: bool,
}

/// Whatever the debt route answered. Non-JSON bodies land in `raw`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DebtUpdateOutcome {
    pub status: Option<bool>,
    pub message: Option<String>,
    pub error: Option<String>,
    pub raw: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ProfileClient {
    client: ApiClient,
    profile_path: String,
    debt_path: String,
}

impl ProfileClient {
    pub fn new(client: ApiClient, config: &ApiConfig) -> Self {
        Self {
            client,
            profile_path: config.profile_path.clone(),
            debt_path: config.debt_path.clone(),
        }
    }

    /// Load the aggregated profile of `unique_id`.
    pub async fn fetch(&self, unique_id: &str) -> Result<UserProfile, ProfileError> {
        let unique_id = unique_id.trim();
        if unique_id.is_empty() {
            return Err(ProfileError::MissingId);
        }

        let request = ProfileRequest {
            unique_id,
            unique_user_id: unique_id,
        };
        let response = self.client.post_json(&self.profile_path, &request).await?;
        let text = response
            .text()
            .await
            .map_err(|e| ProfileError::Transport(e.to_string()))?;

        let envelope: ProfileEnvelope =
            serde_json::from_str(&text).map_err(|e| ProfileError::Decode(e.to_string()))?;

        let profile = envelope
            .result
            .and_then(|r| r.into_first())
            .ok_or_else(|| ProfileError::NotFound(envelope.message.clone()))?;

        tracing::info!(
            unique_id = unique_id,
            upstream_status = envelope.status,
            sections = ?profile.sections(),
            "Loaded user profile"
        );
        Ok(profile)
    }

    /// Record an approve/reject decision on the user's debt.
    pub async fn decide_debt(
        &self,
        unique_id: &str,
        decision: DebtDecision,
    ) -> Result<DebtUpdateOutcome, ProfileError> {
        let unique_id = unique_id.trim();
        if unique_id.is_empty() {
            return Err(ProfileError::MissingId);
        }

        let request = DebtUpdateRequest {
            unique_id,
            status: decision.as_status(),
        };
        let response = self.client.post_json(&self.debt_path, &request).await?;
        let text = response
            .text()
            .await
            .map_err(|e| ProfileError::Transport(e.to_string()))?;

        let outcome = serde_json::from_str::<DebtUpdateOutcome>(&text).unwrap_or(DebtUpdateOutcome {
            raw: Some(text),
            ..Default::default()
        });

        tracing::info!(unique_id = unique_id, ?decision, "Debt decision recorded");
        Ok(outcome)
    }
}
