//! Authenticated HTTP client for the admin console proxy.
//!
//! Every request goes through the [`AccessGate`](crate::session::AccessGate): without
//! an admin token nothing is sent. The token is attached as a bearer credential, and a
//! `401 Unauthorized` response expires the shared session before the error is returned.
//! Requests are never retried.

use reqwest::{Response, StatusCode};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use crate::config::ApiConfig;
use crate::session::{SessionController, SessionError, SessionToken};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authorization required: no admin session")]
    Unauthorized,

    #[error("Session expired")]
    SessionExpired,

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

impl From<SessionError> for ApiError {
    fn from(_: SessionError) -> Self {
        ApiError::Unauthorized
    }
}

/// Thin wrapper over `reqwest::Client` bound to one proxy origin and one session.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionController,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns `ApiError::Client` if the HTTP client cannot be created
    /// (e.g., TLS configuration issues).
    pub fn new(config: &ApiConfig, session: SessionController) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &SessionController {
        &self.session
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Authenticated GET. Returns the response only for success statuses.
    pub async fn get(&self, path: &str) -> Result<Response, ApiError> {
        let token = self.session.gate().authorize()?;
        let url = self.url(path);
        tracing::debug!(url = %url, "GET");

        let response = self
            .http
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, token.bearer_header())
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        self.check(path, &token, response).await
    }

    /// Authenticated JSON POST. Returns the response only for success statuses.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Response, ApiError> {
        let token = self.session.gate().authorize()?;
        let url = self.url(path);
        tracing::debug!(url = %url, "POST");

        let response = self
            .http
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, token.bearer_header())
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        self.check(path, &token, response).await
    }

    async fn check(
        &self,
        path: &str,
        token: &SessionToken,
        response: Response,
    ) -> Result<Response, ApiError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            self.session
                .expire(token, &format!("401 Unauthorized from {}", path));
            return Err(ApiError::SessionExpired);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(path = path, status = status.as_u16(), "Upstream request failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}
