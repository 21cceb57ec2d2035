//! Admin session handling and the access gate.
//!
//! The session controller is passed explicitly to whatever needs it. Anything that
//! needs to observe expiry registers a
//! [`SessionExpiryListener`] and keeps the returned [`ListenerRegistration`] alive
//! for as long as it is mounted; dropping the registration deregisters it.
//!
//! # Expiry semantics
//!
//! - `expire` takes the token the failing request carried. It clears the session and
//!   notifies listeners only while that token is still the current one, so several
//!   in-flight calls observing a 401 expire a session exactly once.
//! - A late 401 for a token that was already replaced by `sign_in` is ignored.

use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use thiserror::Error;

use crate::metrics::ViewerMetrics;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// No admin token is present; the caller must re-authenticate.
    #[error("Authorization required: no admin session")]
    AuthorizationRequired,

    #[error("Session token cannot be empty")]
    EmptyToken,
}

/// Opaque bearer credential for the admin session.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Result<Self, SessionError> {
        let token = token.into().trim().to_string();
        if token.is_empty() {
            return Err(SessionError::EmptyToken);
        }
        Ok(Self(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header.
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/// Receives the one-shot notification that the admin must re-authenticate.
pub trait SessionExpiryListener: Send + Sync {
    fn on_session_expired(&self, reason: &str);
}

type ListenerSlot = (u64, Arc<dyn SessionExpiryListener>);

struct ControllerInner {
    token: RwLock<Option<SessionToken>>,
    listeners: Mutex<Vec<ListenerSlot>>,
    next_listener_id: AtomicU64,
}

/// Capability for reading and invalidating the admin session.
///
/// Cloning is cheap; clones share the same session.
#[derive(Clone)]
pub struct SessionController {
    inner: Arc<ControllerInner>,
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("authenticated", &self.is_authenticated())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new(None)
    }
}

impl SessionController {
    pub fn new(token: Option<SessionToken>) -> Self {
        Self {
            inner: Arc::new(ControllerInner {
                token: RwLock::new(token),
                listeners: Mutex::new(Vec::new()),
                next_listener_id: AtomicU64::new(1),
            }),
        }
    }

    /// Build a controller from an optional raw token; blank tokens count as absent.
    pub fn from_raw(token: Option<&str>) -> Self {
        Self::new(token.and_then(|t| SessionToken::new(t).ok()))
    }

    pub fn token(&self) -> Option<SessionToken> {
        self.inner.token.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.token.read().is_some()
    }

    /// Install a fresh token, starting a new session.
    pub fn sign_in(&self, token: SessionToken) {
        *self.inner.token.write() = Some(token);
    }

    /// Invalidate the session after an unauthorized response to a request sent
    /// with `token`.
    ///
    /// Returns `true` for the call that actually performed the expiry. Overlapping
    /// callers, and callers whose token was already replaced, get `false` and
    /// trigger no notifications.
    pub fn expire(&self, token: &SessionToken, reason: &str) -> bool {
        {
            let mut current = self.inner.token.write();
            if current.as_ref() != Some(token) {
                tracing::debug!(reason = reason, "Ignoring 401 for a token that is no longer current");
                return false;
            }
            current.take();
        }

        ViewerMetrics::global().session_expiries.inc();
        tracing::warn!(reason = reason, "Admin session expired, re-authentication required");

        // Snapshot so listeners may (de)register without deadlocking
        let listeners: Vec<Arc<dyn SessionExpiryListener>> = self
            .inner
            .listeners
            .lock()
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        for listener in listeners {
            listener.on_session_expired(reason);
        }
        true
    }

    /// Register a listener for the lifetime of the returned registration.
    pub fn register(&self, listener: Arc<dyn SessionExpiryListener>) -> ListenerRegistration {
        let id = self.inner.next_listener_id.fetch_add(1, Ordering::Relaxed);
        self.inner.listeners.lock().push((id, listener));
        ListenerRegistration {
            id,
            controller: Arc::downgrade(&self.inner),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.lock().len()
    }

    pub fn gate(&self) -> AccessGate {
        AccessGate {
            session: self.clone(),
        }
    }
}

/// Keeps a listener registered; deregisters on drop.
#[must_use = "dropping the registration deregisters the listener immediately"]
pub struct ListenerRegistration {
    id: u64,
    controller: Weak<ControllerInner>,
}

impl ListenerRegistration {
    /// Explicit teardown, same as dropping.
    pub fn deregister(self) {}
}

impl Drop for ListenerRegistration {
    fn drop(&mut self) {
        if let Some(inner) = self.controller.upgrade() {
            inner.listeners.lock().retain(|(id, _)| *id != self.id);
        }
    }
}

/// Refuses operations when no admin session is present.
#[derive(Debug, Clone)]
pub struct AccessGate {
    session: SessionController,
}

impl AccessGate {
    pub fn authorize(&self) -> Result<SessionToken, SessionError> {
        self.session
            .token()
            .ok_or(SessionError::AuthorizationRequired)
    }

    pub fn session(&self) -> &SessionController {
        &self.session
    }
}
