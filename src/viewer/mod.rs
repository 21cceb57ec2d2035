//! Secure document viewer.
//!
//! Ties the pipeline together for one mounted view:
//! gate → fetch → dispatch → render → watermark, strictly in that order.
//! A later [`SecureViewer::load`] or an [`SecureViewer::unmount`] supersedes
//! anything still in flight; the stale result is dropped on arrival rather
//! than the network request being aborted.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crate::document::{DocumentReference, DocumentSource, FetchError};
use crate::guard::{ExfiltrationGuard, GuardDecision, ViewerEvent};
use crate::render::{RenderError, RenderSurface, Renderer};
use crate::session::AccessGate;
use crate::watermark::stamp_watermark;

/// Outcome of a [`SecureViewer::load`].
#[derive(Debug)]
pub enum ViewState {
    /// No admin session; nothing was fetched.
    AuthorizationRequired,
    FetchFailed(FetchError),
    /// Rendering or stamping failed; the surface stays blank.
    RenderFailed(RenderError),
    /// The watermarked surface.
    Ready(Arc<RenderSurface>),
    /// A newer load started or the viewer was unmounted first.
    Superseded,
}

impl ViewState {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn surface(&self) -> Option<&Arc<RenderSurface>> {
        match self {
            Self::Ready(surface) => Some(surface),
            _ => None,
        }
    }
}

pub struct SecureViewer {
    gate: AccessGate,
    source: Arc<dyn DocumentSource>,
    renderer: Renderer,
    fallback_watermark: String,
    guard: ExfiltrationGuard,
    generation: AtomicU64,
    mounted: AtomicBool,
    current: Mutex<Option<Arc<RenderSurface>>>,
}

impl SecureViewer {
    /// Mount a viewer and attach its exfiltration guard.
    pub fn mount(
        gate: AccessGate,
        source: Arc<dyn DocumentSource>,
        renderer: Renderer,
        fallback_watermark: impl Into<String>,
    ) -> Self {
        Self {
            gate,
            source,
            renderer,
            fallback_watermark: fallback_watermark.into(),
            guard: ExfiltrationGuard::attach(),
            generation: AtomicU64::new(0),
            mounted: AtomicBool::new(true),
            current: Mutex::new(None),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    /// The surface from the most recent successful load, if still current.
    pub fn current_surface(&self) -> Option<Arc<RenderSurface>> {
        self.current.lock().clone()
    }

    /// Route a UI event through the guard.
    pub fn handle_event(&self, event: &ViewerEvent) -> GuardDecision {
        self.guard.decide(event)
    }

    /// Load and display `reference`, replacing whatever was shown before.
    pub async fn load(&self, reference: &DocumentReference) -> ViewState {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        if !self.is_mounted() {
            return ViewState::Superseded;
        }
        self.current.lock().take();

        if self.gate.authorize().is_err() {
            tracing::info!(path = reference.path(), "Viewer refused without a session");
            return ViewState::AuthorizationRequired;
        }

        let blob = match self.source.fetch(reference).await {
            Ok(blob) => blob,
            Err(_) if self.is_stale(generation) => return ViewState::Superseded,
            Err(e) => return ViewState::FetchFailed(e),
        };

        if self.is_stale(generation) {
            tracing::debug!(path = reference.path(), "Discarding superseded document");
            return ViewState::Superseded;
        }

        let renderer = self.renderer.clone();
        let text = reference.watermark_text().to_string();
        let fallback = self.fallback_watermark.clone();

        let rendered = tokio::task::spawn_blocking(move || {
            let mut surface = renderer.render(&blob)?;
            drop(blob);
            stamp_watermark(&mut surface, &text, &fallback)
                .map_err(|e| RenderError::Watermark(e.to_string()))?;
            Ok::<_, RenderError>(surface)
        })
        .await
        .map_err(|e| RenderError::Task(e.to_string()))
        .and_then(|result| result);

        if self.is_stale(generation) {
            return ViewState::Superseded;
        }

        match rendered {
            Ok(surface) => {
                let surface = Arc::new(surface);
                let mut current = self.current.lock();
                // Re-check under the lock so an unmount cannot be overwritten
                if self.is_stale(generation) {
                    return ViewState::Superseded;
                }
                *current = Some(surface.clone());
                tracing::info!(
                    path = reference.path(),
                    width = surface.width(),
                    height = surface.height(),
                    "Document ready"
                );
                ViewState::Ready(surface)
            }
            Err(e) => {
                tracing::warn!(path = reference.path(), error = %e, "Document could not be displayed");
                ViewState::RenderFailed(e)
            }
        }
    }

    /// Detach the guard, drop the current surface and discard in-flight loads.
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::Release);
        let mut current = self.current.lock();
        self.generation.fetch_add(1, Ordering::AcqRel);
        current.take();
        drop(current);
        self.guard.detach();
    }

    fn is_stale(&self, generation: u64) -> bool {
        !self.is_mounted() || self.generation.load(Ordering::Acquire) != generation
    }
}

impl std::fmt::Debug for SecureViewer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureViewer")
            .field("renderer", &self.renderer)
            .field("mounted", &self.is_mounted())
            .field("generation", &self.generation.load(Ordering::Relaxed))
            .finish()
    }
}
