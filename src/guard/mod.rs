//! Exfiltration guard.
//!
//! While a viewer is mounted, cancels the casual ways of copying the document
//! out of the UI: the context menu, dragging, and pointer-down inside the
//! viewer region, plus the save and print shortcuts anywhere.
//!
//! This is advisory hardening only. It does nothing against screenshots,
//! developer tools, or anyone reading the bytes off the wire, and must not be
//! treated as a security boundary. The watermark is what identifies a leak.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::metrics::ViewerMetrics;

/// A UI event delivered to the guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerEvent {
    ContextMenu { inside_viewer: bool },
    DragStart { inside_viewer: bool },
    PointerDown { inside_viewer: bool },
    /// Keyboard event at document scope.
    KeyDown { key: String, ctrl: bool, meta: bool },
}

impl ViewerEvent {
    pub fn key(key: impl Into<String>, ctrl: bool, meta: bool) -> Self {
        Self::KeyDown {
            key: key.into(),
            ctrl,
            meta,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::ContextMenu { .. } => "context_menu",
            Self::DragStart { .. } => "drag_start",
            Self::PointerDown { .. } => "pointer_down",
            Self::KeyDown { .. } => "key_down",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Suppress the default action.
    Cancel,
    Allow,
}

/// Event filter bound to one mounted viewer.
#[derive(Debug)]
pub struct ExfiltrationGuard {
    attached: AtomicBool,
}

impl ExfiltrationGuard {
    /// Mount the guard. It stays attached until [`detach`](Self::detach) or drop.
    pub fn attach() -> Self {
        tracing::debug!("Exfiltration guard attached");
        Self {
            attached: AtomicBool::new(true),
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::Acquire)
    }

    pub fn detach(&self) {
        if self.attached.swap(false, Ordering::AcqRel) {
            tracing::debug!("Exfiltration guard detached");
        }
    }

    pub fn decide(&self, event: &ViewerEvent) -> GuardDecision {
        if !self.is_attached() {
            return GuardDecision::Allow;
        }

        let cancel = match event {
            ViewerEvent::ContextMenu { inside_viewer }
            | ViewerEvent::DragStart { inside_viewer }
            | ViewerEvent::PointerDown { inside_viewer } => *inside_viewer,
            ViewerEvent::KeyDown { key, ctrl, meta } => {
                (*ctrl || *meta) && is_save_or_print(key)
            }
        };

        if cancel {
            ViewerMetrics::global().record_guard_cancellation(event.label());
            GuardDecision::Cancel
        } else {
            GuardDecision::Allow
        }
    }
}

impl Drop for ExfiltrationGuard {
    fn drop(&mut self) {
        self.detach();
    }
}

fn is_save_or_print(key: &str) -> bool {
    key.eq_ignore_ascii_case("s") || key.eq_ignore_ascii_case("p")
}
