// Viewer pipeline Prometheus metrics
//
// Provides metrics for the secure document pipeline:
// - Document fetch outcomes
// - Render outcomes per strategy
// - Watermark compositing latency
// - Exfiltration guard cancellations
// - Session expiries

use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, Encoder, Histogram,
    IntCounter, IntCounterVec, TextEncoder,
};
use std::sync::OnceLock;

/// Global metrics registry for the viewer pipeline
pub struct ViewerMetrics {
    /// Document fetches by outcome (success, unauthorized, status, transport, expired)
    pub fetches: IntCounterVec,

    /// Render attempts by strategy and outcome
    pub renders: IntCounterVec,

    /// Time spent stamping the watermark (in seconds)
    pub watermark_duration: Histogram,

    /// Events cancelled by the exfiltration guard, by event kind
    pub guard_cancellations: IntCounterVec,

    /// Number of times an admin session was expired
    pub session_expiries: IntCounter,
}

/// Global singleton instance of metrics
static METRICS: OnceLock<ViewerMetrics> = OnceLock::new();

impl ViewerMetrics {
    /// Initialize and return the global metrics instance
    ///
    /// Subsequent calls return the same instance.
    pub fn global() -> &'static Self {
        METRICS.get_or_init(|| {
            let fetches = register_int_counter_vec!(
                "paydesk_document_fetches_total",
                "Total number of document fetches by outcome",
                &["outcome"]
            )
            .expect("Failed to register document_fetches_total metric");

            let renders = register_int_counter_vec!(
                "paydesk_document_renders_total",
                "Total number of document renders by strategy and outcome",
                &["strategy", "outcome"]
            )
            .expect("Failed to register document_renders_total metric");

            let watermark_duration = register_histogram!(
                "paydesk_watermark_duration_seconds",
                "Duration of watermark compositing in seconds",
                vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0]
            )
            .expect("Failed to register watermark_duration_seconds metric");

            let guard_cancellations = register_int_counter_vec!(
                "paydesk_guard_cancellations_total",
                "Viewer events cancelled by the exfiltration guard",
                &["event"]
            )
            .expect("Failed to register guard_cancellations_total metric");

            let session_expiries = register_int_counter!(
                "paydesk_session_expiries_total",
                "Number of admin sessions invalidated after a 401"
            )
            .expect("Failed to register session_expiries_total metric");

            ViewerMetrics {
                fetches,
                renders,
                watermark_duration,
                guard_cancellations,
                session_expiries,
            }
        })
    }

    pub fn record_fetch(&self, outcome: &str) {
        self.fetches.with_label_values(&[outcome]).inc();
    }

    pub fn record_render(&self, strategy: &str, outcome: &str) {
        self.renders.with_label_values(&[strategy, outcome]).inc();
    }

    pub fn record_guard_cancellation(&self, event: &str) {
        self.guard_cancellations.with_label_values(&[event]).inc();
    }
}

/// Render every registered metric in the Prometheus text exposition format.
pub fn gather_text() -> String {
    let encoder = TextEncoder::new();
    let families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&families, &mut buffer) {
        tracing::warn!(error = %e, "Failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
