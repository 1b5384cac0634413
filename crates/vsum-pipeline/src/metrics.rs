//! Pipeline metrics.
//!
//! Emitted through the `metrics` facade; nothing is recorded unless the
//! embedding process installs a recorder.

use metrics::{counter, histogram};

/// Metric names as constants for consistency.
pub mod names {
    pub const EXTERNAL_CALLS_TOTAL: &str = "vsum_external_calls_total";
    pub const EXTERNAL_CALL_DURATION_SECONDS: &str = "vsum_external_call_duration_seconds";
    pub const REDUCTION_ITERATIONS: &str = "vsum_reduction_iterations";
    pub const TITLE_FALLBACKS_TOTAL: &str = "vsum_title_fallbacks_total";
}

/// Record one external service call.
pub fn record_external_call(kind: &'static str, success: bool, duration_secs: f64) {
    let labels = [
        ("kind", kind.to_string()),
        ("outcome", if success { "ok" } else { "error" }.to_string()),
    ];

    counter!(names::EXTERNAL_CALLS_TOTAL, &labels).increment(1);
    histogram!(names::EXTERNAL_CALL_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record how many passes a converged reduction took.
pub fn record_reduction_iterations(iterations: usize) {
    histogram!(names::REDUCTION_ITERATIONS).record(iterations as f64);
}

pub fn record_title_fallback() {
    counter!(names::TITLE_FALLBACKS_TOTAL).increment(1);
}
