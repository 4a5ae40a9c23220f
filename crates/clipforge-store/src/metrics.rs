//! Store metrics collection.
//!
//! Request counters by operation and outcome, recorded through the
//! `metrics` facade; the embedding service decides whether an exporter
//! is installed.

use metrics::counter;

/// Metric name constants for consistency.
pub mod names {
    /// Total store requests by operation and outcome.
    pub const REQUESTS_TOTAL: &str = "job_store_requests_total";
}

/// Record a completed store request.
pub fn record_request(operation: &'static str, outcome: &'static str) {
    counter!(
        names::REQUESTS_TOTAL,
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
}
