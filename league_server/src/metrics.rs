//! Prometheus metrics for monitoring the report server.
//!
//! Metrics are recorded through the `metrics` facade and exposed in Prometheus
//! text format when an exporter is installed. Without an exporter every
//! recording call is a no-op.
//!
//! # Metrics Categories
//!
//! - **HTTP Metrics**: Request counts, duration, status codes
//! - **Report Metrics**: Reports generated by kind, format and outcome
//! - **Auth Metrics**: Login attempts
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use league_server::metrics;
//! use std::net::SocketAddr;
//!
//! let addr: SocketAddr = "127.0.0.1:9090".parse().unwrap();
//! metrics::init_metrics(addr).unwrap();
//!
//! metrics::reports_generated_total("fixture", "pdf", "ok");
//! ```

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Initialize Prometheus metrics exporter.
///
/// Metrics will be available at `http://<addr>/metrics`.
///
/// # Arguments
///
/// - `addr`: Address to bind the metrics server to (e.g., `0.0.0.0:9090`)
///
/// # Returns
///
/// Result indicating success or error message
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {}", e))
}

// ============================================================================
// HTTP Metrics
// ============================================================================

/// Record HTTP request.
pub fn http_requests_total(method: &str, path: &str, status: u16) {
    metrics::counter!("http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record HTTP request duration in milliseconds.
pub fn http_request_duration_ms(method: &str, path: &str, duration_ms: f64) {
    metrics::histogram!("http_request_duration_ms",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(duration_ms);
}

// ============================================================================
// Report Metrics
// ============================================================================

/// Increment the generated reports counter.
///
/// `outcome` is `ok` or the error class (`not_found`, `invalid`, `error`).
pub fn reports_generated_total(kind: &str, format: &str, outcome: &str) {
    metrics::counter!("reports_generated_total",
        "kind" => kind.to_string(),
        "format" => format.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Record report generation time in milliseconds.
pub fn report_duration_ms(kind: &str, format: &str, duration_ms: f64) {
    metrics::histogram!("report_duration_ms",
        "kind" => kind.to_string(),
        "format" => format.to_string()
    )
    .record(duration_ms);
}

// ============================================================================
// Auth Metrics
// ============================================================================

/// Increment login attempts counter.
pub fn login_attempts_total(success: bool) {
    metrics::counter!("login_attempts_total",
        "success" => success.to_string()
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_exporter_is_noop() {
        http_requests_total("GET", "/health", 200);
        http_request_duration_ms("GET", "/health", 1.5);
        reports_generated_total("fixture", "pdf", "ok");
        report_duration_ms("fixture", "pdf", 42.0);
        login_attempts_total(false);
    }
}
