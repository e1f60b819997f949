//! Structured logging configuration.
//!
//! Installs a `tracing` subscriber that also receives the `log` records
//! emitted by the `league` library.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured logging
///
/// Log levels are read from `RUST_LOG`, defaulting to `info,sqlx=warn`.
///
/// # Example
///
/// ```no_run
/// use league_server::logging;
///
/// #[tokio::main]
/// async fn main() {
///     logging::init();
///     tracing::info!("Server starting");
/// }
/// ```
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log security event with structured data
///
/// # Arguments
///
/// * `event_type` - Type of security event
/// * `user_id` - Optional user ID
/// * `message` - Event message
pub fn log_security_event(event_type: &str, user_id: Option<i64>, message: &str) {
    tracing::warn!(
        event_type = event_type,
        user_id = user_id,
        "SECURITY: {}",
        message
    );
}

/// Log the outcome of a report request
///
/// Slow reports are raised to `warn`.
///
/// # Arguments
///
/// * `report` - Report kind and format, e.g. `fixture/pdf`
/// * `target_id` - Tournament or team id
/// * `duration_ms` - Generation time in milliseconds
/// * `outcome` - `ok` or the error class
pub fn log_report(report: &str, target_id: i64, duration_ms: u64, outcome: &str) {
    if duration_ms > 2000 {
        tracing::warn!(
            report = report,
            target_id = target_id,
            duration_ms = duration_ms,
            outcome = outcome,
            "PERFORMANCE: Slow report"
        );
    } else {
        tracing::debug!(
            report = report,
            target_id = target_id,
            duration_ms = duration_ms,
            outcome = outcome,
            "Report request finished"
        );
    }
}
