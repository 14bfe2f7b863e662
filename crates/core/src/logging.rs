//! Structured logging infrastructure for Helmlink.
//!
//! Centralized logging initialization with environment-based filtering.
//! State transitions in the arbitration and supervision layers log
//! structured fields (endpoint, publisher, strength) rather than formatted
//! strings.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize human-readable logging.
///
/// Log level comes from `RUST_LOG`, defaulting to `info`.
///
/// # Example
/// ```no_run
/// helmlink_core::logging::init();
/// tracing::info!("actuator starting");
/// ```
pub fn init() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_target(true))
        .init();
}

/// Initialize JSON logging for log-aggregated deployments.
///
/// # Example
/// ```no_run
/// helmlink_core::logging::init_json();
/// tracing::info!(service = "sim", "service started");
/// ```
pub fn init_json() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().json().with_target(true))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_construction_doesnt_panic() {
        // Initialization is once-per-process, so only the filter is exercised
        // here; full init runs in the service binary.
        let _ = env_filter();
    }
}
