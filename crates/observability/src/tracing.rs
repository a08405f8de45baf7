//! Tracing/logging initialization.
//!
//! JSON logs with an env-driven filter; correlation IDs and layered exporters
//! can be added here later without touching call sites.

use tracing_subscriber::EnvFilter;

/// Initialize tracing for the process: JSON lines to stdout, filtered via
/// `RUST_LOG` (default `info`).
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_target(false)
        .with_current_span(false)
        .try_init();
}
