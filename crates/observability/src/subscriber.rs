//! Subscriber construction (filters, formatting).

use tracing_subscriber::EnvFilter;

/// Default directive when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Filter from `RUST_LOG`, falling back to `default`.
pub fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// JSON logs + timestamps, configurable via `RUST_LOG`.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(DEFAULT_FILTER))
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}

/// Compact logs routed through the test writer, so `cargo test` only shows them on failure.
pub fn init_for_tests() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter("debug"))
        .with_test_writer()
        .compact()
        .try_init();
}
