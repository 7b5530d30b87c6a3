//! Tracing/logging setup shared by every binary and test harness.

pub mod subscriber;

/// Initialize process-wide observability (JSON logs filtered by `RUST_LOG`).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    subscriber::init();
}

/// Initialize human-readable logs captured by the test harness.
///
/// Safe to call from every test.
pub fn init_for_tests() {
    subscriber::init_for_tests();
}
