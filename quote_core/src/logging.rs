//! Logging setup on `tracing` / `tracing-subscriber`.
//!
//! The library only emits events; binaries decide whether and how to show
//! them by calling [`init`].

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber.
///
/// # Environment
/// - `RUST_LOG`: filter directives (default `info`),
///   e.g. `RUST_LOG=debug` or `RUST_LOG=quote_core=trace`
///
/// Calling it twice is harmless; the first subscriber stays.
///
/// # Example
/// ```no_run
/// quote_core::logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .try_init();
}

/// Debug-level logging routed through the test harness's capture.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
