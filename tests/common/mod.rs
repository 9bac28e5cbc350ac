//! Shared helpers for the workspace tests

use tracing_subscriber::{fmt, EnvFilter};

/// Route `tracing` output to the test harness.
///
/// Use `RUST_LOG` to override the default filter, e.g.
/// `RUST_LOG=scrap_ir=trace cargo test`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // Several tests race to install the subscriber; only the first one wins
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_test_writer()
        .try_init();
}
