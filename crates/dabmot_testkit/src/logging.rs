//! Test logging setup.

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Installs a tracing subscriber for test output.
///
/// Respects `RUST_LOG`; defaults to `debug` for the dabmot crates.
/// Safe to call from every test, the subscriber is installed once.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("dabmot_core=debug,dabmot_codec=debug"));
        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}
