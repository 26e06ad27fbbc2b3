#![deny(unsafe_code)]
//! Shared scaffolding for the Vigil integration test suites
//!
//! The actual tests live under `tests/`; this library only carries what
//! every suite wants: a process-wide tracing subscriber so failing runs
//! can be replayed with `RUST_LOG=debug`.

use std::sync::Once;

static INIT: Once = Once::new();

/// Install the test tracing subscriber once per process.
///
/// Honors `RUST_LOG`; defaults to `info` so sweep summaries and
/// workflow decisions show up in captured test output.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
