//! Logging setup for the command line application.
//!
//! Diagnostics go to stderr so that stdout only carries the report. With the `profiling`
//! feature, the library's profiling scopes become tracing spans and their timings are logged
//! when they close.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Initialize logging with sensible defaults.
pub fn setup_logging() {
    if std::env::var("RUST_LOG").is_err() {
        // Safety: single-threaded at startup
        unsafe {
            if cfg!(debug_assertions) {
                std::env::set_var("RUST_LOG", "debug");
            } else {
                std::env::set_var("RUST_LOG", "info");
            }
        }
    }

    let fmt_layer = fmt::layer().with_writer(std::io::stderr);
    #[cfg(feature = "profiling")]
    let fmt_layer = fmt_layer.with_span_events(fmt::format::FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(EnvFilter::from_default_env()))
        .init();

    tracing::debug!(
        "Logging initialized (RUST_LOG={})",
        std::env::var("RUST_LOG").unwrap_or_default()
    );
}
