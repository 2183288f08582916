//! Structured logging with tracing.
//!
//! One global fmt subscriber, filtered by `RUST_LOG` with an `info` default.
//! Components log through the `tracing` macros directly; this module only owns
//! initialization so binaries and tests configure it exactly once.

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    /// Installs the global subscriber. Call once at process start.
    pub fn init() {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_span_events(FmtSpan::ENTER)
            .init()
    }
}
