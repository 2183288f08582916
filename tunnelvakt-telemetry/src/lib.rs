//! # Tunnelvakt Telemetry
//!
//! Logging and metrics for the enforcement pipeline.

pub mod logging;
pub mod metrics;

pub use logging::EventLogger;
pub use metrics::MetricsRecorder;
