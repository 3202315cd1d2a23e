//! Call Bridge Telemetry
//!
//! Structured logging via `tracing` plus lightweight in-process metrics.

mod config;
mod metrics;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use metrics::{Counter, Histogram, MetricsSnapshot};
pub use tracing_setup::init_tracing;

/// Initialize all telemetry for a service
pub fn init(service_name: &str) -> Result<(), TelemetryError> {
    let config = TelemetryConfig::from_env(service_name);
    init_tracing(&config)
}

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("Tracing initialization failed: {0}")]
    TracingInit(String),
}
