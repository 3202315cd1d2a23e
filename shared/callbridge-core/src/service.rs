//! Service infrastructure for the bridge microservices

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

use crate::error::{CallBridgeError, Result};

/// Health status for liveness probes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub healthy: bool,
    pub service_id: String,
    pub version: String,
    pub uptime_seconds: u64,
}

/// Readiness status for readiness probes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessStatus {
    pub ready: bool,
    pub dependencies: Vec<DependencyStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyStatus {
    pub name: String,
    pub available: bool,
    pub latency_ms: Option<u64>,
}

/// Standard trait the bridge microservices implement
#[async_trait]
pub trait CallBridgeService: Send + Sync + 'static {
    /// Service identifier (e.g., "telephony-server")
    fn service_id(&self) -> &'static str;

    /// Service version
    fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    /// Graceful shutdown
    async fn shutdown(&self) -> Result<()>;

    /// Start the service (HTTP server etc.)
    async fn start(&self) -> Result<()>;
}

/// Standard microservice runtime bootstrap
pub struct MicroserviceRuntime {
    start_time: std::time::Instant,
}

impl MicroserviceRuntime {
    pub fn new() -> Self {
        Self {
            start_time: std::time::Instant::now(),
        }
    }

    /// Run a microservice until it exits or a shutdown signal arrives.
    ///
    /// A failed `start` is returned after shutdown so the process exits
    /// with an error.
    pub async fn run<S: CallBridgeService>(service: Arc<S>) -> Result<()> {
        let runtime = Self::new();

        info!(
            service_id = service.service_id(),
            version = service.version(),
            "Starting microservice"
        );

        let service_clone = service.clone();
        let mut service_handle = tokio::spawn(async move { service_clone.start().await });

        let outcome = tokio::select! {
            _ = Self::wait_for_shutdown() => {
                info!("Shutdown signal received, gracefully stopping...");
                Ok(())
            }
            joined = &mut service_handle => {
                match joined {
                    Ok(Ok(())) => {
                        info!("Service exited");
                        Ok(())
                    }
                    Ok(Err(e)) => {
                        error!("Service error: {}", e);
                        Err(e)
                    }
                    Err(e) => {
                        error!("Service task failed: {}", e);
                        Err(CallBridgeError::Internal(format!("service task failed: {}", e)))
                    }
                }
            }
        };

        if let Err(e) = service.shutdown().await {
            warn!("Error during shutdown: {}", e);
        }

        service_handle.abort();

        info!(
            uptime_seconds = runtime.start_time.elapsed().as_secs(),
            "Microservice stopped"
        );

        outcome
    }

    async fn wait_for_shutdown() {
        let ctrl_c = async {
            if let Err(e) = signal::ctrl_c().await {
                warn!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    sigterm.recv().await;
                }
                Err(e) => {
                    warn!("Failed to listen for SIGTERM: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {},
            _ = terminate => {},
        }
    }
}

impl Default for MicroserviceRuntime {
    fn default() -> Self {
        Self::new()
    }
}
