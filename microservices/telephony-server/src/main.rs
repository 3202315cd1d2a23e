//! Telephony Server
//!
//! Places outbound Twilio calls and bridges the answered call's audio to a
//! voice-agent websocket:
//! - Tunnel discovery through the ngrok inspection API
//! - Twilio call creation with per-call session ids
//! - Session records in a Redis-compatible store
//! - TwiML callbacks for standard and demo calls

mod config;
mod error;
mod flow;
mod handlers;
mod routes;

use async_trait::async_trait;
use callbridge_core::{
    CallBridgeError, CallBridgeService, MicroserviceRuntime, TunnelDiscovery, TunnelResolver,
};
use callbridge_kv::{KvPool, KvStore, MemoryKvStore, RedisKvStore};
use callbridge_telemetry::{Counter, Histogram};
use callbridge_twilio_sdk::{CallApi, TwilioClient};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::{info, warn};

pub use config::Config;
pub use error::{Error, Result};

use config::StoreBackend;

/// In-process counters exposed on `/stats`
#[derive(Clone)]
pub struct Metrics {
    pub calls_initiated: Counter,
    pub calls_failed: Counter,
    pub callbacks_served: Counter,
    pub twilio_latency_ms: Histogram,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            calls_initiated: Counter::new(),
            calls_failed: Counter::new(),
            callbacks_served: Counter::new(),
            twilio_latency_ms: Histogram::new("twilio_latency_ms"),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub twilio: Arc<dyn CallApi>,
    pub store: Arc<dyn KvStore>,
    pub tunnels: Arc<dyn TunnelResolver>,
    pub config: Arc<Config>,
    pub metrics: Metrics,
    pub start_time: Instant,
}

impl AppState {
    /// Wire the production clients from configuration
    pub fn from_config(config: Config) -> std::result::Result<Self, CallBridgeError> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout())
            .build()?;

        let twilio = TwilioClient::with_client(
            http.clone(),
            config.twilio_api_base.clone(),
            config.twilio.clone(),
        );

        let tunnels = TunnelDiscovery::with_client(http, config.tunnel_api_url.clone())
            .with_tunnel_names(
                config.callback_tunnel_name.clone(),
                config.websocket_tunnel_name.clone(),
            );

        let store: Arc<dyn KvStore> = match config.store_backend {
            StoreBackend::Redis => {
                let pool = KvPool::new(config.redis.clone())
                    .map_err(|e| CallBridgeError::Store(e.to_string()))?;
                Arc::new(RedisKvStore::new(pool))
            }
            StoreBackend::Memory => {
                warn!("Using in-memory session store; sessions are lost on restart");
                Arc::new(MemoryKvStore::new())
            }
        };

        Ok(Self {
            twilio: Arc::new(twilio),
            store,
            tunnels: Arc::new(tunnels),
            config: Arc::new(config),
            metrics: Metrics::new(),
            start_time: Instant::now(),
        })
    }
}

/// HTTP front of the bridge, driven by `MicroserviceRuntime`
pub struct TelephonyServer {
    state: AppState,
}

impl TelephonyServer {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl CallBridgeService for TelephonyServer {
    fn service_id(&self) -> &'static str {
        "telephony-server"
    }

    async fn shutdown(&self) -> callbridge_core::Result<()> {
        info!(
            calls_initiated = self.state.metrics.calls_initiated.get(),
            calls_failed = self.state.metrics.calls_failed.get(),
            "Telephony Server shutting down"
        );
        Ok(())
    }

    async fn start(&self) -> callbridge_core::Result<()> {
        let bind_addr = self.state.config.service.bind_address();
        let app = routes::create_router(self.state.clone());

        let listener = TcpListener::bind(&bind_addr).await?;
        info!("Telephony Server listening on {}", bind_addr);

        axum::serve(listener, app).await?;

        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    callbridge_telemetry::init(&config.service.service_name)?;

    info!(
        store = ?config.store_backend,
        tunnel_api_url = %config.tunnel_api_url,
        "Starting Telephony Server"
    );

    let state = AppState::from_config(config)?;

    if !state.store.ping().await {
        warn!("Session store not reachable at startup; calls will fail until it recovers");
    }

    MicroserviceRuntime::run(Arc::new(TelephonyServer::new(state))).await?;

    Ok(())
}
