//! Tunnel Discovery Client
//!
//! Finds the public URLs of the local development tunnels by querying the
//! ngrok inspection API. Two tunnels matter: one exposes this server to
//! the telephony provider, the other exposes the voice-agent websocket.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

pub const DEFAULT_TUNNEL_API_URL: &str = "http://ngrok:4040/api/tunnels";
pub const DEFAULT_CALLBACK_TUNNEL: &str = "twilio-app";
pub const DEFAULT_WEBSOCKET_TUNNEL: &str = "bolna-app";

/// Public URLs of both tunnels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TunnelPair {
    pub callback_url: String,
    pub websocket_url: String,
}

/// Outcome of a tunnel lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TunnelResolution {
    Resolved(TunnelPair),
    /// Inspection API answered but at least one named tunnel was missing
    PartiallyResolved {
        callback_url: Option<String>,
        websocket_url: Option<String>,
    },
    /// Inspection API unreachable, non-success status, or unrecognised body
    Unreachable { reason: String },
}

impl TunnelResolution {
    pub fn callback_url(&self) -> Option<&str> {
        match self {
            Self::Resolved(pair) => Some(&pair.callback_url),
            Self::PartiallyResolved { callback_url, .. } => callback_url.as_deref(),
            Self::Unreachable { .. } => None,
        }
    }

    pub fn websocket_url(&self) -> Option<&str> {
        match self {
            Self::Resolved(pair) => Some(&pair.websocket_url),
            Self::PartiallyResolved { websocket_url, .. } => websocket_url.as_deref(),
            Self::Unreachable { .. } => None,
        }
    }

    pub fn into_pair(self) -> Option<TunnelPair> {
        match self {
            Self::Resolved(pair) => Some(pair),
            _ => None,
        }
    }
}

/// Source of tunnel URLs, resolved fresh on every call
#[async_trait]
pub trait TunnelResolver: Send + Sync {
    async fn resolve(&self) -> TunnelResolution;
}

/// Body returned by `GET /api/tunnels`
#[derive(Debug, Deserialize)]
pub struct TunnelListing {
    pub tunnels: Vec<TunnelDescriptor>,
}

#[derive(Debug, Deserialize)]
pub struct TunnelDescriptor {
    pub name: String,
    pub public_url: String,
}

impl TunnelListing {
    /// Pick the callback and websocket tunnels by exact name, in any order.
    pub fn resolve(&self, callback_tunnel: &str, websocket_tunnel: &str) -> TunnelResolution {
        let mut callback_url = None;
        let mut websocket_url = None;

        for tunnel in &self.tunnels {
            if tunnel.name == callback_tunnel {
                callback_url = Some(tunnel.public_url.clone());
            } else if tunnel.name == websocket_tunnel {
                websocket_url = Some(tunnel.public_url.replace("https:", "wss:"));
            }
        }

        match (callback_url, websocket_url) {
            (Some(callback_url), Some(websocket_url)) => TunnelResolution::Resolved(TunnelPair {
                callback_url,
                websocket_url,
            }),
            (callback_url, websocket_url) => TunnelResolution::PartiallyResolved {
                callback_url,
                websocket_url,
            },
        }
    }
}

/// Tunnel discovery against the ngrok inspection API
#[derive(Clone)]
pub struct TunnelDiscovery {
    client: reqwest::Client,
    api_url: String,
    callback_tunnel: String,
    websocket_tunnel: String,
}

impl TunnelDiscovery {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_url)
    }

    pub fn with_client(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            callback_tunnel: DEFAULT_CALLBACK_TUNNEL.to_string(),
            websocket_tunnel: DEFAULT_WEBSOCKET_TUNNEL.to_string(),
        }
    }

    /// Override the tunnel names to look up
    pub fn with_tunnel_names(
        mut self,
        callback_tunnel: impl Into<String>,
        websocket_tunnel: impl Into<String>,
    ) -> Self {
        self.callback_tunnel = callback_tunnel.into();
        self.websocket_tunnel = websocket_tunnel.into();
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    async fn fetch_listing(&self) -> Result<TunnelListing, String> {
        let response = self
            .client
            .get(&self.api_url)
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("unable to fetch tunnels, status code: {}", status.as_u16()));
        }

        response
            .json::<TunnelListing>()
            .await
            .map_err(|e| format!("unrecognised tunnel listing: {}", e))
    }
}

#[async_trait]
impl TunnelResolver for TunnelDiscovery {
    async fn resolve(&self) -> TunnelResolution {
        let listing = match self.fetch_listing().await {
            Ok(listing) => listing,
            Err(reason) => {
                warn!(api_url = %self.api_url, %reason, "Tunnel discovery failed");
                return TunnelResolution::Unreachable { reason };
            }
        };

        let resolution = listing.resolve(&self.callback_tunnel, &self.websocket_tunnel);
        debug!(
            callback_url = ?resolution.callback_url(),
            websocket_url = ?resolution.websocket_url(),
            "Tunnels resolved"
        );
        resolution
    }
}
