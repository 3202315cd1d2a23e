//! Configuration for the Telephony Server

use callbridge_core::config::required_var;
use callbridge_core::discovery::{
    DEFAULT_CALLBACK_TUNNEL, DEFAULT_TUNNEL_API_URL, DEFAULT_WEBSOCKET_TUNNEL,
};
use callbridge_core::{CallBridgeError, ServiceConfig};
use callbridge_kv::PoolConfig;
use callbridge_twilio_sdk::{TwilioCredentials, DEFAULT_API_BASE};

/// Where call session records are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Redis,
    /// In-process map, for running without Redis
    Memory,
}

impl std::str::FromStr for StoreBackend {
    type Err = CallBridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "memory" => Ok(Self::Memory),
            other => Err(CallBridgeError::Config(format!(
                "Invalid STORE_BACKEND: {}",
                other
            ))),
        }
    }
}

/// Telephony Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP bind, log level and client timeout
    pub service: ServiceConfig,
    pub twilio: TwilioCredentials,
    /// Caller ID for every outbound call
    pub twilio_phone_number: String,
    pub twilio_api_base: String,
    pub store_backend: StoreBackend,
    pub redis: PoolConfig,
    /// ngrok inspection endpoint
    pub tunnel_api_url: String,
    pub callback_tunnel_name: String,
    pub websocket_tunnel_name: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> callbridge_core::Result<Self> {
        let service = ServiceConfig::from_env()?;

        Ok(Self {
            service,
            twilio: TwilioCredentials {
                account_sid: required_var("TWILIO_ACCOUNT_SID")?,
                auth_token: required_var("TWILIO_AUTH_TOKEN")?,
            },
            twilio_phone_number: required_var("TWILIO_PHONE_NUMBER")?,
            twilio_api_base: std::env::var("TWILIO_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            store_backend: std::env::var("STORE_BACKEND")
                .unwrap_or_else(|_| "redis".to_string())
                .parse()?,
            redis: PoolConfig::from_env(),
            tunnel_api_url: std::env::var("TUNNEL_API_URL")
                .unwrap_or_else(|_| DEFAULT_TUNNEL_API_URL.to_string()),
            callback_tunnel_name: std::env::var("CALLBACK_TUNNEL_NAME")
                .unwrap_or_else(|_| DEFAULT_CALLBACK_TUNNEL.to_string()),
            websocket_tunnel_name: std::env::var("WEBSOCKET_TUNNEL_NAME")
                .unwrap_or_else(|_| DEFAULT_WEBSOCKET_TUNNEL.to_string()),
        })
    }

    pub fn http_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.service.http_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_backend_parse() {
        assert_eq!("redis".parse::<StoreBackend>().unwrap(), StoreBackend::Redis);
        assert_eq!("Memory".parse::<StoreBackend>().unwrap(), StoreBackend::Memory);
        assert!("postgres".parse::<StoreBackend>().is_err());
    }
}
