//! Configuration management for microservices

use crate::error::{CallBridgeError, Result};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub service_name: String,
    pub host: String,
    pub http_port: u16,
    pub log_level: String,
    pub http_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            service_name: "telephony-server".to_string(),
            host: "0.0.0.0".to_string(),
            http_port: 8001,
            log_level: "info".to_string(),
            http_timeout_secs: 10,
        }
    }
}

impl ServiceConfig {
    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let defaults = Self::default();
        Ok(Self {
            service_name: env::var("SERVICE_NAME").unwrap_or(defaults.service_name),
            host: env::var("HOST").unwrap_or(defaults.host),
            http_port: parse_var("PORT", defaults.http_port)?,
            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            http_timeout_secs: parse_var("HTTP_TIMEOUT_SECS", defaults.http_timeout_secs)?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }
}

/// Read a required variable, failing with a configuration error when unset or blank.
pub fn required_var(key: &str) -> Result<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(CallBridgeError::Config(format!("{} must be set", key))),
    }
}

/// Parse an optional variable, falling back to `default` when unset.
pub fn parse_var<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| CallBridgeError::Config(format!("Invalid {}: {}", key, e))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.http_port, 8001);
        assert_eq!(config.bind_address(), "0.0.0.0:8001");
    }

    #[test]
    fn test_parse_var_invalid() {
        std::env::set_var("CALLBRIDGE_TEST_BAD_PORT", "not-a-port");
        let result: Result<u16> = parse_var("CALLBRIDGE_TEST_BAD_PORT", 80);
        assert!(matches!(result, Err(CallBridgeError::Config(_))));
    }

    #[test]
    fn test_parse_var_default() {
        let value: u64 = parse_var("CALLBRIDGE_TEST_UNSET_VAR", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_required_var_blank() {
        std::env::set_var("CALLBRIDGE_TEST_BLANK", "  ");
        assert!(required_var("CALLBRIDGE_TEST_BLANK").is_err());
        assert!(required_var("CALLBRIDGE_TEST_MISSING").is_err());
    }
}
