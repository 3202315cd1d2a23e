//! Error types for Call Bridge services

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CallBridgeError>;

#[derive(Error, Debug)]
pub enum CallBridgeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Timeout: {0}")]
    Timeout(String),
}

impl From<std::io::Error> for CallBridgeError {
    fn from(err: std::io::Error) -> Self {
        CallBridgeError::Network(err.to_string())
    }
}

impl From<reqwest::Error> for CallBridgeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CallBridgeError::Timeout(err.to_string())
        } else {
            CallBridgeError::Network(err.to_string())
        }
    }
}
