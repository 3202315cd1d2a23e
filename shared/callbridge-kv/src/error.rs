//! Key-value store error types

use deadpool_redis::redis::RedisError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, KvError>;

#[derive(Debug, Error)]
pub enum KvError {
    #[error("Command error: {0}")]
    Command(#[from] RedisError),

    #[error("Pool error: {0}")]
    Pool(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
