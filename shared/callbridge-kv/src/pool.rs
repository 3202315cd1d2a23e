//! Connection Pool for the Redis-compatible key-value store

use deadpool_redis::{Config, Connection, Pool, Runtime};
use tracing::{debug, info};

use crate::{KvError, Result};

/// Pool configuration
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub url: String,
    pub max_size: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            max_size: 16,
        }
    }
}

impl PoolConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: std::env::var("REDIS_URL").unwrap_or(defaults.url),
            max_size: std::env::var("REDIS_POOL_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_size),
        }
    }
}

/// Shared Redis connection pool.
///
/// Built once per process; connections go back to the pool when the
/// returned guard drops.
#[derive(Clone)]
pub struct KvPool {
    pool: Pool,
}

impl KvPool {
    /// Create a new connection pool. Connections are opened lazily.
    pub fn new(config: PoolConfig) -> Result<Self> {
        info!(max_size = config.max_size, "Creating key-value connection pool");

        let mut cfg = Config::from_url(config.url);
        cfg.pool = Some(deadpool_redis::PoolConfig::new(config.max_size));

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| KvError::Configuration(e.to_string()))?;

        debug!("Key-value pool created successfully");

        Ok(Self { pool })
    }

    /// Get a connection from the pool
    pub async fn get(&self) -> Result<Connection> {
        self.pool
            .get()
            .await
            .map_err(|e| KvError::Pool(e.to_string()))
    }

    /// Check pool health with a PING round trip
    pub async fn is_healthy(&self) -> bool {
        let Ok(mut conn) = self.get().await else {
            return false;
        };
        let pong: std::result::Result<String, _> =
            deadpool_redis::redis::cmd("PING").query_async(&mut conn).await;
        pong.is_ok()
    }

}
