//! Key-value store clients

use async_trait::async_trait;
use dashmap::DashMap;
use deadpool_redis::redis::AsyncCommands;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::{KvEntry, KvPool, Result};

/// Write side of a key-value store, shared across concurrent handlers
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Store `entry.value` under `entry.key`, replacing any previous value
    async fn set(&self, entry: KvEntry) -> Result<()>;

    /// Liveness of the backing store
    async fn ping(&self) -> bool;
}

/// Redis-backed store on top of the shared pool
#[derive(Clone)]
pub struct RedisKvStore {
    pool: KvPool,
}

impl RedisKvStore {
    pub fn new(pool: KvPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KvStore for RedisKvStore {
    #[instrument(skip(self, entry), fields(key = %entry.key))]
    async fn set(&self, entry: KvEntry) -> Result<()> {
        let mut conn = self.pool.get().await?;

        conn.set::<_, _, ()>(&entry.key, &entry.value).await?;

        debug!("Key stored");
        Ok(())
    }

    async fn ping(&self) -> bool {
        self.pool.is_healthy().await
    }
}

/// In-process store for local runs without Redis. Entries never expire.
#[derive(Clone, Default)]
pub struct MemoryKvStore {
    entries: Arc<DashMap<String, String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|v| v.value().clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.key().clone()).collect()
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn set(&self, entry: KvEntry) -> Result<()> {
        self.entries.insert(entry.key, entry.value);
        Ok(())
    }

    async fn ping(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_overwrites() {
        let store = MemoryKvStore::new();
        tokio_test::block_on(async {
            store.set(KvEntry::new("session", "one")).await.unwrap();
            store.set(KvEntry::new("session", "two")).await.unwrap();
            assert!(store.ping().await);
        });

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("session").as_deref(), Some("two"));
    }

    #[tokio::test]
    async fn test_memory_store_shared_between_clones() {
        let store = MemoryKvStore::new();
        let handle: Arc<dyn KvStore> = Arc::new(store.clone());

        handle.set(KvEntry::new("a", "1")).await.unwrap();
        assert_eq!(store.keys(), vec!["a".to_string()]);
    }

    #[tokio::test]
    async fn test_redis_store_reports_unreachable() {
        let pool = KvPool::new(crate::PoolConfig {
            url: "redis://127.0.0.1:1".to_string(),
            max_size: 1,
        })
        .unwrap();
        let store = RedisKvStore::new(pool);

        assert!(store.set(KvEntry::new("k", "v")).await.is_err());
        assert!(!store.ping().await);
    }

    #[tokio::test]
    async fn test_redis_store_round_trip() {
        // Needs a live server; skipped unless REDIS_URL is set.
        let Ok(url) = std::env::var("REDIS_URL") else {
            return;
        };
        let pool = KvPool::new(crate::PoolConfig { url, max_size: 2 }).unwrap();
        let store = RedisKvStore::new(pool.clone());
        let key = format!("callbridge-test-{}", std::process::id());

        store.set(KvEntry::new(&key, "one")).await.unwrap();
        store.set(KvEntry::new(&key, "two")).await.unwrap();

        let mut conn = pool.get().await.unwrap();
        let stored: String = conn.get(&key).await.unwrap();
        let ttl: i64 = conn.ttl(&key).await.unwrap();
        let _: () = conn.del(&key).await.unwrap();

        assert_eq!(stored, "two");
        assert_eq!(ttl, -1);
        assert!(store.ping().await);
    }
}
