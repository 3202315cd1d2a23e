//! Call Bridge Key-Value Store
//!
//! Redis wire-protocol key-value access behind a shared connection pool,
//! plus an in-memory store for local runs and tests.

mod client;
mod error;
mod pool;
mod types;

pub use client::{KvStore, MemoryKvStore, RedisKvStore};
pub use error::{KvError, Result};
pub use pool::{KvPool, PoolConfig};
pub use types::KvEntry;
