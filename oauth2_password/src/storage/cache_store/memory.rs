use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::storage::errors::StorageError;
use crate::storage::types::CacheData;

use super::types::{CacheStore, InMemoryCacheStore, MemoryEntry};

const CACHE_PREFIX: &str = "cache";

impl InMemoryCacheStore {
    pub(crate) fn new() -> Self {
        tracing::info!("Creating new in-memory generic cache store");
        Self {
            entry: HashMap::new(),
        }
    }

    fn make_key(prefix: &str, key: &str) -> String {
        format!("{CACHE_PREFIX}:{prefix}:{key}")
    }

    fn make_entry(value: CacheData, ttl: u64) -> MemoryEntry {
        MemoryEntry {
            data: value,
            expires_at: (ttl > 0).then(|| Instant::now() + Duration::from_secs(ttl)),
        }
    }

    /// Drop every entry whose TTL has passed. Called on each write.
    fn sweep_expired(&mut self) {
        let now = Instant::now();
        self.entry.retain(|_, e| e.expires_at.is_none_or(|at| at > now));
    }

    /// Drop the entry if its TTL has passed.
    fn evict_if_expired(&mut self, key: &str) {
        let expired = self
            .entry
            .get(key)
            .and_then(|e| e.expires_at)
            .is_some_and(|at| at <= Instant::now());
        if expired {
            self.entry.remove(key);
        }
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn init(&self) -> Result<(), StorageError> {
        Ok(()) // Nothing to initialize for in-memory store
    }

    async fn put_with_ttl(
        &mut self,
        prefix: &str,
        key: &str,
        value: CacheData,
        ttl: u64,
    ) -> Result<(), StorageError> {
        self.sweep_expired();
        let key = Self::make_key(prefix, key);
        self.entry.insert(key, Self::make_entry(value, ttl));
        Ok(())
    }

    async fn put_if_not_exists(
        &mut self,
        prefix: &str,
        key: &str,
        value: CacheData,
        ttl: u64,
    ) -> Result<bool, StorageError> {
        self.sweep_expired();
        let key = Self::make_key(prefix, key);
        if self.entry.contains_key(&key) {
            return Ok(false);
        }
        self.entry.insert(key, Self::make_entry(value, ttl));
        Ok(true)
    }

    async fn get(&self, prefix: &str, key: &str) -> Result<Option<CacheData>, StorageError> {
        let key = Self::make_key(prefix, key);
        let now = Instant::now();
        Ok(self
            .entry
            .get(&key)
            .filter(|e| e.expires_at.is_none_or(|at| at > now))
            .map(|e| e.data.clone()))
    }

    async fn take(&mut self, prefix: &str, key: &str) -> Result<Option<CacheData>, StorageError> {
        let key = Self::make_key(prefix, key);
        self.evict_if_expired(&key);
        Ok(self.entry.remove(&key).map(|e| e.data))
    }

    async fn remove(&mut self, prefix: &str, key: &str) -> Result<(), StorageError> {
        let key = Self::make_key(prefix, key);
        self.entry.remove(&key);
        Ok(())
    }
}
