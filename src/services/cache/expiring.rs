/*
 * Responsibility
 * - Typed, time-expiring view over a CacheClient
 * - Wraps every value in a versioned CacheEntry { version, written_at, payload }
 * - Expiry is checked lazily on read; sweep() is an optional bulk pass
 * - Corrupt or unknown entries are evicted and reported as a miss
 */
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned, de::IgnoredAny};
use std::sync::Arc;
use thiserror::Error;

use crate::services::{
    cache::client::{CacheClient, CacheError},
    clock::Clock,
};

pub const DEFAULT_TTL_DAYS: i64 = 7;

// Bump when the persisted entry layout changes; older entries become misses.
pub const ENTRY_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cache read failed: {0}")]
    Read(#[source] CacheError),
    #[error("cache write failed: {0}")]
    Write(#[source] CacheError),
    #[error("cache entry encoding failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry<T> {
    version: u32,
    written_at: DateTime<Utc>,
    payload: T,
}

enum Freshness<T> {
    Fresh(T),
    Expired,
    Corrupt(String),
}

#[derive(Clone)]
pub struct ExpiringStore {
    cache: Arc<dyn CacheClient>,
    clock: Arc<dyn Clock>,
    prefix: String,
    ttl: Duration,
}

impl ExpiringStore {
    pub fn new(
        cache: Arc<dyn CacheClient>,
        clock: Arc<dyn Clock>,
        prefix: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        Self {
            cache,
            clock,
            prefix: prefix.into(),
            ttl,
        }
    }

    pub fn default_ttl() -> Duration {
        Duration::days(DEFAULT_TTL_DAYS)
    }

    pub fn key(&self, raw: &str) -> String {
        format!("{}:{}", self.prefix, raw)
    }

    pub async fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let full_key = self.key(key);
        let entry = CacheEntry {
            version: ENTRY_VERSION,
            written_at: self.clock.now(),
            payload: value,
        };
        let json = serde_json::to_string(&entry)?;

        self.cache
            .set_string(&full_key, &json)
            .await
            .map_err(StoreError::Write)?;

        tracing::debug!(key = %full_key, backend = self.cache.backend_name(), "cache write");
        Ok(())
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let full_key = self.key(key);

        let Some(raw) = self
            .cache
            .get_string(&full_key)
            .await
            .map_err(StoreError::Read)?
        else {
            return Ok(None);
        };

        match self.check::<T>(&raw) {
            Freshness::Fresh(value) => Ok(Some(value)),
            Freshness::Expired => {
                tracing::debug!(key = %full_key, "cache entry expired");
                self.evict(&full_key).await;
                Ok(None)
            }
            Freshness::Corrupt(reason) => {
                tracing::warn!(key = %full_key, %reason, "dropping unreadable cache entry");
                self.evict(&full_key).await;
                Ok(None)
            }
        }
    }

    pub async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.cache
            .del(&self.key(key))
            .await
            .map_err(StoreError::Write)?;
        Ok(())
    }

    /// Evict every expired or unreadable entry under this store's prefix.
    ///
    /// Returns the number of evicted entries. Reads never depend on this having run.
    pub async fn sweep(&self) -> Result<usize, StoreError> {
        let keys = self
            .cache
            .keys_with_prefix(&self.key(""))
            .await
            .map_err(StoreError::Read)?;

        let mut evicted = 0;
        for full_key in keys {
            let Some(raw) = self
                .cache
                .get_string(&full_key)
                .await
                .map_err(StoreError::Read)?
            else {
                continue;
            };

            if !matches!(self.check::<IgnoredAny>(&raw), Freshness::Fresh(_)) {
                self.cache
                    .del(&full_key)
                    .await
                    .map_err(StoreError::Write)?;
                evicted += 1;
            }
        }

        tracing::info!(evicted, backend = self.cache.backend_name(), "cache sweep finished");
        Ok(evicted)
    }

    fn check<T: DeserializeOwned>(&self, raw: &str) -> Freshness<T> {
        let entry: CacheEntry<T> = match serde_json::from_str(raw) {
            Ok(entry) => entry,
            Err(e) => return Freshness::Corrupt(e.to_string()),
        };

        if entry.version != ENTRY_VERSION {
            return Freshness::Corrupt(format!("unknown entry version {}", entry.version));
        }

        // valid iff now - written_at <= ttl
        if self.clock.now() - entry.written_at > self.ttl {
            return Freshness::Expired;
        }

        Freshness::Fresh(entry.payload)
    }

    // A failed eviction only means the stale entry is checked again next read.
    async fn evict(&self, full_key: &str) {
        if let Err(e) = self.cache.del(full_key).await {
            tracing::warn!(key = %full_key, error = %e, "failed to evict cache entry");
        }
    }
}
