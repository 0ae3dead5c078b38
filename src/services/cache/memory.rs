use async_trait::async_trait;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;

use crate::services::cache::client::{CacheClient, CacheResult};

/// In-process cache backend.
///
/// Lives as long as the process. Each operation holds the lock for a single
/// map access, never across an `.await` on anything else.
#[derive(Clone, Debug, Default)]
pub struct MemoryClient {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl CacheClient for MemoryClient {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn get_string(&self, key: &str) -> CacheResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set_string(&self, key: &str, value: &str) -> CacheResult<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn del(&self, key: &str) -> CacheResult<u64> {
        let removed = self.entries.write().await.remove(key);
        Ok(u64::from(removed.is_some()))
    }

    async fn keys_with_prefix(&self, prefix: &str) -> CacheResult<Vec<String>> {
        let keys = self
            .entries
            .read()
            .await
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        Ok(keys)
    }
}
