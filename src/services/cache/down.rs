//! Backend that is down for every operation.
use async_trait::async_trait;

use crate::services::cache::client::{CacheClient, CacheError, CacheResult};

pub struct DownCache;

fn refused() -> CacheError {
    CacheError::BackendConnection("refused".into())
}

#[async_trait]
impl CacheClient for DownCache {
    fn backend_name(&self) -> &'static str {
        "down"
    }

    async fn get_string(&self, _key: &str) -> CacheResult<Option<String>> {
        Err(refused())
    }

    async fn set_string(&self, _key: &str, _value: &str) -> CacheResult<()> {
        Err(refused())
    }

    async fn del(&self, _key: &str) -> CacheResult<u64> {
        Err(refused())
    }

    async fn keys_with_prefix(&self, _prefix: &str) -> CacheResult<Vec<String>> {
        Err(refused())
    }
}
