/*
 * Responsibility
 * - Persist the catalog API key across restarts (cache backend, no expiry)
 * - Restore it into the catalog client at startup
 * - The key itself is never logged
 */
use std::sync::Arc;
use thiserror::Error;

use crate::services::{
    cache::{CacheClient, CacheError},
    catalog::CatalogClient,
};

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("credential must not be empty")]
    Empty,
    #[error("failed to persist credential: {0}")]
    Cache(#[from] CacheError),
}

#[derive(Clone)]
pub struct CredentialStore {
    cache: Arc<dyn CacheClient>,
    key: String,
}

impl CredentialStore {
    pub fn new(cache: Arc<dyn CacheClient>, prefix: &str) -> Self {
        Self {
            cache,
            key: format!("{prefix}:credential:tmdb_api_key"),
        }
    }

    /// Push a previously saved key into the client. Returns whether one was found.
    pub async fn load_into(&self, catalog: &dyn CatalogClient) -> Result<bool, CredentialError> {
        match self.cache.get_string(&self.key).await? {
            Some(saved) if !saved.trim().is_empty() => {
                catalog.set_credential(saved);
                tracing::info!(backend = self.cache.backend_name(), "restored saved catalog credential");
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    pub async fn save(&self, catalog: &dyn CatalogClient, value: &str) -> Result<(), CredentialError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(CredentialError::Empty);
        }

        // The client only sees a key once it is persisted.
        self.cache.set_string(&self.key, value).await?;
        catalog.set_credential(value.to_string());
        Ok(())
    }
}
