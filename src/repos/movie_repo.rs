/*
 * Responsibility
 * - Cache-aside access to the movie catalog (search pages / movie details)
 * - store hit -> return; miss -> remote fetch -> store write -> return
 * - Remote failures propagate and are never cached
 * - Store failures never fail a request: read errors count as a miss, write errors are logged
 */
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;

use crate::{
    models::{CatalogItem, SearchPage},
    repos::{
        cache_keys::{detail_key, search_key},
        error::RepoError,
    },
    services::{
        cache::{ExpiringStore, StoreError},
        catalog::CatalogClient,
    },
};

#[derive(Clone)]
pub struct MovieRepository {
    catalog: Arc<dyn CatalogClient>,
    store: ExpiringStore,
}

impl MovieRepository {
    pub fn new(catalog: Arc<dyn CatalogClient>, store: ExpiringStore) -> Self {
        Self { catalog, store }
    }

    /// Search the catalog, serving repeated (query, page) pairs from the cache.
    ///
    /// The whole page is cached, including `total_pages` / `total_results`,
    /// so a hit returns exactly what the first fetch returned.
    pub async fn search_movies(&self, query: &str, page: u32) -> Result<SearchPage, RepoError> {
        let key = search_key(query, page);

        if let Some(cached) = self.cached::<SearchPage>(&key).await {
            tracing::debug!(%key, items = cached.items.len(), "search served from cache");
            return Ok(cached);
        }

        tracing::debug!(%key, "search cache miss, fetching from catalog");
        let fresh = self.catalog.search_movies(query, page).await?;

        self.remember(&key, &fresh).await;
        Ok(fresh)
    }

    pub async fn get_movie_details(&self, id: i64) -> Result<CatalogItem, RepoError> {
        let key = detail_key(id);

        if let Some(cached) = self.cached::<CatalogItem>(&key).await {
            tracing::debug!(%key, title = %cached.title, "details served from cache");
            return Ok(cached);
        }

        tracing::debug!(%key, "details cache miss, fetching from catalog");
        let fresh = self.catalog.get_movie_details(id).await?;

        self.remember(&key, &fresh).await;
        Ok(fresh)
    }

    /// Drop the cached details of one movie so the next lookup goes upstream.
    pub async fn forget_movie(&self, id: i64) -> Result<(), StoreError> {
        self.store.delete(&detail_key(id)).await
    }

    async fn cached<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.store.get::<T>(key).await {
            Ok(hit) => hit,
            Err(e) => {
                tracing::warn!(%key, error = %e, "cache read failed, treating as miss");
                None
            }
        }
    }

    // The fetched value is still returned when caching it fails.
    async fn remember<T: Serialize>(&self, key: &str, value: &T) {
        if let Err(e) = self.store.put(key, value).await {
            tracing::warn!(%key, error = %e, "failed to cache catalog response");
        }
    }
}
