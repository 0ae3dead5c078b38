//! Scripted in-memory catalog for tests.
use async_trait::async_trait;
use std::{
    collections::HashSet,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use super::client::{CatalogClient, RemoteFetchError};
use crate::models::{CatalogItem, SearchPage, movie::sample_item};

pub const FAKE_TOTAL_PAGES: u32 = 5;
pub const FAKE_TOTAL_RESULTS: u32 = 42;

#[derive(Default)]
pub struct FakeCatalog {
    search_calls: AtomicUsize,
    detail_calls: AtomicUsize,
    failing_queries: Mutex<HashSet<String>>,
    failing_ids: Mutex<HashSet<i64>>,
    credential: Mutex<Option<String>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_query(&self, query: &str) {
        self.failing_queries.lock().unwrap().insert(query.to_string());
    }

    pub fn heal_query(&self, query: &str) {
        self.failing_queries.lock().unwrap().remove(query);
    }

    pub fn fail_id(&self, id: i64) {
        self.failing_ids.lock().unwrap().insert(id);
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }

    pub fn credential(&self) -> Option<String> {
        self.credential.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogClient for FakeCatalog {
    async fn search_movies(&self, query: &str, page: u32) -> Result<SearchPage, RemoteFetchError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);

        if self.failing_queries.lock().unwrap().contains(query) {
            return Err(RemoteFetchError::Status {
                status: 503,
                body: "unavailable".to_string(),
            });
        }

        Ok(SearchPage {
            page,
            items: vec![sample_item(
                i64::from(page) * 100,
                &format!("{query} #{page}"),
            )],
            total_pages: FAKE_TOTAL_PAGES,
            total_results: FAKE_TOTAL_RESULTS,
        })
    }

    async fn get_movie_details(&self, id: i64) -> Result<CatalogItem, RemoteFetchError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);

        if self.failing_ids.lock().unwrap().contains(&id) {
            return Err(RemoteFetchError::NotFound);
        }

        Ok(sample_item(id, &format!("Movie {id}")))
    }

    fn has_credential(&self) -> bool {
        self.credential.lock().unwrap().is_some()
    }

    fn set_credential(&self, value: String) {
        *self.credential.lock().unwrap() = Some(value);
    }
}
