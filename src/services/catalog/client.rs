//! Remote catalog interface consumed by the movie repository.
use async_trait::async_trait;
use thiserror::Error;

use crate::models::{CatalogItem, SearchPage};

/// Any failure talking to the upstream catalog.
///
/// The repository never retries or caches these; they go straight back to the caller.
#[derive(Debug, Error)]
pub enum RemoteFetchError {
    #[error("catalog credential is not set")]
    MissingCredential,
    #[error("catalog rejected the credential")]
    InvalidCredential,
    #[error("catalog item not found")]
    NotFound,
    #[error("catalog transport error: {0}")]
    Transport(String),
    #[error("catalog returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("catalog response could not be decoded: {0}")]
    Decode(String),
}

#[async_trait]
pub trait CatalogClient: Send + Sync + 'static {
    async fn search_movies(&self, query: &str, page: u32) -> Result<SearchPage, RemoteFetchError>;

    async fn get_movie_details(&self, id: i64) -> Result<CatalogItem, RemoteFetchError>;

    fn has_credential(&self) -> bool;

    fn set_credential(&self, value: String);
}
