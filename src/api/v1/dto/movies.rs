/*
 * Responsibility
 * - Request/response DTOs for /movies
 * - Responses carry the derived image URLs; the domain model does not store them
 */
use serde::{Deserialize, Serialize};

use crate::models::{CatalogItem, SearchPage};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    pub page: Option<u32>,
}

impl SearchQuery {
    pub fn validate(&self) -> Result<u32, &'static str> {
        if self.query.trim().is_empty() {
            return Err("query is required");
        }
        if self.query.len() > 256 {
            return Err("query must be <= 256 chars");
        }
        match self.page {
            Some(0) => Err("page must be >= 1"),
            Some(p) => Ok(p),
            None => Ok(1),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MovieResponse {
    pub id: i64,
    pub title: String,
    pub overview: String,
    pub poster_url: String,
    pub backdrop_url: String,
    pub score: f32,
    pub release_date: Option<String>,
    pub genres: Vec<String>,
}

impl From<CatalogItem> for MovieResponse {
    fn from(item: CatalogItem) -> Self {
        Self {
            poster_url: item.full_poster_url(),
            backdrop_url: item.full_backdrop_url(),
            id: item.id,
            title: item.title,
            overview: item.summary,
            score: item.score,
            release_date: item.release_date,
            genres: item.genre_names,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchPageResponse {
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u32,
    pub results: Vec<MovieResponse>,
}

impl From<SearchPage> for SearchPageResponse {
    fn from(page: SearchPage) -> Self {
        Self {
            page: page.page,
            total_pages: page.total_pages,
            total_results: page.total_results,
            results: page.items.into_iter().map(MovieResponse::from).collect(),
        }
    }
}
