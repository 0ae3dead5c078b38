/*
 * Responsibility
 * - JSON shapes of the TMDb v3 API (only the fields we map)
 * - Conversion into the domain model; nothing outside the TMDb client sees these types
 */
use serde::Deserialize;

use crate::models::{CatalogItem, SearchPage};

#[derive(Debug, Deserialize)]
pub struct TmdbGenre {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct TmdbMovie {
    pub id: i64,
    pub title: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: f32,
    pub release_date: Option<String>,
    // Only present on the details endpoint; search results carry genre_ids instead.
    pub genres: Option<Vec<TmdbGenre>>,
}

impl From<TmdbMovie> for CatalogItem {
    fn from(m: TmdbMovie) -> Self {
        Self {
            id: m.id,
            title: m.title.unwrap_or_default(),
            summary: m.overview.unwrap_or_default(),
            poster_ref: m.poster_path.filter(|p| !p.is_empty()),
            backdrop_ref: m.backdrop_path.filter(|p| !p.is_empty()),
            score: m.vote_average,
            release_date: m.release_date.filter(|d| !d.is_empty()),
            genre_names: m
                .genres
                .unwrap_or_default()
                .into_iter()
                .map(|g| g.name)
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TmdbSearchResponse {
    pub page: Option<u32>,
    #[serde(default)]
    pub results: Vec<TmdbMovie>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

impl TmdbSearchResponse {
    pub fn into_page(self, requested_page: u32) -> SearchPage {
        SearchPage {
            page: self.page.unwrap_or(requested_page).max(1),
            items: self.results.into_iter().map(CatalogItem::from).collect(),
            total_pages: self.total_pages,
            total_results: self.total_results,
        }
    }
}
