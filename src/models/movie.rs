/*
 * Responsibility
 * - Domain model of the catalog (CatalogItem / SearchPage)
 * - This is the shape the cache persists; it is independent of the upstream wire schema
 * - Image URLs are derived on demand and never stored
 */
use serde::{Deserialize, Serialize};

pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";
pub const BACKDROP_BASE_URL: &str = "https://image.tmdb.org/t/p/original";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: i64,
    pub title: String,
    pub summary: String,
    pub poster_ref: Option<String>,
    pub backdrop_ref: Option<String>,
    pub score: f32,
    // YYYY-MM-DD; None when upstream has no date
    pub release_date: Option<String>,
    #[serde(default)]
    pub genre_names: Vec<String>,
}

impl CatalogItem {
    pub fn full_poster_url(&self) -> String {
        join_image_url(POSTER_BASE_URL, self.poster_ref.as_deref())
    }

    pub fn full_backdrop_url(&self) -> String {
        join_image_url(BACKDROP_BASE_URL, self.backdrop_ref.as_deref())
    }
}

fn join_image_url(base: &str, image_ref: Option<&str>) -> String {
    match image_ref {
        Some(r) if !r.is_empty() => format!("{base}{r}"),
        _ => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    // 1-based
    pub page: u32,
    pub items: Vec<CatalogItem>,
    pub total_pages: u32,
    pub total_results: u32,
}

#[cfg(test)]
pub(crate) fn sample_item(id: i64, title: &str) -> CatalogItem {
    CatalogItem {
        id,
        title: title.to_string(),
        summary: format!("{title} summary"),
        poster_ref: Some(format!("/poster{id}.jpg")),
        backdrop_ref: None,
        score: 7.5,
        release_date: Some("1999-03-31".to_string()),
        genre_names: vec!["Action".to_string()],
    }
}
