use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, StatusCode};
use serde::de::DeserializeOwned;
use std::{sync::RwLock, time::Duration};
use url::Url;

use super::{
    client::{CatalogClient, RemoteFetchError},
    wire::{TmdbMovie, TmdbSearchResponse},
};
use crate::models::{CatalogItem, SearchPage};

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Configuration for the TMDb client
#[derive(Debug, Clone)]
pub struct TmdbConfig {
    /// API root, without a trailing slash
    pub base_url: String,

    /// Per-request timeout
    pub timeout_secs: u64,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

/// HTTP client for the TMDb v3 API.
///
/// The API key travels as a query parameter, so full URLs are never logged;
/// only the path is.
pub struct TmdbClient {
    http: ReqwestClient,
    base_url: String,
    api_key: RwLock<Option<String>>,
}

impl TmdbClient {
    pub fn with_config(config: TmdbConfig) -> Result<Self, RemoteFetchError> {
        let http = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RemoteFetchError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: RwLock::new(None),
        })
    }

    fn api_key(&self) -> Result<String, RemoteFetchError> {
        let guard = self.api_key.read().unwrap_or_else(|p| p.into_inner());
        guard.clone().ok_or(RemoteFetchError::MissingCredential)
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, RemoteFetchError> {
        let api_key = self.api_key()?;
        let mut all = vec![("api_key", api_key.as_str())];
        all.extend_from_slice(params);

        Url::parse_with_params(&format!("{}{}", self.base_url, path), &all)
            .map_err(|e| RemoteFetchError::Transport(format!("invalid catalog url: {e}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, RemoteFetchError> {
        tracing::debug!(path = url.path(), "catalog request");

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| RemoteFetchError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(path = url.path(), status = status.as_u16(), "catalog request failed");
            return Err(match status {
                StatusCode::NOT_FOUND => RemoteFetchError::NotFound,
                StatusCode::UNAUTHORIZED => RemoteFetchError::InvalidCredential,
                _ => RemoteFetchError::Status {
                    status: status.as_u16(),
                    body,
                },
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| RemoteFetchError::Transport(e.without_url().to_string()))?;

        serde_json::from_slice(&bytes).map_err(|e| RemoteFetchError::Decode(e.to_string()))
    }
}

#[async_trait]
impl CatalogClient for TmdbClient {
    async fn search_movies(&self, query: &str, page: u32) -> Result<SearchPage, RemoteFetchError> {
        let page_param = page.to_string();
        let url = self.endpoint(
            "/search/movie",
            &[("query", query), ("page", page_param.as_str())],
        )?;

        let resp: TmdbSearchResponse = self.get_json(url).await?;
        let result = resp.into_page(page);

        tracing::debug!(
            page = result.page,
            items = result.items.len(),
            total_pages = result.total_pages,
            total_results = result.total_results,
            "catalog search ok"
        );
        Ok(result)
    }

    async fn get_movie_details(&self, id: i64) -> Result<CatalogItem, RemoteFetchError> {
        let url = self.endpoint(&format!("/movie/{id}"), &[])?;

        let movie: TmdbMovie = self.get_json(url).await?;
        Ok(movie.into())
    }

    fn has_credential(&self) -> bool {
        self.api_key
            .read()
            .map(|k| k.is_some())
            .unwrap_or_else(|p| p.into_inner().is_some())
    }

    fn set_credential(&self, value: String) {
        let mut guard = self.api_key.write().unwrap_or_else(|p| p.into_inner());
        *guard = Some(value);
        tracing::info!("catalog credential updated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn client_for(server: &Server) -> TmdbClient {
        TmdbClient::with_config(TmdbConfig {
            base_url: server.url(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn search_without_credential_fails_before_any_request() {
        let client = TmdbClient::with_config(TmdbConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
        })
        .unwrap();

        assert!(!client.has_credential());
        let err = client.search_movies("dune", 1).await.unwrap_err();
        assert!(matches!(err, RemoteFetchError::MissingCredential));
    }

    #[tokio::test]
    async fn search_sends_key_query_and_page() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/search/movie")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("api_key".into(), "secret".into()),
                Matcher::UrlEncoded("query".into(), "star wars".into()),
                Matcher::UrlEncoded("page".into(), "2".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                serde_json::json!({
                    "page": 2,
                    "results": [{"id": 11, "title": "Star Wars", "vote_average": 8.2}],
                    "total_pages": 3,
                    "total_results": 55
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = client_for(&server);
        client.set_credential("secret".to_string());

        let page = client.search_movies("star wars", 2).await.unwrap();

        assert_eq!(page.page, 2);
        assert_eq!(page.total_results, 55);
        assert_eq!(page.items[0].title, "Star Wars");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn details_maps_status_codes_to_errors() {
        let mut server = Server::new_async().await;
        let _missing = server
            .mock("GET", "/movie/404")
            .match_query(Matcher::Any)
            .with_status(404)
            .create_async()
            .await;
        let _unauthorized = server
            .mock("GET", "/movie/401")
            .match_query(Matcher::Any)
            .with_status(401)
            .create_async()
            .await;
        let _broken = server
            .mock("GET", "/movie/500")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let client = client_for(&server);
        client.set_credential("k".to_string());

        assert!(matches!(
            client.get_movie_details(404).await.unwrap_err(),
            RemoteFetchError::NotFound
        ));
        assert!(matches!(
            client.get_movie_details(401).await.unwrap_err(),
            RemoteFetchError::InvalidCredential
        ));
        match client.get_movie_details(500).await.unwrap_err() {
            RemoteFetchError::Status { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/movie/603")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("{\"title\": 1")
            .create_async()
            .await;

        let client = client_for(&server);
        client.set_credential("k".to_string());

        let err = client.get_movie_details(603).await.unwrap_err();
        assert!(matches!(err, RemoteFetchError::Decode(_)));
    }
}
