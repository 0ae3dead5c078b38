/*
 * Responsibility
 * - GET /movies/search, GET /movies/{id}, DELETE /movies/{id}/cache
 * - Query validation here; caching is entirely the repository's business
 */
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    api::v1::dto::movies::{MovieResponse, SearchPageResponse, SearchQuery},
    error::AppError,
    state::AppState,
};

pub async fn search_movies(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<SearchPageResponse>, AppError> {
    let page = params
        .validate()
        .map_err(|msg| AppError::bad_request("INVALID_QUERY", msg))?;

    let result = state.movies.search_movies(params.query.trim(), page).await?;

    Ok(Json(result.into()))
}

pub async fn get_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<i64>,
) -> Result<Json<MovieResponse>, AppError> {
    if movie_id <= 0 {
        return Err(AppError::bad_request("INVALID_ID", "id must be positive"));
    }

    let item = state.movies.get_movie_details(movie_id).await?;

    Ok(Json(item.into()))
}

pub async fn forget_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.movies.forget_movie(movie_id).await.map_err(|e| {
        tracing::error!(movie_id, error = %e, "failed to drop cached movie");
        AppError::Internal
    })?;

    Ok(StatusCode::NO_CONTENT)
}
