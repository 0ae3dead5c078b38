/*
 * Responsibility
 * - URL layout of v1
 * - /health, /movies, /credential, /sessions
 * - DELETE /movies/{id}/cache forces the next lookup of that movie upstream
 */
use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

use crate::api::v1::handlers::{
    credential::{get_credential_status, set_credential},
    health::health,
    movies::{forget_movie, get_movie, search_movies},
    sessions::{create_session, delete_session, next_page, previous_page},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/movies/search", get(search_movies))
        .route("/movies/{movie_id}", get(get_movie))
        .route("/movies/{movie_id}/cache", delete(forget_movie))
        .route(
            "/credential",
            get(get_credential_status).put(set_credential),
        )
        .route("/sessions", post(create_session))
        .route("/sessions/{id}", delete(delete_session))
        .route("/sessions/{id}/next", post(next_page))
        .route("/sessions/{id}/previous", post(previous_page))
}
