/*
 * Responsibility
 * - /sessions: stateful paging over one query (create / next / previous / delete)
 * - A session is held exclusively for the duration of one request
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    api::v1::dto::sessions::{CreateSessionRequest, SessionPageResponse},
    error::AppError,
    models::SearchPage,
    services::search_session::SearchSession,
    state::AppState,
};

fn to_response(id: Uuid, session: &SearchSession, page: SearchPage) -> SessionPageResponse {
    SessionPageResponse {
        id,
        query: session.current_query().unwrap_or_default().to_string(),
        page: page.into(),
    }
}

pub async fn create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionPageResponse>), AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_QUERY", msg))?;

    let id = state.sessions.create().await;
    let mut session = state.sessions.acquire(id).await?;

    match session.search(&state.movies, req.query.trim()).await {
        Ok(page) => Ok((StatusCode::CREATED, Json(to_response(id, &session, page)))),
        Err(e) => {
            drop(session);
            state.sessions.remove(id).await;
            Err(e.into())
        }
    }
}

pub async fn next_page(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionPageResponse>, AppError> {
    let mut session = state.sessions.acquire(id).await?;
    let page = session.next_page(&state.movies).await?;
    tracing::debug!(%id, page = session.current_page(), "session moved forward");

    Ok(Json(to_response(id, &session, page)))
}

pub async fn previous_page(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionPageResponse>, AppError> {
    let mut session = state.sessions.acquire(id).await?;
    let page = session.previous_page(&state.movies).await?;
    tracing::debug!(%id, page = session.current_page(), "session moved back");

    Ok(Json(to_response(id, &session, page)))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("session"))
    }
}
