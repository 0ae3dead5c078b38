/*
 * Responsibility
 * - AppError shared by every handler
 * - IntoResponse (HTTP status / JSON error body)
 * - Maps repo / catalog / session / credential errors onto user-facing failures
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::RepoError;
use crate::services::{
    catalog::RemoteFetchError, credentials::CredentialError, search_session::SessionError,
};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{code}: {message}")]
    BadRequest { code: &'static str, message: String },
    #[error("{code}: {message}")]
    Unauthorized { code: &'static str, message: String },
    #[error("not found: {resource}")]
    NotFound { resource: &'static str },
    #[error("{code}: {message}")]
    Conflict { code: &'static str, message: String },
    #[error("upstream catalog failure")]
    BadGateway,
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    pub fn conflict(code: &'static str, message: impl Into<String>) -> Self {
        Self::Conflict {
            code,
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::BadRequest { code, message } => (StatusCode::BAD_REQUEST, code, message),
            AppError::Unauthorized { code, message } => (StatusCode::UNAUTHORIZED, code, message),
            AppError::NotFound { resource } => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{resource} not found."),
            ),
            AppError::Conflict { code, message } => (StatusCode::CONFLICT, code, message),
            AppError::BadGateway => (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_ERROR",
                "the movie catalog is unavailable".into(),
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "internal server error".into(),
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<RemoteFetchError> for AppError {
    fn from(e: RemoteFetchError) -> Self {
        match e {
            RemoteFetchError::MissingCredential => AppError::Unauthorized {
                code: "CREDENTIAL_MISSING",
                message: "set a catalog API key first".into(),
            },
            RemoteFetchError::InvalidCredential => AppError::Unauthorized {
                code: "CREDENTIAL_INVALID",
                message: "the catalog rejected the API key".into(),
            },
            RemoteFetchError::NotFound => AppError::not_found("movie"),
            other => {
                tracing::error!(error = %other, "catalog request failed");
                AppError::BadGateway
            }
        }
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Remote(remote) => remote.into(),
        }
    }
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::NotFound => AppError::not_found("session"),
            SessionError::Busy => AppError::conflict("SESSION_BUSY", e.to_string()),
            SessionError::NoActiveQuery | SessionError::AtFirstPage | SessionError::AtLastPage => {
                AppError::bad_request("INVALID_PAGE", e.to_string())
            }
            SessionError::Repo(repo) => repo.into(),
        }
    }
}

impl From<CredentialError> for AppError {
    fn from(e: CredentialError) -> Self {
        match e {
            CredentialError::Empty => AppError::bad_request("INVALID_CREDENTIAL", e.to_string()),
            CredentialError::Cache(cache) => {
                tracing::error!(error = %cache, "failed to persist credential");
                AppError::Internal
            }
        }
    }
}
