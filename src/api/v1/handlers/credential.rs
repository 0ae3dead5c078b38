use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::v1::dto::credential::{CredentialStatusResponse, SetCredentialRequest},
    error::AppError,
    state::AppState,
};

pub async fn get_credential_status(State(state): State<AppState>) -> Json<CredentialStatusResponse> {
    Json(CredentialStatusResponse {
        configured: state.catalog.has_credential(),
    })
}

pub async fn set_credential(
    State(state): State<AppState>,
    Json(req): Json<SetCredentialRequest>,
) -> Result<StatusCode, AppError> {
    state
        .credentials
        .save(state.catalog.as_ref(), &req.api_key)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
