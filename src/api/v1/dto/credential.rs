use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SetCredentialRequest {
    pub api_key: String,
}

#[derive(Debug, Serialize)]
pub struct CredentialStatusResponse {
    pub configured: bool,
}
