use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::movies::SearchPageResponse;

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub query: String,
}

impl CreateSessionRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.query.trim().is_empty() {
            return Err("query is required");
        }
        if self.query.len() > 256 {
            return Err("query must be <= 256 chars");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct SessionPageResponse {
    pub id: Uuid,
    pub query: String,
    #[serde(flatten)]
    pub page: SearchPageResponse,
}
