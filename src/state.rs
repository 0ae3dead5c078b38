/*
 * Responsibility
 * - Shared context attached to the Router (AppState)
 *   - movie repository, catalog client, credential store, search sessions
 * - Cheap to Clone (Arc inside)
 */
use std::sync::Arc;

use crate::{
    repos::MovieRepository,
    services::{
        catalog::CatalogClient, credentials::CredentialStore, search_session::SessionRegistry,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub movies: MovieRepository,
    pub catalog: Arc<dyn CatalogClient>,
    pub credentials: CredentialStore,
    pub sessions: SessionRegistry,
}

impl AppState {
    pub fn new(
        movies: MovieRepository,
        catalog: Arc<dyn CatalogClient>,
        credentials: CredentialStore,
        sessions: SessionRegistry,
    ) -> Self {
        Self {
            movies,
            catalog,
            credentials,
            sessions,
        }
    }
}
