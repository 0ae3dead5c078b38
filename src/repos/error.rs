/*
 * Responsibility
 * - What the repo layer reports to its callers
 * - Cache trouble is absorbed inside the repo; only upstream failures surface
 */
use thiserror::Error;

use crate::services::catalog::RemoteFetchError;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Remote(#[from] RemoteFetchError),
}
