/*
 * Responsibility
 * - Paging state of one browsing session (current query + page)
 * - Results are returned to the caller; there is no global notification channel
 * - One request at a time per session (a second concurrent request gets Busy)
 * - Sessions idle longer than the configured limit are dropped
 */
use chrono::{DateTime, Duration, Utc};
use std::{collections::HashMap, sync::Arc};
use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use uuid::Uuid;

use crate::{
    models::SearchPage,
    repos::{MovieRepository, RepoError},
    services::clock::Clock,
};

pub const DEFAULT_IDLE_MINUTES: i64 = 30;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session not found")]
    NotFound,
    #[error("a search is already running for this session")]
    Busy,
    #[error("no search has been made in this session")]
    NoActiveQuery,
    #[error("already at the first page")]
    AtFirstPage,
    #[error("already at the last page")]
    AtLastPage,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Default)]
pub struct SearchSession {
    query: Option<String>,
    page: u32,
    // from the last successful fetch; 0 = unknown
    total_pages: u32,
}

impl SearchSession {
    pub fn current_query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn current_page(&self) -> u32 {
        self.page
    }

    /// Start a new search at page 1.
    pub async fn search(
        &mut self,
        repo: &MovieRepository,
        query: &str,
    ) -> Result<SearchPage, SessionError> {
        let result = repo.search_movies(query, 1).await?;

        self.query = Some(query.to_string());
        self.apply(&result);
        Ok(result)
    }

    pub async fn next_page(&mut self, repo: &MovieRepository) -> Result<SearchPage, SessionError> {
        let query = self.query.clone().ok_or(SessionError::NoActiveQuery)?;
        if self.total_pages > 0 && self.page >= self.total_pages {
            return Err(SessionError::AtLastPage);
        }

        let result = repo.search_movies(&query, self.page + 1).await?;
        self.apply(&result);
        Ok(result)
    }

    pub async fn previous_page(
        &mut self,
        repo: &MovieRepository,
    ) -> Result<SearchPage, SessionError> {
        let query = self.query.clone().ok_or(SessionError::NoActiveQuery)?;
        if self.page <= 1 {
            return Err(SessionError::AtFirstPage);
        }

        let result = repo.search_movies(&query, self.page - 1).await?;
        self.apply(&result);
        Ok(result)
    }

    // Only a successful fetch moves the cursor.
    fn apply(&mut self, result: &SearchPage) {
        self.page = result.page;
        self.total_pages = result.total_pages;
    }
}

struct Slot {
    session: Arc<Mutex<SearchSession>>,
    last_used: DateTime<Utc>,
}

impl Slot {
    // A session held by a running request is never idle.
    fn is_idle(&self, now: DateTime<Utc>, idle_ttl: Duration) -> bool {
        now - self.last_used > idle_ttl && self.session.try_lock().is_ok()
    }
}

/// Live sessions keyed by id.
///
/// Idle sessions are evicted whenever a new one is created, and a lookup of an
/// idle session behaves as if it was already gone.
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, Slot>>>,
    clock: Arc<dyn Clock>,
    idle_ttl: Duration,
}

impl SessionRegistry {
    pub fn new(clock: Arc<dyn Clock>, idle_ttl: Duration) -> Self {
        Self {
            sessions: Arc::default(),
            clock,
            idle_ttl,
        }
    }

    pub async fn create(&self) -> Uuid {
        let now = self.clock.now();
        let mut sessions = self.sessions.write().await;

        let before = sessions.len();
        sessions.retain(|_, slot| !slot.is_idle(now, self.idle_ttl));
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::debug!(evicted, live = sessions.len(), "dropped idle search sessions");
        }

        let id = Uuid::new_v4();
        sessions.insert(
            id,
            Slot {
                session: Arc::new(Mutex::new(SearchSession::default())),
                last_used: now,
            },
        );
        id
    }

    /// Exclusive access to a session, failing fast instead of queueing.
    pub async fn acquire(&self, id: Uuid) -> Result<OwnedMutexGuard<SearchSession>, SessionError> {
        let now = self.clock.now();

        let session = {
            let mut sessions = self.sessions.write().await;
            let idle = sessions
                .get(&id)
                .ok_or(SessionError::NotFound)?
                .is_idle(now, self.idle_ttl);

            if idle {
                sessions.remove(&id);
                tracing::debug!(%id, "search session expired");
                return Err(SessionError::NotFound);
            }

            let slot = sessions.get_mut(&id).ok_or(SessionError::NotFound)?;
            slot.last_used = now;
            slot.session.clone()
        };

        session.try_lock_owned().map_err(|_| SessionError::Busy)
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::services::{
        cache::{ExpiringStore, MemoryClient},
        catalog::fake::{FAKE_TOTAL_PAGES, FakeCatalog},
        clock::{ManualClock, SystemClock},
    };

    fn registry() -> (SessionRegistry, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
        ));
        let registry = SessionRegistry::new(clock.clone(), Duration::minutes(DEFAULT_IDLE_MINUTES));
        (registry, clock)
    }

    fn repo_with(catalog: Arc<FakeCatalog>) -> MovieRepository {
        let store = ExpiringStore::new(
            Arc::new(MemoryClient::new()),
            Arc::new(SystemClock),
            "test",
            ExpiringStore::default_ttl(),
        );
        MovieRepository::new(catalog, store)
    }

    #[tokio::test]
    async fn paging_walks_forward_and_back() {
        let repo = repo_with(Arc::new(FakeCatalog::new()));
        let mut session = SearchSession::default();

        let first = session.search(&repo, "dune").await.unwrap();
        assert_eq!(first.page, 1);
        assert_eq!(session.current_query(), Some("dune"));

        let second = session.next_page(&repo).await.unwrap();
        assert_eq!(second.page, 2);
        assert_eq!(session.current_page(), 2);

        let back = session.previous_page(&repo).await.unwrap();
        assert_eq!(back.page, 1);
        assert!(matches!(
            session.previous_page(&repo).await.unwrap_err(),
            SessionError::AtFirstPage
        ));
    }

    #[tokio::test]
    async fn paging_without_a_query_is_rejected() {
        let repo = repo_with(Arc::new(FakeCatalog::new()));
        let mut session = SearchSession::default();

        assert!(matches!(
            session.next_page(&repo).await.unwrap_err(),
            SessionError::NoActiveQuery
        ));
    }

    #[tokio::test]
    async fn next_page_stops_at_the_last_page() {
        let repo = repo_with(Arc::new(FakeCatalog::new()));
        let mut session = SearchSession::default();

        session.search(&repo, "q").await.unwrap();
        for _ in 1..FAKE_TOTAL_PAGES {
            session.next_page(&repo).await.unwrap();
        }

        assert_eq!(session.current_page(), FAKE_TOTAL_PAGES);
        assert!(matches!(
            session.next_page(&repo).await.unwrap_err(),
            SessionError::AtLastPage
        ));
    }

    #[tokio::test]
    async fn failed_fetch_keeps_the_cursor() {
        let catalog = Arc::new(FakeCatalog::new());
        let repo = repo_with(catalog.clone());
        let mut session = SearchSession::default();

        session.search(&repo, "ghost").await.unwrap();
        catalog.fail_query("ghost");

        assert!(matches!(
            session.next_page(&repo).await.unwrap_err(),
            SessionError::Repo(_)
        ));
        assert_eq!(session.current_page(), 1);
    }

    #[tokio::test]
    async fn registry_rejects_concurrent_use_of_one_session() {
        let (registry, _clock) = registry();
        let id = registry.create().await;

        let held = registry.acquire(id).await.unwrap();
        assert!(matches!(
            registry.acquire(id).await.unwrap_err(),
            SessionError::Busy
        ));
        drop(held);

        assert!(registry.acquire(id).await.is_ok());
        assert!(registry.remove(id).await);
        assert!(matches!(
            registry.acquire(id).await.unwrap_err(),
            SessionError::NotFound
        ));
    }

    #[tokio::test]
    async fn idle_sessions_are_dropped() {
        let (registry, clock) = registry();

        let stale = registry.create().await;
        clock.advance(Duration::minutes(DEFAULT_IDLE_MINUTES) + Duration::seconds(1));
        let fresh = registry.create().await;

        assert_eq!(registry.len().await, 1);
        assert!(matches!(
            registry.acquire(stale).await.unwrap_err(),
            SessionError::NotFound
        ));
        assert!(registry.acquire(fresh).await.is_ok());
    }

    #[tokio::test]
    async fn idle_session_is_gone_even_before_the_next_create() {
        let (registry, clock) = registry();

        let id = registry.create().await;
        clock.advance(Duration::minutes(DEFAULT_IDLE_MINUTES + 1));

        assert!(matches!(
            registry.acquire(id).await.unwrap_err(),
            SessionError::NotFound
        ));
        assert_eq!(registry.len().await, 0);
    }

    #[tokio::test]
    async fn using_a_session_keeps_it_alive() {
        let (registry, clock) = registry();
        let half = Duration::minutes(DEFAULT_IDLE_MINUTES / 2 + 1);

        let id = registry.create().await;
        clock.advance(half);
        drop(registry.acquire(id).await.unwrap());
        clock.advance(half);
        registry.create().await;

        assert_eq!(registry.len().await, 2);
        assert!(registry.acquire(id).await.is_ok());
    }

    #[tokio::test]
    async fn a_session_in_use_is_not_evicted() {
        let (registry, clock) = registry();

        let id = registry.create().await;
        let held = registry.acquire(id).await.unwrap();
        clock.advance(Duration::minutes(DEFAULT_IDLE_MINUTES * 2));
        registry.create().await;

        assert_eq!(registry.len().await, 2);
        drop(held);
    }
}
