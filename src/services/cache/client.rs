//! Cache backend interface used by the expiring store and credential persistence.
use async_trait::async_trait;
use thiserror::Error;

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache-layer errors (transport/command/value).
///
/// Note:
/// - We keep this independent from `AppError` so callers can decide how to fail
///   (a failed cache read is just a miss for the movie repository, while a failed
///   credential write must be reported).
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache connection error: {0}")]
    BackendConnection(String),
    #[error("cache command error: {0}")]
    BackendCommand(String),
}

/// A minimal string key-value backend.
///
/// Values are opaque strings; encoding, timestamps and expiry live one layer up
/// in `ExpiringStore`. Every call must be atomic per key: a reader racing a
/// writer observes either the old or the new value.
#[async_trait]
pub trait CacheClient: Send + Sync + 'static {
    // Returns the cache backend name (for logging).
    fn backend_name(&self) -> &'static str;

    // Get UTF-8 string value.
    async fn get_string(&self, key: &str) -> CacheResult<Option<String>>;

    // Set value unconditionally, replacing any previous value.
    async fn set_string(&self, key: &str, value: &str) -> CacheResult<()>;

    // Delete a key. Returns number of deleted keys.
    async fn del(&self, key: &str) -> CacheResult<u64>;

    // List keys starting with `prefix`. Order is unspecified.
    async fn keys_with_prefix(&self, prefix: &str) -> CacheResult<Vec<String>>;
}
