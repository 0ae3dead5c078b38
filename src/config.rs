/*
 * Responsibility
 * - Load settings from the environment (.env is honoured via dotenvy)
 * - Validate them (missing / malformed values abort startup)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use url::Url;

use crate::services::catalog::tmdb::DEFAULT_BASE_URL;

// Upper bounds keep derived durations and timers well inside range.
const MAX_TMDB_TIMEOUT_SECONDS: u64 = 300;
const MAX_SESSION_IDLE_SECONDS: u64 = 7 * 24 * 60 * 60;
const MAX_SWEEP_INTERVAL_SECONDS: u64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::to_ascii_lowercase).as_deref() {
            Some("production") | Some("prod") => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheBackend {
    Memory,
    Valkey { url: String },
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub tmdb_base_url: String,
    pub tmdb_api_key: Option<String>,
    pub tmdb_timeout_seconds: u64,

    pub cache_backend: CacheBackend,
    pub cache_key_prefix: String,
    // 0 disables the background sweep
    pub cache_sweep_interval_seconds: u64,

    pub session_idle_seconds: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port: u16 = match get("PORT") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(get("APP_ENV").as_deref());

        let tmdb_base_url = get("TMDB_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Url::parse(&tmdb_base_url).map_err(|_| ConfigError::Invalid("TMDB_BASE_URL"))?;

        let tmdb_api_key = get("TMDB_API_KEY")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let tmdb_timeout_seconds = match get("TMDB_TIMEOUT_SECONDS") {
            Some(v) => v
                .parse::<u64>()
                .ok()
                .filter(|n| (1..=MAX_TMDB_TIMEOUT_SECONDS).contains(n))
                .ok_or(ConfigError::Invalid("TMDB_TIMEOUT_SECONDS"))?,
            None => 10,
        };

        let cache_backend = match get("CACHE_BACKEND")
            .unwrap_or_else(|| "memory".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "memory" => CacheBackend::Memory,
            "valkey" | "redis" => CacheBackend::Valkey {
                url: get("VALKEY_URL").ok_or(ConfigError::Missing("VALKEY_URL"))?,
            },
            _ => return Err(ConfigError::Invalid("CACHE_BACKEND")),
        };

        let cache_key_prefix = get("CACHE_KEY_PREFIX")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "movie-catalog".to_string());

        let cache_sweep_interval_seconds = match get("CACHE_SWEEP_INTERVAL_SECONDS") {
            Some(v) => v
                .parse::<u64>()
                .ok()
                .filter(|n| *n <= MAX_SWEEP_INTERVAL_SECONDS)
                .ok_or(ConfigError::Invalid("CACHE_SWEEP_INTERVAL_SECONDS"))?,
            None => 0,
        };

        let session_idle_seconds = match get("SESSION_IDLE_SECONDS") {
            Some(v) => v
                .parse::<u64>()
                .ok()
                .filter(|n| (1..=MAX_SESSION_IDLE_SECONDS).contains(n))
                .ok_or(ConfigError::Invalid("SESSION_IDLE_SECONDS"))?,
            None => 30 * 60,
        };

        Ok(Self {
            addr,
            app_env,
            tmdb_base_url,
            tmdb_api_key,
            tmdb_timeout_seconds,
            cache_backend,
            cache_key_prefix,
            cache_sweep_interval_seconds,
            session_idle_seconds,
        })
    }
}
