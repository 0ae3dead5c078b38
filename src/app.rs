/*
 * Responsibility
 * - Load Config -> build dependencies -> assemble the Router
 * - Apply HTTP middleware
 * - Start the optional cache sweep task and axum::serve()
 */
use anyhow::Result;
use axum::Router;
use std::{panic, process, sync::Arc, time::Duration};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api,
    config::{CacheBackend, Config},
    middleware,
    repos::MovieRepository,
    services::{
        cache::{CacheClient, ExpiringStore, MemoryClient, ValkeyClient},
        catalog::{CatalogClient, TmdbClient, TmdbConfig},
        clock::{Clock, SystemClock},
        credentials::CredentialStore,
        search_session::SessionRegistry,
    },
    state::AppState,
};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,movie_catalog=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development: crash the whole process so we notice immediately.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting movie catalog in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let (state, store) = build_state(&config).await?;

    if config.cache_sweep_interval_seconds > 0 {
        spawn_sweeper(
            store,
            Duration::from_secs(config.cache_sweep_interval_seconds),
        );
    }

    let app = build_router(state, Duration::from_secs(config.tmdb_timeout_seconds));

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn build_state(config: &Config) -> Result<(AppState, ExpiringStore)> {
    let cache: Arc<dyn CacheClient> = match &config.cache_backend {
        CacheBackend::Memory => Arc::new(MemoryClient::new()),
        CacheBackend::Valkey { url } => Arc::new(ValkeyClient::new(url).await?),
    };
    tracing::info!(backend = cache.backend_name(), "cache backend ready");

    let catalog: Arc<dyn CatalogClient> = Arc::new(TmdbClient::with_config(TmdbConfig {
        base_url: config.tmdb_base_url.clone(),
        timeout_secs: config.tmdb_timeout_seconds,
    })?);

    let credentials = CredentialStore::new(cache.clone(), &config.cache_key_prefix);
    match &config.tmdb_api_key {
        Some(key) => catalog.set_credential(key.clone()),
        None => match credentials.load_into(catalog.as_ref()).await {
            Ok(true) => {}
            Ok(false) => tracing::warn!("no catalog API key yet; PUT /api/v1/credential to set one"),
            Err(e) => tracing::warn!(error = %e, "could not restore saved catalog credential"),
        },
    }

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // Cached responses get their own sub-namespace so a sweep never touches the credential.
    let store = ExpiringStore::new(
        cache,
        clock.clone(),
        format!("{}:cache", config.cache_key_prefix),
        ExpiringStore::default_ttl(),
    );
    let movies = MovieRepository::new(catalog.clone(), store.clone());

    let idle_seconds = i64::try_from(config.session_idle_seconds)?;
    let sessions = SessionRegistry::new(clock, chrono::Duration::seconds(idle_seconds));

    Ok((AppState::new(movies, catalog, credentials, sessions), store))
}

fn spawn_sweeper(store: ExpiringStore, every: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        // The first tick completes immediately; skip it so startup stays quiet.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            if let Err(e) = store.sweep().await {
                tracing::warn!(error = %e, "cache sweep failed");
            }
        }
    });
}

fn build_router(state: AppState, upstream_timeout: Duration) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes())
        .with_state(state);

    middleware::http::apply(router, upstream_timeout)
}
