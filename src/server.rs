//! HTTP server initialization and runtime setup.
//!
//! Handles store construction, service wiring, and the Axum server lifecycle.

use crate::application::services::ShortUrlService;
use crate::config::{Config, StoreBackend};
use crate::domain::repositories::UrlRepository;
use crate::infrastructure::dns::DnsHostResolver;
use crate::infrastructure::persistence::{InMemoryUrlRepository, PgUrlRepository};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - The mapping store (PostgreSQL pool + migrations, or in-memory)
/// - The DNS-backed host resolver
/// - Axum HTTP server with graceful shutdown on Ctrl-C / SIGTERM
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let (repository, pool) = build_store(&config).await?;

    let resolver = Arc::new(DnsHostResolver::new(Duration::from_millis(
        config.dns_timeout_ms,
    )));
    let short_url_service = Arc::new(ShortUrlService::new(repository, resolver));
    let state = AppState::new(short_url_service);

    let app = app_router(state, &config.static_assets());

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pool) = pool {
        pool.close().await;
        tracing::info!("Database pool closed");
    }

    tracing::info!("Server stopped");
    Ok(())
}

/// Creates the configured store; the pool is returned so it can be closed on shutdown.
async fn build_store(config: &Config) -> Result<(Arc<dyn UrlRepository>, Option<PgPool>)> {
    match config.store_backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; mappings are lost on restart");
            let repository: Arc<dyn UrlRepository> = Arc::new(InMemoryUrlRepository::new());
            Ok((repository, None))
        }
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set when STORE_BACKEND=postgres")?;

            let pool = connect_pool(config, database_url).await?;
            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run database migrations")?;
            tracing::info!("Database migrations applied");

            let repository: Arc<dyn UrlRepository> =
                Arc::new(PgUrlRepository::new(Arc::new(pool.clone())));
            Ok((repository, Some(pool)))
        }
    }
}

/// Connects the pool, retrying with jittered exponential backoff.
async fn connect_pool(config: &Config, database_url: &str) -> Result<PgPool> {
    let options = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime));

    // 200ms, 400ms, 800ms ... capped at 10s
    let strategy = ExponentialBackoff::from_millis(2)
        .factor(100)
        .max_delay(Duration::from_secs(10))
        .map(jitter)
        .take(config.db_connect_retries.saturating_sub(1));

    Retry::spawn(strategy, || {
        let options = options.clone();
        async move {
            options.connect(database_url).await.inspect_err(|e| {
                tracing::warn!(error = %e, "Database connection attempt failed");
            })
        }
    })
    .await
    .context("Failed to connect to database")
}

/// Resolves when the process receives Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
