//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /`           - Landing page with the submission form
//! - `GET  /public/*`   - Static assets
//! - `GET  /health`     - Store health check
//! - `/api/*`           - Short URL API (see [`crate::api::routes`])
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Any origin may call the API
//! - **Path normalization** - Trailing slash handling

use std::path::PathBuf;

use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::services::{ServeDir, ServeFile};

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::tracing;
use crate::state::AppState;

/// Locations of the landing page and static assets on disk.
#[derive(Debug, Clone)]
pub struct StaticAssets {
    pub index_file: PathBuf,
    pub public_dir: PathBuf,
}

impl Default for StaticAssets {
    fn default() -> Self {
        Self {
            index_file: PathBuf::from("views/index.html"),
            public_dir: PathBuf::from("public"),
        }
    }
}

/// Builds the router with all routes and middleware, without path normalization.
pub fn build_router(state: AppState, assets: &StaticAssets) -> Router {
    Router::new()
        .route_service("/", ServeFile::new(&assets.index_file))
        .nest_service("/public", ServeDir::new(&assets.public_dir))
        .route("/health", get(health_handler))
        .nest("/api", api::routes::routes())
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(tracing::layer())
}

/// Constructs the application router served by [`crate::server::run`].
pub fn app_router(state: AppState, assets: &StaticAssets) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(build_router(state, assets))
}
