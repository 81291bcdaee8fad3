//! API route configuration.

use axum::{
    Router,
    routing::{get, post},
};

use crate::api::handlers::{hello_handler, redirect_handler, shorten_handler};
use crate::state::AppState;

/// Routes nested under `/api`.
///
/// # Endpoints
///
/// - `GET  /hello`                - Diagnostic greeting
/// - `POST /shorturl`             - Create or fetch the short id for a URL
/// - `GET  /shorturl/{short_url}` - Redirect to the original URL
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/hello", get(hello_handler))
        .route("/shorturl", post(shorten_handler))
        .route("/shorturl/{short_url}", get(redirect_handler))
}
