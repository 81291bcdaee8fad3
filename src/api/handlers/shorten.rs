//! Handler for short URL creation.

use axum::{Json, extract::State};

use crate::api::dto::shorten::ShortenResponse;
use crate::api::extractors::ShortenPayload;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the short id for a URL, creating one on first submission.
///
/// # Endpoint
///
/// `POST /api/shorturl`
///
/// # Request Body
///
/// Form (`url=https://example.com`) or JSON (`{ "url": "https://example.com" }`).
///
/// # Response
///
/// ```json
/// { "original_url": "https://example.com", "short_url": 1 }
/// ```
///
/// Submitting the same URL again returns the same `short_url`.
///
/// # Errors
///
/// - 200 `{ "error": "invalid url" }` for a missing field, a malformed URL or
///   an unresolvable host
/// - 500 `{ "error": "server error" }` when the store fails
pub async fn shorten_handler(
    State(state): State<AppState>,
    ShortenPayload(payload): ShortenPayload,
) -> Result<Json<ShortenResponse>, AppError> {
    let url = payload
        .url
        .ok_or_else(|| AppError::invalid_url("missing url field"))?;

    let mapping = state.short_url_service.shorten(&url).await?;

    Ok(Json(mapping.into()))
}
