//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use url::Url;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short id to its original URL.
///
/// # Endpoint
///
/// `GET /api/shorturl/{short_url}`
///
/// # Responses
///
/// - 302 Found with `Location` set to the original URL
/// - 200 `{ "error": "No short URL found for the given input" }` for unknown
///   or non-numeric ids
/// - 500 `{ "error": "server error" }` when the store fails
pub async fn redirect_handler(
    Path(short_url): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let mapping = state.short_url_service.resolve(&short_url).await?;
    let location = location_header(&mapping.original_url)?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

/// Builds the `Location` value.
///
/// Plain ASCII URLs are sent verbatim. Anything else goes out in its
/// serialized form: non-ASCII characters percent-encoded, IDN hosts in
/// punycode, control characters stripped.
fn location_header(original_url: &str) -> Result<HeaderValue, AppError> {
    if original_url.is_ascii()
        && let Ok(value) = HeaderValue::from_str(original_url)
    {
        return Ok(value);
    }

    Url::parse(original_url)
        .ok()
        .and_then(|url| HeaderValue::from_str(url.as_str()).ok())
        .ok_or_else(|| {
            AppError::internal(
                "Stored URL cannot be used as a redirect target",
                json!({ "original_url": original_url }),
            )
        })
}
