//! Request body extractor for the shorten endpoint.

use axum::{
    Form, Json,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
};

use crate::api::dto::shorten::ShortenRequest;
use crate::error::AppError;

/// Extracts a [`ShortenRequest`] from a JSON or URL-encoded form body.
///
/// JSON is used when `Content-Type` is `application/json`; everything else
/// is read as a form, which is what the landing page submits. Any body that
/// cannot be read is answered as an invalid URL.
#[derive(Debug)]
pub struct ShortenPayload(pub ShortenRequest);

impl<S> FromRequest<S> for ShortenPayload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json"));

        if is_json {
            let Json(request) = Json::<ShortenRequest>::from_request(req, state)
                .await
                .map_err(|e| AppError::invalid_url(e.body_text()))?;
            Ok(Self(request))
        } else {
            let Form(request) = Form::<ShortenRequest>::from_request(req, state)
                .await
                .map_err(|e| AppError::invalid_url(e.body_text()))?;
            Ok(Self(request))
        }
    }
}
