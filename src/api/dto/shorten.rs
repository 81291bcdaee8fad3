//! DTOs for the short URL creation endpoint.

use serde::{Deserialize, Serialize};

use crate::domain::entities::UrlMapping;

/// Request body for `POST /api/shorturl`.
///
/// `url` is optional so that a missing field is answered with the regular
/// invalid-url response instead of a deserialization rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ShortenRequest {
    pub url: Option<String>,
}

/// Successful creation or lookup result.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ShortenResponse {
    pub original_url: String,
    pub short_url: i64,
}

impl From<UrlMapping> for ShortenResponse {
    fn from(mapping: UrlMapping) -> Self {
        Self {
            original_url: mapping.original_url,
            short_url: mapping.short_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn test_response_wire_shape() {
        let mapping = UrlMapping::new("https://example.com".to_string(), 1, Utc::now());
        let body = serde_json::to_value(ShortenResponse::from(mapping)).unwrap();

        assert_eq!(
            body,
            json!({ "original_url": "https://example.com", "short_url": 1 })
        );
    }

    #[test]
    fn test_request_without_url_field() {
        let request: ShortenRequest = serde_json::from_value(json!({})).unwrap();
        assert!(request.url.is_none());
    }
}
