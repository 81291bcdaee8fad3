//! Mapping entity between an original URL and its short id.

use chrono::{DateTime, Utc};

/// A persisted mapping.
///
/// `original_url` is stored exactly as submitted. `short_id` is positive and
/// unique; under sequential operation ids form the dense range `1..=N` in
/// order of first submission. Mappings are never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlMapping {
    pub original_url: String,
    pub short_id: i64,
    pub created_at: DateTime<Utc>,
}

impl UrlMapping {
    pub fn new(original_url: String, short_id: i64, created_at: DateTime<Utc>) -> Self {
        Self {
            original_url,
            short_id,
            created_at,
        }
    }
}

/// Input data for appending a new mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUrlMapping {
    pub original_url: String,
    pub short_id: i64,
}

impl NewUrlMapping {
    /// Builds the mapping that follows a store currently holding `count` records.
    pub fn next_after(original_url: impl Into<String>, count: i64) -> Self {
        Self {
            original_url: original_url.into(),
            short_id: count + 1,
        }
    }
}
