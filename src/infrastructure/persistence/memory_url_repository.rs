//! In-memory implementation of the URL mapping store.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

use crate::domain::entities::{NewUrlMapping, UrlMapping};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

#[derive(Debug, Default)]
struct Mappings {
    by_short_id: BTreeMap<i64, UrlMapping>,
    by_original_url: HashMap<String, i64>,
}

impl Mappings {
    fn len(&self) -> Result<i64, AppError> {
        let len = self.by_short_id.len();
        i64::try_from(len)
            .map_err(|_| AppError::internal("Store size overflow", json!({ "len": len })))
    }

    /// Checks both unique keys and appends; callers hold the write lock.
    fn append(&mut self, new_mapping: NewUrlMapping) -> Result<UrlMapping, AppError> {
        if self.by_short_id.contains_key(&new_mapping.short_id) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "short_id", "short_id": new_mapping.short_id }),
            ));
        }
        if self.by_original_url.contains_key(&new_mapping.original_url) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "original_url" }),
            ));
        }

        let mapping = UrlMapping::new(new_mapping.original_url, new_mapping.short_id, Utc::now());
        self.by_original_url
            .insert(mapping.original_url.clone(), mapping.short_id);
        self.by_short_id.insert(mapping.short_id, mapping.clone());

        Ok(mapping)
    }
}

/// Process-local store with the same uniqueness rules as the PostgreSQL schema.
///
/// The uniqueness check and the append happen under one write lock, so a
/// losing concurrent insert sees [`AppError::Conflict`] and `insert_next`
/// never hands out the same id twice. Contents are lost when the process
/// exits.
#[derive(Debug, Default)]
pub struct InMemoryUrlRepository {
    mappings: RwLock<Mappings>,
}

impl InMemoryUrlRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UrlRepository for InMemoryUrlRepository {
    async fn find_by_original_url(
        &self,
        original_url: &str,
    ) -> Result<Option<UrlMapping>, AppError> {
        let mappings = self.mappings.read().await;

        Ok(mappings
            .by_original_url
            .get(original_url)
            .and_then(|short_id| mappings.by_short_id.get(short_id))
            .cloned())
    }

    async fn find_by_short_id(&self, short_id: i64) -> Result<Option<UrlMapping>, AppError> {
        Ok(self.mappings.read().await.by_short_id.get(&short_id).cloned())
    }

    async fn count(&self) -> Result<i64, AppError> {
        self.mappings.read().await.len()
    }

    async fn insert(&self, new_mapping: NewUrlMapping) -> Result<UrlMapping, AppError> {
        self.mappings.write().await.append(new_mapping)
    }

    async fn insert_next(&self, original_url: &str) -> Result<UrlMapping, AppError> {
        let mut mappings = self.mappings.write().await;
        let count = mappings.len()?;

        mappings.append(NewUrlMapping::next_after(original_url, count))
    }
}
