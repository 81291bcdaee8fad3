//! PostgreSQL implementation of the URL mapping store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewUrlMapping, UrlMapping};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

/// Advisory lock key serializing short id assignment across connections.
const SHORT_ID_LOCK_KEY: i64 = 0x5348_4f52_5455_524c;

/// PostgreSQL repository for URL mappings.
///
/// Both `original_url` and `short_id` carry unique constraints (see
/// `migrations/`), so a losing concurrent insert fails with
/// [`AppError::Conflict`] instead of producing a duplicate.
/// `insert_next` takes a transaction-scoped advisory lock, so counting and
/// appending cannot interleave between requests or server processes.
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
}

impl PgUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UrlMappingRow {
    original_url: String,
    short_id: i64,
    created_at: DateTime<Utc>,
}

impl From<UrlMappingRow> for UrlMapping {
    fn from(row: UrlMappingRow) -> Self {
        UrlMapping::new(row.original_url, row.short_id, row.created_at)
    }
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn find_by_original_url(
        &self,
        original_url: &str,
    ) -> Result<Option<UrlMapping>, AppError> {
        // md5 predicate lets the planner use the unique hash index
        let row = sqlx::query_as::<_, UrlMappingRow>(
            r#"
            SELECT original_url, short_id, created_at
            FROM url_mappings
            WHERE md5(original_url) = md5($1) AND original_url = $1
            "#,
        )
        .bind(original_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(UrlMapping::from))
    }

    async fn find_by_short_id(&self, short_id: i64) -> Result<Option<UrlMapping>, AppError> {
        let row = sqlx::query_as::<_, UrlMappingRow>(
            r#"
            SELECT original_url, short_id, created_at
            FROM url_mappings
            WHERE short_id = $1
            "#,
        )
        .bind(short_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(UrlMapping::from))
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM url_mappings")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn insert(&self, new_mapping: NewUrlMapping) -> Result<UrlMapping, AppError> {
        let row = sqlx::query_as::<_, UrlMappingRow>(
            r#"
            INSERT INTO url_mappings (original_url, short_id)
            VALUES ($1, $2)
            RETURNING original_url, short_id, created_at
            "#,
        )
        .bind(&new_mapping.original_url)
        .bind(new_mapping.short_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn insert_next(&self, original_url: &str) -> Result<UrlMapping, AppError> {
        let mut tx = self.pool.begin().await?;

        // Released on commit or rollback
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(SHORT_ID_LOCK_KEY)
            .execute(&mut *tx)
            .await?;

        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM url_mappings")
            .fetch_one(&mut *tx)
            .await?;
        let new_mapping = NewUrlMapping::next_after(original_url, count);

        let row = sqlx::query_as::<_, UrlMappingRow>(
            r#"
            INSERT INTO url_mappings (original_url, short_id)
            VALUES ($1, $2)
            RETURNING original_url, short_id, created_at
            "#,
        )
        .bind(&new_mapping.original_url)
        .bind(new_mapping.short_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into())
    }
}
