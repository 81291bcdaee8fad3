//! Store trait for URL mappings.

use crate::domain::entities::{NewUrlMapping, UrlMapping};
use crate::error::AppError;
use async_trait::async_trait;

/// Append-only store of [`UrlMapping`]s, queryable by either field.
///
/// The store is the single source of truth: callers hold no mapping state
/// between requests. There are no update or delete operations.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryUrlRepository`] - Process-local store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Finds a mapping by exact original URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] when the store is unavailable.
    async fn find_by_original_url(&self, original_url: &str)
    -> Result<Option<UrlMapping>, AppError>;

    /// Finds a mapping by short id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] when the store is unavailable.
    async fn find_by_short_id(&self, short_id: i64) -> Result<Option<UrlMapping>, AppError>;

    /// Number of mappings currently persisted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] when the store is unavailable.
    async fn count(&self) -> Result<i64, AppError>;

    /// Appends a new mapping.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if either the short id or the original
    /// URL is already taken, and [`AppError::Internal`] when the store is
    /// unavailable.
    async fn insert(&self, new_mapping: NewUrlMapping) -> Result<UrlMapping, AppError>;

    /// Appends `original_url` with `short_id = count + 1`.
    ///
    /// Reading the count and appending happen as one atomic step with
    /// respect to every other `insert_next`, so concurrent callers always
    /// receive distinct, dense ids.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the original URL is already stored,
    /// and [`AppError::Internal`] when the store is unavailable.
    async fn insert_next(&self, original_url: &str) -> Result<UrlMapping, AppError>;
}
