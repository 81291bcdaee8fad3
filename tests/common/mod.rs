#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use serde_json::json;
use shorturl_service::application::services::ShortUrlService;
use shorturl_service::domain::entities::{NewUrlMapping, UrlMapping};
use shorturl_service::domain::host_resolver::HostResolver;
use shorturl_service::domain::repositories::UrlRepository;
use shorturl_service::error::AppError;
use shorturl_service::infrastructure::persistence::InMemoryUrlRepository;
use shorturl_service::routes::{StaticAssets, build_router};
use shorturl_service::state::AppState;
use sqlx::PgPool;
use std::sync::Arc;

/// Resolves every host except those under the reserved `.invalid` TLD.
pub struct FakeResolver;

#[async_trait]
impl HostResolver for FakeResolver {
    async fn resolves(&self, host: &str) -> bool {
        !host.ends_with(".invalid")
    }
}

/// Store whose every operation fails as if the database were down.
pub struct UnavailableRepository;

fn unavailable() -> AppError {
    AppError::internal("Database error", json!({ "reason": "connection refused" }))
}

#[async_trait]
impl UrlRepository for UnavailableRepository {
    async fn find_by_original_url(&self, _: &str) -> Result<Option<UrlMapping>, AppError> {
        Err(unavailable())
    }

    async fn find_by_short_id(&self, _: i64) -> Result<Option<UrlMapping>, AppError> {
        Err(unavailable())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Err(unavailable())
    }

    async fn insert(&self, _: NewUrlMapping) -> Result<UrlMapping, AppError> {
        Err(unavailable())
    }

    async fn insert_next(&self, _: &str) -> Result<UrlMapping, AppError> {
        Err(unavailable())
    }
}

pub fn create_state_with(repository: Arc<dyn UrlRepository>) -> AppState {
    let short_url_service = Arc::new(ShortUrlService::new(repository, Arc::new(FakeResolver)));
    AppState::new(short_url_service)
}

pub fn create_test_state() -> AppState {
    create_state_with(Arc::new(InMemoryUrlRepository::new()))
}

/// Full application router over the given state.
pub fn create_test_server(state: AppState) -> TestServer {
    TestServer::new(build_router(state, &StaticAssets::default())).unwrap()
}

pub async fn insert_mapping(pool: &PgPool, url: &str, short_id: i64) {
    sqlx::query("INSERT INTO url_mappings (original_url, short_id) VALUES ($1, $2)")
        .bind(url)
        .bind(short_id)
        .execute(pool)
        .await
        .unwrap();
}
