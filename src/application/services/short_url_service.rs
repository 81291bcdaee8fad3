//! Short id assignment and redirect lookup.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::entities::UrlMapping;
use crate::domain::host_resolver::HostResolver;
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::utils::url_validation::{TargetHost, parse_target_url};

/// Service for creating and resolving sequential short URLs.
///
/// Holds no mapping state of its own; every call reads the injected store.
pub struct ShortUrlService {
    repository: Arc<dyn UrlRepository>,
    resolver: Arc<dyn HostResolver>,
}

impl ShortUrlService {
    /// Creates a new service over a store and a host resolver.
    pub fn new(repository: Arc<dyn UrlRepository>, resolver: Arc<dyn HostResolver>) -> Self {
        Self {
            repository,
            resolver,
        }
    }

    /// Returns the mapping for `raw_url`, creating it on first submission.
    ///
    /// # Flow
    ///
    /// 1. Parse as an absolute HTTP(S) URL with a host
    /// 2. Check that the host resolves (IP literals skip the lookup)
    /// 3. Return the existing mapping if the exact URL was seen before
    /// 4. Otherwise append with `short_id = count + 1`
    ///
    /// # Concurrency
    ///
    /// The store assigns `count + 1` and appends atomically
    /// ([`UrlRepository::insert_next`]), so concurrent submissions of distinct
    /// URLs get distinct ids. When the same URL is submitted concurrently the
    /// losing append conflicts and the winner's mapping is returned.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidUrl`] for malformed URLs or unresolvable
    /// hosts, and [`AppError::Internal`] on store failures.
    pub async fn shorten(&self, raw_url: &str) -> Result<UrlMapping, AppError> {
        let host = parse_target_url(raw_url).map_err(|e| AppError::invalid_url(e.to_string()))?;

        if let TargetHost::Domain(domain) = &host
            && !self.resolver.resolves(domain).await
        {
            return Err(AppError::invalid_url(format!(
                "host {domain} does not resolve"
            )));
        }

        if let Some(existing) = self.repository.find_by_original_url(raw_url).await? {
            debug!(short_id = existing.short_id, "Returning existing short url");
            return Ok(existing);
        }

        self.create_mapping(raw_url).await
    }

    /// Looks up the mapping for a raw short id path segment.
    ///
    /// Anything that is not a base-10 integer is treated as not found.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no mapping matches and
    /// [`AppError::Internal`] on store failures.
    pub async fn resolve(&self, raw_short_id: &str) -> Result<UrlMapping, AppError> {
        let Ok(short_id) = raw_short_id.trim().parse::<i64>() else {
            return Err(AppError::not_found(raw_short_id));
        };

        self.repository
            .find_by_short_id(short_id)
            .await?
            .ok_or_else(|| AppError::not_found(raw_short_id))
    }

    /// Number of mappings in the store.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store failures.
    pub async fn mapping_count(&self) -> Result<i64, AppError> {
        self.repository.count().await
    }

    async fn create_mapping(&self, original_url: &str) -> Result<UrlMapping, AppError> {
        match self.repository.insert_next(original_url).await {
            Ok(mapping) => {
                info!(short_id = mapping.short_id, "Created short url");
                Ok(mapping)
            }
            Err(AppError::Conflict { message, details }) => {
                debug!("URL stored concurrently, returning existing short url");
                self.repository
                    .find_by_original_url(original_url)
                    .await?
                    .ok_or(AppError::Internal { message, details })
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::host_resolver::MockHostResolver;
    use crate::domain::repositories::MockUrlRepository;
    use crate::domain::entities::NewUrlMapping;
    use crate::infrastructure::persistence::InMemoryUrlRepository;
    use async_trait::async_trait;
    use chrono::Utc;
    use serde_json::json;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn mapping(url: &str, short_id: i64) -> UrlMapping {
        UrlMapping::new(url.to_string(), short_id, Utc::now())
    }

    fn resolving(answer: bool) -> MockHostResolver {
        let mut resolver = MockHostResolver::new();
        resolver.expect_resolves().returning(move |_| answer);
        resolver
    }

    fn in_memory_service() -> ShortUrlService {
        ShortUrlService::new(
            Arc::new(InMemoryUrlRepository::new()),
            Arc::new(resolving(true)),
        )
    }

    #[tokio::test]
    async fn test_shorten_creates_first_mapping() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_original_url()
            .withf(|url| url == "https://example.com")
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_insert_next()
            .withf(|url| url == "https://example.com")
            .times(1)
            .returning(|url| Ok(mapping(url, 1)));

        let service = ShortUrlService::new(Arc::new(repo), Arc::new(resolving(true)));

        let created = service.shorten("https://example.com").await.unwrap();
        assert_eq!(created.original_url, "https://example.com");
        assert_eq!(created.short_id, 1);
    }

    #[tokio::test]
    async fn test_shorten_returns_existing_mapping() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_original_url()
            .times(1)
            .returning(|_| Ok(Some(mapping("https://example.com", 7))));
        repo.expect_insert_next().times(0);

        let service = ShortUrlService::new(Arc::new(repo), Arc::new(resolving(true)));

        let existing = service.shorten("https://example.com").await.unwrap();
        assert_eq!(existing.short_id, 7);
    }

    #[tokio::test]
    async fn test_shorten_rejects_malformed_url_without_lookup() {
        let mut resolver = MockHostResolver::new();
        resolver.expect_resolves().times(0);

        let service = ShortUrlService::new(
            Arc::new(MockUrlRepository::new()),
            Arc::new(resolver),
        );

        let err = service.shorten("not-a-url").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_shorten_rejects_unresolvable_host() {
        let mut resolver = MockHostResolver::new();
        resolver
            .expect_resolves()
            .withf(|host| host == "this-domain-should-not-exist-xyz123.invalid")
            .times(1)
            .returning(|_| false);

        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_original_url().times(0);

        let service = ShortUrlService::new(Arc::new(repo), Arc::new(resolver));

        let err = service
            .shorten("https://this-domain-should-not-exist-xyz123.invalid")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_shorten_ip_literal_skips_lookup() {
        let mut resolver = MockHostResolver::new();
        resolver.expect_resolves().times(0);

        let service = ShortUrlService::new(
            Arc::new(InMemoryUrlRepository::new()),
            Arc::new(resolver),
        );

        let created = service.shorten("http://127.0.0.1:8080/").await.unwrap();
        assert_eq!(created.short_id, 1);
    }

    #[tokio::test]
    async fn test_shorten_store_failure_is_internal() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_original_url()
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let service = ShortUrlService::new(Arc::new(repo), Arc::new(resolving(true)));

        let err = service.shorten("https://example.com").await.unwrap_err();
        assert!(matches!(err, AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_shorten_conflict_on_same_url_returns_winner() {
        let mut repo = MockUrlRepository::new();

        let lookups = AtomicUsize::new(0);
        repo.expect_find_by_original_url()
            .times(2)
            .returning(move |_| {
                if lookups.fetch_add(1, Ordering::SeqCst) == 0 {
                    Ok(None)
                } else {
                    Ok(Some(mapping("https://example.com", 3)))
                }
            });
        repo.expect_insert_next()
            .times(1)
            .returning(|_| Err(AppError::conflict("Unique constraint violation", json!({}))));

        let service = ShortUrlService::new(Arc::new(repo), Arc::new(resolving(true)));

        let winner = service.shorten("https://example.com").await.unwrap();
        assert_eq!(winner.short_id, 3);
    }

    #[tokio::test]
    async fn test_shorten_conflict_without_winner_is_internal() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_original_url()
            .times(2)
            .returning(|_| Ok(None));
        repo.expect_insert_next()
            .times(1)
            .returning(|_| Err(AppError::conflict("Unique constraint violation", json!({}))));

        let service = ShortUrlService::new(Arc::new(repo), Arc::new(resolving(true)));

        let err = service.shorten("https://example.com").await.unwrap_err();
        assert!(matches!(err, AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_shorten_insert_failure_is_internal() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_original_url()
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_insert_next()
            .times(1)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let service = ShortUrlService::new(Arc::new(repo), Arc::new(resolving(true)));

        let err = service.shorten("https://example.com").await.unwrap_err();
        assert!(matches!(err, AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_sequential_submissions_are_dense_and_idempotent() {
        let service = in_memory_service();
        let urls = [
            "https://example.com",
            "https://www.rust-lang.org",
            "https://docs.rs/tokio",
            "https://crates.io",
        ];

        for (i, url) in urls.iter().enumerate() {
            let created = service.shorten(url).await.unwrap();
            assert_eq!(created.short_id, i as i64 + 1);
        }

        let again = service.shorten("https://www.rust-lang.org").await.unwrap();
        assert_eq!(again.short_id, 2);
        assert_eq!(service.mapping_count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_resolve_round_trip() {
        let service = in_memory_service();
        let created = service
            .shorten("https://example.com/some/long/path?q=1")
            .await
            .unwrap();

        let resolved = service
            .resolve(&created.short_id.to_string())
            .await
            .unwrap();
        assert_eq!(resolved.original_url, "https://example.com/some/long/path?q=1");
    }

    #[tokio::test]
    async fn test_resolve_unknown_id_is_not_found() {
        let service = in_memory_service();
        service.shorten("https://example.com").await.unwrap();

        let err = service.resolve("999999").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_resolve_non_integer_is_not_found_without_query() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_short_id().times(0);

        let service = ShortUrlService::new(Arc::new(repo), Arc::new(resolving(true)));

        for input in ["abc", "1.5", "", "12abc"] {
            let err = service.resolve(input).await.unwrap_err();
            assert!(matches!(err, AppError::NotFound(_)), "input {input:?}");
        }
    }

    #[tokio::test]
    async fn test_resolve_store_failure_is_internal() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_short_id()
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let service = ShortUrlService::new(Arc::new(repo), Arc::new(resolving(true)));

        let err = service.resolve("1").await.unwrap_err();
        assert!(matches!(err, AppError::Internal { .. }));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_distinct_submissions_get_distinct_ids() {
        const N: i64 = 32;
        let service = Arc::new(in_memory_service());
        let mut handles = vec![];

        for i in 0..N {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                service
                    .shorten(&format!("https://example.com/page/{i}"))
                    .await
                    .unwrap()
                    .short_id
            }));
        }

        let mut ids = HashSet::new();
        for handle in handles {
            ids.insert(handle.await.unwrap());
        }

        assert_eq!(ids, (1..=N).collect::<HashSet<_>>());
    }

    /// Store that answers every call after a networked round trip.
    struct SlowRepository {
        inner: InMemoryUrlRepository,
        latency: Duration,
    }

    #[async_trait]
    impl UrlRepository for SlowRepository {
        async fn find_by_original_url(
            &self,
            original_url: &str,
        ) -> Result<Option<UrlMapping>, AppError> {
            tokio::time::sleep(self.latency).await;
            self.inner.find_by_original_url(original_url).await
        }

        async fn find_by_short_id(&self, short_id: i64) -> Result<Option<UrlMapping>, AppError> {
            tokio::time::sleep(self.latency).await;
            self.inner.find_by_short_id(short_id).await
        }

        async fn count(&self) -> Result<i64, AppError> {
            tokio::time::sleep(self.latency).await;
            self.inner.count().await
        }

        async fn insert(&self, new_mapping: NewUrlMapping) -> Result<UrlMapping, AppError> {
            tokio::time::sleep(self.latency).await;
            self.inner.insert(new_mapping).await
        }

        async fn insert_next(&self, original_url: &str) -> Result<UrlMapping, AppError> {
            tokio::time::sleep(self.latency).await;
            self.inner.insert_next(original_url).await
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_submissions_with_store_latency_all_succeed() {
        const N: i64 = 50;
        let repo = SlowRepository {
            inner: InMemoryUrlRepository::new(),
            latency: Duration::from_millis(1),
        };
        let service = Arc::new(ShortUrlService::new(
            Arc::new(repo),
            Arc::new(resolving(true)),
        ));
        let mut handles = vec![];

        for i in 0..N {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                service.shorten(&format!("https://example.com/p/{i}")).await
            }));
        }

        let mut ids = HashSet::new();
        for handle in handles {
            let created = handle.await.unwrap();
            assert!(created.is_ok(), "shorten failed: {created:?}");
            ids.insert(created.unwrap().short_id);
        }

        assert_eq!(ids, (1..=N).collect::<HashSet<_>>());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_same_url_with_store_latency_shares_one_id() {
        let repo = SlowRepository {
            inner: InMemoryUrlRepository::new(),
            latency: Duration::from_millis(1),
        };
        let service = Arc::new(ShortUrlService::new(
            Arc::new(repo),
            Arc::new(resolving(true)),
        ));
        let mut handles = vec![];

        for _ in 0..20 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                service.shorten("https://example.com/same").await.unwrap().short_id
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap(), 1);
        }
        assert_eq!(service.mapping_count().await.unwrap(), 1);
    }
}
