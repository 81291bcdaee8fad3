//! Reachability check for the host of a submitted URL.

use async_trait::async_trait;

/// Answers whether a hostname resolves to at least one address.
///
/// This is a best-effort check, not a liveness guarantee. Implementations
/// must not block the executor; a slow lookup may only delay its own caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HostResolver: Send + Sync {
    async fn resolves(&self, host: &str) -> bool;
}
