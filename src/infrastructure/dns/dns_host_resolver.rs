//! [`HostResolver`] implementation using `tokio::net::lookup_host`.

use async_trait::async_trait;
use std::time::Duration;
use tokio::net::lookup_host;
use tracing::{debug, warn};

use crate::domain::host_resolver::HostResolver;

/// Resolves hostnames through the system resolver.
///
/// `lookup_host` runs `getaddrinfo` on tokio's blocking pool, so a slow lookup
/// never stalls other requests. Each lookup is additionally bounded by
/// `timeout`; a lookup that exceeds it counts as unresolvable.
#[derive(Debug, Clone)]
pub struct DnsHostResolver {
    timeout: Duration,
}

impl DnsHostResolver {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl HostResolver for DnsHostResolver {
    async fn resolves(&self, host: &str) -> bool {
        match tokio::time::timeout(self.timeout, lookup_host((host, 0))).await {
            Ok(Ok(mut addrs)) => addrs.next().is_some(),
            Ok(Err(e)) => {
                debug!(host, error = %e, "Host lookup failed");
                false
            }
            Err(_) => {
                warn!(
                    host,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Host lookup timed out"
                );
                false
            }
        }
    }
}
