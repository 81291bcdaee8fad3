//! Syntactic validation of submitted URLs.
//!
//! A URL is accepted when it parses as an absolute `http` or `https` URL
//! with a non-empty host. The submitted string itself is never rewritten;
//! parsing only extracts the host that still has to pass name resolution.

use std::net::IpAddr;
use url::{Host, Url};

/// Errors that can occur during URL validation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL has no host")]
    MissingHost,
}

/// Host component of a validated URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetHost {
    /// A DNS name that still needs a lookup.
    Domain(String),
    /// An IP literal, reachable by construction.
    Ip(IpAddr),
}

/// Parses `input` and returns its host.
///
/// # Errors
///
/// - [`UrlValidationError::InvalidFormat`] for relative or malformed URLs
/// - [`UrlValidationError::UnsupportedProtocol`] for non-HTTP(S) schemes
/// - [`UrlValidationError::MissingHost`] when no host is present
///
/// # Examples
///
/// ```ignore
/// assert_eq!(
///     parse_target_url("https://Example.com/path").unwrap(),
///     TargetHost::Domain("example.com".to_string())
/// );
/// assert!(parse_target_url("not-a-url").is_err());
/// ```
pub fn parse_target_url(input: &str) -> Result<TargetHost, UrlValidationError> {
    let url = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    match url.host() {
        Some(Host::Domain(domain)) if !domain.is_empty() => {
            Ok(TargetHost::Domain(domain.to_string()))
        }
        Some(Host::Ipv4(ip)) => Ok(TargetHost::Ip(IpAddr::V4(ip))),
        Some(Host::Ipv6(ip)) => Ok(TargetHost::Ip(IpAddr::V6(ip))),
        _ => Err(UrlValidationError::MissingHost),
    }
}
