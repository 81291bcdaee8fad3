//! Hostname resolution backed by the operating system resolver.

mod dns_host_resolver;

pub use dns_host_resolver::DnsHostResolver;
