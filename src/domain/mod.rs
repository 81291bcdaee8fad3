//! Domain layer containing the mapping entity and the ports it is accessed through.
//!
//! # Architecture
//!
//! - [`entities`] - Core data structures ([`entities::UrlMapping`])
//! - [`repositories`] - Store trait ([`repositories::UrlRepository`])
//! - [`host_resolver`] - Hostname reachability check ([`host_resolver::HostResolver`])
//!
//! Implementations of the traits live in [`crate::infrastructure`]; the
//! create-or-fetch and redirect-lookup logic lives in
//! [`crate::application::services`].

pub mod entities;
pub mod host_resolver;
pub mod repositories;
