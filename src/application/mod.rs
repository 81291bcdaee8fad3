//! Application layer services implementing business logic.
//!
//! Services consume the domain traits and provide a clean API for HTTP
//! handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::short_url_service::ShortUrlService`] - Short id assignment and lookup

pub mod services;
