//! Store trait definitions for the domain layer.
//!
//! - Traits define the contract for data operations
//! - Implementations live in `crate::infrastructure::persistence`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! See `tests/repository_url_mapping.rs` for the PostgreSQL contract tests.

pub mod url_repository;

pub use url_repository::UrlRepository;

#[cfg(test)]
pub use url_repository::MockUrlRepository;
