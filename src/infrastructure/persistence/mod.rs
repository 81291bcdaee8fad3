//! Store implementations.
//!
//! # Repositories
//!
//! - [`PgUrlRepository`] - PostgreSQL-backed mappings with unique constraints
//! - [`InMemoryUrlRepository`] - Process-local mappings for development and tests

pub mod memory_url_repository;
pub mod pg_url_repository;

pub use memory_url_repository::InMemoryUrlRepository;
pub use pg_url_repository::PgUrlRepository;
