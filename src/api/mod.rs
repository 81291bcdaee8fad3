//! REST API layer for HTTP request/response handling.
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for request/response serialization
//! - [`extractors`] - Request body extraction accepting form or JSON payloads
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Request tracing
//! - [`routes`] - Route configuration under `/api`

pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod routes;
