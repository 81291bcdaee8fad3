//! Core domain entities.
//!
//! - [`UrlMapping`] - A persisted original URL with its sequential short id
//! - [`NewUrlMapping`] - Input for appending a mapping to the store

pub mod url_mapping;

pub use url_mapping::{NewUrlMapping, UrlMapping};
