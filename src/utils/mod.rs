//! Helper functions shared across layers.
//!
//! - [`url_validation`] - Syntactic checks for submitted URLs

pub mod url_validation;
