//! Shared utilities: IPv4 helpers and document validation.

pub mod ip_utils;
pub mod validation;

pub use validation::{validate_document, DocumentIssue, ValidationReport};
