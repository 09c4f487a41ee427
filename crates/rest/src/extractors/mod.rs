//! Axum extractors for search requests.
//!
//! - [`RequestArgs`] - Query-string arguments with empty values dropped
//! - [`BinarySearchForm`] - Binary search rules from a form or file upload

mod binary_search_form;
mod request_args;

pub use binary_search_form::BinarySearchForm;
pub use request_args::RequestArgs;
