//! Core traits and abstractions.
//!
//! This module provides the collaborator traits the search front consumes:
//!
//! - [`SearchBackend`] - Count and page through the records selected by a query
//! - [`Catalog`] - Facet lists and record lookups
//! - [`BinarySearchService`] - Asynchronous binary pattern searches
//!
//! # Example: Implementing a Search Backend
//!
//! ```ignore
//! use async_trait::async_trait;
//! use firmscope_persistence::core::SearchBackend;
//! use firmscope_persistence::error::StorageResult;
//! use firmscope_persistence::types::{MetaEntry, Query};
//!
//! struct MyBackend {
//!     // ... backend-specific fields
//! }
//!
//! #[async_trait]
//! impl SearchBackend for MyBackend {
//!     fn backend_name(&self) -> &'static str {
//!         "my-backend"
//!     }
//!
//!     async fn count(&self, query: &Query, only_parent_of_match: bool) -> StorageResult<u64> {
//!         // Implementation...
//!         todo!()
//!     }
//!
//!     // ... implement search
//! }
//! ```

pub mod binary_search;
pub mod catalog;
pub mod search;

pub use binary_search::{BinarySearchService, BinarySearchStatus};
pub use catalog::Catalog;
pub use search::SearchBackend;
