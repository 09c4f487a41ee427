//! Firmscope Persistence Layer
//!
//! This crate provides the query model and the collaborator traits the
//! firmscope search front consumes. The document store itself lives outside
//! this workspace; an in-memory backend is bundled for tests and development.
//!
//! # Architecture
//!
//! - [`types`] - Query tree, pagination and result rows
//! - [`error`] - Error types for all operations
//! - [`core`] - Search, catalog and binary search traits
//! - [`backends`] - Backend implementations
//!
//! # Quick Start
//!
//! ```
//! use firmscope_persistence::types::{Clause, Field, Query};
//!
//! let query = Query::from(Clause::exact(Field::DeviceClass, "Router"))
//!     .and(Clause::regex(Field::Vendor, "avm").into());
//!
//! // Queries travel as Mongo-style JSON
//! let text = query.to_json_string();
//! assert!(text.starts_with(r#"{"$and":"#));
//! assert!(Query::parse(&text).unwrap().is_equivalent(&query));
//! ```
//!
//! # Searching
//!
//! ```
//! use firmscope_persistence::backends::memory::InMemoryBackend;
//! use firmscope_persistence::core::SearchBackend;
//! use firmscope_persistence::types::{FirmwareRecord, Query};
//!
//! # tokio_test::block_on(async {
//! let backend = InMemoryBackend::with_records(vec![
//!     FirmwareRecord::firmware("fw-1", "AVM", "FRITZ!Box 7490", "7.21"),
//! ]);
//!
//! let total = backend.count(&Query::Empty, false).await.unwrap();
//! assert_eq!(total, 1);
//! # });
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod core;
pub mod error;
pub mod types;

pub use error::{BackendError, QueryError, StorageError, StorageResult};
