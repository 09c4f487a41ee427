//! Core types for the persistence layer.
//!
//! This module provides the fundamental types used throughout the persistence layer:
//!
//! - [`Query`], [`Clause`], [`Field`], [`Predicate`] - The search filter tree
//! - [`PageRequest`], [`SearchResultPage`] - Pagination types
//! - [`FirmwareRecord`], [`MetaEntry`] - Stored records and result rows
//!
//! # Examples
//!
//! ## Building a Query
//!
//! ```
//! use firmscope_persistence::types::{Clause, Field, Query};
//!
//! let query = Query::from(Clause::exact(Field::DeviceClass, "Router"))
//!     .and(Clause::regex(Field::Vendor, "avm").into());
//!
//! assert_eq!(query.clauses().len(), 2);
//! ```
//!
//! ## Pagination
//!
//! ```
//! use firmscope_persistence::types::PageRequest;
//!
//! let page = PageRequest::new(3, 20).unwrap();
//! assert_eq!(page.offset(), 40);
//! ```

mod pagination;
mod query;
mod record;

pub use pagination::{PageRequest, SearchResultPage};
pub use query::{Clause, Field, HASH_FIELD_PREFIX, Predicate, Query, REGEX_OPTIONS};
pub use record::{FirmwareRecord, MetaEntry, RecordKind};
