//! Errors raised while composing a search.

use firmscope_persistence::{QueryError, StorageError};
use thiserror::Error;

/// Errors produced by the [`QueryComposer`](super::QueryComposer).
#[derive(Error, Debug)]
pub enum ComposeError {
    /// A `date` filter did not have the `<Month> <Year>` shape.
    ///
    /// The composer recovers from this by dropping the filter; it never
    /// reaches a caller of the public operations.
    #[error("malformed date filter '{value}'")]
    MalformedDate {
        /// The rejected date text.
        value: String,
    },

    /// User input was empty after sanitizing.
    #[error("{message}")]
    InvalidInput {
        /// Message shown to the user.
        message: String,
    },

    /// A query parameter could not be decoded.
    #[error("invalid search query: {0}")]
    InvalidQuery(#[from] QueryError),

    /// `page` or `per_page` is not a positive integer.
    #[error("invalid value '{value}' for {parameter}: expected a positive integer")]
    InvalidPagination {
        /// The offending parameter name.
        parameter: &'static str,
        /// The rejected value.
        value: String,
    },

    /// `page` and `per_page` are valid on their own, but the page starts
    /// beyond any representable offset.
    #[error("page {page} with {per_page} results per page is out of range")]
    PageOutOfRange {
        /// The requested page.
        page: usize,
        /// The effective page size.
        per_page: usize,
    },

    /// The search backend failed.
    #[error("Could not query database: {0}")]
    Backend(#[from] StorageError),
}
