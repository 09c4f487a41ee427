//! Error types for the persistence layer.
//!
//! This module defines all error types used throughout the persistence layer,
//! following a hierarchy that separates query decoding errors from errors
//! raised by the backend that executes the query.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The primary error type for all storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Query decoding and validation errors
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Backend-specific errors
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Errors raised while decoding or validating a search query.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The query text is not valid JSON.
    #[error("query is not valid JSON: {message}")]
    InvalidJson { message: String },

    /// The query decoded to something other than a JSON object.
    #[error("search query invalid (wrong type): expected an object, found {found}")]
    NotAnObject { found: String },

    /// The field is not part of the searchable attribute set.
    #[error("unknown search field: {field}")]
    UnknownField { field: String },

    /// The operator is not supported.
    #[error("unsupported operator '{operator}' on {field}")]
    UnsupportedOperator { field: String, operator: String },

    /// The value has a shape the field cannot be compared against.
    #[error("unsupported value for {field}: {message}")]
    UnsupportedValue { field: String, message: String },

    /// A compound clause carried no children.
    #[error("{operator} requires at least one clause")]
    EmptyCompound { operator: String },

    /// A date bound could not be decoded.
    #[error("invalid date '{value}' for {field}")]
    InvalidDate { field: String, value: String },
}

/// Errors originating from the database backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend is currently unavailable.
    #[error("backend unavailable: {backend_name}: {message}")]
    Unavailable {
        backend_name: String,
        message: String,
    },

    /// A regular expression in the query could not be compiled.
    #[error("invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// The binary search request id is not known to the task queue.
    #[error("unknown binary search request: {request_id}")]
    UnknownRequest { request_id: String },

    /// Reading or decoding a data file failed.
    #[error("failed to load records from {path}: {message}")]
    DataFile { path: String, message: String },

    /// Internal backend error.
    #[error("internal error in {backend_name}: {message}")]
    Internal {
        backend_name: String,
        message: String,
    },
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
