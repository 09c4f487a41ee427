//! Binary pattern (YARA) search.
//!
//! Binary searches run asynchronously in the analysis back end. The search
//! front submits a rule set, receives a request id and polls for the result.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::StorageResult;

/// State of a submitted binary search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinarySearchStatus {
    /// The search has not finished yet.
    Pending,

    /// The search failed in the back end.
    Failed {
        /// Error reported by the back end.
        message: String,
    },

    /// The search finished.
    Completed {
        /// Matching uids keyed by rule name.
        matches: BTreeMap<String, Vec<String>>,
        /// The rule set that was searched for.
        rules: Vec<u8>,
    },
}

/// Task queue binding for binary pattern searches.
#[async_trait]
pub trait BinarySearchService: Send + Sync {
    /// Checks that `rules` is a compilable rule set.
    ///
    /// Returns a human-readable reason on failure.
    fn check_rules(&self, rules: &[u8]) -> Result<(), String>;

    /// Submits a search, optionally restricted to one firmware image, and
    /// returns the request id.
    async fn submit(&self, rules: Vec<u8>, firmware_uid: Option<String>) -> StorageResult<String>;

    /// Returns the state of a submitted search.
    ///
    /// # Errors
    ///
    /// * `BackendError::UnknownRequest` - If the request id was never issued
    async fn result(&self, request_id: &str) -> StorageResult<BinarySearchStatus>;
}
