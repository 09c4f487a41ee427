//! Search backend trait.
//!
//! [`SearchBackend`] is narrow: counting and fetching the records
//! selected by a [`Query`]. Facets, lookups and binary pattern search live in
//! the [`Catalog`](super::Catalog) and
//! [`BinarySearchService`](super::BinarySearchService) traits.

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::types::{MetaEntry, Query};

/// Executes search queries against the firmware database.
///
/// # Semantics
///
/// - [`Query::Empty`] matches every firmware image.
/// - `only_parent_of_match` replaces every matching file by the firmware
///   images it was found in, so that only top-level records are returned.
/// - A `limit` of `0` means "no limit", not "no results".
///
/// # Example
///
/// ```ignore
/// use firmscope_persistence::core::SearchBackend;
/// use firmscope_persistence::types::{Clause, Field, Query};
///
/// async fn routers<B: SearchBackend>(backend: &B) -> StorageResult<()> {
///     let query = Query::from(Clause::exact(Field::DeviceClass, "Router"));
///
///     let total = backend.count(&query, false).await?;
///     let first_page = backend.search(&query, 0, 10, false).await?;
///
///     for entry in first_page {
///         println!("{} of {}: {}", entry.uid, total, entry.label);
///     }
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Returns a human-readable name for this backend.
    fn backend_name(&self) -> &'static str;

    /// Counts the records selected by the query.
    ///
    /// # Errors
    ///
    /// * `StorageError::Backend` - If the backend cannot evaluate the query
    async fn count(&self, query: &Query, only_parent_of_match: bool) -> StorageResult<u64>;

    /// Returns the records selected by the query, skipping `offset` records
    /// and returning at most `limit` (`0` for all).
    ///
    /// # Errors
    ///
    /// * `StorageError::Backend` - If the backend cannot evaluate the query
    async fn search(
        &self,
        query: &Query,
        offset: usize,
        limit: usize,
        only_parent_of_match: bool,
    ) -> StorageResult<Vec<MetaEntry>>;
}
