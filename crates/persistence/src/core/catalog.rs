//! Catalog lookups that sit next to search.

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::types::MetaEntry;

/// Facet lists and direct record lookups.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Returns the distinct device classes of all firmware images, sorted.
    async fn device_classes(&self) -> StorageResult<Vec<String>>;

    /// Returns the distinct vendors of all firmware images, sorted.
    async fn vendors(&self) -> StorageResult<Vec<String>>;

    /// Returns `true` if `uid` names a firmware image.
    async fn is_firmware(&self, uid: &str) -> StorageResult<bool>;

    /// Resolves uids to result rows. Unknown uids are skipped.
    async fn meta_entries(&self, uids: &[String]) -> StorageResult<Vec<MetaEntry>>;
}
