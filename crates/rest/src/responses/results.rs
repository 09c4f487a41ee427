//! JSON bodies of the search routes.

use std::collections::BTreeMap;

use firmscope_persistence::types::{MetaEntry, PageRequest, Query, SearchResultPage};
use serde::Serialize;

/// Body of a browse response.
#[derive(Debug, Clone, Serialize)]
pub struct BrowseResponse {
    /// The query that was run, in wire form.
    pub query: Query,
    /// Whether results were restricted to firmware images.
    pub only_firmwares: bool,
    /// Pagination of the result list.
    pub pagination: PaginationInfo,
    /// The entries on this page, sorted by label.
    pub firmwares: Vec<MetaEntry>,
    /// Known device classes, for the filter controls.
    pub device_classes: Vec<String>,
    /// Known vendors, for the filter controls.
    pub vendors: Vec<String>,
    /// The `device_class` filter of the request.
    pub current_class: Option<String>,
    /// The `vendor` filter of the request.
    pub current_vendor: Option<String>,
}

/// Pagination details of a result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationInfo {
    /// 1-based page number.
    pub page: usize,
    /// Page size.
    pub per_page: usize,
    /// Total number of matches.
    pub total: u64,
    /// Number of pages.
    pub total_pages: u64,
    /// Whether a following page exists.
    pub has_next: bool,
    /// Whether a preceding page exists.
    pub has_previous: bool,
}

impl PaginationInfo {
    /// Describes a result page.
    pub fn new(request: &PageRequest, page: &SearchResultPage) -> Self {
        Self {
            page: request.page(),
            per_page: request.per_page(),
            total: page.total_count,
            total_pages: request.total_pages(page.total_count),
            has_next: request.has_next(page.total_count),
            has_previous: request.has_previous(),
        }
    }
}

/// Body of the search form route.
#[derive(Debug, Clone, Serialize)]
pub struct SearchFormResponse {
    /// Known device classes.
    pub device_classes: Vec<String>,
    /// Known vendors.
    pub vendors: Vec<String>,
}

/// Body of the advanced search form route.
#[derive(Debug, Clone, Serialize)]
pub struct AdvancedSearchResponse {
    /// Searchable attribute paths.
    pub fields: Vec<String>,
    /// Hash fields searchable by digest.
    pub hash_fields: Vec<String>,
}

/// Body of the binary search results route.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BinarySearchResultResponse {
    /// The search is still running.
    Pending {
        /// Id of the search request.
        request_id: String,
    },
    /// The search failed.
    Failed {
        /// Id of the search request.
        request_id: String,
        /// Error reported by the task queue.
        error: String,
    },
    /// The search finished.
    Completed {
        /// Id of the search request.
        request_id: String,
        /// Matching records per rule, sorted.
        result: BTreeMap<String, Vec<MetaEntry>>,
        /// The rules that were searched for.
        yara_rules: String,
    },
}
