//! Pagination types for search results.
//!
//! Search results are paged by offset: page `n` of size `per_page` starts at
//! `(n - 1) * per_page`.

use serde::Serialize;

use super::record::MetaEntry;

/// A validated page request.
///
/// Constructed once per incoming request and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    /// 1-based page number.
    page: usize,
    /// Number of items per page.
    per_page: usize,
    /// Number of items to skip.
    offset: usize,
}

impl PageRequest {
    /// Creates a page request.
    ///
    /// Returns `None` if `page` or `per_page` is zero or the offset does not
    /// fit in a `usize`.
    pub fn new(page: usize, per_page: usize) -> Option<Self> {
        if page == 0 || per_page == 0 {
            return None;
        }
        let offset = (page - 1).checked_mul(per_page)?;
        Some(Self {
            page,
            per_page,
            offset,
        })
    }

    /// Creates the first page with the given size.
    pub fn first(per_page: usize) -> Option<Self> {
        Self::new(1, per_page)
    }

    /// Returns the page number (1-based).
    pub fn page(&self) -> usize {
        self.page
    }

    /// Returns the page size.
    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// Returns the number of items skipped before this page.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the number of pages needed for `total` items.
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.per_page as u64)
    }

    /// Returns `true` if items remain after this page.
    pub fn has_next(&self, total: u64) -> bool {
        (self.offset as u64).saturating_add(self.per_page as u64) < total
    }

    /// Returns `true` if this is not the first page.
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResultPage {
    /// The entries on this page.
    pub items: Vec<MetaEntry>,

    /// Total number of matches across all pages.
    pub total_count: u64,
}

impl SearchResultPage {
    /// Creates a result page.
    pub fn new(items: Vec<MetaEntry>, total_count: u64) -> Self {
        Self { items, total_count }
    }

    /// Returns true if this page has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items in this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns the single entry if the page holds exactly one.
    pub fn single(&self) -> Option<&MetaEntry> {
        match self.items.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// Sorts the entries by label, ignoring case.
    pub fn sort_by_label(&mut self) {
        self.items.sort_by_cached_key(|entry| entry.label.to_lowercase());
    }
}
