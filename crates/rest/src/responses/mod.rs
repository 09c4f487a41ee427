//! Response building for the search API.
//!
//! - [`redirect`] - `303 See Other` redirects between the search routes
//! - [`results`] - JSON bodies of the search routes

pub mod redirect;
pub mod results;

pub use redirect::{analysis_url, browse_url, see_other, url_with_params};
pub use results::{
    AdvancedSearchResponse, BinarySearchResultResponse, BrowseResponse, PaginationInfo,
    SearchFormResponse,
};
