//! HTTP request handlers for the database search routes.
//!
//! - [`browse`] - Paginated result lists
//! - [`search`] - Basic search form
//! - [`quick_search`] - Free-text search box
//! - [`advanced_search`] - Raw JSON queries
//! - [`binary_search`] - YARA rule searches and their results
//! - [`health`] - Health check endpoints

pub mod advanced_search;
pub mod binary_search;
pub mod browse;
pub mod health;
pub mod quick_search;
pub mod search;

// Re-export handlers for convenience
pub use advanced_search::{advanced_search_form_handler, advanced_search_submit_handler};
pub use binary_search::{binary_search_handler, binary_search_results_handler};
pub use browse::browse_handler;
pub use health::{health_handler, liveness_handler, readiness_handler};
pub use quick_search::quick_search_handler;
pub use search::{search_form_handler, search_submit_handler};
