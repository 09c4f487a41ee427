//! Redirect responses.
//!
//! Search routes answer form submissions with `303 See Other` so that the
//! browser follows up with a `GET` on the browse route.

use axum::response::{IntoResponse, Redirect, Response};
use firmscope_persistence::types::Query;
use url::form_urlencoded;

/// Path of the browse route.
pub const BROWSE_PATH: &str = "/database/browse";

/// Path of the binary search results route.
pub const BINARY_SEARCH_RESULTS_PATH: &str = "/database/binary_search_results";

/// Builds `path?k=v&...` with form-urlencoded parameters.
pub fn url_with_params(path: &str, params: &[(&str, &str)]) -> String {
    if params.is_empty() {
        return path.to_string();
    }
    let encoded = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish();
    format!("{}?{}", path, encoded)
}

/// Returns the browse URL for a query.
///
/// `only_firmwares` is added as `True`/`False` when given.
pub fn browse_url(query: &Query, only_firmwares: Option<bool>) -> String {
    let query = query.to_json_string();
    let mut params = vec![("query", query.as_str())];
    if let Some(only_firmwares) = only_firmwares {
        params.push(("only_firmwares", if only_firmwares { "True" } else { "False" }));
    }
    url_with_params(BROWSE_PATH, &params)
}

/// Returns the analysis page URL of a record.
pub fn analysis_url(uid: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(uid.as_bytes()).collect();
    format!("/analysis/{}", encoded)
}

/// Responds with `303 See Other`.
pub fn see_other(location: &str) -> Response {
    Redirect::to(location).into_response()
}
