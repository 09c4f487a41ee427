//! Quick search handler.

use axum::{extract::State, response::Response};
use firmscope_persistence::core::{Catalog, SearchBackend};
use tracing::debug;

use crate::error::RestResult;
use crate::extractors::RequestArgs;
use crate::responses::{browse_url, see_other};
use crate::state::AppState;

/// Handler for the quick search box.
///
/// The `search_term` is matched against every configured hash and, as a
/// pattern, against device name, vendor and file name.
///
/// # HTTP Request
///
/// `GET [base]/database/quick_search?search_term=...`
///
/// # Response
///
/// - `303 See Other` - To the browse route carrying the query
/// - `400 Bad Request` - "Search string not found" if nothing usable was given
pub async fn quick_search_handler<S>(
    State(state): State<AppState<S>>,
    args: RequestArgs,
) -> RestResult<Response>
where
    S: SearchBackend + Catalog,
{
    let query = state
        .composer()
        .build_quick_search_query(args.get("search_term"))?;
    debug!(%query, "Processing quick search");

    Ok(see_other(&browse_url(&query, None)))
}
