//! Browse handler.
//!
//! Lists the records selected by a query one page at a time:
//! - `GET /database/browse?query=...&page=...&per_page=...`
//!
//! A non-empty query with exactly one match redirects to that record's
//! analysis page instead.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use firmscope_persistence::core::{Catalog, SearchBackend};
use tracing::debug;

use crate::error::RestResult;
use crate::extractors::RequestArgs;
use crate::responses::{BrowseResponse, PaginationInfo, analysis_url, see_other};
use crate::state::AppState;

/// Handler for browsing the database.
///
/// # HTTP Request
///
/// `GET [base]/database/browse`
///
/// # Query Parameters
///
/// - `query` - JSON query, `{}` when absent
/// - `page`, `per_page` - Pagination
/// - `only_firmwares` - `True` to list parent firmware images only
/// - `date` - `<Month> <Year>` release date filter
/// - `device_class`, `vendor`, `device_name`, `file_name`, `version`,
///   `release_date`, `hash_value` - Attribute filters
///
/// # Response
///
/// - `200 OK` - A page of results
/// - `303 See Other` - To `/analysis/<uid>` if the query matched one record
/// - `400 Bad Request` - Undecodable query or invalid pagination
/// - `500 Internal Server Error` - The database could not be queried
pub async fn browse_handler<S>(
    State(state): State<AppState<S>>,
    args: RequestArgs,
) -> RestResult<Response>
where
    S: SearchBackend + Catalog,
{
    debug!(args = ?args, "Processing browse request");

    let composer = state.composer();
    let query = composer.compose_from_request_args("{}", &args)?;
    let outcome = composer
        .paginate_and_search(&query, &args, state.storage())
        .await?;

    if let Some(uid) = &outcome.redirect {
        debug!(uid = %uid, "Single match, redirecting to analysis page");
        return Ok(see_other(&analysis_url(uid)));
    }

    let device_classes = state.storage().device_classes().await?;
    let vendors = state.storage().vendors().await?;

    let body = BrowseResponse {
        pagination: PaginationInfo::new(&outcome.page_request, &outcome.page),
        only_firmwares: args.only_firmwares(),
        firmwares: outcome.page.items,
        query,
        device_classes,
        vendors,
        current_class: args.get("device_class").map(str::to_string),
        current_vendor: args.get("vendor").map(str::to_string),
    };

    Ok((StatusCode::OK, Json(body)).into_response())
}
