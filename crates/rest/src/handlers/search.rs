//! Basic search handlers.
//!
//! - `GET /database/search` - Values for the search form
//! - `POST /database/search` - Submit the form, redirects to browse

use axum::{
    Form, Json,
    extract::State,
    response::{IntoResponse, Response},
};
use firmscope_persistence::core::{Catalog, SearchBackend};
use tracing::debug;

use crate::composer::SearchForm;
use crate::error::RestResult;
use crate::responses::{SearchFormResponse, browse_url, see_other};
use crate::state::AppState;

/// Handler for the search form.
///
/// # HTTP Request
///
/// `GET [base]/database/search`
///
/// # Response
///
/// Returns the known device classes and vendors.
pub async fn search_form_handler<S>(State(state): State<AppState<S>>) -> RestResult<Response>
where
    S: SearchBackend + Catalog,
{
    let body = SearchFormResponse {
        device_classes: state.storage().device_classes().await?,
        vendors: state.storage().vendors().await?,
    };
    Ok(Json(body).into_response())
}

/// Handler for a submitted search form.
///
/// # HTTP Request
///
/// `POST [base]/database/search` with a form-encoded body
///
/// # Response
///
/// `303 See Other` to the browse route carrying the composed query.
pub async fn search_submit_handler<S>(
    State(state): State<AppState<S>>,
    Form(form): Form<SearchForm>,
) -> Response
where
    S: SearchBackend + Catalog,
{
    let query = state.composer().build_query_from_form(&form);
    debug!(%query, "Processing search form");

    see_other(&browse_url(&query, None))
}
