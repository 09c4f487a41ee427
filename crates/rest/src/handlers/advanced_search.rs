//! Advanced search handlers.
//!
//! Advanced search accepts a raw JSON query:
//! - `GET /database/advanced_search` - Searchable fields
//! - `POST /database/advanced_search` - Submit a query, redirects to browse

use axum::{
    Form, Json,
    extract::State,
    response::{IntoResponse, Response},
};
use firmscope_persistence::core::{Catalog, SearchBackend};
use firmscope_persistence::types::Field;
use serde::Deserialize;
use tracing::debug;

use crate::error::RestResult;
use crate::responses::{AdvancedSearchResponse, browse_url, see_other};
use crate::state::AppState;

/// Form body of an advanced search.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AdvancedSearchForm {
    /// The JSON query.
    pub advanced_search: String,
    /// Present when the "only firmwares" checkbox is ticked.
    pub only_firmwares: Option<String>,
}

/// Handler listing the fields an advanced query can use.
///
/// # HTTP Request
///
/// `GET [base]/database/advanced_search`
pub async fn advanced_search_form_handler<S>(State(state): State<AppState<S>>) -> Response
where
    S: SearchBackend + Catalog,
{
    let body = AdvancedSearchResponse {
        fields: Field::ATTRIBUTES
            .iter()
            .map(|field| field.path().into_owned())
            .collect(),
        hash_fields: state
            .composer()
            .hash_algorithms()
            .iter()
            .map(|algorithm| Field::hash(algorithm.as_str()).path().into_owned())
            .collect(),
    };
    Json(body).into_response()
}

/// Handler for a submitted advanced search.
///
/// # HTTP Request
///
/// `POST [base]/database/advanced_search` with a form-encoded body
///
/// # Response
///
/// - `303 See Other` - To the browse route carrying the query
/// - `400 Bad Request` - If the text is not a JSON object or not a valid query
pub async fn advanced_search_submit_handler<S>(
    State(state): State<AppState<S>>,
    Form(form): Form<AdvancedSearchForm>,
) -> RestResult<Response>
where
    S: SearchBackend + Catalog,
{
    let query = state
        .composer()
        .parse_advanced_query(&form.advanced_search)?;
    let only_firmwares = form.only_firmwares.is_some();
    debug!(%query, only_firmwares, "Processing advanced search");

    Ok(see_other(&browse_url(&query, Some(only_firmwares))))
}
