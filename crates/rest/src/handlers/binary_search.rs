//! Binary pattern (YARA) search handlers.
//!
//! - `POST /database/binary_search` - Submit rules, redirects to the results
//! - `GET /database/binary_search_results?request_id=...` - Poll for results

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use firmscope_persistence::core::{BinarySearchStatus, Catalog, SearchBackend};
use tracing::{debug, info};

use crate::error::{RestError, RestResult};
use crate::extractors::{BinarySearchForm, RequestArgs};
use crate::responses::redirect::BINARY_SEARCH_RESULTS_PATH;
use crate::responses::{BinarySearchResultResponse, see_other, url_with_params};
use crate::state::AppState;

/// Handler for submitting a binary search.
///
/// # HTTP Request
///
/// `POST [base]/database/binary_search` with a form-encoded or
/// `multipart/form-data` body. An uploaded `file` wins over `textarea`.
///
/// # Response
///
/// - `303 See Other` - To the results route with the request id
/// - `400 Bad Request` - Missing or invalid rules
/// - `404 Not Found` - Unknown `firmware_uid`
pub async fn binary_search_handler<S>(
    State(state): State<AppState<S>>,
    form: BinarySearchForm,
) -> RestResult<Response>
where
    S: SearchBackend + Catalog,
{
    let firmware_uid = form.firmware_uid();

    if let Some(uid) = &firmware_uid {
        if !state.storage().is_firmware(uid).await? {
            return Err(RestError::NotFound {
                message: format!("Error: Firmware with UID '{}' not found in database", uid),
            });
        }
    }

    let rules = form.rules().ok_or_else(|| RestError::BadRequest {
        message: "please select a file or enter rules in the text area".to_string(),
    })?;
    state
        .binary_search()
        .check_rules(&rules)
        .map_err(|reason| RestError::BadRequest {
            message: format!("Error in YARA rules: {}", reason),
        })?;

    let request_id = state.binary_search().submit(rules, firmware_uid).await?;
    info!(request_id = %request_id, "Submitted binary search");

    Ok(see_other(&url_with_params(
        BINARY_SEARCH_RESULTS_PATH,
        &[("request_id", request_id.as_str())],
    )))
}

/// Handler for binary search results.
///
/// # HTTP Request
///
/// `GET [base]/database/binary_search_results?request_id=...`
///
/// # Response
///
/// - `200 OK` - The state of the search; finished searches list the matching
///   records per rule
/// - `400 Bad Request` - "No request ID found"
/// - `404 Not Found` - Unknown request id
pub async fn binary_search_results_handler<S>(
    State(state): State<AppState<S>>,
    args: RequestArgs,
) -> RestResult<Response>
where
    S: SearchBackend + Catalog,
{
    let request_id = args
        .get("request_id")
        .ok_or_else(|| RestError::BadRequest {
            message: "No request ID found".to_string(),
        })?
        .to_string();
    debug!(request_id = %request_id, "Processing binary search results request");

    let body = match state.binary_search().result(&request_id).await? {
        BinarySearchStatus::Pending => BinarySearchResultResponse::Pending { request_id },
        BinarySearchStatus::Failed { message } => BinarySearchResultResponse::Failed {
            request_id,
            error: message,
        },
        BinarySearchStatus::Completed { matches, rules } => {
            let mut result = BTreeMap::new();
            for (rule, uids) in matches {
                let mut entries = state.storage().meta_entries(&uids).await?;
                entries.sort();
                result.insert(rule, entries);
            }
            BinarySearchResultResponse::Completed {
                request_id,
                result,
                yara_rules: String::from_utf8_lossy(&rules).into_owned(),
            }
        }
    };

    Ok(Json(body).into_response())
}
