//! Database search route configuration.
//!
//! Routes are grouped by the privilege they require.

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use firmscope_persistence::core::{Catalog, SearchBackend};

use crate::handlers;
use crate::middleware::{Privilege, PrivilegeGuard, require_privilege};
use crate::state::AppState;

/// Creates all search API routes.
///
/// # Routes
///
/// ## Unguarded
/// - `GET /health` - Health check
/// - `GET /_liveness` - Liveness probe
/// - `GET /_readiness` - Readiness probe
///
/// ## Basic search
/// - `GET /database/browse` - Paginated results
/// - `GET /database/search` - Search form values
/// - `POST /database/search` - Submit the search form
/// - `GET /database/quick_search` - Quick search
///
/// ## Advanced search
/// - `GET /database/advanced_search` - Searchable fields
/// - `POST /database/advanced_search` - Submit a JSON query
///
/// ## Pattern search
/// - `POST /database/binary_search` - Submit YARA rules
/// - `GET /database/binary_search_results` - Poll results
pub fn create_routes<S>(state: AppState<S>) -> Router
where
    S: SearchBackend + Catalog + 'static,
{
    let auth = state.auth_enabled();

    let basic_search = Router::new()
        .route("/database/browse", get(handlers::browse_handler::<S>))
        .route(
            "/database/search",
            get(handlers::search_form_handler::<S>).post(handlers::search_submit_handler::<S>),
        )
        .route(
            "/database/quick_search",
            get(handlers::quick_search_handler::<S>),
        )
        .route_layer(from_fn_with_state(
            PrivilegeGuard::new(Privilege::BasicSearch, auth),
            require_privilege,
        ));

    let advanced_search = Router::new()
        .route(
            "/database/advanced_search",
            get(handlers::advanced_search_form_handler::<S>)
                .post(handlers::advanced_search_submit_handler::<S>),
        )
        .route_layer(from_fn_with_state(
            PrivilegeGuard::new(Privilege::AdvancedSearch, auth),
            require_privilege,
        ));

    let pattern_search = Router::new()
        .route(
            "/database/binary_search",
            post(handlers::binary_search_handler::<S>),
        )
        .route(
            "/database/binary_search_results",
            get(handlers::binary_search_results_handler::<S>),
        )
        .route_layer(from_fn_with_state(
            PrivilegeGuard::new(Privilege::PatternSearch, auth),
            require_privilege,
        ));

    Router::new()
        .route("/health", get(handlers::health_handler::<S>))
        .route("/_liveness", get(handlers::liveness_handler))
        .route("/_readiness", get(handlers::readiness_handler::<S>))
        .merge(basic_search)
        .merge(advanced_search)
        .merge(pattern_search)
        .with_state(state)
}
