//! # firmscope-rest - Firmware Database Search API
//!
//! This crate serves the database search routes of the firmware analysis
//! platform. It turns form fields, query-string filters, free-text terms and
//! raw JSON into [`Query`](firmscope_persistence::types::Query) values, runs
//! them against a [`SearchBackend`] one page at a time, and forwards binary
//! pattern (YARA) searches to a [`BinarySearchService`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use firmscope_persistence::backends::memory::{InMemoryBackend, InMemoryBinarySearch};
//! use firmscope_rest::{create_app_with_config, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = InMemoryBackend::load_records("firmware.json")?;
//!     let config = ServerConfig::default();
//!
//!     let app = create_app_with_config(backend, Arc::new(InMemoryBinarySearch::new()), config);
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## API Endpoints
//!
//! | Route | HTTP Method | Privilege |
//! |-------|-------------|-----------|
//! | `/database/browse` | GET | basic_search |
//! | `/database/search` | GET/POST | basic_search |
//! | `/database/quick_search` | GET | basic_search |
//! | `/database/advanced_search` | GET/POST | advanced_search |
//! | `/database/binary_search` | POST | pattern_search |
//! | `/database/binary_search_results` | GET | pattern_search |
//! | `/health` | GET | - |
//!
//! Submitting a search answers `303 See Other` with the browse URL carrying
//! the composed query as JSON, so result pages can be bookmarked and paged.
//!
//! ## Error Handling
//!
//! Errors are returned as JSON with the matching HTTP status, see [`error`].
//!
//! ## Architecture
//!
//! - [`composer`] - Query composition, date ranges, sanitizing, pagination
//! - [`config`] - Server configuration
//! - [`error`] - Error types and error bodies
//! - [`state`] - Application state (backend, binary search, composer, configuration)
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Privilege checks
//! - [`extractors`] - Query-string extraction
//! - [`responses`] - Redirects and response bodies
//! - [`routing`] - Route configuration

// Enforce documentation
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod composer;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod responses;
pub mod routing;
pub mod state;

// Re-export commonly used types
pub use composer::{ComposeError, QueryComposer, SearchForm};
pub use config::ServerConfig;
pub use error::{RestError, RestResult};
pub use state::AppState;

use std::sync::Arc;

use axum::Router;
use firmscope_persistence::core::{BinarySearchService, Catalog, SearchBackend};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Creates the Axum application with default configuration.
///
/// For more control, use [`create_app_with_config`].
///
/// # Arguments
///
/// * `storage` - The database backend
/// * `binary_search` - The binary search task queue
pub fn create_app<S>(storage: S, binary_search: Arc<dyn BinarySearchService>) -> Router
where
    S: SearchBackend + Catalog + 'static,
{
    create_app_with_config(storage, binary_search, ServerConfig::default())
}

/// Creates the Axum application with custom configuration.
///
/// # Arguments
///
/// * `storage` - The database backend
/// * `binary_search` - The binary search task queue
/// * `config` - Server configuration
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
///
/// use firmscope_persistence::backends::memory::{InMemoryBackend, InMemoryBinarySearch};
/// use firmscope_rest::{create_app_with_config, ServerConfig};
///
/// let config = ServerConfig {
///     results_per_page: 25,
///     enable_auth: true,
///     ..Default::default()
/// };
/// let app = create_app_with_config(
///     InMemoryBackend::new(),
///     Arc::new(InMemoryBinarySearch::new()),
///     config,
/// );
/// ```
pub fn create_app_with_config<S>(
    storage: S,
    binary_search: Arc<dyn BinarySearchService>,
    config: ServerConfig,
) -> Router
where
    S: SearchBackend + Catalog + 'static,
{
    info!(
        backend = storage.backend_name(),
        auth = config.enable_auth,
        "Creating search API server"
    );

    let state = AppState::new(Arc::new(storage), binary_search, config.clone());

    let router = routing::create_routes(state);

    // Build middleware stack
    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::REQUEST_TIMEOUT,
            std::time::Duration::from_secs(config.request_timeout),
        ));

    let router = if config.enable_cors {
        router.layer(build_cors_layer(&config))
    } else {
        router
    };

    router.layer(service_builder)
}

/// Builds the CORS layer based on configuration.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let mut cors = CorsLayer::new();

    if config.cors_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    if config.cors_methods == "*" {
        cors = cors.allow_methods(Any);
    } else {
        let methods: Vec<_> = config
            .cors_methods
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_methods(methods);
    }

    if config.cors_headers == "*" {
        cors = cors.allow_headers(Any);
    } else {
        let headers: Vec<_> = config
            .cors_headers
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_headers(headers);
    }

    cors
}

/// Initializes the tracing subscriber for logging.
///
/// This should be called once at application startup. `RUST_LOG` takes
/// precedence over `level`.
///
/// # Arguments
///
/// * `level` - The log level (error, warn, info, debug, trace)
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "firmscope_rest={level},firmscope_persistence={level},tower_http=debug"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

