//! Search API test harness.

use std::sync::Arc;

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::{Next, from_fn},
    response::Response,
};
use axum_test::{TestResponse, TestServer};
use firmscope_persistence::backends::memory::{InMemoryBackend, InMemoryBinarySearch};
use firmscope_persistence::core::BinarySearchService;
use firmscope_persistence::types::FirmwareRecord;
use firmscope_rest::ServerConfig;
use firmscope_rest::middleware::{Principal, Privilege};

use super::fixtures;

/// Header carrying the comma-separated privileges of the test principal.
pub const PRINCIPAL_HEADER: HeaderName = HeaderName::from_static("x-test-privileges");

/// Test harness wrapping a server over the fixture records.
pub struct SearchTestHarness {
    /// The test server instance.
    pub server: TestServer,

    /// The binary search queue behind the server.
    pub binary_search: Arc<InMemoryBinarySearch>,
}

impl SearchTestHarness {
    /// Creates a harness with the testing configuration.
    pub fn new() -> Self {
        Self::with_config(ServerConfig::for_testing())
    }

    /// Creates a harness with search privileges enforced.
    pub fn with_auth() -> Self {
        Self::with_config(ServerConfig {
            enable_auth: true,
            ..ServerConfig::for_testing()
        })
    }

    /// Creates a harness with the given configuration.
    pub fn with_config(config: ServerConfig) -> Self {
        Self::with_records(fixtures::records(), config)
    }

    /// Creates a harness serving `records` instead of the fixtures.
    pub fn with_records(records: Vec<FirmwareRecord>, config: ServerConfig) -> Self {
        let backend = InMemoryBackend::with_records(records);
        let binary_search = Arc::new(InMemoryBinarySearch::new());

        let app = firmscope_rest::create_app_with_config(
            backend,
            Arc::clone(&binary_search) as Arc<dyn BinarySearchService>,
            config,
        )
        .layer(from_fn(test_principal));

        let server = TestServer::new(app).expect("Failed to create test server");

        Self {
            server,
            binary_search,
        }
    }

    /// Makes a GET request with query parameters.
    pub async fn get(&self, path: &str, params: &[(&str, &str)]) -> TestResponse {
        let mut request = self.server.get(path);
        for (key, value) in params {
            request = request.add_query_param(key, value);
        }
        request.await
    }

    /// Makes a form-encoded POST request.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> TestResponse {
        self.server.post(path).form(&form).await
    }

    /// Makes a GET request as a principal holding `privileges`.
    pub async fn get_as(&self, path: &str, privileges: &'static str) -> TestResponse {
        self.server
            .get(path)
            .add_header(PRINCIPAL_HEADER, HeaderValue::from_static(privileges))
            .await
    }
}

/// Returns the decoded `query` parameter of a redirect target.
pub fn redirect_query(response: &TestResponse) -> Vec<(String, String)> {
    let location = response.header("location");
    let location = location.to_str().expect("ASCII location");
    let (_, params) = location.split_once('?').unwrap_or((location, ""));
    url::form_urlencoded::parse(params.as_bytes())
        .into_owned()
        .collect()
}

/// Stands in for the authentication layer: turns the test header into a
/// [`Principal`].
async fn test_principal(mut request: Request, next: Next) -> Response {
    let principal = request
        .headers()
        .get(&PRINCIPAL_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|value| {
            value
                .split(',')
                .filter_map(|name| name.trim().parse::<Privilege>().ok())
                .fold(Principal::new("tester"), Principal::with_privilege)
        });
    if let Some(principal) = principal {
        request.extensions_mut().insert(principal);
    }
    next.run(request).await
}
