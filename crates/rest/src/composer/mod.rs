//! Search query composition and pagination.
//!
//! The [`QueryComposer`] turns the heterogeneous inputs of the search routes
//! (a raw query carried across a redirect, attribute filters, form fields, a
//! free-text term, a `<Month> <Year>` date) into one [`Query`], and runs it
//! against a [`SearchBackend`] one page at a time.
//!
//! # Example
//!
//! ```
//! use firmscope_rest::composer::{QueryComposer, SearchForm};
//!
//! let composer = QueryComposer::new(10, 1000, vec!["sha256".into(), "md5".into()]);
//! let form = SearchForm {
//!     device_class_dropdown: "Router".to_string(),
//!     vendor: "avm".to_string(),
//!     ..Default::default()
//! };
//!
//! let query = composer.build_query_from_form(&form);
//! assert_eq!(query.clauses().len(), 2);
//! ```

mod date;
mod error;
mod sanitize;

pub use date::{add_date_to_query, month_range};
pub use error::ComposeError;
pub use sanitize::filter_out_illegal_characters;

use firmscope_persistence::core::SearchBackend;
use firmscope_persistence::types::{Clause, Field, PageRequest, Query, SearchResultPage};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::ServerConfig;
use crate::extractors::RequestArgs;

/// Fields of the basic search form.
///
/// Every field is optional; empty strings are treated as absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchForm {
    /// Device class picked from the dropdown, matched exactly.
    pub device_class_dropdown: String,
    /// File name pattern.
    pub file_name: String,
    /// Vendor pattern.
    pub vendor: String,
    /// Device name pattern.
    pub device_name: String,
    /// Version pattern.
    pub version: String,
    /// Release date pattern.
    pub release_date: String,
    /// Digest matched against every configured hash algorithm.
    pub hash_value: String,
}

impl SearchForm {
    fn text_fields(&self) -> [(Field, &str); 5] {
        [
            (Field::FileName, self.file_name.as_str()),
            (Field::Vendor, self.vendor.as_str()),
            (Field::DeviceName, self.device_name.as_str()),
            (Field::Version, self.version.as_str()),
            (Field::ReleaseDate, self.release_date.as_str()),
        ]
    }
}

/// Result of [`QueryComposer::paginate_and_search`].
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// The page of results, sorted by label.
    pub page: SearchResultPage,
    /// The page that was requested.
    pub page_request: PageRequest,
    /// Uid of the only match, when the caller should show it directly.
    pub redirect: Option<String>,
}

/// Builds search queries from request input and pages through the results.
#[derive(Debug, Clone)]
pub struct QueryComposer {
    results_per_page: usize,
    max_results_per_page: usize,
    hash_algorithms: Vec<String>,
}

impl QueryComposer {
    /// Creates a composer.
    ///
    /// # Arguments
    ///
    /// * `results_per_page` - Page size used when `per_page` is not given
    /// * `max_results_per_page` - Upper bound applied to `per_page`
    /// * `hash_algorithms` - Algorithms searched for hash values, in order
    pub fn new(
        results_per_page: usize,
        max_results_per_page: usize,
        hash_algorithms: Vec<String>,
    ) -> Self {
        Self {
            results_per_page,
            max_results_per_page,
            hash_algorithms,
        }
    }

    /// Creates a composer from the server configuration.
    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(
            config.results_per_page,
            config.max_results_per_page,
            config.hash_algorithm_list(),
        )
    }

    /// Returns the configured hash algorithms.
    pub fn hash_algorithms(&self) -> &[String] {
        &self.hash_algorithms
    }

    /// Composes the query for a browse request.
    ///
    /// A `query` argument replaces `raw_query`. Attribute filters and a
    /// `hash_value` from the arguments are ANDed in first, then the `date`
    /// filter. A malformed date is ignored.
    ///
    /// # Errors
    ///
    /// * `ComposeError::InvalidQuery` - If the query text cannot be decoded
    pub fn compose_from_request_args(
        &self,
        raw_query: &str,
        args: &RequestArgs,
    ) -> Result<Query, ComposeError> {
        let text = args.get("query").unwrap_or(raw_query);
        let mut query = if text.trim().is_empty() {
            Query::Empty
        } else {
            Query::parse(text)?
        };

        for field in Field::ATTRIBUTES {
            if let Some(pattern) = args.get(&field.path()) {
                query = query.and(Clause::regex(field, pattern).into());
            }
        }
        if let Some(value) = args.get("hash_value") {
            query = self.and_hash_filter(query, value);
        }

        if let Some(date) = args.get("date") {
            query = add_date_to_query(query, date);
        }

        debug!(%query, "Composed search query");
        Ok(query)
    }

    /// Builds the query for a submitted search form.
    pub fn build_query_from_form(&self, form: &SearchForm) -> Query {
        let mut query = Query::Empty;

        if !form.device_class_dropdown.is_empty() {
            query = query.and(Clause::exact(Field::DeviceClass, &form.device_class_dropdown).into());
        }
        for (field, value) in form.text_fields() {
            if !value.is_empty() {
                query = query.and(Clause::regex(field, value).into());
            }
        }
        if !form.hash_value.is_empty() {
            query = self.and_hash_filter(query, &form.hash_value);
        }
        query
    }

    /// Builds the query for a quick search.
    ///
    /// The term is sanitized, then searched for as a digest of every
    /// configured hash algorithm and as a pattern on device name, vendor and
    /// file name. Any match qualifies.
    ///
    /// # Errors
    ///
    /// * `ComposeError::InvalidInput` - If nothing is left of the term after sanitizing
    pub fn build_quick_search_query(&self, search_term: Option<&str>) -> Result<Query, ComposeError> {
        let term = search_term
            .map(filter_out_illegal_characters)
            .filter(|term| !term.is_empty())
            .ok_or_else(|| ComposeError::InvalidInput {
                message: "Search string not found".to_string(),
            })?;

        let children = self
            .hash_clauses(&term)
            .chain(
                [Field::DeviceName, Field::Vendor, Field::FileName]
                    .into_iter()
                    .map(|field| Clause::regex(field, term.as_str()).into()),
            );
        // The pattern clauses guarantee at least one child.
        Ok(Query::any_of(children).unwrap_or_default())
    }

    /// Decodes the JSON text of an advanced search.
    ///
    /// # Errors
    ///
    /// * `ComposeError::InvalidQuery` - If the text is not a JSON object or not a valid query
    pub fn parse_advanced_query(&self, text: &str) -> Result<Query, ComposeError> {
        let query = Query::parse(text)?;
        debug!(%query, "Parsed advanced search query");
        Ok(query)
    }

    /// Derives the page request from `page` and `per_page`.
    ///
    /// `per_page` falls back to the configured default and is capped at the
    /// configured maximum.
    ///
    /// # Errors
    ///
    /// * `ComposeError::InvalidPagination` - If either value is not a positive integer
    /// * `ComposeError::PageOutOfRange` - If the page offset overflows
    pub fn page_request(&self, args: &RequestArgs) -> Result<PageRequest, ComposeError> {
        let page = positive_arg(args, "page")?.unwrap_or(1);
        let per_page = positive_arg(args, "per_page")?
            .unwrap_or(self.results_per_page)
            .min(self.max_results_per_page);

        PageRequest::new(page, per_page).ok_or(ComposeError::PageOutOfRange { page, per_page })
    }

    /// Runs the query and returns one page of results.
    ///
    /// `only_firmwares=True` restricts the results to firmware images. The
    /// page is sorted by label, ignoring case. When a non-empty query yields
    /// exactly one entry, its uid is returned as the redirect target.
    ///
    /// # Errors
    ///
    /// * `ComposeError::InvalidPagination` - If `page` or `per_page` is invalid
    /// * `ComposeError::Backend` - If the search backend fails
    pub async fn paginate_and_search<B>(
        &self,
        query: &Query,
        args: &RequestArgs,
        backend: &B,
    ) -> Result<SearchOutcome, ComposeError>
    where
        B: SearchBackend + ?Sized,
    {
        let page_request = self.page_request(args)?;
        let only_parent_of_match = args.only_firmwares();

        let total_count = backend.count(query, only_parent_of_match).await?;
        let items = backend
            .search(
                query,
                page_request.offset(),
                page_request.per_page(),
                only_parent_of_match,
            )
            .await?;

        let mut page = SearchResultPage::new(items, total_count);
        page.sort_by_label();

        let redirect = if query.is_empty() {
            None
        } else {
            page.single().map(|entry| entry.uid.clone())
        };

        debug!(
            backend = backend.backend_name(),
            page = page_request.page(),
            per_page = page_request.per_page(),
            total_count,
            "Search finished"
        );
        Ok(SearchOutcome {
            page,
            page_request,
            redirect,
        })
    }

    fn hash_clauses<'a>(&'a self, value: &'a str) -> impl Iterator<Item = Query> + 'a {
        self.hash_algorithms
            .iter()
            .map(move |algorithm| Clause::exact(Field::hash(algorithm.as_str()), value).into())
    }

    fn and_hash_filter(&self, query: Query, value: &str) -> Query {
        match Query::any_of(self.hash_clauses(value)) {
            Some(hashes) => query.and(hashes),
            None => {
                warn!("No hash algorithms configured, ignoring hash filter");
                query
            }
        }
    }
}

fn positive_arg(args: &RequestArgs, parameter: &'static str) -> Result<Option<usize>, ComposeError> {
    let Some(value) = args.get(parameter) else {
        return Ok(None);
    };
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(Some(n)),
        _ => Err(ComposeError::InvalidPagination {
            parameter,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use firmscope_persistence::error::{BackendError, StorageResult};
    use firmscope_persistence::types::{MetaEntry, Predicate};
    use parking_lot::Mutex;

    fn composer() -> QueryComposer {
        QueryComposer::new(10, 100, vec!["sha256".to_string(), "md5".to_string()])
    }

    fn args(pairs: &[(&str, &str)]) -> RequestArgs {
        RequestArgs::new(pairs.iter().copied())
    }

    /// Backend returning canned entries and recording its calls.
    #[derive(Default)]
    struct StubBackend {
        entries: Vec<MetaEntry>,
        calls: Mutex<Vec<(usize, usize, bool)>>,
        fail: bool,
    }

    impl StubBackend {
        fn with_labels(labels: &[&str]) -> Self {
            Self {
                entries: labels
                    .iter()
                    .enumerate()
                    .map(|(i, label)| MetaEntry::new(format!("uid-{i}"), *label))
                    .collect(),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl SearchBackend for StubBackend {
        fn backend_name(&self) -> &'static str {
            "stub"
        }

        async fn count(&self, _query: &Query, _only_parent_of_match: bool) -> StorageResult<u64> {
            if self.fail {
                return Err(BackendError::Unavailable {
                    backend_name: "stub".to_string(),
                    message: "connection refused".to_string(),
                }
                .into());
            }
            Ok(self.entries.len() as u64)
        }

        async fn search(
            &self,
            _query: &Query,
            offset: usize,
            limit: usize,
            only_parent_of_match: bool,
        ) -> StorageResult<Vec<MetaEntry>> {
            self.calls.lock().push((offset, limit, only_parent_of_match));
            Ok(self.entries.clone())
        }
    }

    fn exact_values<'a>(query: &'a Query, field: &Field) -> Vec<&'a str> {
        query
            .clauses()
            .into_iter()
            .filter(|c| &c.field == field)
            .filter_map(|c| match &c.predicate {
                Predicate::Exact(v) => Some(v.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_form_device_class_is_exact() {
        let form = SearchForm {
            device_class_dropdown: "Router".to_string(),
            ..Default::default()
        };
        let query = composer().build_query_from_form(&form);
        assert_eq!(query, Query::from(Clause::exact(Field::DeviceClass, "Router")));
        assert_eq!(exact_values(&query, &Field::DeviceClass), vec!["Router"]);
    }

    #[test]
    fn test_form_text_fields_are_regex() {
        let form = SearchForm {
            vendor: "acme".to_string(),
            version: "1.0".to_string(),
            ..Default::default()
        };
        let query = composer().build_query_from_form(&form);
        let expected = Query::from(Clause::regex(Field::Vendor, "acme"))
            .and(Clause::regex(Field::Version, "1.0").into());
        assert!(query.is_equivalent(&expected));
    }

    #[test]
    fn test_form_hash_value_expands_per_algorithm() {
        let form = SearchForm {
            hash_value: "deadbeef".to_string(),
            vendor: "acme".to_string(),
            ..Default::default()
        };
        let query = composer().build_query_from_form(&form);

        let Query::And(children) = &query else {
            panic!("expected a conjunction, got {query:?}");
        };
        let hashes = children
            .iter()
            .find_map(|c| match c {
                Query::Or(inner) => Some(inner),
                _ => None,
            })
            .unwrap();
        assert_eq!(hashes.len(), 2);
        assert_eq!(exact_values(&query, &Field::hash("sha256")), vec!["deadbeef"]);
        assert_eq!(exact_values(&query, &Field::hash("md5")), vec!["deadbeef"]);
    }

    #[test]
    fn test_form_hash_value_without_algorithms_is_skipped() {
        let composer = QueryComposer::new(10, 100, Vec::new());
        let form = SearchForm {
            hash_value: "deadbeef".to_string(),
            ..Default::default()
        };
        assert_eq!(composer.build_query_from_form(&form), Query::Empty);
    }

    #[test]
    fn test_empty_form_is_empty_query() {
        let query = composer().build_query_from_form(&SearchForm::default());
        assert!(query.is_empty());
        assert_eq!(query.to_json_string(), "{}");
    }

    #[test]
    fn test_compose_keeps_raw_query() {
        let query = composer()
            .compose_from_request_args(r#"{"vendor": "AVM"}"#, &RequestArgs::default())
            .unwrap();
        assert_eq!(query, Query::from(Clause::exact(Field::Vendor, "AVM")));
    }

    #[test]
    fn test_compose_query_argument_overrides_raw_query() {
        let query = composer()
            .compose_from_request_args(
                r#"{"vendor": "AVM"}"#,
                &args(&[("query", r#"{"device_class": "Router"}"#)]),
            )
            .unwrap();
        assert_eq!(query, Query::from(Clause::exact(Field::DeviceClass, "Router")));
    }

    #[test]
    fn test_compose_attribute_filters_are_regex() {
        let query = composer()
            .compose_from_request_args("{}", &args(&[("vendor", "acme"), ("device_class", "Router")]))
            .unwrap();
        let expected = Query::from(Clause::regex(Field::Vendor, "acme"))
            .and(Clause::regex(Field::DeviceClass, "Router").into());
        assert!(query.is_equivalent(&expected));
    }

    #[test]
    fn test_compose_date_filter() {
        let query = composer()
            .compose_from_request_args("{}", &args(&[("date", "January 2020")]))
            .unwrap();
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2020, 2, 1).unwrap();
        assert_eq!(query, Query::from(Clause::release_between(start, end)));
    }

    #[test]
    fn test_compose_malformed_date_is_ignored() {
        let query = composer()
            .compose_from_request_args(r#"{"vendor": "AVM"}"#, &args(&[("date", "not a date")]))
            .unwrap();
        assert_eq!(query, Query::from(Clause::exact(Field::Vendor, "AVM")));
    }

    #[test]
    fn test_compose_is_idempotent() {
        let composer = composer();
        let request = args(&[
            ("vendor", "acme"),
            ("hash_value", "abc"),
            ("date", "'March 1999'"),
        ]);
        let first = composer
            .compose_from_request_args(r#"{"device_class": "Router"}"#, &request)
            .unwrap();
        let second = composer
            .compose_from_request_args(&first.to_json_string(), &request)
            .unwrap();
        assert!(second.is_equivalent(&first));
    }

    #[test]
    fn test_compose_rejects_invalid_query() {
        let err = composer()
            .compose_from_request_args("{not json", &RequestArgs::default())
            .unwrap_err();
        assert!(matches!(err, ComposeError::InvalidQuery(_)));
    }

    #[test]
    fn test_quick_search_shape() {
        let query = composer().build_quick_search_query(Some("acme")).unwrap();
        let Query::Or(children) = &query else {
            panic!("expected a disjunction, got {query:?}");
        };
        assert_eq!(children.len(), 5);

        let clauses = query.clauses();
        let hashes = clauses
            .iter()
            .filter(|c| matches!(c.field, Field::Hash(_)) && c.predicate == Predicate::Exact("acme".into()))
            .count();
        let patterns: Vec<&Field> = clauses
            .iter()
            .filter(|c| c.predicate == Predicate::Regex("acme".into()))
            .map(|c| &c.field)
            .collect();
        assert_eq!(hashes, 2);
        assert_eq!(patterns, vec![&Field::DeviceName, &Field::Vendor, &Field::FileName]);
    }

    #[test]
    fn test_quick_search_sanitizes_term() {
        let query = composer().build_quick_search_query(Some("ac$me()")).unwrap();
        assert!(query
            .clauses()
            .iter()
            .all(|c| matches!(&c.predicate, Predicate::Exact(v) | Predicate::Regex(v) if v == "acme")));
    }

    #[test]
    fn test_quick_search_empty_term_is_invalid_input() {
        for term in [None, Some(""), Some("$()*")] {
            let err = composer().build_quick_search_query(term).unwrap_err();
            assert!(matches!(err, ComposeError::InvalidInput { .. }));
            assert_eq!(err.to_string(), "Search string not found");
        }
    }

    #[test]
    fn test_advanced_query_accepts_objects() {
        let query = composer()
            .parse_advanced_query(r#"{"vendor": {"$regex": "avm", "$options": "si"}}"#)
            .unwrap();
        assert_eq!(query, Query::from(Clause::regex(Field::Vendor, "avm")));
    }

    #[test]
    fn test_advanced_query_rejects_wrong_type() {
        let err = composer().parse_advanced_query("[1, 2, 3]").unwrap_err();
        assert!(err.to_string().contains("search query invalid (wrong type)"));
    }

    #[test]
    fn test_page_request_arithmetic() {
        let composer = composer();
        let page = composer
            .page_request(&args(&[("page", "3"), ("per_page", "20")]))
            .unwrap();
        assert_eq!(page.offset(), 40);

        let default = composer.page_request(&args(&[("page", "3")])).unwrap();
        assert_eq!(default.per_page(), 10);
        assert_eq!(default.offset(), 20);
    }

    #[test]
    fn test_page_request_caps_per_page() {
        let page = composer().page_request(&args(&[("per_page", "5000")])).unwrap();
        assert_eq!(page.per_page(), 100);
    }

    #[test]
    fn test_page_request_rejects_invalid_values() {
        for (name, value) in [("page", "0"), ("page", "abc"), ("per_page", "0"), ("per_page", "-1")] {
            let err = composer().page_request(&args(&[(name, value)])).unwrap_err();
            assert!(matches!(err, ComposeError::InvalidPagination { .. }), "{name}={value}");
        }
    }

    #[test]
    fn test_page_request_offset_overflow() {
        let huge = usize::MAX.to_string();
        let err = composer()
            .page_request(&args(&[("page", huge.as_str()), ("per_page", "2")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ComposeError::PageOutOfRange { page: usize::MAX, per_page: 2 }
        ));
    }

    #[tokio::test]
    async fn test_single_result_redirects() {
        let backend = StubBackend::with_labels(&["AVM Box - 1.0"]);
        let query = Query::from(Clause::regex(Field::Vendor, "avm"));
        let outcome = composer()
            .paginate_and_search(&query, &RequestArgs::default(), &backend)
            .await
            .unwrap();
        assert_eq!(outcome.redirect.as_deref(), Some("uid-0"));
    }

    #[tokio::test]
    async fn test_single_result_of_empty_query_does_not_redirect() {
        let backend = StubBackend::with_labels(&["AVM Box - 1.0"]);
        let outcome = composer()
            .paginate_and_search(&Query::Empty, &RequestArgs::default(), &backend)
            .await
            .unwrap();
        assert!(outcome.redirect.is_none());
        assert_eq!(outcome.page.total_count, 1);
    }

    #[tokio::test]
    async fn test_page_is_sorted_by_label_ignoring_case() {
        let backend = StubBackend::with_labels(&["b", "C", "a"]);
        let outcome = composer()
            .paginate_and_search(&Query::Empty, &RequestArgs::default(), &backend)
            .await
            .unwrap();
        let labels: Vec<&str> = outcome.page.items.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["a", "b", "C"]);
        assert!(outcome.redirect.is_none());
    }

    #[tokio::test]
    async fn test_backend_receives_offset_limit_and_scope() {
        let backend = StubBackend::with_labels(&["a", "b"]);
        composer()
            .paginate_and_search(
                &Query::Empty,
                &args(&[("page", "3"), ("per_page", "20"), ("only_firmwares", "True")]),
                &backend,
            )
            .await
            .unwrap();
        assert_eq!(backend.calls.lock().as_slice(), &[(40, 20, true)]);
    }

    #[tokio::test]
    async fn test_backend_failure_propagates() {
        let backend = StubBackend {
            fail: true,
            ..Default::default()
        };
        let err = composer()
            .paginate_and_search(&Query::Empty, &RequestArgs::default(), &backend)
            .await
            .unwrap_err();
        assert!(matches!(err, ComposeError::Backend(_)));
        assert!(err.to_string().starts_with("Could not query database"));
    }
}
