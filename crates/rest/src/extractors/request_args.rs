//! Request argument extractor.
//!
//! Collects the query-string parameters of a request into a map.

use std::collections::HashMap;

use axum::{
    extract::{FromRequestParts, Query},
    http::{StatusCode, request::Parts},
};

/// Axum extractor for the query-string arguments of a request.
///
/// Parameters with an empty value are treated as absent, so `?vendor=` is
/// the same as leaving `vendor` out.
///
/// # Example
///
/// ```rust,ignore
/// use firmscope_rest::extractors::RequestArgs;
///
/// async fn browse(args: RequestArgs) {
///     if let Some(vendor) = args.get("vendor") {
///         // ...
///     }
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestArgs {
    args: HashMap<String, String>,
}

impl RequestArgs {
    /// Creates request arguments from key/value pairs.
    pub fn new<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            args: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .filter(|(_, v)| !v.is_empty())
                .collect(),
        }
    }

    /// Returns the value of a parameter, if present and non-empty.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.args.get(name).map(String::as_str)
    }

    /// Returns `true` when results are restricted to firmware images.
    pub fn only_firmwares(&self) -> bool {
        self.get("only_firmwares") == Some("True")
    }
}

impl<S> FromRequestParts<S> for RequestArgs
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(args) = Query::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|_| (StatusCode::BAD_REQUEST, "Invalid query string"))?;

        Ok(RequestArgs::new(args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(uri: &str) -> RequestArgs {
        let (mut parts, _) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        RequestArgs::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[test]
    fn test_empty_values_are_absent() {
        let args = RequestArgs::new([("vendor", ""), ("page", "2")]);
        assert_eq!(args.get("vendor"), None);
        assert_eq!(args.get("page"), Some("2"));
    }

    #[test]
    fn test_only_firmwares() {
        assert!(RequestArgs::new([("only_firmwares", "True")]).only_firmwares());
        assert!(!RequestArgs::new([("only_firmwares", "true")]).only_firmwares());
        assert!(!RequestArgs::default().only_firmwares());
    }

    #[tokio::test]
    async fn test_extracts_decoded_query_string() {
        let args = extract("/database/browse?date=January%202020&vendor=&page=3").await;
        assert_eq!(args.get("date"), Some("January 2020"));
        assert_eq!(args.get("page"), Some("3"));
        assert!(args.get("vendor").is_none());
    }

    #[tokio::test]
    async fn test_no_query_string() {
        let args = extract("/database/browse").await;
        assert!(args.get("query").is_none());
    }
}
