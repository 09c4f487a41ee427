//! In-memory backend implementation.
//!
//! Records are kept in a `Vec` behind a [`RwLock`] and every query is
//! evaluated by scanning it. This is meant for tests and the development
//! server, not for large firmware collections.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt::Debug;
use std::path::Path;

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::RwLock;
use regex::{Regex, RegexBuilder};
use uuid::Uuid;

use crate::core::{BinarySearchService, BinarySearchStatus, Catalog, SearchBackend};
use crate::error::{BackendError, StorageResult};
use crate::types::{Field, FirmwareRecord, MetaEntry, Predicate, Query};

const BACKEND_NAME: &str = "memory";

/// A query compiled against the record layout, with regexes built once.
enum Matcher {
    Everything,
    Exact(Field, String),
    Pattern(Field, Regex),
    Released { start: NaiveDate, end: NaiveDate },
    AllOf(Vec<Matcher>),
    AnyOf(Vec<Matcher>),
}

impl Matcher {
    fn compile(query: &Query) -> StorageResult<Self> {
        Ok(match query {
            Query::Empty => Matcher::Everything,
            Query::Clause(clause) => match &clause.predicate {
                Predicate::Exact(value) => Matcher::Exact(clause.field.clone(), value.clone()),
                Predicate::Regex(pattern) => {
                    let regex = RegexBuilder::new(&escape_literal_braces(pattern))
                        .case_insensitive(true)
                        .dot_matches_new_line(true)
                        .build()
                        .map_err(|e| BackendError::InvalidPattern {
                            pattern: pattern.clone(),
                            message: e.to_string(),
                        })?;
                    Matcher::Pattern(clause.field.clone(), regex)
                }
                Predicate::DateRange { start, end } => Matcher::Released {
                    start: *start,
                    end: *end,
                },
            },
            Query::And(children) => Matcher::AllOf(
                children
                    .iter()
                    .map(Matcher::compile)
                    .collect::<StorageResult<_>>()?,
            ),
            Query::Or(children) => Matcher::AnyOf(
                children
                    .iter()
                    .map(Matcher::compile)
                    .collect::<StorageResult<_>>()?,
            ),
        })
    }

    fn matches(&self, record: &FirmwareRecord) -> bool {
        match self {
            Matcher::Everything => true,
            Matcher::Exact(field, value) => {
                record.field_value(field).as_deref() == Some(value.as_str())
            }
            Matcher::Pattern(field, regex) => record
                .field_value(field)
                .is_some_and(|text| regex.is_match(&text)),
            Matcher::Released { start, end } => record
                .release_date
                .is_some_and(|date| *start <= date && date < *end),
            Matcher::AllOf(children) => children.iter().all(|m| m.matches(record)),
            Matcher::AnyOf(children) => children.iter().any(|m| m.matches(record)),
        }
    }
}

/// Escapes every brace that is not part of a counted repetition such as
/// `a{2}` or `a{2,5}`.
/// A term like `box{x}` then matches literally.
fn escape_literal_braces(pattern: &str) -> Cow<'_, str> {
    if !pattern.contains(['{', '}']) {
        return Cow::Borrowed(pattern);
    }

    let mut escaped = String::with_capacity(pattern.len() + 4);
    let mut chars = pattern.char_indices();
    let mut in_class = false;
    // Whether the previous item may carry a repetition.
    let mut repeatable = false;

    while let Some((i, c)) = chars.next() {
        if c == '\\' {
            escaped.push(c);
            if let Some((_, next)) = chars.next() {
                escaped.push(next);
            }
            repeatable = true;
            continue;
        }
        if in_class {
            escaped.push(c);
            if c == ']' {
                in_class = false;
                repeatable = true;
            }
            continue;
        }
        match c {
            '[' => {
                in_class = true;
                escaped.push(c);
            }
            '{' => match counted_repetition(&pattern[i..]) {
                Some(len) if repeatable => {
                    escaped.push_str(&pattern[i..i + len]);
                    // The closing brace is ASCII, so `len` bytes are `len` chars.
                    for _ in 1..len {
                        chars.next();
                    }
                    repeatable = false;
                }
                _ => {
                    escaped.push_str("\\{");
                    repeatable = true;
                }
            },
            '}' => {
                escaped.push_str("\\}");
                repeatable = true;
            }
            '(' | '|' | '*' | '+' | '?' | '^' | '$' => {
                escaped.push(c);
                repeatable = false;
            }
            _ => {
                escaped.push(c);
                repeatable = true;
            }
        }
    }
    Cow::Owned(escaped)
}

/// Length in bytes of a `{n}`, `{n,}` or `{n,m}` at the start of `text`.
fn counted_repetition(text: &str) -> Option<usize> {
    let body = text.strip_prefix('{')?;
    let close = body.find('}')?;
    let (min, max) = match body[..close].split_once(',') {
        Some((min, max)) => (min, Some(max)),
        None => (&body[..close], None),
    };
    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if min.is_empty() || !digits(min) || !max.is_none_or(digits) {
        return None;
    }
    Some(close + 2)
}

/// In-memory implementation of [`SearchBackend`] and [`Catalog`].
///
/// # Example
///
/// ```
/// use firmscope_persistence::backends::memory::InMemoryBackend;
/// use firmscope_persistence::types::FirmwareRecord;
///
/// let backend = InMemoryBackend::with_records(vec![
///     FirmwareRecord::firmware("fw-1", "AVM", "FRITZ!Box 7490", "7.21"),
/// ]);
/// assert_eq!(backend.len(), 1);
/// ```
#[derive(Default)]
pub struct InMemoryBackend {
    records: RwLock<Vec<FirmwareRecord>>,
}

impl Debug for InMemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBackend")
            .field("records", &self.records.read().len())
            .finish()
    }
}

impl InMemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend holding the given records.
    pub fn with_records(records: impl IntoIterator<Item = FirmwareRecord>) -> Self {
        Self {
            records: RwLock::new(records.into_iter().collect()),
        }
    }

    /// Loads records from a JSON file containing an array of records.
    pub fn load_records<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        let path = path.as_ref();
        let data_file_error = |message: String| BackendError::DataFile {
            path: path.display().to_string(),
            message,
        };

        let text = std::fs::read_to_string(path).map_err(|e| data_file_error(e.to_string()))?;
        let records: Vec<FirmwareRecord> =
            serde_json::from_str(&text).map_err(|e| data_file_error(e.to_string()))?;

        tracing::info!(
            path = %path.display(),
            records = records.len(),
            "Loaded records into in-memory backend"
        );
        Ok(Self::with_records(records))
    }

    /// Adds a record, replacing any record with the same uid.
    pub fn insert(&self, record: FirmwareRecord) {
        let mut records = self.records.write();
        match records.iter_mut().find(|r| r.uid == record.uid) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
    }

    /// Returns the number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Returns `true` if no records are stored.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Evaluates the query and returns the selected records in storage order.
    fn select(&self, query: &Query, only_parent_of_match: bool) -> StorageResult<Vec<MetaEntry>> {
        let matcher = Matcher::compile(query)?;
        let records = self.records.read();

        // The empty query lists firmware images only.
        if query.is_empty() {
            return Ok(records
                .iter()
                .filter(|r| r.is_firmware())
                .map(MetaEntry::from)
                .collect());
        }

        let matched = records.iter().filter(|r| matcher.matches(r));
        if !only_parent_of_match {
            return Ok(matched.map(MetaEntry::from).collect());
        }

        let mut parent_uids: Vec<&str> = Vec::new();
        let mut seen = HashSet::new();
        for record in matched {
            let uids: Vec<&str> = if record.is_firmware() {
                vec![record.uid.as_str()]
            } else {
                record.parent_firmware_uids.iter().map(String::as_str).collect()
            };
            for uid in uids {
                if seen.insert(uid) {
                    parent_uids.push(uid);
                }
            }
        }

        let firmware: HashMap<&str, &FirmwareRecord> = records
            .iter()
            .filter(|r| r.is_firmware())
            .map(|r| (r.uid.as_str(), r))
            .collect();
        Ok(parent_uids
            .into_iter()
            .filter_map(|uid| firmware.get(uid).map(|r| MetaEntry::from(*r)))
            .collect())
    }

    fn firmware_facet(&self, facet: impl Fn(&FirmwareRecord) -> &str) -> Vec<String> {
        self.records
            .read()
            .iter()
            .filter(|r| r.is_firmware())
            .map(&facet)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[async_trait]
impl SearchBackend for InMemoryBackend {
    fn backend_name(&self) -> &'static str {
        BACKEND_NAME
    }

    async fn count(&self, query: &Query, only_parent_of_match: bool) -> StorageResult<u64> {
        let count = self.select(query, only_parent_of_match)?.len();
        Ok(count as u64)
    }

    async fn search(
        &self,
        query: &Query,
        offset: usize,
        limit: usize,
        only_parent_of_match: bool,
    ) -> StorageResult<Vec<MetaEntry>> {
        tracing::debug!(%query, offset, limit, only_parent_of_match, "Searching in-memory backend");

        let selected = self.select(query, only_parent_of_match)?.into_iter().skip(offset);
        Ok(if limit == 0 {
            selected.collect()
        } else {
            selected.take(limit).collect()
        })
    }
}

#[async_trait]
impl Catalog for InMemoryBackend {
    async fn device_classes(&self) -> StorageResult<Vec<String>> {
        Ok(self.firmware_facet(|r| r.device_class.as_str()))
    }

    async fn vendors(&self) -> StorageResult<Vec<String>> {
        Ok(self.firmware_facet(|r| r.vendor.as_str()))
    }

    async fn is_firmware(&self, uid: &str) -> StorageResult<bool> {
        Ok(self
            .records
            .read()
            .iter()
            .any(|r| r.uid == uid && r.is_firmware()))
    }

    async fn meta_entries(&self, uids: &[String]) -> StorageResult<Vec<MetaEntry>> {
        let records = self.records.read();
        Ok(uids
            .iter()
            .filter_map(|uid| records.iter().find(|r| &r.uid == uid))
            .map(MetaEntry::from)
            .collect())
    }
}

struct BinarySearchRequest {
    rules: Vec<u8>,
    firmware_uid: Option<String>,
    outcome: Option<Result<BTreeMap<String, Vec<String>>, String>>,
}

/// In-memory task queue for binary searches.
///
/// Submitted searches stay pending until [`complete`](Self::complete) or
/// [`fail`](Self::fail) is called for them.
#[derive(Default)]
pub struct InMemoryBinarySearch {
    requests: RwLock<HashMap<String, BinarySearchRequest>>,
}

impl Debug for InMemoryBinarySearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBinarySearch")
            .field("requests", &self.requests.read().len())
            .finish()
    }
}

impl InMemoryBinarySearch {
    /// Creates an empty task queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the firmware a pending or finished request is restricted to.
    pub fn firmware_uid(&self, request_id: &str) -> StorageResult<Option<String>> {
        self.requests
            .read()
            .get(request_id)
            .map(|r| r.firmware_uid.clone())
            .ok_or_else(|| unknown_request(request_id))
    }

    /// Finishes a request with the given matches (rule name to uids).
    pub fn complete(
        &self,
        request_id: &str,
        matches: impl IntoIterator<Item = (String, Vec<String>)>,
    ) -> StorageResult<()> {
        self.finish(request_id, Ok(matches.into_iter().collect()))
    }

    /// Finishes a request with an error.
    pub fn fail(&self, request_id: &str, message: impl Into<String>) -> StorageResult<()> {
        self.finish(request_id, Err(message.into()))
    }

    fn finish(
        &self,
        request_id: &str,
        outcome: Result<BTreeMap<String, Vec<String>>, String>,
    ) -> StorageResult<()> {
        let mut requests = self.requests.write();
        let request = requests
            .get_mut(request_id)
            .ok_or_else(|| unknown_request(request_id))?;
        request.outcome = Some(outcome);
        Ok(())
    }
}

fn unknown_request(request_id: &str) -> crate::error::StorageError {
    BackendError::UnknownRequest {
        request_id: request_id.to_string(),
    }
    .into()
}

/// Performs a structural check of a YARA rule set: every rule has a name,
/// a braced body and a `condition:` section.
fn check_rule_structure(rules: &[u8]) -> Result<(), String> {
    let text = std::str::from_utf8(rules).map_err(|_| "rules are not valid UTF-8".to_string())?;

    let header = Regex::new(r"(?m)^\s*(?:(?:private|global)\s+)*rule\s+(\S+?)\s*(?::[^{]*)?\{")
        .map_err(|e| e.to_string())?;
    let identifier = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").map_err(|e| e.to_string())?;

    let mut headers = header.captures_iter(text).peekable();
    if headers.peek().is_none() {
        return Err("no rule definition found".to_string());
    }

    let mut depth: i64 = 0;
    for c in text.chars() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth < 0 {
                    return Err("unexpected '}'".to_string());
                }
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err("unbalanced braces".to_string());
    }

    let starts: Vec<(usize, String)> = headers
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(1)?;
            Some((whole.start(), name.as_str().to_string()))
        })
        .collect();
    for (i, (start, name)) in starts.iter().enumerate() {
        if !identifier.is_match(name) {
            return Err(format!("invalid rule identifier '{name}'"));
        }
        let end = starts.get(i + 1).map_or(text.len(), |(next, _)| *next);
        if !text[*start..end].contains("condition:") {
            return Err(format!("rule '{name}' has no condition section"));
        }
    }
    Ok(())
}

#[async_trait]
impl BinarySearchService for InMemoryBinarySearch {
    fn check_rules(&self, rules: &[u8]) -> Result<(), String> {
        check_rule_structure(rules)
    }

    async fn submit(&self, rules: Vec<u8>, firmware_uid: Option<String>) -> StorageResult<String> {
        let request_id = Uuid::new_v4().to_string();
        tracing::debug!(%request_id, firmware_uid = ?firmware_uid, "Queued binary search");
        self.requests.write().insert(
            request_id.clone(),
            BinarySearchRequest {
                rules,
                firmware_uid,
                outcome: None,
            },
        );
        Ok(request_id)
    }

    async fn result(&self, request_id: &str) -> StorageResult<BinarySearchStatus> {
        let requests = self.requests.read();
        let request = requests
            .get(request_id)
            .ok_or_else(|| unknown_request(request_id))?;
        Ok(match &request.outcome {
            None => BinarySearchStatus::Pending,
            Some(Err(message)) => BinarySearchStatus::Failed {
                message: message.clone(),
            },
            Some(Ok(matches)) => BinarySearchStatus::Completed {
                matches: matches.clone(),
                rules: request.rules.clone(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::types::Clause;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn backend() -> InMemoryBackend {
        InMemoryBackend::with_records(vec![
            FirmwareRecord::firmware("fw-1", "AVM", "FRITZ!Box 7490", "7.21")
                .with_device_class("Router")
                .with_release_date(date(2020, 1, 15))
                .with_hash("sha256", "aa11"),
            FirmwareRecord::firmware("fw-2", "Acme", "Cam 3000", "1.0")
                .with_device_class("IP Camera")
                .with_release_date(date(2020, 2, 1)),
            FirmwareRecord::firmware("fw-3", "acme", "Switch", "2.4").with_device_class("Switch"),
            FirmwareRecord::file("fo-1", "busybox", "fw-1")
                .with_parent("fw-2")
                .with_hash("md5", "bb22"),
        ])
    }

    #[tokio::test]
    async fn test_empty_query_lists_firmware_only() {
        let backend = backend();
        assert_eq!(backend.count(&Query::Empty, false).await.unwrap(), 3);
        let all = backend.search(&Query::Empty, 0, 0, false).await.unwrap();
        assert!(all.iter().all(|e| e.uid.starts_with("fw-")));
    }

    #[tokio::test]
    async fn test_regex_is_case_insensitive() {
        let backend = backend();
        let query = Query::from(Clause::regex(Field::Vendor, "ACME"));
        let uids: Vec<String> = backend
            .search(&query, 0, 0, false)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.uid)
            .collect();
        assert_eq!(uids, vec!["fw-2", "fw-3"]);
    }

    #[tokio::test]
    async fn test_exact_is_case_sensitive() {
        let backend = backend();
        let query = Query::from(Clause::exact(Field::Vendor, "acme"));
        assert_eq!(backend.count(&query, false).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_date_range_is_half_open() {
        let backend = backend();
        let january = Query::from(Clause::release_between(date(2020, 1, 1), date(2020, 2, 1)));
        let hits = backend.search(&january, 0, 0, false).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].uid, "fw-1");
    }

    #[tokio::test]
    async fn test_offset_and_limit() {
        let backend = backend();
        let page = backend.search(&Query::Empty, 1, 1, false).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].uid, "fw-2");

        let rest = backend.search(&Query::Empty, 1, 0, false).await.unwrap();
        assert_eq!(rest.len(), 2);

        let beyond = backend.search(&Query::Empty, 10, 5, false).await.unwrap();
        assert!(beyond.is_empty());
    }

    #[tokio::test]
    async fn test_only_parent_of_match_maps_files_to_firmware() {
        let backend = backend();
        let query = Query::any_of(vec![
            Clause::exact(Field::hash("md5"), "bb22").into(),
            Clause::exact(Field::hash("sha256"), "aa11").into(),
        ])
        .unwrap();

        let direct = backend.search(&query, 0, 0, false).await.unwrap();
        assert_eq!(direct.len(), 2);

        let parents: Vec<String> = backend
            .search(&query, 0, 0, true)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.uid)
            .collect();
        assert_eq!(parents, vec!["fw-1", "fw-2"]);
        assert_eq!(backend.count(&query, true).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_invalid_pattern_is_backend_error() {
        let backend = backend();
        let query = Query::from(Clause::regex(Field::Vendor, "(unclosed"));
        let err = backend.count(&query, false).await.unwrap_err();
        assert!(matches!(
            err,
            StorageError::Backend(BackendError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_escape_literal_braces() {
        assert_eq!(escape_literal_braces("busybox"), "busybox");
        assert_eq!(escape_literal_braces("box{x}"), r"box\{x\}");
        assert_eq!(escape_literal_braces("{"), r"\{");
        assert_eq!(escape_literal_braces("v{1.0}"), r"v\{1.0\}");
        assert_eq!(escape_literal_braces("{2}"), r"\{2\}");
        assert_eq!(escape_literal_braces("a{2}"), "a{2}");
        assert_eq!(escape_literal_braces("(ab){2,}x{1,3}"), "(ab){2,}x{1,3}");
        assert_eq!(escape_literal_braces(r"\{[{}]"), r"\{[{}]");
    }

    #[tokio::test]
    async fn test_braced_term_matches_literally() {
        let backend = InMemoryBackend::with_records(vec![
            FirmwareRecord::firmware("fw-1", "Acme", "box{x}", "1.0"),
            FirmwareRecord::firmware("fw-2", "Acme", "boxx", "1.0"),
            FirmwareRecord::firmware("fw-3", "Acme", "baa", "1.0"),
        ]);
        let braced = Query::from(Clause::regex(Field::DeviceName, "box{x}"));
        let found = backend.search(&braced, 0, 0, false).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].uid, "fw-1");

        let counted = Query::from(Clause::regex(Field::DeviceName, "ba{2}"));
        assert_eq!(backend.count(&counted, false).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_catalog_facets() {
        let backend = backend();
        assert_eq!(
            backend.device_classes().await.unwrap(),
            vec!["IP Camera", "Router", "Switch"]
        );
        assert_eq!(backend.vendors().await.unwrap(), vec!["AVM", "Acme", "acme"]);
        assert!(backend.is_firmware("fw-1").await.unwrap());
        assert!(!backend.is_firmware("fo-1").await.unwrap());
        assert!(!backend.is_firmware("missing").await.unwrap());

        let entries = backend
            .meta_entries(&["fo-1".to_string(), "missing".to_string(), "fw-3".to_string()])
            .await
            .unwrap();
        let labels: Vec<&str> = entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["busybox", "acme Switch - 2.4"]);
    }

    #[test]
    fn test_insert_replaces_same_uid() {
        let backend = backend();
        backend.insert(FirmwareRecord::firmware("fw-3", "Acme", "Switch", "2.5"));
        assert_eq!(backend.len(), 4);
        backend.insert(FirmwareRecord::firmware("fw-4", "Acme", "Switch", "3.0"));
        assert_eq!(backend.len(), 5);
    }

    #[test]
    fn test_load_records_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");
        std::fs::write(
            &path,
            r#"[{"uid": "fw-1", "vendor": "AVM", "device_name": "Box", "version": "1"},
                {"uid": "fo-1", "kind": "file", "file_name": "busybox", "parent_firmware_uids": ["fw-1"]}]"#,
        )
        .unwrap();

        let backend = InMemoryBackend::load_records(&path).unwrap();
        assert_eq!(backend.len(), 2);
    }

    #[test]
    fn test_load_records_reports_path() {
        let err = InMemoryBackend::load_records("/nonexistent/records.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/records.json"));
    }

    #[test]
    fn test_rule_check() {
        let search = InMemoryBinarySearch::new();
        let valid = b"rule busybox_banner {\n  strings:\n    $a = \"BusyBox v\"\n  condition:\n    $a\n}\n";
        assert!(search.check_rules(valid).is_ok());

        assert_eq!(
            search.check_rules(b"not a rule").unwrap_err(),
            "no rule definition found"
        );
        assert!(search.check_rules(b"rule a { condition: true").is_err());
        assert!(
            search
                .check_rules(b"rule a { strings: $a = \"x\" }")
                .unwrap_err()
                .contains("no condition")
        );
        assert!(search.check_rules(b"rule 9a { condition: true }").is_err());
    }

    #[tokio::test]
    async fn test_binary_search_lifecycle() {
        let search = InMemoryBinarySearch::new();
        let rules = b"rule a { condition: true }".to_vec();
        let id = search
            .submit(rules.clone(), Some("fw-1".to_string()))
            .await
            .unwrap();

        assert_eq!(search.result(&id).await.unwrap(), BinarySearchStatus::Pending);
        assert_eq!(search.firmware_uid(&id).unwrap().as_deref(), Some("fw-1"));

        search
            .complete(&id, vec![("a".to_string(), vec!["fo-1".to_string()])])
            .unwrap();
        match search.result(&id).await.unwrap() {
            BinarySearchStatus::Completed { matches, rules: r } => {
                assert_eq!(matches["a"], vec!["fo-1".to_string()]);
                assert_eq!(r, rules);
            }
            other => panic!("unexpected status: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_binary_search_failure_and_unknown_id() {
        let search = InMemoryBinarySearch::new();
        let id = search.submit(b"rule a { condition: true }".to_vec(), None).await.unwrap();
        search.fail(&id, "worker crashed").unwrap();
        assert_eq!(
            search.result(&id).await.unwrap(),
            BinarySearchStatus::Failed {
                message: "worker crashed".to_string()
            }
        );

        let err = search.result("nope").await.unwrap_err();
        assert!(matches!(
            err,
            StorageError::Backend(BackendError::UnknownRequest { .. })
        ));
    }
}
