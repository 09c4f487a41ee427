//! Search query model.
//!
//! A [`Query`] is a tree of [`Clause`]s combined with `AND`/`OR`. Queries are
//! exchanged as Mongo-style JSON so that a composed query can travel through a
//! redirect as a single URL parameter and be decoded again on the other side:
//!
//! | Query | JSON |
//! |-------|------|
//! | Empty | `{}` |
//! | exact | `{"vendor": "AVM"}` |
//! | regex | `{"vendor": {"$regex": "avm", "$options": "si"}}` |
//! | date range | `{"release_date": {"$gte": "2020-01-01", "$lt": "2020-02-01"}}` |
//! | AND / OR | `{"$and": [...]}` / `{"$or": [...]}` |
//!
//! # Example
//!
//! ```
//! use firmscope_persistence::types::{Clause, Field, Query};
//!
//! let query = Query::from(Clause::regex(Field::Vendor, "acme"))
//!     .and(Clause::exact(Field::DeviceClass, "Router").into());
//!
//! let decoded = Query::parse(&query.to_json_string()).unwrap();
//! assert!(decoded.is_equivalent(&query));
//! ```

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value, json};

use crate::error::QueryError;

/// Path prefix of the digest fields written by the hash analysis plugin.
pub const HASH_FIELD_PREFIX: &str = "processed_analysis.file_hashes.";

/// Options attached to every encoded regex clause.
pub const REGEX_OPTIONS: &str = "si";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A searchable record attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    /// `device_class`
    DeviceClass,
    /// `device_name`
    DeviceName,
    /// `vendor`
    Vendor,
    /// `version`
    Version,
    /// `file_name`
    FileName,
    /// `release_date`
    ReleaseDate,
    /// Digest of one hash algorithm, e.g. `processed_analysis.file_hashes.sha256`.
    Hash(String),
}

impl Field {
    /// The plain text attributes, in the order filters are applied.
    pub const ATTRIBUTES: [Field; 6] = [
        Field::DeviceClass,
        Field::Vendor,
        Field::DeviceName,
        Field::FileName,
        Field::Version,
        Field::ReleaseDate,
    ];

    /// Creates the digest field for a hash algorithm.
    pub fn hash(algorithm: impl Into<String>) -> Self {
        Field::Hash(algorithm.into())
    }

    /// Returns the document path of this field.
    pub fn path(&self) -> Cow<'static, str> {
        match self {
            Field::DeviceClass => Cow::Borrowed("device_class"),
            Field::DeviceName => Cow::Borrowed("device_name"),
            Field::Vendor => Cow::Borrowed("vendor"),
            Field::Version => Cow::Borrowed("version"),
            Field::FileName => Cow::Borrowed("file_name"),
            Field::ReleaseDate => Cow::Borrowed("release_date"),
            Field::Hash(algorithm) => Cow::Owned(format!("{HASH_FIELD_PREFIX}{algorithm}")),
        }
    }
}

impl FromStr for Field {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "device_class" => Ok(Field::DeviceClass),
            "device_name" => Ok(Field::DeviceName),
            "vendor" => Ok(Field::Vendor),
            "version" => Ok(Field::Version),
            "file_name" => Ok(Field::FileName),
            "release_date" => Ok(Field::ReleaseDate),
            other => match other.strip_prefix(HASH_FIELD_PREFIX) {
                Some(algorithm) if is_algorithm_name(algorithm) => {
                    Ok(Field::Hash(algorithm.to_string()))
                }
                _ => Err(QueryError::UnknownField {
                    field: other.to_string(),
                }),
            },
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

fn is_algorithm_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// How a clause compares a field against its value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Predicate {
    /// The field equals the value.
    Exact(String),
    /// The field matches the pattern, case-insensitively.
    Regex(String),
    /// The date lies in `[start, end)`.
    DateRange {
        /// Inclusive lower bound.
        start: NaiveDate,
        /// Exclusive upper bound.
        end: NaiveDate,
    },
}

/// A single field predicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Clause {
    /// The attribute being tested.
    pub field: Field,
    /// The comparison applied to the attribute.
    pub predicate: Predicate,
}

impl Clause {
    /// Creates an exact-match clause.
    pub fn exact(field: Field, value: impl Into<String>) -> Self {
        Self {
            field,
            predicate: Predicate::Exact(value.into()),
        }
    }

    /// Creates a case-insensitive regex clause.
    pub fn regex(field: Field, pattern: impl Into<String>) -> Self {
        Self {
            field,
            predicate: Predicate::Regex(pattern.into()),
        }
    }

    /// Creates a half-open `release_date` range clause.
    pub fn release_between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            field: Field::ReleaseDate,
            predicate: Predicate::DateRange { start, end },
        }
    }

    fn to_value(&self) -> Value {
        let value = match &self.predicate {
            Predicate::Exact(value) => Value::String(value.clone()),
            Predicate::Regex(pattern) => json!({
                "$regex": pattern,
                "$options": REGEX_OPTIONS,
            }),
            Predicate::DateRange { start, end } => json!({
                "$gte": start.format(DATE_FORMAT).to_string(),
                "$lt": end.format(DATE_FORMAT).to_string(),
            }),
        };

        let mut map = Map::new();
        map.insert(self.field.path().into_owned(), value);
        Value::Object(map)
    }

    fn from_entry(key: &str, value: &Value) -> Result<Self, QueryError> {
        let field: Field = key.parse()?;
        match value {
            Value::String(value) => Ok(Clause::exact(field, value.clone())),
            Value::Object(operators) => decode_operators(field, operators),
            other => Err(QueryError::UnsupportedValue {
                field: key.to_string(),
                message: format!(
                    "expected a string or an operator object, found {}",
                    json_type(other)
                ),
            }),
        }
    }
}

fn decode_operators(field: Field, operators: &Map<String, Value>) -> Result<Clause, QueryError> {
    let unsupported = |operator: &str| QueryError::UnsupportedOperator {
        field: field.to_string(),
        operator: operator.to_string(),
    };

    if let Some(pattern) = operators.get("$regex") {
        if let Some(other) = operators
            .keys()
            .find(|k| k.as_str() != "$regex" && k.as_str() != "$options")
        {
            return Err(unsupported(other));
        }
        let pattern = pattern
            .as_str()
            .ok_or_else(|| QueryError::UnsupportedValue {
                field: field.to_string(),
                message: "$regex expects a string".to_string(),
            })?;
        return Ok(Clause::regex(field, pattern));
    }

    if operators.contains_key("$gte") || operators.contains_key("$lt") {
        if field != Field::ReleaseDate {
            return Err(unsupported("$gte"));
        }
        if let Some(other) = operators
            .keys()
            .find(|k| k.as_str() != "$gte" && k.as_str() != "$lt")
        {
            return Err(unsupported(other));
        }
        let start = decode_date(&field, operators.get("$gte"))?;
        let end = decode_date(&field, operators.get("$lt"))?;
        return Ok(Clause::release_between(start, end));
    }

    match operators.keys().next() {
        Some(operator) => Err(unsupported(operator)),
        None => Err(QueryError::UnsupportedValue {
            field: field.to_string(),
            message: "empty operator object".to_string(),
        }),
    }
}

fn decode_date(field: &Field, value: Option<&Value>) -> Result<NaiveDate, QueryError> {
    let invalid = |value: String| QueryError::InvalidDate {
        field: field.to_string(),
        value,
    };
    let text = match value {
        Some(Value::String(text)) => text,
        Some(other) => return Err(invalid(other.to_string())),
        None => return Err(invalid("<missing>".to_string())),
    };

    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(text).map(|dt| dt.date_naive()))
        .map_err(|_| invalid(text.clone()))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A filter expression over firmware and file records.
///
/// `And` and `Or` always carry at least one child when built through
/// [`Query::and`] and [`Query::any_of`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Query {
    /// Matches every record.
    #[default]
    Empty,
    /// A single predicate.
    Clause(Clause),
    /// All children must match.
    And(Vec<Query>),
    /// At least one child must match.
    Or(Vec<Query>),
}

impl Query {
    /// Returns `true` for the match-everything query.
    pub fn is_empty(&self) -> bool {
        matches!(self, Query::Empty)
    }

    /// Combines two queries with `AND`.
    ///
    /// Empty operands are dropped, nested conjunctions are flattened and
    /// children already present are not added twice.
    pub fn and(self, other: Query) -> Query {
        match (self, other) {
            (Query::Empty, query) | (query, Query::Empty) => query,
            (lhs, rhs) => {
                let mut children = lhs.into_conjuncts();
                for child in rhs.into_conjuncts() {
                    if !children.contains(&child) {
                        children.push(child);
                    }
                }
                collapse(children, Query::And)
            }
        }
    }

    /// Builds a disjunction, or `None` when there is nothing to combine.
    pub fn any_of(children: impl IntoIterator<Item = Query>) -> Option<Query> {
        let children: Vec<Query> = children.into_iter().collect();
        if children.is_empty() {
            None
        } else {
            Some(Query::Or(children))
        }
    }

    fn into_conjuncts(self) -> Vec<Query> {
        match self {
            Query::Empty => Vec::new(),
            Query::And(children) => children,
            other => vec![other],
        }
    }

    /// Returns every leaf clause in the tree, depth first.
    pub fn clauses(&self) -> Vec<&Clause> {
        let mut out = Vec::new();
        self.collect_clauses(&mut out);
        out
    }

    fn collect_clauses<'a>(&'a self, out: &mut Vec<&'a Clause>) {
        match self {
            Query::Empty => {}
            Query::Clause(clause) => out.push(clause),
            Query::And(children) | Query::Or(children) => {
                for child in children {
                    child.collect_clauses(out);
                }
            }
        }
    }

    /// Returns the canonical form used for semantic comparison.
    ///
    /// Compound children are flattened, sorted and de-duplicated, and
    /// single-child compounds collapse into their child. A disjunction with
    /// an empty branch matches everything and becomes [`Query::Empty`].
    pub fn normalized(&self) -> Query {
        match self {
            Query::Empty | Query::Clause(_) => self.clone(),
            Query::And(children) => {
                let mut flat = Vec::new();
                for child in children {
                    match child.normalized() {
                        Query::Empty => {}
                        Query::And(inner) => flat.extend(inner),
                        other => flat.push(other),
                    }
                }
                flat.sort();
                flat.dedup();
                collapse(flat, Query::And)
            }
            Query::Or(children) => {
                let mut flat = Vec::new();
                for child in children {
                    match child.normalized() {
                        Query::Empty => return Query::Empty,
                        Query::Or(inner) => flat.extend(inner),
                        other => flat.push(other),
                    }
                }
                flat.sort();
                flat.dedup();
                collapse(flat, Query::Or)
            }
        }
    }

    /// Returns `true` if both queries select the same records by construction.
    pub fn is_equivalent(&self, other: &Query) -> bool {
        self.normalized() == other.normalized()
    }

    /// Encodes the query into its JSON wire form.
    pub fn to_value(&self) -> Value {
        match self {
            Query::Empty => Value::Object(Map::new()),
            Query::Clause(clause) => clause.to_value(),
            Query::And(children) => json!({
                "$and": children.iter().map(Query::to_value).collect::<Vec<_>>(),
            }),
            Query::Or(children) => json!({
                "$or": children.iter().map(Query::to_value).collect::<Vec<_>>(),
            }),
        }
    }

    /// Encodes the query as a compact JSON string.
    pub fn to_json_string(&self) -> String {
        self.to_value().to_string()
    }

    /// Decodes a query from its JSON wire form.
    ///
    /// Objects with several keys are read as an implicit conjunction.
    pub fn from_value(value: &Value) -> Result<Self, QueryError> {
        let Value::Object(map) = value else {
            return Err(QueryError::NotAnObject {
                found: json_type(value).to_string(),
            });
        };

        let mut query = Query::Empty;
        for (key, entry) in map {
            let part = match key.as_str() {
                "$and" => decode_compound(key, entry)?
                    .into_iter()
                    .fold(Query::Empty, Query::and),
                "$or" => {
                    let children = decode_compound(key, entry)?;
                    // An empty branch matches every record.
                    if children.iter().any(Query::is_empty) {
                        Query::Empty
                    } else {
                        Query::Or(children)
                    }
                }
                operator if operator.starts_with('$') => {
                    return Err(QueryError::UnsupportedOperator {
                        field: "query".to_string(),
                        operator: operator.to_string(),
                    });
                }
                field => Query::Clause(Clause::from_entry(field, entry)?),
            };
            query = query.and(part);
        }
        Ok(query)
    }

    /// Decodes a query from JSON text.
    pub fn parse(text: &str) -> Result<Self, QueryError> {
        let value: Value = serde_json::from_str(text).map_err(|e| QueryError::InvalidJson {
            message: e.to_string(),
        })?;
        Self::from_value(&value)
    }
}

fn decode_compound(operator: &str, value: &Value) -> Result<Vec<Query>, QueryError> {
    let Value::Array(items) = value else {
        return Err(QueryError::UnsupportedValue {
            field: operator.to_string(),
            message: format!("expected an array of clauses, found {}", json_type(value)),
        });
    };
    if items.is_empty() {
        return Err(QueryError::EmptyCompound {
            operator: operator.to_string(),
        });
    }
    items.iter().map(Query::from_value).collect()
}

fn collapse(mut children: Vec<Query>, wrap: fn(Vec<Query>) -> Query) -> Query {
    match children.len() {
        0 => Query::Empty,
        1 => children.swap_remove(0),
        _ => wrap(children),
    }
}

impl From<Clause> for Query {
    fn from(clause: Clause) -> Self {
        Query::Clause(clause)
    }
}

impl FromStr for Query {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Query::parse(s)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

impl Serialize for Query {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Query {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Query::from_value(&value).map_err(serde::de::Error::custom)
    }
}
