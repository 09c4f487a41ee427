//! `<Month> <Year>` date filters.

use chrono::{Months, NaiveDate};
use firmscope_persistence::types::{Clause, Query};
use tracing::debug;

use super::ComposeError;

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Parses `"<Month> <Year>"` into the half-open range covering that month.
///
/// Single quotes anywhere in the text are ignored, so `"'March 1999'"` is
/// accepted. The month must be spelled out in full (any case) and the text
/// may not carry leading or trailing whitespace.
pub fn month_range(date: &str) -> Result<(NaiveDate, NaiveDate), ComposeError> {
    let malformed = || ComposeError::MalformedDate {
        value: date.to_string(),
    };

    let cleaned = date.replace('\'', "");
    if cleaned.trim() != cleaned {
        return Err(malformed());
    }
    let month = cleaned.split(char::is_whitespace).next().unwrap_or_default();
    if !MONTH_NAMES.contains(&month.to_ascii_lowercase().as_str()) {
        return Err(malformed());
    }
    let start = NaiveDate::parse_from_str(&format!("01 {cleaned}"), "%d %B %Y")
        .map_err(|_| malformed())?;
    let end = start
        .checked_add_months(Months::new(1))
        .ok_or_else(malformed)?;
    Ok((start, end))
}

/// ANDs the release date range for `date` into the query.
///
/// A malformed date leaves the query unchanged.
pub fn add_date_to_query(query: Query, date: &str) -> Query {
    match month_range(date) {
        Ok((start, end)) => query.and(Clause::release_between(start, end).into()),
        Err(e) => {
            debug!(error = %e, "Ignoring date filter");
            query
        }
    }
}
