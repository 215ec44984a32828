//! Field-level predicates.
//!
//! Every predicate is total: it never panics and treats an absent value as
//! valid, leaving optionality to the caller. Required-ness is checked
//! separately with [`required`].

use std::sync::LazyLock;

use aero_model::{CellValue, RawRecord};
use chrono::{Local, NaiveDate};
use regex::Regex;
use uuid::Uuid;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("Invalid email regex")
});

static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9\s\-()]{10,15}$").expect("Invalid phone regex"));

/// Returns the names in `fields` that are absent, null, or blank in `record`,
/// in the order given.
pub fn required<'a>(record: &RawRecord, fields: &[&'a str]) -> Vec<&'a str> {
    fields
        .iter()
        .copied()
        .filter(|field| record.get(field).is_missing())
        .collect()
}

/// Permissive `local@domain.tld` check.
pub fn is_valid_email(value: &CellValue) -> bool {
    matches_pattern(&EMAIL_REGEX, value)
}

/// Optional leading `+`, then 10 to 15 digits, spaces, dashes or parentheses.
pub fn is_valid_phone(value: &CellValue) -> bool {
    matches_pattern(&PHONE_REGEX, value)
}

fn matches_pattern(pattern: &Regex, value: &CellValue) -> bool {
    value
        .render_non_empty()
        .is_none_or(|text| pattern.is_match(text.trim()))
}

/// True when the value parses as a date under exactly `format`.
pub fn is_valid_date(value: &CellValue, format: &str) -> bool {
    value.is_missing() || value.parse_date(format).is_some()
}

/// True when the value parses as a timestamp under exactly `format`.
pub fn is_valid_datetime(value: &CellValue, format: &str) -> bool {
    value.is_missing() || value.parse_datetime(format).is_some()
}

/// True when the value parses and falls strictly after today's local date.
pub fn is_future_date(value: &CellValue, format: &str) -> bool {
    is_future_date_on(value, format, Local::now().date_naive())
}

/// [`is_future_date`] against an explicit reference date.
pub fn is_future_date_on(value: &CellValue, format: &str, today: NaiveDate) -> bool {
    value.is_missing()
        || value
            .parse_date(format)
            .is_some_and(|date| date > today)
}

/// True when the value is a well-formed UUID.
pub fn is_valid_identifier(value: &CellValue) -> bool {
    value
        .render_non_empty()
        .is_none_or(|text| Uuid::parse_str(text.trim()).is_ok())
}
