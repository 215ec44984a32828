//! Tagged cell values produced by the tabular reader.
//!
//! Every conversion is total: it returns `None` instead of failing, so the
//! validation predicates built on top of them never panic.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

/// A single untyped scalar from a source row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Empty cell or absent column.
    #[default]
    Missing,
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// Spreadsheet date or datetime cell.
    DateTime(NaiveDateTime),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Returns true for absent values, NaN floats and text that trims to empty.
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Missing => true,
            Self::Text(value) => value.trim().is_empty(),
            Self::Float(value) => value.is_nan(),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Renders the value the way it would appear in a delimited file.
    pub fn render(&self) -> String {
        match self {
            Self::Missing => String::new(),
            Self::Text(value) => value.clone(),
            Self::Integer(value) => value.to_string(),
            Self::Float(value) if value.is_nan() => String::new(),
            Self::Float(value) => format_numeric(*value),
            Self::Bool(value) => value.to_string(),
            Self::DateTime(value) => value.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    /// Rendered text, or `None` when the value is missing.
    pub fn render_non_empty(&self) -> Option<String> {
        if self.is_missing() {
            None
        } else {
            Some(self.render())
        }
    }

    /// Integer view of the value.
    ///
    /// Floats (and float-looking text) convert only when they carry no
    /// fractional part, so `150.0` is `150` but `150.5` is rejected.
    pub fn parse_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            Self::Float(value) => integral_f64(*value),
            Self::Text(value) => {
                parse_i64(value).or_else(|| parse_f64(value).and_then(integral_f64))
            }
            _ => None,
        }
    }

    pub fn parse_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(value) => Some(*value as f64),
            Self::Float(value) if value.is_finite() => Some(*value),
            Self::Text(value) => parse_f64(value),
            _ => None,
        }
    }

    /// Parses a calendar date under an exact `chrono` format string.
    ///
    /// Spreadsheet datetimes are accepted when they fall on midnight, which
    /// is how workbooks store plain dates.
    pub fn parse_date(&self, format: &str) -> Option<NaiveDate> {
        match self {
            Self::Text(value) => NaiveDate::parse_from_str(value, format).ok(),
            Self::DateTime(value) if value.time() == NaiveTime::MIN => Some(value.date()),
            _ => None,
        }
    }

    /// Parses a timestamp under an exact `chrono` format string.
    pub fn parse_datetime(&self, format: &str) -> Option<NaiveDateTime> {
        match self {
            Self::Text(value) => NaiveDateTime::parse_from_str(value, format).ok(),
            Self::DateTime(value) => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Formats a floating-point number as a string without trailing zeros.
pub fn format_numeric(value: f64) -> String {
    let s = format!("{value}");
    if !s.contains('.') {
        return s;
    }
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Parses a string as f64, returning None for invalid, empty or non-finite input.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|parsed| parsed.is_finite())
}

/// Parses a string as i64, returning None for invalid or empty strings.
pub fn parse_i64(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<i64>().ok()
}

fn integral_f64(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}
