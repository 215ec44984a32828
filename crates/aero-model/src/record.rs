//! Source rows and the accepted/rejected partition built from them.

use serde::Serialize;

use crate::value::CellValue;

/// One source row keyed by normalized field name.
///
/// Field order follows the source header order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawRecord {
    /// Zero-based data row position in the source.
    pub index: usize,
    fields: Vec<(String, CellValue)>,
}

impl RawRecord {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            fields: Vec::new(),
        }
    }

    /// Builds a record from `(name, value)` pairs, keeping the last value
    /// of a repeated name.
    pub fn from_pairs<I, K, V>(index: usize, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<CellValue>,
    {
        let mut record = Self::new(index);
        for (name, value) in pairs {
            record.set(name, value);
        }
        record
    }

    /// Value for `name`, or `CellValue::Missing` when the column is absent.
    pub fn get(&self, name: &str) -> &CellValue {
        const MISSING: &CellValue = &CellValue::Missing;
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map_or(MISSING, |(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(field, _)| field == name)
    }

    /// Inserts or replaces a field, preserving its original position.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<CellValue>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(field, _)| *field == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// True when every field is missing.
    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|(_, value)| value.is_missing())
    }
}

/// A row a transformer declined, with every reason it was declined.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedRecord {
    record: RawRecord,
    errors: Vec<String>,
}

/// Message used when a row is rejected without an explicit reason.
pub const UNSPECIFIED_REJECTION: &str = "Rejected: no reason recorded";

impl RejectedRecord {
    /// Wraps a cleaned row. An empty error list is replaced by
    /// [`UNSPECIFIED_REJECTION`] so the list is never empty.
    pub fn new(record: RawRecord, errors: Vec<String>) -> Self {
        let errors = if errors.is_empty() {
            vec![UNSPECIFIED_REJECTION.to_string()]
        } else {
            errors
        };
        Self { record, errors }
    }

    pub fn index(&self) -> usize {
        self.record.index
    }

    pub fn record(&self) -> &RawRecord {
        &self.record
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

/// An accepted entity together with its source row position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Accepted<T> {
    pub index: usize,
    pub record: T,
}

/// Exhaustive, order-preserving split of one feed's rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Partition<T> {
    pub accepted: Vec<Accepted<T>>,
    pub rejected: Vec<RejectedRecord>,
}

impl<T> Default for Partition<T> {
    fn default() -> Self {
        Self {
            accepted: Vec::new(),
            rejected: Vec::new(),
        }
    }
}

impl<T> Partition<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accept(&mut self, index: usize, record: T) {
        self.accepted.push(Accepted { index, record });
    }

    pub fn reject(&mut self, record: RawRecord, errors: Vec<String>) {
        self.rejected.push(RejectedRecord::new(record, errors));
    }

    pub fn total(&self) -> usize {
        self.accepted.len() + self.rejected.len()
    }

    pub fn accepted_records(&self) -> impl Iterator<Item = &T> {
        self.accepted.iter().map(|accepted| &accepted.record)
    }
}
