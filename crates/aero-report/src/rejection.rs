//! Per-feed rejection report: a flat CSV plus a JSON summary.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use aero_load::LoadFailure;
use aero_model::{Feed, RejectedRecord};
use serde::Serialize;
use tracing::info;

use crate::categorize::categorize_errors;
use crate::error::{ReportError, Result};
use crate::{ensure_dir, write_json};

/// Column holding a row's error messages, joined.
pub const ERRORS_COLUMN: &str = "_errors";
/// Column holding a row's source position.
pub const INDEX_COLUMN: &str = "_original_index";
/// Separator between messages in [`ERRORS_COLUMN`].
pub const ERROR_SEPARATOR: &str = "; ";

/// Everything one feed declined to persist.
#[derive(Debug, Clone, Copy)]
pub struct RejectionReport<'a> {
    pub feed: Feed,
    pub source_file: &'a str,
    /// Rows the transformer rejected.
    pub rejected: &'a [RejectedRecord],
    /// Accepted rows the loader could not persist.
    pub failures: &'a [LoadFailure],
}

/// Paths of a written rejection report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenRejectionReport {
    pub errors_csv: PathBuf,
    pub summary_json: PathBuf,
}

#[derive(Debug, Serialize)]
struct RejectionSummary<'a> {
    source_file: &'a str,
    feed: Feed,
    timestamp: &'a str,
    total_errors: usize,
    error_categories: BTreeMap<String, usize>,
}

impl<'a> RejectionReport<'a> {
    pub fn is_empty(&self) -> bool {
        self.rejected.is_empty() && self.failures.is_empty()
    }

    /// Rows written to the CSV: rejected rows then load failures.
    pub fn total_errors(&self) -> usize {
        self.rejected.len() + self.failures.len()
    }

    /// Every message, in report order.
    pub fn messages(&self) -> impl Iterator<Item = &'a str> {
        let rejected = self.rejected;
        let failures = self.failures;
        rejected
            .iter()
            .flat_map(|row| row.errors().iter().map(String::as_str))
            .chain(failures.iter().map(|failure| failure.message.as_str()))
    }

    /// Union of field names in first-seen order, then the two meta columns.
    pub fn columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = Vec::new();
        let mut push = |name: &str| {
            if !columns.iter().any(|c| c == name) {
                columns.push(name.to_string());
            }
        };
        for row in self.rejected {
            row.record().field_names().for_each(&mut push);
        }
        for failure in self.failures {
            push(failure.field);
        }
        columns.push(ERRORS_COLUMN.to_string());
        columns.push(INDEX_COLUMN.to_string());
        columns
    }

    /// Writes `<feed>_errors_<timestamp>.csv` and
    /// `<feed>_summary_<timestamp>.json` into `errors_dir`.
    ///
    /// Returns `None` without touching the filesystem when nothing failed.
    pub fn write(
        &self,
        errors_dir: &Path,
        timestamp: &str,
    ) -> Result<Option<WrittenRejectionReport>> {
        if self.is_empty() {
            return Ok(None);
        }
        ensure_dir(errors_dir)?;

        let errors_csv = errors_dir.join(format!("{}_errors_{timestamp}.csv", self.feed));
        self.write_csv(&errors_csv)?;

        let summary_json = errors_dir.join(format!("{}_summary_{timestamp}.json", self.feed));
        let summary = RejectionSummary {
            source_file: self.source_file,
            feed: self.feed,
            timestamp,
            total_errors: self.total_errors(),
            error_categories: categorize_errors(self.messages()),
        };
        write_json(&summary_json, &summary)?;

        info!(
            feed = %self.feed,
            rows = self.total_errors(),
            path = %errors_csv.display(),
            "rejection report written"
        );
        Ok(Some(WrittenRejectionReport {
            errors_csv,
            summary_json,
        }))
    }

    fn write_csv(&self, path: &Path) -> Result<()> {
        let csv_error = |source| ReportError::Csv {
            path: path.to_path_buf(),
            source,
        };
        let columns = self.columns();
        let field_columns = &columns[..columns.len() - 2];

        let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
        writer.write_record(&columns).map_err(csv_error)?;

        for row in self.rejected {
            let record = row.record();
            let mut cells: Vec<String> = field_columns
                .iter()
                .map(|name| record.get(name).render())
                .collect();
            cells.push(row.errors().join(ERROR_SEPARATOR));
            cells.push(row.index().to_string());
            writer.write_record(&cells).map_err(csv_error)?;
        }

        for failure in self.failures {
            let mut cells: Vec<String> = field_columns
                .iter()
                .map(|name| {
                    if name == failure.field {
                        failure.key.clone()
                    } else {
                        String::new()
                    }
                })
                .collect();
            cells.push(failure.message.clone());
            cells.push(failure.index.to_string());
            writer.write_record(&cells).map_err(csv_error)?;
        }

        writer.flush().map_err(|source| ReportError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}
