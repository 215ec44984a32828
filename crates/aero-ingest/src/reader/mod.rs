//! Tabular source reading.
//!
//! A [`TabularReader`] is a cheap handle on one file (and optionally one
//! worksheet). Every call to [`TabularReader::records`] re-opens the source,
//! so iterating twice over an unchanged file yields the same rows.

mod csv;
mod workbook;

use std::fmt;
use std::path::{Path, PathBuf};

use aero_model::{CellValue, RawRecord};

use crate::error::{IngestError, Result};

/// Supported tabular source formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    /// Comma-delimited text with a header row.
    Csv,
    /// `.xlsx` / `.xls` workbook with named worksheets.
    Spreadsheet,
}

impl SourceFormat {
    /// File extensions recognised as tabular sources (lower-case).
    pub const EXTENSIONS: [&'static str; 3] = ["csv", "xlsx", "xls"];

    /// Detects the format from the extension, case-insensitively.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "xls" => Some(Self::Spreadsheet),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        Self::from_extension(extension).ok_or_else(|| IngestError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension: extension.to_string(),
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Spreadsheet => "spreadsheet",
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalizes a header value: trimmed, BOM stripped, lower-cased, with
/// spaces replaced by underscores.
pub fn normalize_header(value: &str) -> String {
    value
        .trim_start_matches('\u{feff}')
        .trim()
        .to_lowercase()
        .replace(' ', "_")
}

/// Handle on one tabular source.
#[derive(Debug, Clone)]
pub struct TabularReader {
    path: PathBuf,
    format: SourceFormat,
    sheet: Option<String>,
}

impl TabularReader {
    /// Checks that `path` exists and has a supported extension.
    ///
    /// The file itself is not parsed until rows are requested.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(IngestError::SourceNotFound {
                path: path.to_path_buf(),
            });
        }
        let format = SourceFormat::from_path(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            format,
            sheet: None,
        })
    }

    /// Selects a worksheet by name. Ignored for CSV sources, which have a
    /// single implicit section.
    #[must_use]
    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> SourceFormat {
        self.format
    }

    pub fn sheet(&self) -> Option<&str> {
        self.sheet.as_deref()
    }

    /// Worksheet names of a spreadsheet source; empty for CSV.
    pub fn sheet_names(&self) -> Result<Vec<String>> {
        match self.format {
            SourceFormat::Csv => Ok(Vec::new()),
            SourceFormat::Spreadsheet => workbook::sheet_names(&self.path),
        }
    }

    /// Actual name of the worksheet `wanted` resolves to, if the workbook
    /// has one. CSV sources have no named sheets.
    pub fn find_sheet(&self, wanted: &str) -> Result<Option<String>> {
        let names = self.sheet_names()?;
        Ok(workbook::match_sheet(&names, wanted).cloned())
    }

    /// Normalized column names of the selected section.
    pub fn headers(&self) -> Result<Vec<String>> {
        match self.format {
            SourceFormat::Csv => csv::headers(&self.path),
            SourceFormat::Spreadsheet => {
                workbook::open_sheet(&self.path, self.sheet.as_deref()).map(|sheet| sheet.headers)
            }
        }
    }

    /// Lazily yields the non-blank rows of the selected section.
    ///
    /// `RawRecord::index` is the zero-based data row position in the
    /// source; blank rows are skipped but still occupy a position. Empty
    /// CSV lines are dropped by the CSV parser itself and occupy none.
    pub fn records(&self) -> Result<Records> {
        tracing::debug!(
            path = %self.path.display(),
            format = %self.format,
            sheet = self.sheet.as_deref().unwrap_or("-"),
            "opening tabular source"
        );
        let inner = match self.format {
            SourceFormat::Csv => RecordsInner::Csv(csv::CsvRecords::open(&self.path)?),
            SourceFormat::Spreadsheet => RecordsInner::Sheet(
                workbook::open_sheet(&self.path, self.sheet.as_deref())?.into_records(),
            ),
        };
        Ok(Records { inner })
    }

    /// Collects every non-blank row, failing on the first malformed one.
    pub fn read_all(&self) -> Result<Vec<RawRecord>> {
        self.records()?.collect()
    }
}

/// Lazy row sequence returned by [`TabularReader::records`].
pub struct Records {
    inner: RecordsInner,
}

enum RecordsInner {
    Csv(csv::CsvRecords),
    Sheet(workbook::SheetRecords),
}

impl Iterator for Records {
    type Item = Result<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            RecordsInner::Csv(records) => records.next(),
            RecordsInner::Sheet(records) => records.next(),
        }
    }
}

/// Zips a header row with cell values into a record, `None` when blank.
///
/// Short rows are padded with missing values; surplus cells beyond the
/// header are dropped.
fn build_record(headers: &[String], index: usize, cells: Vec<CellValue>) -> Option<RawRecord> {
    let mut cells = cells.into_iter();
    let record = RawRecord::from_pairs(
        index,
        headers
            .iter()
            .map(|name| (name.clone(), cells.next().unwrap_or_default())),
    );
    (!record.is_blank()).then_some(record)
}
