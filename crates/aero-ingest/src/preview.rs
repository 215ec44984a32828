//! First-rows preview of a source file.

use std::path::{Path, PathBuf};

use aero_model::RawRecord;

use crate::error::Result;
use crate::reader::{SourceFormat, TabularReader};

/// Columns and leading rows of one source section.
#[derive(Debug, Clone)]
pub struct FilePreview {
    pub path: PathBuf,
    pub format: SourceFormat,
    /// Worksheets of a spreadsheet; empty for CSV.
    pub sheets: Vec<String>,
    pub columns: Vec<String>,
    pub rows: Vec<RawRecord>,
}

/// Reads the normalized column list and the first `rows` non-blank rows.
pub fn preview_file(path: &Path, sheet: Option<&str>, rows: usize) -> Result<FilePreview> {
    let mut reader = TabularReader::open(path)?;
    if let Some(sheet) = sheet {
        reader = reader.with_sheet(sheet);
    }

    let columns = reader.headers()?;
    let records = reader
        .records()?
        .take(rows)
        .collect::<Result<Vec<_>>>()?;

    Ok(FilePreview {
        path: path.to_path_buf(),
        format: reader.format(),
        sheets: reader.sheet_names()?,
        columns,
        rows: records,
    })
}
