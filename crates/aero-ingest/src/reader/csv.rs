//! Comma-delimited sources.

use std::fs::File;
use std::path::{Path, PathBuf};

use aero_model::{CellValue, RawRecord};
use ::csv::{Reader as CsvReader, ReaderBuilder, StringRecordsIntoIter};

use super::{build_record, normalize_header};
use crate::error::{IngestError, Result};

fn open_reader(path: &Path) -> Result<CsvReader<File>> {
    let file = File::open(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file))
}

fn read_headers(reader: &mut CsvReader<File>, path: &Path) -> Result<Vec<String>> {
    let headers = reader
        .headers()
        .map_err(|e| IngestError::malformed(path, e))?;
    Ok(headers.iter().map(normalize_header).collect())
}

pub(super) fn headers(path: &Path) -> Result<Vec<String>> {
    let mut reader = open_reader(path)?;
    read_headers(&mut reader, path)
}

fn cell_value(raw: &str) -> CellValue {
    if raw.is_empty() {
        CellValue::Missing
    } else {
        CellValue::text(raw)
    }
}

pub(super) struct CsvRecords {
    path: PathBuf,
    headers: Vec<String>,
    rows: StringRecordsIntoIter<File>,
    position: usize,
    done: bool,
}

impl CsvRecords {
    pub(super) fn open(path: &Path) -> Result<Self> {
        let mut reader = open_reader(path)?;
        let headers = read_headers(&mut reader, path)?;
        Ok(Self {
            path: path.to_path_buf(),
            headers,
            rows: reader.into_records(),
            position: 0,
            done: false,
        })
    }
}

impl Iterator for CsvRecords {
    type Item = Result<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let row = match self.rows.next()? {
                Ok(row) => row,
                Err(e) => {
                    self.done = true;
                    return Some(Err(IngestError::malformed(&self.path, e)));
                }
            };
            let index = self.position;
            self.position += 1;
            let cells = row.iter().map(cell_value).collect();
            if let Some(record) = build_record(&self.headers, index, cells) {
                return Some(Ok(record));
            }
        }
        None
    }
}
