//! Spreadsheet sources read through `calamine`.

use std::path::Path;

use aero_model::{CellValue, RawRecord};
use calamine::{Data, Reader, open_workbook_auto};
use chrono::{NaiveDate, NaiveDateTime};

use super::{build_record, normalize_header};
use crate::error::{IngestError, Result};

pub(super) fn sheet_names(path: &Path) -> Result<Vec<String>> {
    let workbook = open_workbook_auto(path).map_err(|e| IngestError::malformed(path, e))?;
    Ok(workbook.sheet_names())
}

/// An exact name match wins; otherwise the name is matched
/// case-insensitively.
pub(super) fn match_sheet<'a>(names: &'a [String], wanted: &str) -> Option<&'a String> {
    names
        .iter()
        .find(|name| name.as_str() == wanted)
        .or_else(|| names.iter().find(|name| name.eq_ignore_ascii_case(wanted)))
}

/// One worksheet, fully decoded.
pub(super) struct Sheet {
    pub(super) headers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    pub(super) fn into_records(self) -> SheetRecords {
        SheetRecords {
            headers: self.headers,
            rows: self.rows.into_iter().enumerate(),
        }
    }
}

/// Opens `sheet` (see [`match_sheet`]), or the first worksheet when no
/// name is given.
pub(super) fn open_sheet(path: &Path, sheet: Option<&str>) -> Result<Sheet> {
    let mut workbook = open_workbook_auto(path).map_err(|e| IngestError::malformed(path, e))?;
    let names = workbook.sheet_names();
    let name = match sheet {
        Some(wanted) => match_sheet(&names, wanted)
            .cloned()
            .ok_or_else(|| {
                IngestError::malformed(path, format!("worksheet '{wanted}' not found"))
            })?,
        None => names
            .first()
            .cloned()
            .ok_or_else(|| IngestError::malformed(path, "workbook has no worksheets"))?,
    };

    let range = workbook
        .worksheet_range(&name)
        .map_err(|e| IngestError::malformed(path, format!("worksheet '{name}': {e}")))?;

    let mut rows = range.rows();
    let headers = rows
        .next()
        .map(|header| {
            header
                .iter()
                .map(|cell| normalize_header(&cell.to_string()))
                .collect()
        })
        .unwrap_or_default();
    let rows = rows
        .map(|row| row.iter().map(cell_value).collect())
        .collect();
    Ok(Sheet { headers, rows })
}

pub(super) struct SheetRecords {
    headers: Vec<String>,
    rows: std::iter::Enumerate<std::vec::IntoIter<Vec<CellValue>>>,
}

impl Iterator for SheetRecords {
    type Item = Result<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows
            .by_ref()
            .find_map(|(index, cells)| build_record(&self.headers, index, cells))
            .map(Ok)
    }
}

fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty | Data::Error(_) => CellValue::Missing,
        Data::String(value) if value.is_empty() => CellValue::Missing,
        Data::String(value) => CellValue::text(value.as_str()),
        Data::Int(value) => CellValue::Integer(*value),
        Data::Float(value) => CellValue::Float(*value),
        Data::Bool(value) => CellValue::Bool(*value),
        Data::DateTime(value) => value
            .as_datetime()
            .map_or(CellValue::Float(value.as_f64()), CellValue::DateTime),
        Data::DateTimeIso(value) => parse_iso(value),
        Data::DurationIso(value) => CellValue::text(value.as_str()),
    }
}

fn parse_iso(value: &str) -> CellValue {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map_or_else(|| CellValue::text(value), CellValue::DateTime)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_conversion() {
        assert_eq!(cell_value(&Data::Empty), CellValue::Missing);
        assert_eq!(cell_value(&Data::String(String::new())), CellValue::Missing);
        assert_eq!(cell_value(&Data::Float(150.0)), CellValue::Float(150.0));
        assert_eq!(cell_value(&Data::Int(7)), CellValue::Integer(7));
        assert_eq!(
            cell_value(&Data::String("AB123".to_string())),
            CellValue::text("AB123")
        );
    }

    #[test]
    fn test_iso_datetime_cells() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_opt(10, 0, 0))
            .unwrap();
        assert_eq!(
            parse_iso("2024-01-01T10:00:00"),
            CellValue::DateTime(expected)
        );
        assert_eq!(parse_iso("not a date"), CellValue::text("not a date"));
    }
}
