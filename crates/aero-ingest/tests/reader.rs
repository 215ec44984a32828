//! Integration tests for tabular reading.

use std::path::{Path, PathBuf};

use aero_ingest::{IngestError, SourceFormat, TabularReader, preview_file};
use aero_model::CellValue;
use rust_xlsxwriter::Workbook;
use tempfile::TempDir;

fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write fixture");
    path
}

#[test]
fn csv_rows_use_normalized_headers() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_file(
        dir.path(),
        "passengers.csv",
        "\u{feff}First Name, Last Name ,EMAIL\nAnna,Ivanova,anna@example.com\nBoris,,\n",
    );

    let reader = TabularReader::open(&path).expect("open");
    assert_eq!(reader.format(), SourceFormat::Csv);
    assert_eq!(
        reader.headers().expect("headers"),
        vec!["first_name", "last_name", "email"]
    );

    let rows = reader.read_all().expect("rows");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get("first_name"), &CellValue::text("Anna"));
    assert_eq!(rows[1].get("last_name"), &CellValue::Missing);
    assert_eq!(rows[1].index, 1);
}

#[test]
fn blank_rows_are_dropped_but_keep_positions() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_file(
        dir.path(),
        "flights.csv",
        "flight_number,total_seats\nAB123,150\n,\n  , \nCD456,90\n",
    );

    let rows = TabularReader::open(&path)
        .expect("open")
        .read_all()
        .expect("rows");
    let indices: Vec<usize> = rows.iter().map(|r| r.index).collect();
    assert_eq!(indices, vec![0, 3]);
}

#[test]
fn empty_csv_lines_take_no_position() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_file(
        dir.path(),
        "flights.csv",
        "flight_number,total_seats\nAB123,150\n\n,\nCD456,90\n",
    );

    let rows = TabularReader::open(&path)
        .expect("open")
        .read_all()
        .expect("rows");
    let indices: Vec<usize> = rows.iter().map(|r| r.index).collect();
    assert_eq!(indices, vec![0, 2]);
}

#[test]
fn reading_twice_yields_the_same_rows() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_file(dir.path(), "fares.csv", "fare_class,price\nECON,100\nBUS,250\n");

    let reader = TabularReader::open(&path).expect("open");
    let first = reader.read_all().expect("first pass");
    let second = reader.read_all().expect("second pass");
    assert_eq!(first, second);
}

#[test]
fn short_rows_are_padded() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_file(dir.path(), "flights.csv", "a,b,c\n1,2\n");

    let rows = TabularReader::open(&path)
        .expect("open")
        .read_all()
        .expect("rows");
    assert_eq!(rows[0].len(), 3);
    assert!(rows[0].get("c").is_missing());
}

#[test]
fn missing_file_is_source_not_found() {
    let dir = TempDir::new().expect("temp dir");
    let result = TabularReader::open(dir.path().join("passengers.csv"));
    assert!(matches!(result, Err(IngestError::SourceNotFound { .. })));
}

#[test]
fn unknown_extension_is_unsupported() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_file(dir.path(), "passengers.json", "[]");
    match TabularReader::open(&path) {
        Err(IngestError::UnsupportedFormat { extension, .. }) => assert_eq!(extension, "json"),
        other => panic!("expected UnsupportedFormat, got {other:?}"),
    }
}

#[test]
fn corrupt_workbook_is_malformed() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_file(dir.path(), "flights.xlsx", "this is not a zip archive");

    let reader = TabularReader::open(&path)
        .expect("open")
        .with_sheet("Flights");
    assert!(matches!(
        reader.records(),
        Err(IngestError::MalformedSource { .. })
    ));
}

/// Writes a workbook; cells that parse as numbers are stored as numbers.
fn write_workbook(path: &Path, sheets: &[(&str, &[&[&str]])]) {
    let mut workbook = Workbook::new();
    for (name, rows) in sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(*name).expect("sheet name");
        for (row, cells) in rows.iter().enumerate() {
            for (col, value) in cells.iter().enumerate() {
                let (row, col) = (row as u32, col as u16);
                let written = match value.parse::<f64>() {
                    Ok(number) => sheet.write_number(row, col, number),
                    Err(_) => sheet.write_string(row, col, *value),
                };
                written.expect("write cell");
            }
        }
    }
    workbook.save(path).expect("save workbook");
}

#[test]
fn workbook_sheet_has_normalized_headers_and_numeric_cells() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("flights.xlsx");
    write_workbook(
        &path,
        &[
            (
                "Flights",
                &[&["Flight Number", "TOTAL SEATS"], &["AB123", "150"]],
            ),
            ("FARES", &[&["fare_class", "price"], &["ECON", "4500.5"]]),
        ],
    );

    let reader = TabularReader::open(&path).expect("open");
    assert_eq!(reader.format(), SourceFormat::Spreadsheet);
    assert_eq!(reader.sheet_names().expect("sheets"), ["Flights", "FARES"]);

    let flights = reader.clone().with_sheet("Flights");
    assert_eq!(
        flights.headers().expect("headers"),
        vec!["flight_number", "total_seats"]
    );
    let rows = flights.read_all().expect("rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("flight_number"), &CellValue::text("AB123"));
    assert_eq!(rows[0].get("total_seats"), &CellValue::Float(150.0));
}

#[test]
fn workbook_sheet_name_matches_case_insensitively() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("flights.xlsx");
    write_workbook(
        &path,
        &[
            ("Flights", &[&["flight_number"], &["AB123"]]),
            ("FARES", &[&["fare_class", "price"], &["ECON", "4500.5"]]),
        ],
    );

    let reader = TabularReader::open(&path).expect("open");
    assert_eq!(
        reader.find_sheet("Fares").expect("find"),
        Some("FARES".to_string())
    );
    assert_eq!(reader.find_sheet("Tickets").expect("find"), None);

    let rows = reader.with_sheet("fares").read_all().expect("rows");
    assert_eq!(rows[0].get("price"), &CellValue::Float(4500.5));
}

#[test]
fn missing_worksheet_is_malformed() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("flights.xlsx");
    write_workbook(&path, &[("Flights", &[&["flight_number"], &["AB123"]])]);

    let reader = TabularReader::open(&path).expect("open").with_sheet("Fares");
    match reader.read_all() {
        Err(IngestError::MalformedSource { message, .. }) => {
            assert_eq!(message, "worksheet 'Fares' not found");
        }
        other => panic!("expected MalformedSource, got {other:?}"),
    }
}

#[test]
fn preview_limits_rows() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_file(
        dir.path(),
        "passengers.csv",
        "first_name,last_name\nA,B\nC,D\nE,F\n",
    );

    let preview = preview_file(&path, None, 2).expect("preview");
    assert_eq!(preview.columns, vec!["first_name", "last_name"]);
    assert_eq!(preview.rows.len(), 2);
    assert!(preview.sheets.is_empty());
}
