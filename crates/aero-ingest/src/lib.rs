//! Tabular source ingestion for the airline ETL.
//!
//! This crate provides functionality for listing inbound files, classifying
//! them by feed, and reading CSV or spreadsheet rows as [`RawRecord`]s.
//!
//! # Features
//!
//! - **Tabular Reading**: CSV via `csv`, `.xlsx`/`.xls` via `calamine`, with
//!   normalized headers and blank rows dropped
//! - **File Discovery**: list supported files and classify them by name
//! - **Preview**: column list and first rows of a file
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use aero_ingest::{TabularReader, list_supported_files};
//!
//! for path in list_supported_files(Path::new("data/input"))? {
//!     let rows = TabularReader::open(&path)?.with_sheet("Flights").read_all()?;
//! }
//! ```
//!
//! [`RawRecord`]: aero_model::RawRecord

mod discovery;
mod error;
mod preview;
mod reader;

// === Error Types ===
pub use error::{IngestError, Result};

// === Tabular Reading ===
pub use reader::{Records, SourceFormat, TabularReader, normalize_header};

// === File Discovery ===
pub use discovery::{FileKind, classify_file, fare_sibling, list_supported_files};

// === Preview ===
pub use preview::{FilePreview, preview_file};
