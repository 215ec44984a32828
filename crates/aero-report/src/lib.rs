//! Report writing for the airline ETL.
//!
//! - **rejection**: per-feed `<feed>_errors_<ts>.csv` and
//!   `<feed>_summary_<ts>.json`
//! - **run**: the final `etl_report_<ts>.json`
//! - **categorize**: error grouping by leading token

mod categorize;
mod error;
mod rejection;
mod run;

use std::path::Path;

use chrono::{Local, NaiveDateTime};
use serde::Serialize;

pub use categorize::{GENERAL_CATEGORY, categorize_errors, error_category};
pub use error::{ReportError, Result};
pub use rejection::{
    ERROR_SEPARATOR, ERRORS_COLUMN, INDEX_COLUMN, RejectionReport, WrittenRejectionReport,
};
pub use run::{FeedEntry, RunReport};

/// File-name timestamp format, e.g. `20240101_103000`.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Local wall-clock time in [`TIMESTAMP_FORMAT`].
pub fn timestamp_now() -> String {
    format_timestamp(Local::now().naive_local())
}

fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|source| ReportError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, format!("{json}\n")).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })
}
