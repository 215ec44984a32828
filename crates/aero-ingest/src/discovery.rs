//! Input directory listing and feed classification.

use std::fmt;
use std::path::{Path, PathBuf};

use aero_model::Feed;

use crate::error::{IngestError, Result};
use crate::reader::SourceFormat;

const PASSENGER_KEYWORD: &str = "passenger";
const FLIGHT_KEYWORD: &str = "flight";
const FARE_KEYWORD: &str = "fare";

/// Lists every file with a supported tabular extension in `dir`.
///
/// Returns files sorted by filename. Subdirectories are not descended.
pub fn list_supported_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let supported = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(SourceFormat::from_extension)
            .is_some();
        if supported {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// What an inbound file carries, judged from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// Passengers with their travel documents.
    Passengers,
    /// Flights, followed by the fares attached to them.
    Flights,
}

impl FileKind {
    /// Feeds processed for a file of this kind, in processing order.
    pub const fn feeds(self) -> &'static [Feed] {
        match self {
            Self::Passengers => &[Feed::Passengers],
            Self::Flights => &[Feed::Flights, Feed::Fares],
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Passengers => "passengers",
            Self::Flights => "flights",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a file by the keywords in its name.
///
/// Returns `None` when the name holds neither keyword or both of them.
pub fn classify_file(path: &Path) -> Option<FileKind> {
    let name = file_name_lower(path)?;
    match (name.contains(PASSENGER_KEYWORD), name.contains(FLIGHT_KEYWORD)) {
        (true, false) => Some(FileKind::Passengers),
        (false, true) => Some(FileKind::Flights),
        _ => None,
    }
}

/// Sibling file holding the fare section of a CSV flight file.
///
/// Every occurrence of `flight` in the file name is replaced with `fare`,
/// keeping the case of the original (`Flights_2024.csv` becomes
/// `Fares_2024.csv`). Returns `None` when the name has no `flight`.
pub fn fare_sibling(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?.to_str()?;
    let lower = name.to_ascii_lowercase();
    if !lower.contains(FLIGHT_KEYWORD) {
        return None;
    }

    let mut renamed = String::with_capacity(name.len());
    let mut last = 0;
    for (start, _) in lower.match_indices(FLIGHT_KEYWORD) {
        renamed.push_str(&name[last..start]);
        let original = &name[start..start + FLIGHT_KEYWORD.len()];
        renamed.push_str(&match_case(original, FARE_KEYWORD));
        last = start + FLIGHT_KEYWORD.len();
    }
    renamed.push_str(&name[last..]);

    Some(path.with_file_name(renamed))
}

fn match_case(original: &str, replacement: &str) -> String {
    if original.chars().all(|c| c.is_ascii_uppercase()) {
        replacement.to_ascii_uppercase()
    } else if original.starts_with(|c: char| c.is_ascii_uppercase()) {
        let mut chars = replacement.chars();
        chars
            .next()
            .map(|first| first.to_ascii_uppercase().to_string() + chars.as_str())
            .unwrap_or_default()
    } else {
        replacement.to_string()
    }
}

fn file_name_lower(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_ascii_lowercase)
}
