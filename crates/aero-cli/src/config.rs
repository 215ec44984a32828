//! Run configuration loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file) is a valid
//! configuration:
//!
//! ```toml
//! [paths]
//! input_dir = "data/input"
//!
//! [processing]
//! chunk_size = 500
//!
//! [mappings.fare_class]
//! ECON = "ECONOMY"
//! PREM = "PREMIUM_ECONOMY"
//!
//! [document_types]
//! INTERNATIONAL_PASSPORT = "International passport"
//! ```
//!
//! A mapping table given in the file replaces the default table of the same
//! name; the other tables keep their defaults.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use aero_load::{DEFAULT_CHUNK_SIZE, DEFAULT_DOCUMENT_TYPES};
use aero_model::{DEFAULT_MAX_ERRORS, MappingTables};
use aero_validate::{DEFAULT_DATE_FORMAT, DEFAULT_DATETIME_FORMAT};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Configuration file picked up from the working directory when
/// `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "aero-etl.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EtlConfig {
    pub paths: PathsConfig,
    pub processing: ProcessingConfig,
    pub mappings: MappingTables,
    /// Document-type code to display name, seeded into the store.
    pub document_types: DocumentTypes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub processed_dir: PathBuf,
    pub errors_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("data/input"),
            output_dir: PathBuf::from("data/output"),
            processed_dir: PathBuf::from("data/processed"),
            errors_dir: PathBuf::from("data/errors"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Created records between store commits.
    pub chunk_size: usize,
    /// Error strings retained per feed.
    pub max_errors: usize,
    pub date_format: String,
    pub datetime_format: String,
    pub flights_sheet: String,
    pub fares_sheet: String,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_errors: DEFAULT_MAX_ERRORS,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            datetime_format: DEFAULT_DATETIME_FORMAT.to_string(),
            flights_sheet: "Flights".to_string(),
            fares_sheet: "Fares".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentTypes(pub BTreeMap<String, String>);

impl Default for DocumentTypes {
    fn default() -> Self {
        Self(
            DEFAULT_DOCUMENT_TYPES
                .iter()
                .map(|(code, name)| ((*code).to_string(), (*name).to_string()))
                .collect(),
        )
    }
}

impl DocumentTypes {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(code, name)| (code.as_str(), name.as_str()))
    }
}

impl EtlConfig {
    /// Loads `path`, or [`DEFAULT_CONFIG_FILE`] when it exists, or the
    /// defaults.
    ///
    /// An explicitly given file must exist and parse.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("parse config {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Creates the input, output, processed and errors directories.
    pub fn ensure_directories(&self) -> Result<()> {
        let paths = &self.paths;
        for dir in [
            &paths.input_dir,
            &paths.output_dir,
            &paths.processed_dir,
            &paths.errors_dir,
        ] {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("create directory {}", dir.display()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_defaults() {
        let config = EtlConfig::from_toml("").unwrap();
        assert_eq!(config, EtlConfig::default());
        assert_eq!(config.processing.chunk_size, 1000);
        assert_eq!(config.processing.max_errors, 100);
        assert_eq!(config.paths.errors_dir, PathBuf::from("data/errors"));
    }

    #[test]
    fn test_partial_override() {
        let config = EtlConfig::from_toml(
            r#"
            [paths]
            input_dir = "/srv/inbound"

            [processing]
            chunk_size = 50

            [mappings.fare_class]
            prem = "premium_economy"
            "#,
        )
        .unwrap();

        assert_eq!(config.paths.input_dir, PathBuf::from("/srv/inbound"));
        assert_eq!(config.paths.output_dir, PathBuf::from("data/output"));
        assert_eq!(config.processing.chunk_size, 50);
        assert_eq!(config.processing.fares_sheet, "Fares");
        assert_eq!(
            config.mappings.fare_class.resolve("Prem"),
            Some("PREMIUM_ECONOMY")
        );
        assert_eq!(config.mappings.fare_class.resolve("ECON"), None);
        assert_eq!(
            config.mappings.document_type.resolve("passport"),
            Some("INTERNATIONAL_PASSPORT")
        );
        assert_eq!(config.document_types.0.len(), 5);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = EtlConfig::from_toml("[processing]\nchunk = 5\n").unwrap_err();
        assert!(err.to_string().contains("chunk"));
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = EtlConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(format!("{err:#}").starts_with("read config"));
    }

    #[test]
    fn test_ensure_directories() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = EtlConfig::default();
        config.paths.input_dir = dir.path().join("in");
        config.paths.output_dir = dir.path().join("out");
        config.paths.processed_dir = dir.path().join("done");
        config.paths.errors_dir = dir.path().join("nested/errors");

        config.ensure_directories().unwrap();
        assert!(dir.path().join("nested/errors").is_dir());
        assert!(dir.path().join("done").is_dir());
    }
}
