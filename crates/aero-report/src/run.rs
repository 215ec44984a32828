//! Final JSON run report.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use aero_model::{RunStats, RunSummary};
use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::{ensure_dir, write_json};

/// One entry of the report's `statistics` object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FeedEntry {
    Stats(RunStats),
    /// The file could not be processed.
    Failed { error: String },
}

/// Per-feed statistics and the aggregate summary of one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub timestamp: String,
    pub statistics: BTreeMap<String, FeedEntry>,
    pub summary: RunSummary,
}

impl RunReport {
    /// Builds the report from every feed's stats, in processing order.
    ///
    /// Entries are keyed by feed name. A feed processed for more than one
    /// file gets its later entries keyed `<feed>:<source file>`.
    pub fn new(timestamp: impl Into<String>, stats: &[RunStats]) -> Self {
        let mut statistics = BTreeMap::new();
        for feed_stats in stats {
            let mut key = feed_stats.feed.to_string();
            if statistics.contains_key(&key) {
                key = format!(
                    "{key}:{}",
                    feed_stats.source_file.as_deref().unwrap_or("unknown")
                );
            }
            let entry = match &feed_stats.failure {
                Some(error) => FeedEntry::Failed {
                    error: error.clone(),
                },
                None => FeedEntry::Stats(feed_stats.clone()),
            };
            statistics.insert(key, entry);
        }
        Self {
            timestamp: timestamp.into(),
            statistics,
            summary: RunSummary::from_stats(stats),
        }
    }

    /// Writes `etl_report_<timestamp>.json` into `output_dir`.
    pub fn write(&self, output_dir: &Path) -> Result<PathBuf> {
        ensure_dir(output_dir)?;
        let path = output_dir.join(format!("etl_report_{}.json", self.timestamp));
        write_json(&path, self)?;
        info!(path = %path.display(), "run report written");
        Ok(path)
    }
}
