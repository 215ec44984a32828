//! Per-feed run statistics and the aggregate run summary.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ModelError;

/// Default cap on error strings retained per feed.
pub const DEFAULT_MAX_ERRORS: usize = 100;

/// One of the three domain data streams.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Feed {
    Passengers,
    Flights,
    Fares,
}

impl Feed {
    pub const ALL: [Feed; 3] = [Feed::Passengers, Feed::Flights, Feed::Fares];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Passengers => "passengers",
            Self::Flights => "flights",
            Self::Fares => "fares",
        }
    }

    /// Entity kinds a feed's loader creates, primary entity first.
    pub const fn entity_kinds(self) -> &'static [EntityKind] {
        match self {
            Self::Passengers => &[EntityKind::Passengers, EntityKind::Documents],
            Self::Flights => &[EntityKind::Flights],
            Self::Fares => &[EntityKind::Fares],
        }
    }

    pub const fn primary_entity(self) -> EntityKind {
        self.entity_kinds()[0]
    }
}

impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feed {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "passengers" | "passenger" => Ok(Self::Passengers),
            "flights" | "flight" => Ok(Self::Flights),
            "fares" | "fare" => Ok(Self::Fares),
            other => Err(ModelError::UnknownFeed(other.to_string())),
        }
    }
}

/// Kinds of records a loader creates in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum EntityKind {
    #[serde(rename = "passengers_created")]
    Passengers,
    #[serde(rename = "documents_created")]
    Documents,
    #[serde(rename = "flights_created")]
    Flights,
    #[serde(rename = "fares_created")]
    Fares,
}

impl EntityKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Passengers => "passengers",
            Self::Documents => "documents",
            Self::Flights => "flights",
            Self::Fares => "fares",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counters and error messages for one feed of one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunStats {
    #[serde(skip)]
    pub feed: Feed,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
    /// Non-blank rows read from the source.
    pub total_processed: usize,
    /// Rows the transformer accepted.
    pub valid_records: usize,
    /// Rows the transformer rejected.
    pub error_records: usize,
    #[serde(flatten)]
    pub created: BTreeMap<EntityKind, usize>,
    /// Exact number of load-time errors, including ones not retained.
    pub load_error_count: usize,
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub errors_truncated: bool,
    /// File-level failure that stopped this feed.
    #[serde(rename = "error", skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
    #[serde(skip)]
    max_errors: usize,
}

impl RunStats {
    pub fn new(feed: Feed) -> Self {
        let created = feed.entity_kinds().iter().map(|kind| (*kind, 0)).collect();
        Self {
            feed,
            source_file: None,
            total_processed: 0,
            valid_records: 0,
            error_records: 0,
            created,
            load_error_count: 0,
            errors: Vec::new(),
            errors_truncated: false,
            failure: None,
            max_errors: DEFAULT_MAX_ERRORS,
        }
    }

    #[must_use]
    pub fn with_source_file(mut self, source_file: impl Into<String>) -> Self {
        self.source_file = Some(source_file.into());
        self
    }

    #[must_use]
    pub fn with_error_limit(mut self, max_errors: usize) -> Self {
        self.max_errors = max_errors;
        self
    }

    pub fn max_errors(&self) -> usize {
        self.max_errors
    }

    /// Records the transformer's partition sizes.
    pub fn record_partition(&mut self, total: usize, valid: usize, rejected: usize) {
        self.total_processed = total;
        self.valid_records = valid;
        self.error_records = rejected;
    }

    pub fn record_created(&mut self, kind: EntityKind) {
        *self.created.entry(kind).or_insert(0) += 1;
    }

    pub fn created(&self, kind: EntityKind) -> usize {
        self.created.get(&kind).copied().unwrap_or(0)
    }

    /// Records a load-time error.
    ///
    /// Returns `false` when the message was counted but not retained
    /// because the error limit was reached.
    pub fn record_error(&mut self, message: impl Into<String>) -> bool {
        self.load_error_count += 1;
        if self.errors.len() < self.max_errors {
            self.errors.push(message.into());
            true
        } else {
            self.errors_truncated = true;
            false
        }
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.failure = Some(message.into());
    }

    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }

    /// Records the feed's primary entity kind created in the store.
    pub fn loaded(&self) -> usize {
        self.created(self.feed.primary_entity())
    }

    /// Rejected rows plus load-time errors.
    pub fn total_errors(&self) -> usize {
        self.error_records + self.load_error_count
    }

    pub fn has_errors(&self) -> bool {
        self.total_errors() > 0 || self.is_failed()
    }
}

/// Aggregate across the feeds of a run that completed.
///
/// A failed feed appears in the run report under its error only; whatever
/// it counted before failing is left out of the totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub total_processed: usize,
    pub total_valid: usize,
    pub total_loaded: usize,
    pub total_errors: usize,
    /// Accepted rows as a percentage of processed rows, two decimals.
    pub success_rate: f64,
}

impl RunSummary {
    pub fn from_stats<'a, I>(stats: I) -> Self
    where
        I: IntoIterator<Item = &'a RunStats>,
    {
        let mut summary = Self::default();
        for feed_stats in stats.into_iter().filter(|stats| !stats.is_failed()) {
            summary.total_processed += feed_stats.total_processed;
            summary.total_valid += feed_stats.valid_records;
            summary.total_loaded += feed_stats.loaded();
            summary.total_errors += feed_stats.total_errors();
        }
        summary.success_rate = if summary.total_processed == 0 {
            0.0
        } else {
            let rate = summary.total_valid as f64 / summary.total_processed as f64 * 100.0;
            (rate * 100.0).round() / 100.0
        };
        summary
    }
}
