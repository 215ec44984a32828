//! Per-feed bookkeeping shared by the loaders.

use aero_model::{EntityKind, RunStats};
use tracing::{debug, warn};

use crate::error::{LoadError, Result};
use crate::store::Store;

/// Default number of created records between store commits.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// A record the store refused, kept for the rejection report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    /// Source row position of the accepted record.
    pub index: usize,
    /// Name of the identifying field (`flight_number`, `passenger_id`, ...).
    pub field: &'static str,
    /// Value of the identifying field.
    pub key: String,
    pub message: String,
}

/// Commits every `chunk_size` created records and collects failures.
pub(crate) struct Checkpoint<'a> {
    stats: &'a mut RunStats,
    chunk_size: usize,
    since_commit: usize,
    created: usize,
    pub(crate) failures: Vec<LoadFailure>,
}

impl<'a> Checkpoint<'a> {
    pub(crate) fn new(stats: &'a mut RunStats, chunk_size: usize) -> Self {
        Self {
            stats,
            chunk_size,
            since_commit: 0,
            created: 0,
            failures: Vec::new(),
        }
    }

    /// Counts a created record; commits when a chunk is complete.
    pub(crate) fn created<S>(&mut self, store: &mut S, kind: EntityKind) -> Result<()>
    where
        S: Store + ?Sized,
    {
        self.stats.record_created(kind);
        if kind != self.stats.feed.primary_entity() {
            return Ok(());
        }
        self.created += 1;
        self.since_commit += 1;
        if self.chunk_size > 0 && self.since_commit >= self.chunk_size {
            self.commit(store)?;
            debug!(
                feed = %self.stats.feed,
                created = self.created,
                "chunk committed"
            );
        }
        Ok(())
    }

    /// Records a load-time error against a source row.
    pub(crate) fn failed(&mut self, failure: LoadFailure) {
        self.note(failure.message.clone());
        self.failures.push(failure);
    }

    /// Records a load-time error; warns once when the retention limit is hit.
    pub(crate) fn note(&mut self, message: String) {
        let already_truncated = self.stats.errors_truncated;
        if !self.stats.record_error(message) && !already_truncated {
            warn!(
                feed = %self.stats.feed,
                max_errors = self.stats.max_errors(),
                "error limit reached, further errors are counted but not kept"
            );
        }
    }

    pub(crate) fn commit<S>(&mut self, store: &mut S) -> Result<()>
    where
        S: Store + ?Sized,
    {
        store.commit().map_err(|source| LoadError::Store {
            feed: self.stats.feed,
            operation: "commit",
            source,
        })?;
        self.since_commit = 0;
        Ok(())
    }

    /// Final commit; returns the collected failures.
    pub(crate) fn finish<S>(mut self, store: &mut S) -> Result<Vec<LoadFailure>>
    where
        S: Store + ?Sized,
    {
        self.commit(store)?;
        Ok(self.failures)
    }
}
