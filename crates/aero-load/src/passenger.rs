//! Passenger feed loader.

use std::time::Instant;

use aero_model::{Accepted, EntityKind, NewPassengerDocument, Passenger, RunStats};
use tracing::{debug, info, info_span};

use crate::checkpoint::{Checkpoint, DEFAULT_CHUNK_SIZE, LoadFailure};
use crate::error::{LoadError, Result};
use crate::store::Store;

/// Persists passengers and their travel documents.
pub struct PassengerLoader<'s, S: ?Sized> {
    store: &'s mut S,
    chunk_size: usize,
}

impl<'s, S: Store + ?Sized> PassengerLoader<'s, S> {
    pub fn new(store: &'s mut S) -> Self {
        Self {
            store,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Creates each passenger, then its document.
    ///
    /// A passenger whose document type is unknown to the store is kept and
    /// its document skipped. Returns every record the store refused.
    pub fn load(
        self,
        passengers: &[Accepted<Passenger>],
        stats: &mut RunStats,
    ) -> Result<Vec<LoadFailure>> {
        let span = info_span!("load", feed = %stats.feed, records = passengers.len());
        let _guard = span.enter();
        let start = Instant::now();

        let document_types =
            self.store
                .document_type_ids()
                .map_err(|source| LoadError::Store {
                    feed: stats.feed,
                    operation: "read document types",
                    source,
                })?;

        let mut checkpoint = Checkpoint::new(stats, self.chunk_size);
        for accepted in passengers {
            let passenger = &accepted.record;
            let key = passenger.passenger_id.to_string();

            let passenger_id = match self.store.create_passenger(passenger) {
                Ok(id) => id,
                Err(err) => {
                    debug!(row = accepted.index, error = %err, "passenger rejected by store");
                    checkpoint.failed(LoadFailure {
                        index: accepted.index,
                        field: "passenger_id",
                        message: format!("Passenger creation failed: {key}: {err}"),
                        key,
                    });
                    continue;
                }
            };
            checkpoint.created(&mut *self.store, EntityKind::Passengers)?;

            let document = &passenger.document;
            let Some(&document_type_id) = document_types.get(&document.document_type) else {
                checkpoint.failed(LoadFailure {
                    index: accepted.index,
                    field: "passenger_id",
                    message: format!("Unknown document type: {}", document.document_type),
                    key,
                });
                continue;
            };

            let new_document = NewPassengerDocument {
                passenger_id,
                document_type_id,
                document_number: document.document_number.clone(),
                expiry_date: document.expiry_date,
                country_of_issue: document.country_of_issue.clone(),
            };
            match self.store.create_passenger_document(&new_document) {
                Ok(_) => checkpoint.created(&mut *self.store, EntityKind::Documents)?,
                Err(err) => checkpoint.failed(LoadFailure {
                    index: accepted.index,
                    field: "passenger_id",
                    message: format!("Document creation failed: {key}: {err}"),
                    key,
                }),
            }
        }
        let failures = checkpoint.finish(&mut *self.store)?;

        info!(
            passengers_created = stats.created(EntityKind::Passengers),
            documents_created = stats.created(EntityKind::Documents),
            errors = stats.load_error_count,
            duration_ms = start.elapsed().as_millis(),
            "passenger load complete"
        );
        Ok(failures)
    }
}
