//! Fare feed loader.

use std::time::Instant;

use aero_model::{Accepted, EntityKeyMap, EntityKind, Fare, RunStats};
use tracing::{debug, info, info_span};

use crate::checkpoint::{Checkpoint, DEFAULT_CHUNK_SIZE, LoadFailure};
use crate::error::Result;
use crate::store::Store;

/// Persists fares against flights loaded earlier in the same run.
pub struct FareLoader<'s, S: ?Sized> {
    store: &'s mut S,
    chunk_size: usize,
}

impl<'s, S: Store + ?Sized> FareLoader<'s, S> {
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

    /// Creates each fare under the flight `flights` maps its number to.
    ///
    /// A fare whose flight number is not in `flights` is recorded as a
    /// failure and never reaches the store.
    pub fn load(
        self,
        fares: &[Accepted<Fare>],
        flights: &EntityKeyMap,
        stats: &mut RunStats,
    ) -> Result<Vec<LoadFailure>> {
        let span = info_span!("load", feed = %stats.feed, records = fares.len());
        let _guard = span.enter();
        let start = Instant::now();

        let mut checkpoint = Checkpoint::new(stats, self.chunk_size);
        for accepted in fares {
            let fare = &accepted.record;
            let Some(flight_id) = flights.get(&fare.flight_number) else {
                checkpoint.failed(LoadFailure {
                    index: accepted.index,
                    field: "flight_number",
                    key: fare.flight_number.clone(),
                    message: format!(
                        "Unresolved reference: flight {} not found",
                        fare.flight_number
                    ),
                });
                continue;
            };

            let resolved;
            let fare = if fare.flight_id == flight_id {
                fare
            } else {
                resolved = Fare {
                    flight_id,
                    ..fare.clone()
                };
                &resolved
            };

            match self.store.create_fare(fare) {
                Ok(_) => checkpoint.created(&mut *self.store, EntityKind::Fares)?,
                Err(err) => {
                    debug!(row = accepted.index, error = %err, "fare rejected by store");
                    checkpoint.failed(LoadFailure {
                        index: accepted.index,
                        field: "flight_number",
                        key: fare.flight_number.clone(),
                        message: format!("Fare creation failed: {}: {err}", fare.flight_number),
                    });
                }
            }
        }
        let failures = checkpoint.finish(&mut *self.store)?;

        info!(
            fares_created = stats.created(EntityKind::Fares),
            errors = stats.load_error_count,
            duration_ms = start.elapsed().as_millis(),
            "fare load complete"
        );
        Ok(failures)
    }
}
