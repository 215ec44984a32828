//! Flight feed loader.

use std::time::Instant;

use aero_model::{Accepted, EntityKeyMap, EntityKind, Flight, RunStats};
use tracing::{debug, info, info_span};

use crate::checkpoint::{Checkpoint, DEFAULT_CHUNK_SIZE, LoadFailure};
use crate::error::Result;
use crate::store::Store;

/// Outcome of a flight load.
#[derive(Debug, Clone, Default)]
pub struct FlightLoad {
    /// Flight number to stored flight identifier, for the fare stage.
    pub flights: EntityKeyMap,
    pub failures: Vec<LoadFailure>,
}

/// Persists flights and builds the flight [`EntityKeyMap`].
pub struct FlightLoader<'s, S: ?Sized> {
    store: &'s mut S,
    chunk_size: usize,
}

impl<'s, S: Store + ?Sized> FlightLoader<'s, S> {
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

    /// Creates each flight and maps its number to the stored identifier.
    ///
    /// The map is built as flights are created, so it only holds flights
    /// the store accepted. A later flight with the same number replaces the
    /// earlier mapping.
    pub fn load(self, flights: &[Accepted<Flight>], stats: &mut RunStats) -> Result<FlightLoad> {
        let span = info_span!("load", feed = %stats.feed, records = flights.len());
        let _guard = span.enter();
        let start = Instant::now();

        let mut key_map = EntityKeyMap::new();
        let mut checkpoint = Checkpoint::new(stats, self.chunk_size);
        for accepted in flights {
            let flight = &accepted.record;
            match self.store.create_flight(flight) {
                Ok(flight_id) => {
                    if let Ok(Some(previous)) = key_map.insert(&flight.flight_number, flight_id) {
                        debug!(
                            row = accepted.index,
                            flight_number = %flight.flight_number,
                            %previous,
                            "flight number mapped again"
                        );
                    }
                    checkpoint.created(&mut *self.store, EntityKind::Flights)?;
                }
                Err(err) => {
                    debug!(row = accepted.index, error = %err, "flight rejected by store");
                    checkpoint.failed(LoadFailure {
                        index: accepted.index,
                        field: "flight_number",
                        key: flight.flight_number.clone(),
                        message: format!(
                            "Flight creation failed: {}: {err}",
                            flight.flight_number
                        ),
                    });
                }
            }
        }
        let failures = checkpoint.finish(&mut *self.store)?;

        info!(
            flights_created = stats.created(EntityKind::Flights),
            mapped = key_map.len(),
            errors = stats.load_error_count,
            duration_ms = start.elapsed().as_millis(),
            "flight load complete"
        );
        Ok(FlightLoad {
            flights: key_map,
            failures,
        })
    }
}
