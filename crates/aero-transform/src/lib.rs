//! Feed transformation for the airline ETL.
//!
//! Each transformer cleans a row, runs its acceptance rules, and either
//! builds the typed entity or rejects the cleaned row with every reason.
//! The resulting [`Partition`] is exhaustive and keeps source order on both
//! sides.
//!
//! - **clean**: text trimming shared by all feeds
//! - **passenger** / **flight**: rows checked by the `aero-validate` rules
//! - **fare**: rows checked against the flight [`EntityKeyMap`] of the run
//!
//! [`EntityKeyMap`]: aero_model::EntityKeyMap

pub mod clean;
pub mod fare;
pub mod flight;
pub mod passenger;

use std::time::Instant;

use aero_model::{Feed, Partition, RawRecord};
use tracing::{debug, info, info_span};

pub use clean::{clean_record, clean_value};
pub use fare::{FARE_CLEAN_FIELDS, FARE_REQUIRED_FIELDS, FareTransformer};
pub use flight::{FLIGHT_CLEAN_FIELDS, FlightTransformer};
pub use passenger::{PASSENGER_CLEAN_FIELDS, PassengerTransformer};

/// Splits one feed's rows into accepted entities and rejected rows.
pub trait Transformer {
    type Output;

    fn transform<I>(&self, records: I) -> Partition<Self::Output>
    where
        I: IntoIterator<Item = RawRecord>;
}

/// Cleans each row, then accepts or rejects it by `process`.
///
/// Rejected rows carry the cleaned values, not the raw ones.
fn partition_rows<T, I, F>(
    feed: Feed,
    records: I,
    clean_fields: &[&str],
    mut process: F,
) -> Partition<T>
where
    I: IntoIterator<Item = RawRecord>,
    F: FnMut(&RawRecord) -> Result<T, Vec<String>>,
{
    let span = info_span!("transform", feed = %feed);
    let _guard = span.enter();
    let start = Instant::now();

    let mut partition = Partition::new();
    for record in records {
        let cleaned = clean_record(&record, clean_fields);
        match process(&cleaned) {
            Ok(entity) => partition.accept(cleaned.index, entity),
            Err(errors) => {
                debug!(row = cleaned.index, errors = errors.len(), "row rejected");
                partition.reject(cleaned, errors);
            }
        }
    }

    info!(
        accepted = partition.accepted.len(),
        rejected = partition.rejected.len(),
        duration_ms = start.elapsed().as_millis(),
        "transform complete"
    );
    partition
}
