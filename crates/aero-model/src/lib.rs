//! Shared data model for the airline ETL pipeline.
//!
//! Reader output ([`RawRecord`] of [`CellValue`]s), transformer output
//! ([`Partition`] of typed entities and [`RejectedRecord`]s), the flight
//! [`EntityKeyMap`] handed from the flight stage to the fare stage, and the
//! [`RunStats`] every loader fills in.

pub mod entity;
pub mod error;
pub mod keys;
pub mod mapping;
pub mod record;
pub mod stats;
pub mod value;

pub use entity::{DocumentTypeId, Fare, Flight, NewPassengerDocument, Passenger, PassengerDocument};
pub use error::{ModelError, Result};
pub use keys::{EntityKeyMap, normalize_key};
pub use mapping::{CanonicalMapping, MappingTables};
pub use record::{Accepted, Partition, RawRecord, RejectedRecord, UNSPECIFIED_REJECTION};
pub use stats::{DEFAULT_MAX_ERRORS, EntityKind, Feed, RunStats, RunSummary};
pub use value::{CellValue, format_numeric, parse_f64, parse_i64};
