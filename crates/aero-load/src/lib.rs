//! Loading accepted records into the persistence collaborator.
//!
//! Loaders write one record at a time through a [`Store`] and never abort
//! on a single refused record: the failure is counted in the feed's
//! [`RunStats`](aero_model::RunStats), kept as a [`LoadFailure`] for the
//! rejection report, and the load moves on.
//!
//! The flight loader returns the flight [`EntityKeyMap`](aero_model::EntityKeyMap)
//! the fare transformer and fare loader of the same run consume.

mod checkpoint;
mod error;
mod fare;
mod flight;
mod memory;
mod passenger;
mod store;

pub use checkpoint::{DEFAULT_CHUNK_SIZE, LoadFailure};
pub use error::{LoadError, Result, StoreError};
pub use fare::FareLoader;
pub use flight::{FlightLoad, FlightLoader};
pub use memory::{DEFAULT_DOCUMENT_TYPES, DocumentType, MemoryStore, StoreCounts, StoredDocument};
pub use passenger::PassengerLoader;
pub use store::Store;
