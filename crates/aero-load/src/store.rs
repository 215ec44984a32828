//! The persistence collaborator the loaders write through.

use std::collections::BTreeMap;

use aero_model::{DocumentTypeId, Fare, Flight, NewPassengerDocument, Passenger};
use uuid::Uuid;

use crate::error::StoreError;

/// Single-entity create operations over a relational store.
///
/// Every create either persists the record and returns its identifier or
/// fails without side effects. `commit` is the checkpoint that makes
/// created records durable.
pub trait Store {
    /// Current document-type code to identifier table.
    fn document_type_ids(&self) -> Result<BTreeMap<String, DocumentTypeId>, StoreError>;

    fn create_passenger(&mut self, passenger: &Passenger) -> Result<Uuid, StoreError>;

    fn create_passenger_document(
        &mut self,
        document: &NewPassengerDocument,
    ) -> Result<Uuid, StoreError>;

    fn create_flight(&mut self, flight: &Flight) -> Result<Uuid, StoreError>;

    fn create_fare(&mut self, fare: &Fare) -> Result<Uuid, StoreError>;

    fn commit(&mut self) -> Result<(), StoreError>;
}
