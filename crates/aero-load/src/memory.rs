//! In-memory reference store.
//!
//! Enforces the relational rules of the booking schema: primary keys,
//! foreign keys, check constraints and column lengths.

use std::collections::BTreeMap;

use aero_model::{DocumentTypeId, Fare, Flight, NewPassengerDocument, Passenger};
use uuid::Uuid;

use crate::error::StoreError;
use crate::store::Store;

/// Document types the reference store is seeded with by default.
pub const DEFAULT_DOCUMENT_TYPES: [(&str, &str); 5] = [
    ("BIRTH_CERTIFICATE", "Birth certificate"),
    ("INTERNATIONAL_PASSPORT", "International passport"),
    ("MILITARY_ID", "Military ID"),
    ("PASSPORT_RF", "Russian Federation passport"),
    ("SEAMAN_ID", "Seaman's ID"),
];

/// Largest value of a `SMALLINT` column.
const SMALLINT_MAX: i64 = i16::MAX as i64;
/// `NUMERIC(10, 2)` holds at most eight integer digits.
const PRICE_LIMIT: f64 = 100_000_000.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentType {
    pub id: DocumentTypeId,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub document_id: Uuid,
    pub document: NewPassengerDocument,
}

/// Entity counts held by a [`MemoryStore`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCounts {
    pub passengers: usize,
    pub documents: usize,
    pub flights: usize,
    pub fares: usize,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    document_types: Vec<DocumentType>,
    passengers: BTreeMap<Uuid, Passenger>,
    documents: BTreeMap<Uuid, StoredDocument>,
    flights: BTreeMap<Uuid, Flight>,
    fares: BTreeMap<Uuid, Fare>,
    commits: usize,
    closed: bool,
}

impl MemoryStore {
    /// Store seeded with [`DEFAULT_DOCUMENT_TYPES`].
    pub fn new() -> Self {
        Self::with_document_types(DEFAULT_DOCUMENT_TYPES)
    }

    /// Store seeded with `(code, name)` document types.
    ///
    /// Identifiers are assigned from 1 in code order; a repeated code keeps
    /// its first name.
    pub fn with_document_types<I, K, V>(types: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut by_code: BTreeMap<String, String> = BTreeMap::new();
        for (code, name) in types {
            by_code
                .entry(code.as_ref().trim().to_uppercase())
                .or_insert_with(|| name.as_ref().to_string());
        }
        let document_types = by_code
            .into_iter()
            .zip(1..)
            .map(|((code, name), id)| DocumentType { id, code, name })
            .collect();
        Self {
            document_types,
            ..Self::default()
        }
    }

    pub fn document_types(&self) -> &[DocumentType] {
        &self.document_types
    }

    pub fn passenger(&self, id: &Uuid) -> Option<&Passenger> {
        self.passengers.get(id)
    }

    pub fn flight(&self, id: &Uuid) -> Option<&Flight> {
        self.flights.get(id)
    }

    pub fn passengers(&self) -> impl Iterator<Item = &Passenger> {
        self.passengers.values()
    }

    pub fn documents(&self) -> impl Iterator<Item = &StoredDocument> {
        self.documents.values()
    }

    pub fn flights(&self) -> impl Iterator<Item = &Flight> {
        self.flights.values()
    }

    pub fn fares(&self) -> impl Iterator<Item = &Fare> {
        self.fares.values()
    }

    pub fn counts(&self) -> StoreCounts {
        StoreCounts {
            passengers: self.passengers.len(),
            documents: self.documents.len(),
            flights: self.flights.len(),
            fares: self.fares.len(),
        }
    }

    /// Number of successful `commit` calls.
    pub fn commits(&self) -> usize {
        self.commits
    }

    /// Makes every later operation fail with [`StoreError::Unavailable`].
    pub fn close(&mut self) {
        self.closed = true;
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.closed {
            Err(StoreError::Unavailable {
                message: "store is closed".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

fn max_len(entity: &'static str, field: &str, value: &str, limit: usize) -> Result<(), StoreError> {
    let len = value.chars().count();
    if len > limit {
        return Err(StoreError::integrity(
            entity,
            format!("{field} exceeds {limit} characters ({len})"),
        ));
    }
    Ok(())
}

fn non_empty_max_len(
    entity: &'static str,
    field: &str,
    value: &str,
    limit: usize,
) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        return Err(StoreError::integrity(entity, format!("{field} cannot be null")));
    }
    max_len(entity, field, value, limit)
}

fn optional_max_len(
    entity: &'static str,
    field: &str,
    value: Option<&str>,
    limit: usize,
) -> Result<(), StoreError> {
    value.map_or(Ok(()), |value| max_len(entity, field, value, limit))
}

fn exact_len(entity: &'static str, field: &str, value: &str, len: usize) -> Result<(), StoreError> {
    if value.chars().count() != len {
        return Err(StoreError::integrity(
            entity,
            format!("{field} must be exactly {len} characters"),
        ));
    }
    Ok(())
}

fn check(entity: &'static str, ok: bool, constraint: &str) -> Result<(), StoreError> {
    if ok {
        Ok(())
    } else {
        Err(StoreError::integrity(
            entity,
            format!("check constraint violated: {constraint}"),
        ))
    }
}

fn duplicate_key(entity: &'static str, id: &Uuid) -> StoreError {
    StoreError::integrity(entity, format!("duplicate primary key {id}"))
}

impl Store for MemoryStore {
    fn document_type_ids(&self) -> Result<BTreeMap<String, DocumentTypeId>, StoreError> {
        self.ensure_open()?;
        Ok(self
            .document_types
            .iter()
            .map(|doc_type| (doc_type.code.clone(), doc_type.id))
            .collect())
    }

    fn create_passenger(&mut self, passenger: &Passenger) -> Result<Uuid, StoreError> {
        const ENTITY: &str = "passenger";
        self.ensure_open()?;
        if self.passengers.contains_key(&passenger.passenger_id) {
            return Err(duplicate_key(ENTITY, &passenger.passenger_id));
        }
        non_empty_max_len(ENTITY, "first_name", &passenger.first_name, 100)?;
        non_empty_max_len(ENTITY, "last_name", &passenger.last_name, 100)?;
        optional_max_len(ENTITY, "email", passenger.email.as_deref(), 255)?;
        optional_max_len(ENTITY, "phone_number", passenger.phone_number.as_deref(), 20)?;

        self.passengers
            .insert(passenger.passenger_id, passenger.clone());
        Ok(passenger.passenger_id)
    }

    fn create_passenger_document(
        &mut self,
        document: &NewPassengerDocument,
    ) -> Result<Uuid, StoreError> {
        const ENTITY: &str = "passenger_document";
        self.ensure_open()?;
        if !self.passengers.contains_key(&document.passenger_id) {
            return Err(StoreError::integrity(
                ENTITY,
                format!("foreign key passenger_id {} not found", document.passenger_id),
            ));
        }
        if !self
            .document_types
            .iter()
            .any(|doc_type| doc_type.id == document.document_type_id)
        {
            return Err(StoreError::integrity(
                ENTITY,
                format!(
                    "foreign key document_type_id {} not found",
                    document.document_type_id
                ),
            ));
        }
        non_empty_max_len(ENTITY, "document_number", &document.document_number, 50)?;
        non_empty_max_len(ENTITY, "country_of_issue", &document.country_of_issue, 3)?;

        let document_id = Uuid::new_v4();
        self.documents.insert(
            document_id,
            StoredDocument {
                document_id,
                document: document.clone(),
            },
        );
        Ok(document_id)
    }

    fn create_flight(&mut self, flight: &Flight) -> Result<Uuid, StoreError> {
        const ENTITY: &str = "flight";
        self.ensure_open()?;
        if self.flights.contains_key(&flight.flight_id) {
            return Err(duplicate_key(ENTITY, &flight.flight_id));
        }
        non_empty_max_len(ENTITY, "flight_number", &flight.flight_number, 10)?;
        exact_len(ENTITY, "departure_airport_code", &flight.departure_airport_code, 3)?;
        exact_len(ENTITY, "arrival_airport_code", &flight.arrival_airport_code, 3)?;
        optional_max_len(ENTITY, "aircraft_type", flight.aircraft_type.as_deref(), 50)?;
        check(
            ENTITY,
            flight.scheduled_arrival > flight.scheduled_departure,
            "scheduled_arrival > scheduled_departure",
        )?;
        check(ENTITY, flight.total_seats > 0, "total_seats > 0")?;
        check(
            ENTITY,
            flight.total_seats <= SMALLINT_MAX,
            "total_seats fits SMALLINT",
        )?;

        self.flights.insert(flight.flight_id, flight.clone());
        Ok(flight.flight_id)
    }

    fn create_fare(&mut self, fare: &Fare) -> Result<Uuid, StoreError> {
        const ENTITY: &str = "fare";
        self.ensure_open()?;
        if self.fares.contains_key(&fare.fare_id) {
            return Err(duplicate_key(ENTITY, &fare.fare_id));
        }
        if !self.flights.contains_key(&fare.flight_id) {
            return Err(StoreError::integrity(
                ENTITY,
                format!("foreign key flight_id {} not found", fare.flight_id),
            ));
        }
        non_empty_max_len(ENTITY, "fare_class", &fare.fare_class, 30)?;
        optional_max_len(ENTITY, "fare_conditions", fare.fare_conditions.as_deref(), 500)?;
        check(ENTITY, fare.price >= 0.0, "price >= 0")?;
        check(ENTITY, fare.price < PRICE_LIMIT, "price fits NUMERIC(10, 2)")?;
        check(ENTITY, fare.available_seats >= 0, "available_seats >= 0")?;
        check(
            ENTITY,
            fare.available_seats <= SMALLINT_MAX,
            "available_seats fits SMALLINT",
        )?;

        self.fares.insert(fare.fare_id, fare.clone());
        Ok(fare.fare_id)
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        self.ensure_open()?;
        self.commits += 1;
        Ok(())
    }
}
