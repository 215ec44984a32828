//! Typed, entity-shaped records produced by the transformers.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use uuid::Uuid;

/// Internal identifier of a document-type code in the store.
pub type DocumentTypeId = u16;

/// An accepted passenger row with its travel document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Passenger {
    pub passenger_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub document: PassengerDocument,
    /// Optional booking-link fields carried through from the source.
    pub flight_number: Option<String>,
    pub fare_class: Option<String>,
    pub booking_status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassengerDocument {
    /// Canonical document-type code (e.g. `INTERNATIONAL_PASSPORT`).
    pub document_type: String,
    pub document_number: String,
    pub expiry_date: Option<NaiveDate>,
    pub country_of_issue: String,
}

/// Fields handed to the store when creating a passenger document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPassengerDocument {
    pub passenger_id: Uuid,
    pub document_type_id: DocumentTypeId,
    pub document_number: String,
    pub expiry_date: Option<NaiveDate>,
    pub country_of_issue: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Flight {
    pub flight_id: Uuid,
    pub flight_number: String,
    pub departure_airport_code: String,
    pub arrival_airport_code: String,
    pub scheduled_departure: NaiveDateTime,
    pub scheduled_arrival: NaiveDateTime,
    pub aircraft_type: Option<String>,
    pub total_seats: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fare {
    pub fare_id: Uuid,
    /// Store identifier of the flight, resolved through the flight key map.
    pub flight_id: Uuid,
    /// Business key the fare was resolved from.
    pub flight_number: String,
    pub fare_class: String,
    pub price: f64,
    pub fare_conditions: Option<String>,
    pub available_seats: i64,
}
