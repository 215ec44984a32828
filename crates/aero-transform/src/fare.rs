//! Fare feed transformer.
//!
//! Fares have no standalone validator: the acceptance rules need the
//! flight [`EntityKeyMap`] of the same run, so they live here.

use aero_model::{EntityKeyMap, Fare, Feed, MappingTables, Partition, RawRecord, normalize_key};
use aero_validate::{RowErrors, required};
use uuid::Uuid;

use crate::clean::{optional_text, required_text};
use crate::{Transformer, partition_rows};

/// Fields a fare row must carry.
pub const FARE_REQUIRED_FIELDS: [&str; 4] =
    ["flight_number", "fare_class", "price", "available_seats"];

/// Fields cleaned before a fare row is validated.
pub const FARE_CLEAN_FIELDS: [&str; 5] = [
    "flight_number",
    "fare_class",
    "price",
    "fare_conditions",
    "available_seats",
];

/// Turns fare rows into [`Fare`] records attached to already-loaded flights.
#[derive(Debug, Clone)]
pub struct FareTransformer<'a> {
    mappings: &'a MappingTables,
    flights: &'a EntityKeyMap,
}

impl<'a> FareTransformer<'a> {
    /// `flights` is the key map returned by the flight load of the same run.
    pub fn new(mappings: &'a MappingTables, flights: &'a EntityKeyMap) -> Self {
        Self { mappings, flights }
    }

    /// Every reason `record` cannot be accepted.
    pub fn validate(&self, record: &RawRecord) -> Vec<String> {
        let mut errors = RowErrors::new();
        errors.missing_fields(&required(record, &FARE_REQUIRED_FIELDS));

        if let Some(flight_number) = optional_text(record, "flight_number") {
            let key = normalize_key(&flight_number);
            errors.check(self.flights.contains(&key), || unresolved(&key));
        }

        let price = record.get("price");
        if !price.is_missing() {
            match price.parse_f64() {
                Some(value) => errors.check(value >= 0.0, || {
                    "Invalid value: price cannot be negative".to_string()
                }),
                None => errors.invalid_format("price"),
            }
        }

        let seats = record.get("available_seats");
        if !seats.is_missing() {
            match seats.parse_i64() {
                Some(value) => errors.check(value >= 0, || {
                    "Invalid value: available_seats cannot be negative".to_string()
                }),
                None => errors.invalid_format("available_seats"),
            }
        }

        errors.into_vec()
    }

    fn build(&self, record: &RawRecord) -> Result<Fare, String> {
        let flight_number = normalize_key(&required_text(record, "flight_number")?);
        let flight_id = self
            .flights
            .get(&flight_number)
            .ok_or_else(|| unresolved(&flight_number))?;
        Ok(Fare {
            fare_id: Uuid::new_v4(),
            flight_id,
            fare_class: self
                .mappings
                .fare_class
                .canonicalize(&required_text(record, "fare_class")?),
            flight_number,
            price: record
                .get("price")
                .parse_f64()
                .ok_or("Invalid format: price")?,
            fare_conditions: optional_text(record, "fare_conditions"),
            available_seats: record
                .get("available_seats")
                .parse_i64()
                .ok_or("Invalid format: available_seats")?,
        })
    }
}

fn unresolved(flight_number: &str) -> String {
    format!("Unresolved reference: flight {flight_number} not found")
}

impl Transformer for FareTransformer<'_> {
    type Output = Fare;

    fn transform<I>(&self, records: I) -> Partition<Fare>
    where
        I: IntoIterator<Item = RawRecord>,
    {
        partition_rows(Feed::Fares, records, &FARE_CLEAN_FIELDS, |row| {
            let errors = self.validate(row);
            if errors.is_empty() {
                self.build(row).map_err(|e| vec![e])
            } else {
                Err(errors)
            }
        })
    }
}
