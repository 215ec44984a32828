//! Flight feed transformer.

use aero_model::{Feed, Flight, Partition, RawRecord};
use aero_validate::{FlightValidator, RowValidator};
use uuid::Uuid;

use crate::clean::{optional_text, required_text};
use crate::{Transformer, partition_rows};

/// Fields cleaned before a flight row is validated.
pub const FLIGHT_CLEAN_FIELDS: [&str; 7] = [
    "flight_number",
    "departure_airport_code",
    "arrival_airport_code",
    "scheduled_departure",
    "scheduled_arrival",
    "aircraft_type",
    "total_seats",
];

/// Turns flight rows into [`Flight`] records with fresh identifiers.
#[derive(Debug, Clone, Default)]
pub struct FlightTransformer {
    validator: FlightValidator,
}

impl FlightTransformer {
    pub fn new(validator: FlightValidator) -> Self {
        Self { validator }
    }

    fn build(&self, record: &RawRecord) -> Result<Flight, String> {
        let format = self.validator.datetime_format();
        let scheduled = |field: &str| {
            record
                .get(field)
                .parse_datetime(format)
                .ok_or_else(|| format!("Invalid format: {field}"))
        };
        Ok(Flight {
            flight_id: Uuid::new_v4(),
            flight_number: required_text(record, "flight_number")?.to_uppercase(),
            departure_airport_code: required_text(record, "departure_airport_code")?
                .to_uppercase(),
            arrival_airport_code: required_text(record, "arrival_airport_code")?.to_uppercase(),
            scheduled_departure: scheduled("scheduled_departure")?,
            scheduled_arrival: scheduled("scheduled_arrival")?,
            aircraft_type: optional_text(record, "aircraft_type"),
            total_seats: record
                .get("total_seats")
                .parse_i64()
                .ok_or("Invalid format: total_seats")?,
        })
    }
}

impl Transformer for FlightTransformer {
    type Output = Flight;

    fn transform<I>(&self, records: I) -> Partition<Flight>
    where
        I: IntoIterator<Item = RawRecord>,
    {
        partition_rows(Feed::Flights, records, &FLIGHT_CLEAN_FIELDS, |row| {
            let errors = self.validator.validate(row);
            if errors.is_empty() {
                self.build(row).map_err(|e| vec![e])
            } else {
                Err(errors)
            }
        })
    }
}
