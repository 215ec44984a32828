//! Passenger feed transformer.

use aero_model::{Feed, MappingTables, Partition, Passenger, PassengerDocument, RawRecord};
use aero_validate::{PassengerValidator, RowValidator};
use uuid::Uuid;

use crate::clean::{optional_text, required_text};
use crate::{Transformer, partition_rows};

/// Fields cleaned before a passenger row is validated.
pub const PASSENGER_CLEAN_FIELDS: [&str; 13] = [
    "passenger_id",
    "first_name",
    "last_name",
    "date_of_birth",
    "email",
    "phone_number",
    "document_type",
    "document_number",
    "expiry_date",
    "country_of_issue",
    "flight_number",
    "fare_class",
    "booking_status",
];

/// Turns passenger rows into [`Passenger`] records with their document.
#[derive(Debug, Clone)]
pub struct PassengerTransformer<'a> {
    validator: PassengerValidator,
    mappings: &'a MappingTables,
}

impl<'a> PassengerTransformer<'a> {
    pub fn new(validator: PassengerValidator, mappings: &'a MappingTables) -> Self {
        Self {
            validator,
            mappings,
        }
    }

    fn build(&self, record: &RawRecord) -> Result<Passenger, String> {
        let format = self.validator.date_format();
        let passenger_id = match optional_text(record, "passenger_id") {
            Some(raw) => Uuid::parse_str(&raw).map_err(|_| "Invalid format: passenger_id")?,
            None => Uuid::new_v4(),
        };
        let date_of_birth = record
            .get("date_of_birth")
            .parse_date(format)
            .ok_or("Invalid format: date_of_birth")?;
        let expiry_date = match record.get("expiry_date") {
            value if value.is_missing() => None,
            value => Some(
                value
                    .parse_date(format)
                    .ok_or("Invalid format: expiry_date")?,
            ),
        };

        let document = PassengerDocument {
            document_type: self
                .mappings
                .document_type
                .canonicalize(&required_text(record, "document_type")?),
            document_number: required_text(record, "document_number")?,
            expiry_date,
            country_of_issue: required_text(record, "country_of_issue")?,
        };

        Ok(Passenger {
            passenger_id,
            first_name: required_text(record, "first_name")?,
            last_name: required_text(record, "last_name")?,
            date_of_birth,
            email: optional_text(record, "email"),
            phone_number: optional_text(record, "phone_number"),
            document,
            flight_number: optional_text(record, "flight_number").map(|v| v.to_uppercase()),
            fare_class: optional_text(record, "fare_class")
                .map(|v| self.mappings.fare_class.canonicalize(&v)),
            booking_status: optional_text(record, "booking_status")
                .map(|v| self.mappings.booking_status.canonicalize(&v)),
        })
    }
}

impl Transformer for PassengerTransformer<'_> {
    type Output = Passenger;

    fn transform<I>(&self, records: I) -> Partition<Passenger>
    where
        I: IntoIterator<Item = RawRecord>,
    {
        partition_rows(Feed::Passengers, records, &PASSENGER_CLEAN_FIELDS, |row| {
            let errors = self.validator.validate(row);
            if errors.is_empty() {
                self.build(row).map_err(|e| vec![e])
            } else {
                Err(errors)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(index: usize, pairs: &[(&str, &str)]) -> RawRecord {
        RawRecord::from_pairs(index, pairs.iter().copied())
    }

    fn transformer(mappings: &MappingTables) -> PassengerTransformer<'_> {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        PassengerTransformer::new(
            PassengerValidator::new("%Y-%m-%d").with_today(today),
            mappings,
        )
    }

    #[test]
    fn test_canonicalizes_and_generates_id() {
        let mappings = MappingTables::default();
        let partition = transformer(&mappings).transform([row(
            0,
            &[
                ("first_name", " Anna "),
                ("last_name", "Ivanova"),
                ("date_of_birth", "1990-05-01"),
                ("document_type", "passport"),
                ("document_number", "4510123456"),
                ("country_of_issue", "RUS"),
                ("fare_class", "econ"),
                ("booking_status", "paid"),
                ("flight_number", "ab123"),
                ("email", ""),
            ],
        )]);

        assert!(partition.rejected.is_empty());
        let passenger = &partition.accepted[0].record;
        assert_eq!(passenger.first_name, "Anna");
        assert_eq!(passenger.document.document_type, "INTERNATIONAL_PASSPORT");
        assert_eq!(passenger.fare_class.as_deref(), Some("ECONOMY"));
        assert_eq!(passenger.booking_status.as_deref(), Some("PAID"));
        assert_eq!(passenger.flight_number.as_deref(), Some("AB123"));
        assert_eq!(passenger.email, None);
        assert!(!passenger.passenger_id.is_nil());
    }

    #[test]
    fn test_keeps_source_identifier() {
        let mappings = MappingTables::default();
        let id = "67e55044-10b1-426f-9247-bb680e5fe0c8";
        let partition = transformer(&mappings).transform([row(
            0,
            &[
                ("passenger_id", id),
                ("first_name", "Anna"),
                ("last_name", "Ivanova"),
                ("date_of_birth", "1990-05-01"),
                ("document_type", "SEAMAN_ID"),
                ("document_number", "77"),
                ("country_of_issue", "RUS"),
            ],
        )]);
        assert_eq!(partition.accepted[0].record.passenger_id.to_string(), id);
    }

    #[test]
    fn test_unknown_document_type_passes_through() {
        let mappings = MappingTables::default();
        let partition = transformer(&mappings).transform([row(
            0,
            &[
                ("first_name", "Anna"),
                ("last_name", "Ivanova"),
                ("date_of_birth", "1990-05-01"),
                ("document_type", "pilot licence"),
                ("document_number", "77"),
                ("country_of_issue", "RUS"),
            ],
        )]);
        assert_eq!(
            partition.accepted[0].record.document.document_type,
            "PILOT LICENCE"
        );
    }
}
