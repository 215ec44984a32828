//! Flight row acceptance rules.

use aero_model::RawRecord;

use crate::errors::RowErrors;
use crate::field::{is_valid_datetime, required};
use crate::{DEFAULT_DATETIME_FORMAT, RowValidator};

/// Fields a flight row must carry.
pub const FLIGHT_REQUIRED_FIELDS: [&str; 6] = [
    "flight_number",
    "departure_airport_code",
    "arrival_airport_code",
    "scheduled_departure",
    "scheduled_arrival",
    "total_seats",
];

/// Length of an IATA airport code.
pub const AIRPORT_CODE_LEN: usize = 3;

/// Validates flight rows.
#[derive(Debug, Clone)]
pub struct FlightValidator {
    datetime_format: String,
}

impl Default for FlightValidator {
    fn default() -> Self {
        Self::new(DEFAULT_DATETIME_FORMAT)
    }
}

impl FlightValidator {
    pub fn new(datetime_format: impl Into<String>) -> Self {
        Self {
            datetime_format: datetime_format.into(),
        }
    }

    pub fn datetime_format(&self) -> &str {
        &self.datetime_format
    }
}

impl RowValidator for FlightValidator {
    fn validate(&self, record: &RawRecord) -> Vec<String> {
        let mut errors = RowErrors::new();
        errors.missing_fields(&required(record, &FLIGHT_REQUIRED_FIELDS));

        for field in ["departure_airport_code", "arrival_airport_code"] {
            let code = record.get(field);
            if code.is_missing() {
                continue;
            }
            errors.check(
                code.render().trim().chars().count() == AIRPORT_CODE_LEN,
                || format!("Invalid airport code: {field} must be {AIRPORT_CODE_LEN} characters"),
            );
        }

        let format = self.datetime_format.as_str();
        for field in ["scheduled_departure", "scheduled_arrival"] {
            if !is_valid_datetime(record.get(field), format) {
                errors.invalid_format(field);
            }
        }

        // Only compared when both parse; unparseable values are reported above.
        let departure = record.get("scheduled_departure").parse_datetime(format);
        let arrival = record.get("scheduled_arrival").parse_datetime(format);
        if let (Some(departure), Some(arrival)) = (departure, arrival) {
            errors.check(arrival > departure, || {
                "Invalid schedule: scheduled_arrival must be after scheduled_departure".to_string()
            });
        }

        let seats = record.get("total_seats");
        if !seats.is_missing() {
            match seats.parse_i64() {
                Some(count) => errors.check(count > 0, || {
                    "Invalid value: total_seats must be a positive integer".to_string()
                }),
                None => errors.invalid_format("total_seats"),
            }
        }

        errors.into_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aero_model::CellValue;

    fn flight(overrides: &[(&str, &str)]) -> RawRecord {
        let mut record = RawRecord::from_pairs(
            0,
            [
                ("flight_number", "AB123"),
                ("departure_airport_code", "SVO"),
                ("arrival_airport_code", "LED"),
                ("scheduled_departure", "2024-01-01 10:00:00"),
                ("scheduled_arrival", "2024-01-01 12:00:00"),
                ("total_seats", "150"),
            ],
        );
        for (name, value) in overrides {
            record.set(*name, *value);
        }
        record
    }

    #[test]
    fn test_valid_flight() {
        assert!(FlightValidator::default().validate(&flight(&[])).is_empty());
    }

    #[test]
    fn test_arrival_must_follow_departure() {
        let record = flight(&[("scheduled_arrival", "2024-01-01 10:00:00")]);
        assert_eq!(
            FlightValidator::default().validate(&record),
            vec!["Invalid schedule: scheduled_arrival must be after scheduled_departure"]
        );
    }

    #[test]
    fn test_unparseable_schedule_is_not_compared() {
        let record = flight(&[("scheduled_departure", "tomorrow")]);
        assert_eq!(
            FlightValidator::default().validate(&record),
            vec!["Invalid format: scheduled_departure"]
        );
    }

    #[test]
    fn test_airport_codes_and_seats() {
        let record = flight(&[
            ("departure_airport_code", "SVOX"),
            ("arrival_airport_code", "L"),
            ("total_seats", "0"),
        ]);
        let errors = FlightValidator::default().validate(&record);
        assert_eq!(
            errors,
            vec![
                "Invalid airport code: departure_airport_code must be 3 characters",
                "Invalid airport code: arrival_airport_code must be 3 characters",
                "Invalid value: total_seats must be a positive integer",
            ]
        );
    }

    #[test]
    fn test_seats_accept_integral_floats() {
        let mut record = flight(&[]);
        record.set("total_seats", CellValue::Float(150.0));
        assert!(FlightValidator::default().validate(&record).is_empty());

        record.set("total_seats", "many");
        assert_eq!(
            FlightValidator::default().validate(&record),
            vec!["Invalid format: total_seats"]
        );
    }

    #[test]
    fn test_missing_fields_listed_once() {
        let record = RawRecord::from_pairs(0, [("flight_number", "AB123")]);
        let errors = FlightValidator::default().validate(&record);
        assert_eq!(
            errors,
            vec![
                "Missing required fields: departure_airport_code, arrival_airport_code, \
                 scheduled_departure, scheduled_arrival, total_seats"
            ]
        );
    }
}
