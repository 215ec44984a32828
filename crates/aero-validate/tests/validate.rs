//! Property and scenario tests for row validation.

use aero_model::{CellValue, RawRecord};
use aero_validate::{
    FLIGHT_REQUIRED_FIELDS, FlightValidator, PASSENGER_REQUIRED_FIELDS, PassengerValidator,
    RowValidator, is_valid_date, is_valid_email, is_valid_identifier, is_valid_phone, required,
};
use chrono::NaiveDate;
use proptest::prelude::*;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date")
}

proptest! {
    #[test]
    fn predicates_are_total(value in ".*") {
        let cell = CellValue::text(value);
        let _ = is_valid_email(&cell);
        let _ = is_valid_phone(&cell);
        let _ = is_valid_date(&cell, "%Y-%m-%d");
        let _ = is_valid_identifier(&cell);
    }

    #[test]
    fn validators_never_panic(values in proptest::collection::vec(".{0,12}", 6)) {
        let passenger = RawRecord::from_pairs(
            0,
            PASSENGER_REQUIRED_FIELDS.iter().zip(values.iter()).map(|(k, v)| (*k, v.as_str())),
        );
        let flight = RawRecord::from_pairs(
            0,
            FLIGHT_REQUIRED_FIELDS.iter().zip(values.iter()).map(|(k, v)| (*k, v.as_str())),
        );
        let _ = PassengerValidator::default().with_today(today()).validate(&passenger);
        let _ = FlightValidator::default().validate(&flight);
    }

    #[test]
    fn required_reports_exactly_the_blank_fields(
        blanks in proptest::collection::vec(any::<bool>(), 6)
    ) {
        let record = RawRecord::from_pairs(
            0,
            PASSENGER_REQUIRED_FIELDS
                .iter()
                .zip(blanks.iter())
                .map(|(name, blank)| (*name, if *blank { "  " } else { "x" })),
        );
        let expected: Vec<&str> = PASSENGER_REQUIRED_FIELDS
            .iter()
            .zip(blanks.iter())
            .filter(|(_, blank)| **blank)
            .map(|(name, _)| *name)
            .collect();
        prop_assert_eq!(required(&record, &PASSENGER_REQUIRED_FIELDS), expected);
    }

    #[test]
    fn arrival_not_after_departure_is_always_rejected(
        departure_hour in 0u32..24,
        offset in 0u32..6,
        seats in -5i64..500,
    ) {
        let arrival_hour = departure_hour.saturating_sub(offset);
        let record = RawRecord::from_pairs(
            0,
            [
                ("flight_number", CellValue::text("AB123")),
                ("departure_airport_code", CellValue::text("SVO")),
                ("arrival_airport_code", CellValue::text("LED")),
                ("scheduled_departure", CellValue::text(format!("2024-01-01 {departure_hour:02}:00:00"))),
                ("scheduled_arrival", CellValue::text(format!("2024-01-01 {arrival_hour:02}:00:00"))),
                ("total_seats", CellValue::Integer(seats)),
            ],
        );
        let errors = FlightValidator::default().validate(&record);
        prop_assert!(errors.iter().any(|e| e.starts_with("Invalid schedule:")));
    }
}

#[test]
fn spreadsheet_cells_validate_like_text() {
    let dob = NaiveDate::from_ymd_opt(1990, 5, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid datetime");
    let record = RawRecord::from_pairs(
        0,
        [
            ("first_name", CellValue::text("Anna")),
            ("last_name", CellValue::text("Ivanova")),
            ("date_of_birth", CellValue::DateTime(dob)),
            ("document_type", CellValue::text("PASSPORT")),
            ("document_number", CellValue::Integer(4_510_123_456)),
            ("country_of_issue", CellValue::text("RUS")),
            ("phone_number", CellValue::Float(79_991_234_567.0)),
        ],
    );
    let errors = PassengerValidator::default()
        .with_today(today())
        .validate(&record);
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
}
