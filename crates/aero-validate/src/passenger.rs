//! Passenger row acceptance rules.

use aero_model::RawRecord;
use chrono::{Local, NaiveDate};

use crate::errors::RowErrors;
use crate::field::{
    is_future_date_on, is_valid_date, is_valid_email, is_valid_identifier, is_valid_phone,
    required,
};
use crate::{DEFAULT_DATE_FORMAT, RowValidator};

/// Fields a passenger row must carry.
pub const PASSENGER_REQUIRED_FIELDS: [&str; 6] = [
    "first_name",
    "last_name",
    "date_of_birth",
    "document_type",
    "document_number",
    "country_of_issue",
];

/// Validates passenger rows with their attached travel document.
#[derive(Debug, Clone)]
pub struct PassengerValidator {
    date_format: String,
    today: NaiveDate,
}

impl Default for PassengerValidator {
    fn default() -> Self {
        Self::new(DEFAULT_DATE_FORMAT)
    }
}

impl PassengerValidator {
    /// Dates are parsed under `date_format`; expiry is judged against the
    /// local date at construction time.
    pub fn new(date_format: impl Into<String>) -> Self {
        Self {
            date_format: date_format.into(),
            today: Local::now().date_naive(),
        }
    }

    /// Pins the reference date used for the expiry check.
    #[must_use]
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn date_format(&self) -> &str {
        &self.date_format
    }
}

impl RowValidator for PassengerValidator {
    fn validate(&self, record: &RawRecord) -> Vec<String> {
        let mut errors = RowErrors::new();
        errors.missing_fields(&required(record, &PASSENGER_REQUIRED_FIELDS));

        let format = self.date_format.as_str();
        for (field, valid) in [
            ("passenger_id", is_valid_identifier(record.get("passenger_id"))),
            ("date_of_birth", is_valid_date(record.get("date_of_birth"), format)),
            ("email", is_valid_email(record.get("email"))),
            ("phone_number", is_valid_phone(record.get("phone_number"))),
        ] {
            if !valid {
                errors.invalid_format(field);
            }
        }

        let expiry = record.get("expiry_date");
        if !is_valid_date(expiry, format) {
            errors.invalid_format("expiry_date");
        } else if !is_future_date_on(expiry, format, self.today) {
            errors.push(format!(
                "Expired document: expiry_date {} is not after {}",
                expiry.render().trim(),
                self.today.format(format)
            ));
        }

        errors.into_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> PassengerValidator {
        PassengerValidator::new("%Y-%m-%d")
            .with_today(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
    }

    fn passenger(extra: &[(&str, &str)]) -> RawRecord {
        let mut record = RawRecord::from_pairs(
            0,
            [
                ("first_name", "Anna"),
                ("last_name", "Ivanova"),
                ("date_of_birth", "1990-05-01"),
                ("document_type", "PASSPORT"),
                ("document_number", "4510123456"),
                ("country_of_issue", "RUS"),
            ],
        );
        for (name, value) in extra {
            record.set(*name, *value);
        }
        record
    }

    #[test]
    fn test_valid_passenger() {
        let record = passenger(&[
            ("email", "anna@example.com"),
            ("phone_number", "+79991234567"),
            ("expiry_date", "2030-01-01"),
        ]);
        assert!(validator().validate(&record).is_empty());
    }

    #[test]
    fn test_collects_every_error() {
        let record = passenger(&[
            ("last_name", ""),
            ("date_of_birth", "01.05.1990"),
            ("email", "anna(at)example"),
            ("phone_number", "12"),
        ]);
        let errors = validator().validate(&record);
        assert_eq!(
            errors,
            vec![
                "Missing required fields: last_name",
                "Invalid format: date_of_birth",
                "Invalid format: email",
                "Invalid format: phone_number",
            ]
        );
    }

    #[test]
    fn test_expiry_today_is_expired() {
        let errors = validator().validate(&passenger(&[("expiry_date", "2024-06-01")]));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Expired document:"));
    }

    #[test]
    fn test_malformed_expiry_reports_format_only() {
        let errors = validator().validate(&passenger(&[("expiry_date", "soon")]));
        assert_eq!(errors, vec!["Invalid format: expiry_date"]);
    }

    #[test]
    fn test_source_identifier_must_be_uuid() {
        let errors = validator().validate(&passenger(&[("passenger_id", "P-1")]));
        assert_eq!(errors, vec!["Invalid format: passenger_id"]);
    }
}
