//! Row validation for the airline ETL.
//!
//! Field predicates ([`field`]) are pure and total; the domain validators
//! compose them into per-entity acceptance rules and return every error a
//! row has, not just the first.

pub mod errors;
pub mod field;
pub mod flight;
pub mod passenger;

use aero_model::RawRecord;

pub use errors::RowErrors;
pub use field::{
    is_future_date, is_future_date_on, is_valid_date, is_valid_datetime, is_valid_email,
    is_valid_identifier, is_valid_phone, required,
};
pub use flight::{AIRPORT_CODE_LEN, FLIGHT_REQUIRED_FIELDS, FlightValidator};
pub use passenger::{PASSENGER_REQUIRED_FIELDS, PassengerValidator};

/// Default calendar date format.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Default timestamp format: date and time with seconds.
pub const DEFAULT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Per-entity row acceptance rules.
pub trait RowValidator {
    /// Every reason `record` cannot be accepted; empty when it can.
    fn validate(&self, record: &RawRecord) -> Vec<String>;

    fn is_valid(&self, record: &RawRecord) -> bool {
        self.validate(record).is_empty()
    }
}
