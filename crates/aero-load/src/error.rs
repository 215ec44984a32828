//! Error types for persistence and loading.

use aero_model::Feed;
use thiserror::Error;

/// Errors returned by a [`Store`](crate::Store).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A uniqueness, foreign-key, check or length rule rejected the record.
    #[error("integrity violation on {entity}: {message}")]
    IntegrityViolation {
        entity: &'static str,
        message: String,
    },

    /// The backend cannot serve requests.
    #[error("store unavailable: {message}")]
    Unavailable { message: String },
}

impl StoreError {
    pub fn integrity(entity: &'static str, message: impl Into<String>) -> Self {
        Self::IntegrityViolation {
            entity,
            message: message.into(),
        }
    }

    pub fn is_integrity_violation(&self) -> bool {
        matches!(self, Self::IntegrityViolation { .. })
    }
}

/// Errors that stop a feed's load as a whole.
///
/// Single-record creation failures are never returned here; they are
/// recorded in the feed's stats and the load continues.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{feed} load failed to {operation}: {source}")]
    Store {
        feed: Feed,
        operation: &'static str,
        #[source]
        source: StoreError,
    },
}

/// Result type for loader operations.
pub type Result<T> = std::result::Result<T, LoadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::integrity("flight", "flight_number exceeds 10 characters");
        insta::assert_snapshot!(
            err.to_string(),
            @"integrity violation on flight: flight_number exceeds 10 characters"
        );

        let err = LoadError::Store {
            feed: Feed::Fares,
            operation: "commit",
            source: StoreError::Unavailable {
                message: "closed".to_string(),
            },
        };
        insta::assert_snapshot!(err.to_string(), @"fares load failed to commit: store unavailable: closed");
    }
}
