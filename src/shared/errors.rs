use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Slot {date} {time} is already reserved")]
    DuplicateReservation { date: NaiveDate, time: NaiveTime },

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Referential integrity: {0}")]
    ReferentialIntegrity(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    /// Shorthand for an id lookup that found nothing.
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        Self::NotFound {
            entity,
            field: "id",
            value: id.to_string(),
        }
    }

    /// Whether this error is likely transient (e.g. DB connection lost)
    /// and the operation may succeed if retried.
    pub fn is_transient(&self) -> bool {
        matches!(self, DomainError::Storage(_))
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_storage_errors_are_transient() {
        assert!(DomainError::Storage("connection reset".into()).is_transient());
        assert!(!DomainError::Validation("blank name".into()).is_transient());
        assert!(!DomainError::not_found("Reservation", 7).is_transient());
    }

    #[test]
    fn duplicate_message_names_the_slot() {
        let err = DomainError::DuplicateReservation {
            date: NaiveDate::from_ymd_opt(2023, 10, 13).unwrap(),
            time: NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
        };
        assert_eq!(err.to_string(), "Slot 2023-10-13 13:00:00 is already reserved");
    }

    #[test]
    fn not_found_message() {
        let err = DomainError::not_found("Theme", 999);
        assert_eq!(err.to_string(), "Not found: Theme with id=999");
    }
}
