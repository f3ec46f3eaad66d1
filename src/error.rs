// Error taxonomy for the record store and everything built on it

use thiserror::Error;

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Rejected input, raised before any store mutation is attempted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is empty or absent
    #[error("required field '{0}' is missing")]
    MissingField(&'static str),

    /// Finance amounts must be strictly positive
    #[error("amount must be greater than zero")]
    NonPositiveAmount,

    /// A numeric field that must not go below zero
    #[error("field '{0}' must not be negative")]
    Negative(&'static str),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("no record with id {id} in collection '{collection}'")]
    NotFound { collection: &'static str, id: i64 },

    #[error("storage fault: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("serialization fault: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("collection '{collection}' has schema version {found}, newest supported is {supported}")]
    UnsupportedSchema {
        collection: &'static str,
        found: i64,
        supported: i64,
    },

    #[error("I/O fault: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV fault: {0}")]
    Csv(#[from] csv::Error),
}

impl StoreError {
    /// True for faults of the persistence layer itself (as opposed to bad input).
    pub fn is_storage_fault(&self) -> bool {
        matches!(
            self,
            StoreError::Storage(_)
                | StoreError::Serialization(_)
                | StoreError::UnsupportedSchema { .. }
                | StoreError::Io(_)
                | StoreError::Csv(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_converts_into_store_error() {
        let err: StoreError = ValidationError::MissingField("name").into();

        assert!(matches!(err, StoreError::Validation(ValidationError::MissingField("name"))));
        assert!(!err.is_storage_fault());
        assert_eq!(err.to_string(), "validation failed: required field 'name' is missing");
    }

    #[test]
    fn test_not_found_message() {
        let err = StoreError::NotFound { collection: "finances", id: 42 };
        assert_eq!(err.to_string(), "no record with id 42 in collection 'finances'");
        assert!(!err.is_storage_fault());
    }

    #[test]
    fn test_schema_error_is_storage_fault() {
        let err = StoreError::UnsupportedSchema { collection: "rabbits", found: 9, supported: 1 };
        assert!(err.is_storage_fault());
    }
}
