//! Error types for the schools library.

use thiserror::Error;

use crate::validation::ValidationErrors;

/// Errors that can occur when storing or querying schools.
#[derive(Error, Debug)]
pub enum SchoolError {
    /// Client input failed validation.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// No school exists with the requested id.
    #[error("School not found: id={id}")]
    NotFound { id: i64 },

    /// The underlying database read or write failed.
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// Invalid configuration (e.g., a malformed environment variable).
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias using [`SchoolError`].
pub type Result<T> = std::result::Result<T, SchoolError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::FieldError;

    #[test]
    fn test_error_display() {
        let err = SchoolError::NotFound { id: 42 };
        assert!(err.to_string().contains("42"));

        let err = SchoolError::Config("SCHOOLS_MAX_CONNECTIONS must be a number".into());
        assert!(err.to_string().contains("SCHOOLS_MAX_CONNECTIONS"));

        let err = SchoolError::from(ValidationErrors::from(vec![FieldError::new(
            "latitude",
            "Latitude must be between -90 and 90",
        )]));
        assert!(err.to_string().contains("latitude"));
    }

    #[test]
    fn test_storage_error_from_sqlx() {
        let err: SchoolError = sqlx::Error::PoolClosed.into();
        assert!(matches!(err, SchoolError::Storage(_)));
    }
}
