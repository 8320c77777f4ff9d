//! Custom error types for Permit Desk
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions. Date, sector and header normalization never
//! produce these errors; they always yield a defined value.

use thiserror::Error;

/// The main error type for Permit Desk operations
#[derive(Error, Debug)]
pub enum PermitError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Spreadsheet import errors
    #[error("Import error: {0}")]
    Import(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Record store errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl PermitError {
    /// Create a "not found" error for facilities
    pub fn facility_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Facility",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for payments
    pub fn payment_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Payment",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for regions
    pub fn region_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Region",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for offices
    pub fn office_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Office",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for PermitError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PermitError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for PermitError {
    fn from(err: csv::Error) -> Self {
        Self::Import(err.to_string())
    }
}

impl From<calamine::Error> for PermitError {
    fn from(err: calamine::Error) -> Self {
        Self::Import(err.to_string())
    }
}

/// Result type alias for Permit Desk operations
pub type PermitResult<T> = Result<T, PermitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PermitError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = PermitError::facility_not_found("Acme Quarry");
        assert_eq!(err.to_string(), "Facility not found: Acme Quarry");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_duplicate_error() {
        let err = PermitError::Duplicate {
            entity_type: "Region",
            identifier: "Ashanti".into(),
        };
        assert_eq!(err.to_string(), "Region already exists: Ashanti");
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let permit_err: PermitError = io_err.into();
        assert!(matches!(permit_err, PermitError::Io(_)));
    }
}
