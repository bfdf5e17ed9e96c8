//! # Error Types
//!
//! Domain-specific error types for landed-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  landed-core errors (this file)                                        │
//! │  ├── CoreError        - Document-level failures                        │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  landed-form errors (separate crate)                                   │
//! │  └── FormError        - Unknown rows, invalid edits                    │
//! │                                                                         │
//! │  landed-cli errors (binary)                                            │
//! │  └── ConfigError + anyhow context                                      │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError (with path) → FormError → anyhow    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Note
//! Recalculation itself never fails. Zero divisors resolve to zero and
//! rows with an unknown cost type are left out of the totals. These
//! errors only guard the values written INTO a document.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Document-level errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The document contains a value that fails validation.
    ///
    /// `path` points at the offending value, e.g. `items[2].qty`.
    #[error("Invalid value at {path}: {source}")]
    InvalidDocument {
        path: String,
        #[source]
        source: ValidationError,
    },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before a value is written into the document, never by the
/// recalculation that follows.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must not be negative.
    #[error("{field} must not be negative (got {value})")]
    Negative { field: String, value: f64 },

    /// Value is NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    /// Duplicate value (e.g., duplicate row name).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::Negative {
            field: "qty".to_string(),
            value: -2.0,
        };
        assert_eq!(err.to_string(), "qty must not be negative (got -2)");
    }

    #[test]
    fn test_invalid_document_names_the_path() {
        let err = CoreError::InvalidDocument {
            path: "items[2].qty".to_string(),
            source: ValidationError::NotFinite {
                field: "qty".to_string(),
            },
        };
        assert_eq!(
            err.to_string(),
            "Invalid value at items[2].qty: qty must be a finite number"
        );
    }

    #[test]
    fn test_invalid_document_keeps_validation_source() {
        use std::error::Error;

        let err = CoreError::InvalidDocument {
            path: "policy.exchange_rate".to_string(),
            source: ValidationError::Negative {
                field: "exchange_rate".to_string(),
                value: -1.0,
            },
        };
        let source = err.source().unwrap().downcast_ref::<ValidationError>();
        assert!(matches!(source, Some(ValidationError::Negative { .. })));
    }
}
