//! # Form Error Type
//!
//! Unified error type for form operations.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in landed-form                            │
//! │                                                                         │
//! │  host edit ──► PolicyForm::set_item_qty("row-9", 3.0)                  │
//! │                     │                                                   │
//! │                     ├── row unknown?    ── FormError::RowNotFound       │
//! │                     ├── value invalid?  ── FormError::Validation        │
//! │                     │                                                   │
//! │                     ▼                                                   │
//! │                 write + recalc (cannot fail)                            │
//! │                                                                         │
//! │  The document is left untouched whenever an error is returned.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use landed_core::{ChildTable, CoreError, ValidationError};
use thiserror::Error;

/// Errors returned by [`crate::PolicyForm`] operations.
#[derive(Debug, Error)]
pub enum FormError {
    /// No row with this name in the table.
    #[error("Row '{row}' not found in {table}")]
    RowNotFound { table: ChildTable, row: String },

    /// A value failed validation before being written.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The loaded document is invalid.
    #[error("{0}")]
    Core(#[from] CoreError),

    /// An edit script could not be parsed.
    #[error("Invalid edit script: {0}")]
    Script(#[from] serde_json::Error),
}

impl FormError {
    /// Machine-readable code for the host.
    ///
    /// ## Usage in the host
    /// ```text
    /// NOT_FOUND        → the grid is stale, reload the document
    /// VALIDATION_ERROR → highlight the field
    /// INVALID_SCRIPT   → show the parse error
    /// ```
    pub fn code(&self) -> &'static str {
        match self {
            FormError::RowNotFound { .. } => "NOT_FOUND",
            FormError::Validation(_) | FormError::Core(_) => "VALIDATION_ERROR",
            FormError::Script(_) => "INVALID_SCRIPT",
        }
    }
}

/// Convenience type alias for Results with FormError.
pub type FormResult<T> = Result<T, FormError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_message() {
        let err = FormError::RowNotFound {
            table: ChildTable::CifCosts,
            row: "c9".to_string(),
        };
        assert_eq!(err.to_string(), "Row 'c9' not found in cif_costs");
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[test]
    fn test_validation_converts() {
        let err: FormError = ValidationError::Required {
            field: "name".to_string(),
        }
        .into();
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert_eq!(err.to_string(), "Validation error: name is required");
    }
}
