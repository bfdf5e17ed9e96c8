//! # Validation Module
//!
//! Input validation for values written into a Policy document.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Host form                                                    │
//! │  ├── Field types (Float, Currency, Select)                             │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: landed-form adapter                                          │
//! │  └── THIS MODULE: every value checked before it is written             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: recalc                                                       │
//! │  └── No checks. Degenerate inputs resolve to zero, never fail.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use landed_core::validation::{validate_amount, validate_row_name};
//!
//! assert!(validate_amount("qty", 5.0).is_ok());
//! assert!(validate_amount("qty", -1.0).is_err());
//! assert!(validate_row_name("row-1").is_ok());
//! ```

use std::collections::HashSet;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{CostRow, PolicyDoc};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest row name the host accepts.
pub const MAX_ROW_NAME_LEN: usize = 140;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a numeric input: quantity, price, amount or exchange rate.
///
/// ## Rules
/// - Must be finite (no NaN, no infinity)
/// - Must not be negative
pub fn validate_amount(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }

    if value < 0.0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
            value,
        });
    }

    Ok(())
}

/// Validates a row name.
///
/// ## Rules
/// - Must not be empty or whitespace
/// - At most 140 characters
pub fn validate_row_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_ROW_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_ROW_NAME_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Document Validator
// =============================================================================

/// Validates every input of a document.
///
/// Derived fields are not checked: they are about to be overwritten.
/// Unnamed rows are allowed (the adapter names them), but two rows of the
/// same table may not share a name.
///
/// ## Errors
/// The first failure, as [`CoreError::InvalidDocument`] with a path such
/// as `cif_costs[1].exchange_rate`.
pub fn validate_document(doc: &PolicyDoc) -> CoreResult<()> {
    at("exchange_rate", validate_amount("exchange_rate", doc.exchange_rate))?;

    let mut names = HashSet::new();
    for (i, item) in doc.items.iter().enumerate() {
        at(&format!("items[{i}].qty"), validate_amount("qty", item.qty))?;
        at(
            &format!("items[{i}].fob_unit_price"),
            validate_amount("fob_unit_price", item.fob_unit_price),
        )?;
        at(&format!("items[{i}].name"), unique_name(&mut names, &item.name))?;
    }

    validate_cost_rows("cif_costs", &doc.cif_costs)?;
    validate_cost_rows("nationalization_costs", &doc.nationalization_costs)?;

    Ok(())
}

fn validate_cost_rows(table: &str, rows: &[CostRow]) -> CoreResult<()> {
    let mut names = HashSet::new();
    for (i, row) in rows.iter().enumerate() {
        for (field, value) in [
            ("amount_usd", row.amount_usd),
            ("exchange_rate", row.exchange_rate),
            ("amount_nio", row.amount_nio),
        ] {
            at(&format!("{table}[{i}].{field}"), validate_amount(field, value))?;
        }
        at(&format!("{table}[{i}].name"), unique_name(&mut names, &row.name))?;
    }
    Ok(())
}

fn unique_name<'a>(seen: &mut HashSet<&'a str>, name: &'a str) -> ValidationResult<()> {
    if name.is_empty() {
        return Ok(());
    }
    validate_row_name(name)?;
    if !seen.insert(name) {
        return Err(ValidationError::Duplicate {
            field: "name".to_string(),
            value: name.to_string(),
        });
    }
    Ok(())
}

fn at(path: &str, result: ValidationResult<()>) -> CoreResult<()> {
    result.map_err(|source| CoreError::InvalidDocument {
        path: path.to_string(),
        source,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
