//! # Ratio Module
//!
//! Proportional allocation factors.
//!
//! ## How Allocation Works
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PROPORTIONAL ALLOCATION                                                │
//! │                                                                         │
//! │  A document-level cost is spread over the items in proportion to       │
//! │  each item's share of a base amount:                                    │
//! │                                                                         │
//! │    factor        = document cost / base                                 │
//! │    item's share  = factor × item's base amount                          │
//! │                                                                         │
//! │  Freight, insurance   base = total_fob            item base = FOB       │
//! │  Customs, national.   base = total_fob+total_cif  item base = CIF USD   │
//! │                                                                         │
//! │  A zero base means "nothing to allocate": the factor is 0, never       │
//! │  NaN. Any non-zero base divides normally.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use landed_core::ratio::safe_div;
//!
//! assert_eq!(safe_div(20.0, 100.0), 0.2);
//! assert_eq!(safe_div(20.0, 0.0), 0.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::types::PolicyDoc;

// =============================================================================
// Safe Division
// =============================================================================

/// Divides `numerator` by `denominator`, returning 0 when the denominator
/// is zero or either operand is NaN.
///
/// Any other quotient is returned as is. A quotient that overflows to
/// infinity stays infinite rather than silently dropping the allocation.
///
/// ## Example
/// ```rust
/// use landed_core::ratio::safe_div;
///
/// assert_eq!(safe_div(130.0, 2.0), 65.0);
/// assert_eq!(safe_div(0.0, 0.0), 0.0);
/// assert_eq!(safe_div(5.0, -0.0), 0.0);
/// assert_eq!(safe_div(f64::MAX, 0.5), f64::INFINITY);
/// ```
#[inline]
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 || denominator.is_nan() || numerator.is_nan() {
        0.0
    } else {
        numerator / denominator
    }
}

// =============================================================================
// Allocation Factors
// =============================================================================

/// The four per-unit allocation factors derived from document totals.
///
/// ## User Workflow
/// ```text
/// total_freight = 20, total_fob = 100
///      │
///      ▼
/// AllocationFactors::from_doc ← THIS TYPE
///      │
///      ▼
/// freight = 0.2  →  item with FOB 50 carries 10 of freight
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AllocationFactors {
    /// total_freight / total_fob
    pub freight: f64,
    /// total_insurance / total_fob
    pub insurance: f64,
    /// total_customs_taxes / (total_fob + total_cif)
    pub customs_taxes: f64,
    /// total_nationalization_costs / (total_fob + total_cif)
    pub nationalization: f64,
}

impl AllocationFactors {
    /// Computes the factors from the document's current totals.
    ///
    /// ## Example
    /// ```rust
    /// use landed_core::{PolicyDoc, ratio::AllocationFactors};
    ///
    /// let mut doc = PolicyDoc::new(1.0);
    /// doc.total_fob = 100.0;
    /// doc.total_freight = 20.0;
    ///
    /// let factors = AllocationFactors::from_doc(&doc);
    /// assert_eq!(factors.freight, 0.2);
    /// assert_eq!(factors.insurance, 0.0);
    /// ```
    pub fn from_doc(doc: &PolicyDoc) -> Self {
        let landed_base = doc.total_fob + doc.total_cif;

        AllocationFactors {
            freight: safe_div(doc.total_freight, doc.total_fob),
            insurance: safe_div(doc.total_insurance, doc.total_fob),
            customs_taxes: safe_div(doc.total_customs_taxes, landed_base),
            nationalization: safe_div(doc.total_nationalization_costs, landed_base),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
