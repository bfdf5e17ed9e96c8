//! # landed-core: Pure Allocation Logic for Customs Policies
//!
//! Recomputes the landed cost of every line item of a customs/import
//! Policy: freight, insurance, customs taxes and nationalization costs are
//! spread over the items in proportion to their value.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Landed Cost Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Host form (Policy document)                    │   │
//! │  │   field edits, row add/remove ──► events   ◄── refresh_field    │   │
//! │  └─────────────────────────────┬───────────────────────▲───────────┘   │
//! │                                │                       │                │
//! │  ┌─────────────────────────────▼───────────────────────┴───────────┐   │
//! │  │                 landed-form (event adapter)                     │   │
//! │  │      trigger table, row lookup, validation, RefreshSink         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ landed-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   ratio   │  │  recalc   │  │ validation│  │   │
//! │  │   │ PolicyDoc │  │ safe_div  │  │ item/cost │  │   rules   │  │   │
//! │  │   │  CostRow  │  │  factors  │  │  totals   │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO LOGGING • NO HOST CALLS • PURE FUNCTIONS         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Policy document, rows, field and category enums
//! - [`ratio`] - Zero-safe division and allocation factors
//! - [`recalc`] - The recalculation functions
//! - [`refresh`] - What the view must redisplay after a recalculation
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use landed_core::{recalc, CostRow, PolicyDoc, PolicyItem};
//!
//! let mut doc = PolicyDoc::new(1.0);
//! doc.items.push(PolicyItem::new("a", 2.0, 50.0));
//! doc.cif_costs.push(CostRow::new("c1", Some("Freight"), 20.0, 1.0));
//! doc.cif_costs.push(CostRow::new("c2", Some("Insurance"), 10.0, 1.0));
//!
//! recalc::recompute_all(&mut doc);
//!
//! assert_eq!(doc.total_cif, 30.0);
//! assert_eq!(doc.items[0].total_price, 130.0);
//! assert_eq!(doc.items[0].unit_price, 65.0);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ratio;
pub mod recalc;
pub mod refresh;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use recalc::ItemChange;
pub use refresh::{RefreshSet, RefreshTarget};
pub use types::*;
