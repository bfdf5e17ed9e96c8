//! # Recalculation
//!
//! The allocation recalculator: every derived field of a [`PolicyDoc`] is
//! rewritten here, and nowhere else.
//!
//! ## Cascade
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Recalculation Cascade                             │
//! │                                                                         │
//! │  cost row exchange ──► recompute_row_exchange   (amount_nio only)       │
//! │                                                                         │
//! │  cif_costs change  ──► recompute_cif_totals ─────────────┐              │
//! │                          total_freight, total_insurance, │              │
//! │                          total_cif                       │              │
//! │                                                          ▼              │
//! │  nationalization   ──► recompute_nationalization_totals ─┤              │
//! │  change                  total_customs_taxes, ...        │              │
//! │                                                          ▼              │
//! │  item / exchange   ──────────────────────────► recompute_item_totals    │
//! │  rate change                                     factors × every row    │
//! │                                                                         │
//! │  Grouped totals ALWAYS finish before item totals run.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Guarantees
//! - Same inputs, same outputs: running any function twice changes nothing.
//! - No function here returns an error. Zero divisors give zero.
//! - Rows are never added or removed.

use crate::ratio::{safe_div, AllocationFactors};
use crate::refresh::RefreshSet;
use crate::types::{
    AmountField, ChildTable, CifCostType, CostCategory, CostTable, DocField,
    NationalizationCostType, PolicyDoc,
};

// =============================================================================
// Category → Field Tables
// =============================================================================

/// Where each CIF category is accumulated.
pub const CIF_SUBTOTALS: [(CifCostType, DocField); 2] = [
    (CifCostType::Freight, DocField::TotalFreight),
    (CifCostType::Insurance, DocField::TotalInsurance),
];

/// Where each nationalization category is accumulated.
pub const NATIONALIZATION_SUBTOTALS: [(NationalizationCostType, DocField); 2] = [
    (
        NationalizationCostType::CustomsTaxes,
        DocField::TotalCustomsTaxes,
    ),
    (
        NationalizationCostType::NationalizationFee,
        DocField::TotalNationalizationCosts,
    ),
];

// =============================================================================
// Item Totals
// =============================================================================

/// What triggered an item-totals recalculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemChange {
    /// Only document totals or the exchange rate changed.
    #[default]
    None,
    /// The item at this index had `qty` or `fob_unit_price` edited.
    Row(usize),
    /// An item was removed from the table.
    Removed,
    /// Every row's `fob_total_price` is already current; only the sums
    /// are rebuilt.
    Resum,
}

/// Recomputes every derived item field from the current totals.
///
/// ## Behavior
/// - `ItemChange::Row(i)`: recomputes `fob_total_price` of row `i`, then
///   resums `total_qty` and `total_fob`. An index past the end is skipped.
/// - `ItemChange::Removed` and `ItemChange::Resum`: resum `total_qty` and
///   `total_fob`.
/// - `ItemChange::None`: leaves both sums as they are.
///
/// Then, when there is at least one item, the four allocation factors are
/// applied to every row in order.
///
/// ## Example
/// ```rust
/// use landed_core::{PolicyDoc, PolicyItem};
/// use landed_core::recalc::{recompute_item_totals, ItemChange};
///
/// let mut doc = PolicyDoc::new(1.0);
/// doc.total_freight = 20.0;
/// doc.total_insurance = 10.0;
/// doc.items.push(PolicyItem::new("a", 2.0, 50.0));
///
/// recompute_item_totals(&mut doc, ItemChange::Row(0));
///
/// let item = &doc.items[0];
/// assert_eq!(doc.total_fob, 100.0);
/// assert_eq!(item.cif_total_usd, 130.0);
/// assert_eq!(item.unit_price, 65.0);
/// ```
///
/// ## Refresh
/// `items`, `total_qty` and `total_fob`, even when `items` is empty so an
/// emptied grid footer is redrawn.
pub fn recompute_item_totals(doc: &mut PolicyDoc, change: ItemChange) -> RefreshSet {
    let resum = match change {
        ItemChange::Row(index) => {
            if let Some(item) = doc.items.get_mut(index) {
                item.fob_total_price = item.qty * item.fob_unit_price;
            }
            true
        }
        ItemChange::Removed | ItemChange::Resum => true,
        ItemChange::None => false,
    };

    if resum {
        doc.total_qty = doc.items.iter().map(|item| item.qty).sum();
        doc.total_fob = doc.items.iter().map(|item| item.fob_total_price).sum();
    }

    if !doc.items.is_empty() {
        let factors = AllocationFactors::from_doc(doc);
        let exchange_rate = doc.exchange_rate;

        for row in doc.items.iter_mut() {
            row.freight_cost = factors.freight * row.fob_total_price;
            row.insurance_cost = factors.insurance * row.fob_total_price;

            row.cif_total_usd = row.fob_total_price + row.freight_cost + row.insurance_cost;
            row.cif_total_nio = row.cif_total_usd * exchange_rate;

            row.customs_taxes = factors.customs_taxes * row.cif_total_usd;
            row.nationalization_total = factors.nationalization * row.cif_total_usd;

            row.total_price = row.cif_total_nio + row.customs_taxes + row.nationalization_total;
            row.unit_price = safe_div(row.total_price, row.qty);
        }
    }

    let mut refresh = RefreshSet::new();
    refresh.push(ChildTable::Items);
    refresh.push(DocField::TotalQty);
    refresh.push(DocField::TotalFob);
    refresh
}

// =============================================================================
// Grouped Totals
// =============================================================================

/// Rebuilds per-category subtotals of a cost table and their grand total,
/// then cascades into [`recompute_item_totals`].
///
/// ## Arguments
/// * `table` - Cost table to scan
/// * `source` - Row amount summed into the subtotals
/// * `total` - Document field receiving the sum of all subtotals
/// * `subtotals` - Category → document field table
///
/// ## Unknown Types
/// A row whose `type` is unset, unrecognized, or recognized but missing
/// from `subtotals` adds nothing. The user must pick a type.
pub fn recompute_grouped_totals<C: CostCategory>(
    doc: &mut PolicyDoc,
    table: CostTable,
    source: AmountField,
    total: DocField,
    subtotals: &[(C, DocField)],
) -> RefreshSet {
    for (_, field) in subtotals {
        *doc.get_mut(*field) = 0.0;
    }

    let mut sums = vec![0.0_f64; subtotals.len()];
    for row in doc.cost_rows(table) {
        let Some(category) = row.category::<C>() else {
            continue;
        };
        if let Some(slot) = subtotals.iter().position(|(c, _)| *c == category) {
            sums[slot] += row.amount(source);
        }
    }

    for ((_, field), sum) in subtotals.iter().zip(&sums) {
        *doc.get_mut(*field) += sum;
    }

    let grand_total: f64 = subtotals.iter().map(|(_, field)| doc.get(*field)).sum();
    *doc.get_mut(total) = grand_total;

    let mut refresh = RefreshSet::new();
    refresh.push(total);
    for (_, field) in subtotals {
        refresh.push(*field);
    }

    // Freight/insurance/customs factors depend on these totals.
    refresh.merge(recompute_item_totals(doc, ItemChange::None));
    refresh
}

/// Grouped totals of `cif_costs`: `amount_usd` into `total_freight` and
/// `total_insurance`, summed into `total_cif`.
///
/// ## Example
/// ```rust
/// use landed_core::{CostRow, PolicyDoc};
/// use landed_core::recalc::recompute_cif_totals;
///
/// let mut doc = PolicyDoc::new(1.0);
/// doc.cif_costs.push(CostRow::new("c1", Some("Freight"), 100.0, 1.0));
/// doc.cif_costs.push(CostRow::new("c2", Some("Insurance"), 50.0, 1.0));
/// doc.cif_costs.push(CostRow::new("c3", Some("Unknown"), 999.0, 1.0));
///
/// recompute_cif_totals(&mut doc);
/// assert_eq!(doc.total_freight, 100.0);
/// assert_eq!(doc.total_insurance, 50.0);
/// assert_eq!(doc.total_cif, 150.0);
/// ```
pub fn recompute_cif_totals(doc: &mut PolicyDoc) -> RefreshSet {
    recompute_grouped_totals(
        doc,
        CostTable::CifCosts,
        AmountField::AmountUsd,
        DocField::TotalCif,
        &CIF_SUBTOTALS,
    )
}

/// Grouped totals of `nationalization_costs`: `amount_nio` into
/// `total_customs_taxes` and `total_nationalization_costs`, summed into
/// `grand_total_nationalization`.
pub fn recompute_nationalization_totals(doc: &mut PolicyDoc) -> RefreshSet {
    recompute_grouped_totals(
        doc,
        CostTable::NationalizationCosts,
        AmountField::AmountNio,
        DocField::GrandTotalNationalization,
        &NATIONALIZATION_SUBTOTALS,
    )
}

// =============================================================================
// Row Exchange
// =============================================================================

/// Derives `amount_nio` of one cost row from its `amount_usd` and
/// `exchange_rate`. An index past the end is skipped.
///
/// Totals are NOT touched: for CIF rows `amount_nio` has no effect on any
/// total, and nationalization callers recompute totals themselves.
///
/// ## Refresh
/// The row's table.
pub fn recompute_row_exchange(doc: &mut PolicyDoc, table: CostTable, index: usize) -> RefreshSet {
    if let Some(row) = doc.cost_rows_mut(table).get_mut(index) {
        row.apply_exchange();
    }

    let mut refresh = RefreshSet::new();
    refresh.push(ChildTable::from(table));
    refresh
}

// =============================================================================
// Full Recalculation
// =============================================================================

/// Recomputes every derived field of the document from its raw inputs.
///
/// ## Order
/// 1. `amount_nio` of every CIF row
/// 2. `fob_total_price` of every item, then `total_qty` / `total_fob`
/// 3. CIF totals (cascades into item totals)
/// 4. Nationalization totals (cascades into item totals)
///
/// Nationalization rows keep their `amount_nio`: the user may type it
/// directly, so it is an input there.
///
/// ## Refresh
/// All three tables (`items`, `cif_costs`, `nationalization_costs`) and
/// every total, whether or not the tables have rows.
pub fn recompute_all(doc: &mut PolicyDoc) -> RefreshSet {
    let mut refresh = RefreshSet::new();

    for index in 0..doc.cif_costs.len() {
        recompute_row_exchange(doc, CostTable::CifCosts, index);
    }
    refresh.push(ChildTable::CifCosts);
    refresh.push(ChildTable::NationalizationCosts);

    for item in doc.items.iter_mut() {
        item.fob_total_price = item.qty * item.fob_unit_price;
    }
    refresh.merge(recompute_item_totals(doc, ItemChange::Resum));

    refresh.merge(recompute_cif_totals(doc));
    refresh.merge(recompute_nationalization_totals(doc));
    refresh
}

// =============================================================================
// Unit Tests
// =============================================================================
