//! # Form Events
//!
//! The trigger table: which recalculation runs when the host reports a
//! change.
//!
//! ## Trigger Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Table / field                  Reaction                                │
//! │  ─────────────────────────────  ──────────────────────────────────────  │
//! │  policy.exchange_rate           item totals                             │
//! │  items.qty / fob_unit_price     item totals (that row)                  │
//! │  items (row removed)            item totals (resum)                     │
//! │                                                                         │
//! │  cif_costs (row removed)        CIF totals                              │
//! │  cif_costs.type                 CIF totals                              │
//! │  cif_costs.amount_usd           CIF totals ──► cif_costs.exchange_rate  │
//! │  cif_costs.exchange_rate        row exchange (totals unaffected)        │
//! │  cif_costs.amount_nio           (none)                                  │
//! │                                                                         │
//! │  nationalization (row removed)  nationalization totals                  │
//! │  nationalization.type           nationalization totals                  │
//! │  nationalization.amount_usd     ──► nationalization.exchange_rate       │
//! │  nationalization.exchange_rate  row exchange, nationalization totals    │
//! │  nationalization.amount_nio     nationalization totals                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `──►` re-fires another field's handler on the same row.
//!
//! The two `amount_usd` handlers differ on purpose. A CIF row's totals are
//! kept in USD, so they are updated before the local amount. A
//! nationalization row's totals are kept in local currency, so the local
//! amount has to be derived first.

use landed_core::recalc::{
    recompute_cif_totals, recompute_item_totals, recompute_nationalization_totals,
    recompute_row_exchange,
};
use landed_core::{CostTable, ItemChange, PolicyDoc, RefreshSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::FormResult;
use crate::form::PolicyForm;
use crate::sink::RefreshSink;

/// Editable field of an item row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemField {
    Qty,
    FobUnitPrice,
}

/// Editable field of a cost row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostField {
    #[serde(rename = "type")]
    CostType,
    AmountUsd,
    ExchangeRate,
    AmountNio,
}

/// A change reported by the host after it wrote a value or changed a grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FormEvent {
    /// The document's `exchange_rate` changed.
    ExchangeRateChanged,

    /// An item's input field changed.
    ItemChanged { row: String, field: ItemField },

    /// A row was removed from `items`.
    ItemRemoved,

    /// A cost row's field changed.
    CostChanged {
        table: CostTable,
        row: String,
        field: CostField,
    },

    /// A row was removed from a cost table.
    CostRemoved { table: CostTable },
}

impl<S: RefreshSink> PolicyForm<S> {
    /// Runs the handler for `event` and forwards every refresh target to
    /// the sink.
    ///
    /// The value itself must already be written. Use the typed setters to
    /// write and dispatch in one step.
    ///
    /// ## Errors
    /// [`crate::FormError::RowNotFound`] when the event names a row that does not
    /// exist. Nothing is recalculated in that case.
    pub fn dispatch(&mut self, event: FormEvent) -> FormResult<RefreshSet> {
        debug!(?event, "dispatching form event");

        let refresh = self.handle(&event)?;
        self.flush(&refresh);
        Ok(refresh)
    }

    fn handle(&mut self, event: &FormEvent) -> FormResult<RefreshSet> {
        let refresh = match event {
            FormEvent::ExchangeRateChanged => recompute_item_totals(&mut self.doc, ItemChange::None),

            FormEvent::ItemChanged { row, .. } => {
                let index = self.item_row(row)?;
                recompute_item_totals(&mut self.doc, ItemChange::Row(index))
            }

            FormEvent::ItemRemoved => recompute_item_totals(&mut self.doc, ItemChange::Removed),

            FormEvent::CostRemoved { table } => recompute_cost_totals(&mut self.doc, *table),

            FormEvent::CostChanged { table, row, field } => {
                let index = self.cost_row(*table, row)?;
                self.handle_cost_field(*table, row, index, *field)?
            }
        };

        Ok(refresh)
    }

    fn handle_cost_field(
        &mut self,
        table: CostTable,
        row: &str,
        index: usize,
        field: CostField,
    ) -> FormResult<RefreshSet> {
        let refire_exchange = FormEvent::CostChanged {
            table,
            row: row.to_string(),
            field: CostField::ExchangeRate,
        };

        let refresh = match (table, field) {
            (_, CostField::CostType) => recompute_cost_totals(&mut self.doc, table),

            (CostTable::CifCosts, CostField::AmountUsd) => {
                let mut refresh = recompute_cif_totals(&mut self.doc);
                refresh.merge(self.handle(&refire_exchange)?);
                refresh
            }
            (CostTable::CifCosts, CostField::ExchangeRate) => {
                recompute_row_exchange(&mut self.doc, table, index)
            }
            (CostTable::CifCosts, CostField::AmountNio) => {
                debug!(row, "cif_costs.amount_nio has no handler");
                RefreshSet::new()
            }

            (CostTable::NationalizationCosts, CostField::AmountUsd) => {
                self.handle(&refire_exchange)?
            }
            (CostTable::NationalizationCosts, CostField::ExchangeRate) => {
                let mut refresh = recompute_row_exchange(&mut self.doc, table, index);
                refresh.merge(recompute_nationalization_totals(&mut self.doc));
                refresh
            }
            (CostTable::NationalizationCosts, CostField::AmountNio) => {
                recompute_nationalization_totals(&mut self.doc)
            }
        };

        Ok(refresh)
    }
}

fn recompute_cost_totals(doc: &mut PolicyDoc, table: CostTable) -> RefreshSet {
    match table {
        CostTable::CifCosts => recompute_cif_totals(doc),
        CostTable::NationalizationCosts => recompute_nationalization_totals(doc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormError;
    use crate::sink::RecordingSink;
    use landed_core::{CostRow, DocField, PolicyItem};

    fn form() -> PolicyForm<RecordingSink> {
        let mut doc = PolicyDoc::new(36.5);
        doc.items.push(PolicyItem::new("i1", 2.0, 50.0));
        doc.cif_costs
            .push(CostRow::new("c1", Some("Flete"), 20.0, 36.5));
        doc.nationalization_costs
            .push(CostRow::new("n1", Some("Impuestos Aduaneros"), 10.0, 36.5));
        PolicyForm::new(doc, RecordingSink::new())
    }

    #[test]
    fn test_exchange_rate_changed_keeps_sums() {
        let mut form = form();
        form.doc.total_fob = 500.0;

        form.dispatch(FormEvent::ExchangeRateChanged).unwrap();

        assert_eq!(form.doc().total_fob, 500.0);
        assert_eq!(form.sink().names(), vec!["items", "total_qty", "total_fob"]);
    }

    #[test]
    fn test_item_changed_unknown_row() {
        let mut form = form();
        let err = form
            .dispatch(FormEvent::ItemChanged {
                row: "nope".to_string(),
                field: ItemField::Qty,
            })
            .unwrap_err();

        assert!(matches!(err, FormError::RowNotFound { .. }));
        assert!(form.sink().targets().is_empty());
    }

    #[test]
    fn test_cif_amount_usd_updates_totals_then_exchange() {
        let mut form = form();

        let refresh = form
            .dispatch(FormEvent::CostChanged {
                table: CostTable::CifCosts,
                row: "c1".to_string(),
                field: CostField::AmountUsd,
            })
            .unwrap();

        assert_eq!(form.doc().total_freight, 20.0);
        assert_eq!(form.doc().cif_costs[0].amount_nio, 730.0);
        let names: Vec<_> = refresh.iter().map(|t| t.name()).collect();
        assert_eq!(names.first(), Some(&"total_cif"));
        assert_eq!(names.last(), Some(&"cif_costs"));
    }

    #[test]
    fn test_cif_exchange_rate_leaves_totals() {
        let mut form = form();

        form.dispatch(FormEvent::CostChanged {
            table: CostTable::CifCosts,
            row: "c1".to_string(),
            field: CostField::ExchangeRate,
        })
        .unwrap();

        assert_eq!(form.doc().cif_costs[0].amount_nio, 730.0);
        assert_eq!(form.doc().total_cif, 0.0);
        assert_eq!(form.sink().names(), vec!["cif_costs"]);
    }

    #[test]
    fn test_cif_amount_nio_has_no_handler() {
        let mut form = form();
        let refresh = form
            .dispatch(FormEvent::CostChanged {
                table: CostTable::CifCosts,
                row: "c1".to_string(),
                field: CostField::AmountNio,
            })
            .unwrap();
        assert!(refresh.is_empty());
    }

    #[test]
    fn test_nationalization_amount_usd_derives_nio_then_totals() {
        let mut form = form();

        let refresh = form
            .dispatch(FormEvent::CostChanged {
                table: CostTable::NationalizationCosts,
                row: "n1".to_string(),
                field: CostField::AmountUsd,
            })
            .unwrap();

        assert_eq!(form.doc().nationalization_costs[0].amount_nio, 365.0);
        assert_eq!(form.doc().total_customs_taxes, 365.0);
        assert_eq!(form.doc().grand_total_nationalization, 365.0);
        let names: Vec<_> = refresh.iter().map(|t| t.name()).collect();
        assert_eq!(names.first(), Some(&"nationalization_costs"));
        assert!(refresh.contains(DocField::GrandTotalNationalization));
    }

    #[test]
    fn test_nationalization_amount_nio_sums_typed_value() {
        let mut form = form();
        form.doc.nationalization_costs[0].amount_nio = 999.0;

        form.dispatch(FormEvent::CostChanged {
            table: CostTable::NationalizationCosts,
            row: "n1".to_string(),
            field: CostField::AmountNio,
        })
        .unwrap();

        assert_eq!(form.doc().nationalization_costs[0].amount_nio, 999.0);
        assert_eq!(form.doc().grand_total_nationalization, 999.0);
    }

    #[test]
    fn test_cost_removed_recomputes_table_totals() {
        let mut form = form();
        form.dispatch(FormEvent::CostChanged {
            table: CostTable::CifCosts,
            row: "c1".to_string(),
            field: CostField::CostType,
        })
        .unwrap();
        assert_eq!(form.doc().total_cif, 20.0);

        form.doc.cif_costs.clear();
        form.dispatch(FormEvent::CostRemoved {
            table: CostTable::CifCosts,
        })
        .unwrap();

        assert_eq!(form.doc().total_cif, 0.0);
        assert_eq!(form.doc().total_freight, 0.0);
    }

    #[test]
    fn test_event_json() {
        let event: FormEvent = serde_json::from_str(
            r#"{"event":"cost_changed","table":"cif_costs","row":"c1","field":"type"}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            FormEvent::CostChanged {
                table: CostTable::CifCosts,
                row: "c1".to_string(),
                field: CostField::CostType,
            }
        );
    }
}
