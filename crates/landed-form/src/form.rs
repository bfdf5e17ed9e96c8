//! # Policy Form
//!
//! The document being edited, plus the operations the host calls on it.
//!
//! ## Edit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Policy Form Operations                               │
//! │                                                                         │
//! │  Host Action              Form Operation            Event               │
//! │  ───────────              ──────────────            ─────               │
//! │                                                                         │
//! │  Edit exchange rate ─────► set_exchange_rate() ────► ExchangeRateChanged│
//! │                                                                         │
//! │  Edit item qty ──────────► set_item_qty() ─────────► ItemChanged        │
//! │                                                                         │
//! │  Add grid row ───────────► add_item() / add_cost() ► ItemChanged /      │
//! │                                                      CostChanged        │
//! │                                                                         │
//! │  Delete grid row ────────► remove_item() ──────────► ItemRemoved        │
//! │                            remove_cost() ──────────► CostRemoved        │
//! │                                                                         │
//! │  NOTE: every operation validates first. On error the document is        │
//! │        untouched and nothing is refreshed.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use landed_core::recalc::recompute_all;
use landed_core::validation::{validate_amount, validate_document, validate_row_name};
use landed_core::{
    ChildTable, CostRow, CostTable, PolicyDoc, PolicyItem, RefreshSet, ValidationError,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{FormError, FormResult};
use crate::events::{CostField, FormEvent, ItemField};
use crate::sink::{NoopSink, RefreshSink};

// =============================================================================
// Row Inputs
// =============================================================================

/// A new item row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemInput {
    /// Row name. A UUID is generated when absent.
    pub name: Option<String>,
    pub qty: f64,
    pub fob_unit_price: f64,
}

/// A new cost row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostInput {
    /// Row name. A UUID is generated when absent.
    pub name: Option<String>,

    /// Category label, e.g. `"Flete"`.
    #[serde(rename = "type")]
    pub cost_type: Option<String>,

    pub amount_usd: f64,

    /// Defaults to the document's exchange rate.
    pub exchange_rate: Option<f64>,

    /// A typed local amount. When absent it is derived from `amount_usd`.
    pub amount_nio: Option<f64>,
}

// =============================================================================
// Policy Form
// =============================================================================

/// An open Policy document.
///
/// Owns the document and a [`RefreshSink`]. Every operation runs on the
/// caller's thread and takes `&mut self`.
///
/// ## Example
/// ```rust
/// use landed_core::{CostTable, PolicyDoc};
/// use landed_form::{CostInput, ItemInput, PolicyForm};
///
/// let mut form = PolicyForm::headless(PolicyDoc::new(1.0));
/// form.add_item(ItemInput {
///     name: Some("a".into()),
///     qty: 2.0,
///     fob_unit_price: 50.0,
/// })?;
/// form.add_cost(CostTable::CifCosts, CostInput {
///     cost_type: Some("Flete".into()),
///     amount_usd: 20.0,
///     ..Default::default()
/// })?;
///
/// assert_eq!(form.doc().total_cif, 20.0);
/// assert_eq!(form.doc().items[0].cif_total_usd, 120.0);
/// # Ok::<(), landed_form::FormError>(())
/// ```
#[derive(Debug)]
pub struct PolicyForm<S: RefreshSink = NoopSink> {
    pub(crate) doc: PolicyDoc,
    pub(crate) sink: S,
}

impl PolicyForm<NoopSink> {
    /// Opens a document with no view attached.
    pub fn headless(doc: PolicyDoc) -> Self {
        PolicyForm::new(doc, NoopSink)
    }
}

impl<S: RefreshSink> PolicyForm<S> {
    /// Opens a document without validating it.
    ///
    /// Rows with an empty name get a generated UUID so they can be
    /// addressed by later edits.
    pub fn new(mut doc: PolicyDoc, sink: S) -> Self {
        let mut named = 0usize;
        for item in doc.items.iter_mut().filter(|item| item.name.is_empty()) {
            item.name = new_row_name();
            named += 1;
        }
        for row in doc
            .cif_costs
            .iter_mut()
            .chain(doc.nationalization_costs.iter_mut())
            .filter(|row| row.name.is_empty())
        {
            row.name = new_row_name();
            named += 1;
        }
        if named > 0 {
            debug!(named, "named unnamed rows");
        }

        PolicyForm { doc, sink }
    }

    /// Validates `doc`, then opens it.
    ///
    /// ## Errors
    /// [`FormError::Core`] naming the first invalid value.
    pub fn load(doc: PolicyDoc, sink: S) -> FormResult<Self> {
        validate_document(&doc)?;
        info!(
            items = doc.items.len(),
            cif_costs = doc.cif_costs.len(),
            nationalization_costs = doc.nationalization_costs.len(),
            "policy loaded"
        );
        Ok(PolicyForm::new(doc, sink))
    }

    pub fn doc(&self) -> &PolicyDoc {
        &self.doc
    }

    pub fn into_doc(self) -> PolicyDoc {
        self.doc
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Recomputes every derived field from the raw inputs and refreshes
    /// everything that changed.
    pub fn recalculate_all(&mut self) -> RefreshSet {
        debug!("recalculating whole policy");
        let refresh = recompute_all(&mut self.doc);
        self.flush(&refresh);
        refresh
    }

    pub(crate) fn flush(&mut self, refresh: &RefreshSet) {
        for target in refresh.iter() {
            self.sink.refresh(*target);
        }
    }

    // =========================================================================
    // Row Lookup
    // =========================================================================

    pub(crate) fn item_row(&self, row: &str) -> FormResult<usize> {
        self.doc.item_index(row).ok_or_else(|| FormError::RowNotFound {
            table: ChildTable::Items,
            row: row.to_string(),
        })
    }

    pub(crate) fn cost_row(&self, table: CostTable, row: &str) -> FormResult<usize> {
        self.doc
            .cost_index(table, row)
            .ok_or_else(|| FormError::RowNotFound {
                table: table.into(),
                row: row.to_string(),
            })
    }

    // =========================================================================
    // Field Setters
    // =========================================================================

    /// Sets the document's exchange rate.
    ///
    /// Item totals are recomputed with the new rate. CIF cost rows keep
    /// their own per-row rate.
    pub fn set_exchange_rate(&mut self, rate: f64) -> FormResult<RefreshSet> {
        validate_amount("exchange_rate", rate)?;
        self.doc.exchange_rate = rate;
        self.dispatch(FormEvent::ExchangeRateChanged)
    }

    pub fn set_item_qty(&mut self, row: &str, qty: f64) -> FormResult<RefreshSet> {
        self.set_item_field(row, ItemField::Qty, qty)
    }

    pub fn set_item_fob_unit_price(&mut self, row: &str, price: f64) -> FormResult<RefreshSet> {
        self.set_item_field(row, ItemField::FobUnitPrice, price)
    }

    fn set_item_field(&mut self, row: &str, field: ItemField, value: f64) -> FormResult<RefreshSet> {
        let index = self.item_row(row)?;
        let item = &mut self.doc.items[index];

        match field {
            ItemField::Qty => {
                validate_amount("qty", value)?;
                item.qty = value;
            }
            ItemField::FobUnitPrice => {
                validate_amount("fob_unit_price", value)?;
                item.fob_unit_price = value;
            }
        }

        self.dispatch(FormEvent::ItemChanged {
            row: row.to_string(),
            field,
        })
    }

    /// Sets a cost row's category label.
    ///
    /// Any label is accepted. One that matches no category keeps the row
    /// out of every subtotal.
    pub fn set_cost_type(
        &mut self,
        table: CostTable,
        row: &str,
        cost_type: Option<&str>,
    ) -> FormResult<RefreshSet> {
        let index = self.cost_row(table, row)?;
        self.doc.cost_rows_mut(table)[index].cost_type = cost_type.map(str::to_string);
        self.cost_changed(table, row, CostField::CostType)
    }

    pub fn set_cost_amount_usd(
        &mut self,
        table: CostTable,
        row: &str,
        amount: f64,
    ) -> FormResult<RefreshSet> {
        self.set_cost_amount(table, row, CostNumber::AmountUsd, amount)
    }

    pub fn set_cost_exchange_rate(
        &mut self,
        table: CostTable,
        row: &str,
        rate: f64,
    ) -> FormResult<RefreshSet> {
        self.set_cost_amount(table, row, CostNumber::ExchangeRate, rate)
    }

    /// Sets a cost row's local amount directly.
    ///
    /// On `nationalization_costs` this feeds the totals. On `cif_costs`
    /// nothing is recalculated: CIF totals are kept in USD.
    pub fn set_cost_amount_nio(
        &mut self,
        table: CostTable,
        row: &str,
        amount: f64,
    ) -> FormResult<RefreshSet> {
        self.set_cost_amount(table, row, CostNumber::AmountNio, amount)
    }

    fn set_cost_amount(
        &mut self,
        table: CostTable,
        row: &str,
        field: CostNumber,
        value: f64,
    ) -> FormResult<RefreshSet> {
        let index = self.cost_row(table, row)?;
        validate_amount(field.name(), value)?;
        *field.slot(&mut self.doc.cost_rows_mut(table)[index]) = value;

        self.cost_changed(table, row, field.into())
    }

    fn cost_changed(&mut self, table: CostTable, row: &str, field: CostField) -> FormResult<RefreshSet> {
        self.dispatch(FormEvent::CostChanged {
            table,
            row: row.to_string(),
            field,
        })
    }

    // =========================================================================
    // Grid Operations
    // =========================================================================

    /// Appends an item row and recalculates it.
    ///
    /// ## Returns
    /// The new row's name.
    ///
    /// ## Errors
    /// [`FormError::Validation`] for a negative or non-finite input, an
    /// invalid name, or a name already used in `items`.
    pub fn add_item(&mut self, input: ItemInput) -> FormResult<String> {
        self.insert_item(input).map(|(name, _)| name)
    }

    pub(crate) fn insert_item(&mut self, input: ItemInput) -> FormResult<(String, RefreshSet)> {
        validate_amount("qty", input.qty)?;
        validate_amount("fob_unit_price", input.fob_unit_price)?;
        let name = self.new_name(input.name, |doc, name| doc.item_index(name).is_some())?;

        self.doc
            .items
            .push(PolicyItem::new(name.clone(), input.qty, input.fob_unit_price));
        debug!(row = %name, "item added");

        let refresh = self.dispatch(FormEvent::ItemChanged {
            row: name.clone(),
            field: ItemField::Qty,
        })?;
        Ok((name, refresh))
    }

    /// Removes an item row and resums the item totals.
    pub fn remove_item(&mut self, row: &str) -> FormResult<RefreshSet> {
        let index = self.item_row(row)?;
        self.doc.items.remove(index);
        debug!(row, "item removed");
        self.dispatch(FormEvent::ItemRemoved)
    }

    /// Appends a cost row and recalculates its table.
    ///
    /// ## Behavior
    /// - `exchange_rate` defaults to the document's rate
    /// - without `amount_nio`, the row fires its `amount_usd` handler, so
    ///   the local amount is derived
    /// - with `amount_nio`, the typed amount is kept and only the table's
    ///   totals are recomputed
    ///
    /// ## Returns
    /// The new row's name.
    pub fn add_cost(&mut self, table: CostTable, input: CostInput) -> FormResult<String> {
        self.insert_cost(table, input).map(|(name, _)| name)
    }

    pub(crate) fn insert_cost(
        &mut self,
        table: CostTable,
        input: CostInput,
    ) -> FormResult<(String, RefreshSet)> {
        let exchange_rate = input.exchange_rate.unwrap_or(self.doc.exchange_rate);
        validate_amount("amount_usd", input.amount_usd)?;
        validate_amount("exchange_rate", exchange_rate)?;
        if let Some(amount_nio) = input.amount_nio {
            validate_amount("amount_nio", amount_nio)?;
        }
        let name = self.new_name(input.name, |doc, name| {
            doc.cost_index(table, name).is_some()
        })?;

        let mut cost = CostRow::new(
            name.clone(),
            input.cost_type.as_deref(),
            input.amount_usd,
            exchange_rate,
        );
        let field = match input.amount_nio {
            Some(amount_nio) => {
                cost.amount_nio = amount_nio;
                CostField::CostType
            }
            None => CostField::AmountUsd,
        };
        self.doc.cost_rows_mut(table).push(cost);
        debug!(%table, row = %name, "cost row added");

        let refresh = self.cost_changed(table, &name, field)?;
        Ok((name, refresh))
    }

    /// Removes a cost row and recomputes its table's totals.
    pub fn remove_cost(&mut self, table: CostTable, row: &str) -> FormResult<RefreshSet> {
        let index = self.cost_row(table, row)?;
        self.doc.cost_rows_mut(table).remove(index);
        debug!(%table, row, "cost row removed");
        self.dispatch(FormEvent::CostRemoved { table })
    }

    fn new_name(
        &self,
        name: Option<String>,
        taken: impl Fn(&PolicyDoc, &str) -> bool,
    ) -> FormResult<String> {
        let name = match name {
            Some(name) => {
                validate_row_name(&name)?;
                name
            }
            None => new_row_name(),
        };

        if taken(&self.doc, &name) {
            return Err(ValidationError::Duplicate {
                field: "name".to_string(),
                value: name,
            }
            .into());
        }
        Ok(name)
    }
}

fn new_row_name() -> String {
    Uuid::new_v4().to_string()
}

/// The numeric inputs of a cost row, the only fields `set_cost_amount` writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CostNumber {
    AmountUsd,
    ExchangeRate,
    AmountNio,
}

impl CostNumber {
    fn name(self) -> &'static str {
        match self {
            CostNumber::AmountUsd => "amount_usd",
            CostNumber::ExchangeRate => "exchange_rate",
            CostNumber::AmountNio => "amount_nio",
        }
    }

    fn slot(self, row: &mut CostRow) -> &mut f64 {
        match self {
            CostNumber::AmountUsd => &mut row.amount_usd,
            CostNumber::ExchangeRate => &mut row.exchange_rate,
            CostNumber::AmountNio => &mut row.amount_nio,
        }
    }
}

impl From<CostNumber> for CostField {
    fn from(field: CostNumber) -> Self {
        match field {
            CostNumber::AmountUsd => CostField::AmountUsd,
            CostNumber::ExchangeRate => CostField::ExchangeRate,
            CostNumber::AmountNio => CostField::AmountNio,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::RecordingSink;
    use approx::assert_relative_eq;
    use landed_core::DocField;

    fn form() -> PolicyForm<RecordingSink> {
        PolicyForm::new(PolicyDoc::new(36.5), RecordingSink::new())
    }

    fn item(name: &str, qty: f64, fob_unit_price: f64) -> ItemInput {
        ItemInput {
            name: Some(name.to_string()),
            qty,
            fob_unit_price,
        }
    }

    fn cost(name: &str, cost_type: &str, amount_usd: f64) -> CostInput {
        CostInput {
            name: Some(name.to_string()),
            cost_type: Some(cost_type.to_string()),
            amount_usd,
            ..Default::default()
        }
    }

    #[test]
    fn test_new_names_unnamed_rows() {
        let mut doc = PolicyDoc::new(1.0);
        doc.items.push(PolicyItem::new("", 1.0, 1.0));
        doc.cif_costs.push(CostRow::new("keep", None, 0.0, 1.0));
        doc.nationalization_costs.push(CostRow::new("", None, 0.0, 1.0));

        let form = PolicyForm::headless(doc);

        assert_eq!(form.doc().items[0].name.len(), 36);
        assert_eq!(form.doc().cif_costs[0].name, "keep");
        assert!(!form.doc().nationalization_costs[0].name.is_empty());
    }

    #[test]
    fn test_load_rejects_negative_input() {
        let mut doc = PolicyDoc::new(1.0);
        doc.items.push(PolicyItem::new("a", -1.0, 1.0));

        let err = PolicyForm::load(doc, NoopSink).unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert!(err.to_string().contains("items[0].qty"));
    }

    #[test]
    fn test_add_item_computes_row() {
        let mut form = form();
        form.add_item(item("a", 2.0, 50.0)).unwrap();

        assert_eq!(form.doc().total_qty, 2.0);
        assert_eq!(form.doc().total_fob, 100.0);
        assert_eq!(form.doc().items[0].cif_total_nio, 3_650.0);
    }

    #[test]
    fn test_add_item_generates_name() {
        let mut form = form();
        let name = form.add_item(ItemInput::default()).unwrap();
        assert_eq!(form.doc().item_index(&name), Some(0));
    }

    #[test]
    fn test_add_item_rejects_duplicate_name() {
        let mut form = form();
        form.add_item(item("a", 1.0, 1.0)).unwrap();

        let err = form.add_item(item("a", 1.0, 1.0)).unwrap_err();
        assert!(matches!(
            err,
            FormError::Validation(ValidationError::Duplicate { .. })
        ));
        assert_eq!(form.doc().items.len(), 1);
    }

    #[test]
    fn test_set_item_qty_rejects_nan_without_writing() {
        let mut form = form();
        form.add_item(item("a", 2.0, 5.0)).unwrap();
        form.sink_mut().take();

        let err = form.set_item_qty("a", f64::NAN).unwrap_err();

        assert!(matches!(err, FormError::Validation(_)));
        assert_eq!(form.doc().items[0].qty, 2.0);
        assert!(form.sink().targets().is_empty());
    }

    #[test]
    fn test_set_item_fields() {
        let mut form = form();
        form.add_item(item("a", 2.0, 5.0)).unwrap();

        form.set_item_qty("a", 4.0).unwrap();
        form.set_item_fob_unit_price("a", 10.0).unwrap();

        assert_eq!(form.doc().items[0].fob_total_price, 40.0);
        assert_eq!(form.doc().total_fob, 40.0);
    }

    #[test]
    fn test_remove_item_resums() {
        let mut form = form();
        form.add_item(item("a", 2.0, 5.0)).unwrap();
        form.add_item(item("b", 3.0, 10.0)).unwrap();

        form.remove_item("a").unwrap();

        assert_eq!(form.doc().total_qty, 3.0);
        assert_eq!(form.doc().total_fob, 30.0);
        assert!(form.remove_item("a").is_err());
    }

    #[test]
    fn test_add_cif_cost_derives_nio_and_allocates() {
        let mut form = form();
        form.add_item(item("a", 2.0, 50.0)).unwrap();
        form.add_item(item("b", 1.0, 100.0)).unwrap();

        form.add_cost(CostTable::CifCosts, cost("f", "Flete", 20.0))
            .unwrap();
        form.add_cost(CostTable::CifCosts, cost("s", "Seguro", 10.0))
            .unwrap();

        assert_eq!(form.doc().cif_costs[0].exchange_rate, 36.5);
        assert_eq!(form.doc().cif_costs[0].amount_nio, 730.0);
        assert_eq!(form.doc().total_freight, 20.0);
        assert_eq!(form.doc().total_insurance, 10.0);
        assert_eq!(form.doc().total_cif, 30.0);
        assert_relative_eq!(form.doc().items[0].freight_cost, 10.0, epsilon = 1e-9);
        assert_relative_eq!(form.doc().items[1].insurance_cost, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_add_nationalization_cost_with_typed_nio() {
        let mut form = form();
        form.add_item(item("a", 1.0, 100.0)).unwrap();

        let input = CostInput {
            amount_nio: Some(500.0),
            ..cost("t", "Impuestos Aduaneros", 10.0)
        };
        form.add_cost(CostTable::NationalizationCosts, input).unwrap();

        assert_eq!(form.doc().nationalization_costs[0].amount_nio, 500.0);
        assert_eq!(form.doc().total_customs_taxes, 500.0);
        assert_relative_eq!(form.doc().items[0].customs_taxes, 500.0, epsilon = 1e-9);
    }

    #[test]
    fn test_nationalization_amount_usd_edit_updates_grand_total() {
        let mut form = form();
        form.add_cost(
            CostTable::NationalizationCosts,
            cost("n", "Nacionalizacion", 10.0),
        )
        .unwrap();
        assert_eq!(form.doc().grand_total_nationalization, 365.0);

        form.set_cost_amount_usd(CostTable::NationalizationCosts, "n", 20.0)
            .unwrap();

        assert_eq!(form.doc().nationalization_costs[0].amount_nio, 730.0);
        assert_eq!(form.doc().total_nationalization_costs, 730.0);
        assert_eq!(form.doc().grand_total_nationalization, 730.0);
    }

    #[test]
    fn test_cif_exchange_rate_edit_keeps_totals() {
        let mut form = form();
        form.add_cost(CostTable::CifCosts, cost("f", "Freight", 10.0))
            .unwrap();

        let refresh = form
            .set_cost_exchange_rate(CostTable::CifCosts, "f", 40.0)
            .unwrap();

        assert_eq!(form.doc().cif_costs[0].amount_nio, 400.0);
        assert_eq!(form.doc().total_cif, 10.0);
        assert!(!refresh.contains(DocField::TotalCif));
    }

    #[test]
    fn test_cif_amount_nio_edit_is_ignored_by_totals() {
        let mut form = form();
        form.add_cost(CostTable::CifCosts, cost("f", "Freight", 10.0))
            .unwrap();

        let refresh = form
            .set_cost_amount_nio(CostTable::CifCosts, "f", 1.0)
            .unwrap();

        assert!(refresh.is_empty());
        assert_eq!(form.doc().cif_costs[0].amount_nio, 1.0);
        assert_eq!(form.doc().total_cif, 10.0);
    }

    #[test]
    fn test_cost_setters_write_their_own_field() {
        let mut form = PolicyForm::new(PolicyDoc::new(1.0), RecordingSink::new());
        form.doc.nationalization_costs
            .push(CostRow::new("n", Some("Nacionalizacion"), 0.0, 1.0));

        form.set_cost_amount_usd(CostTable::NationalizationCosts, "n", 3.0)
            .unwrap();
        form.set_cost_exchange_rate(CostTable::NationalizationCosts, "n", 7.0)
            .unwrap();
        let row = &form.doc().nationalization_costs[0];
        assert_eq!((row.amount_usd, row.exchange_rate, row.amount_nio), (3.0, 7.0, 21.0));

        form.set_cost_amount_nio(CostTable::NationalizationCosts, "n", 5.0)
            .unwrap();
        let row = &form.doc().nationalization_costs[0];
        assert_eq!((row.amount_usd, row.exchange_rate, row.amount_nio), (3.0, 7.0, 5.0));
        assert_eq!(form.doc().total_nationalization_costs, 5.0);
    }

    #[test]
    fn test_cost_setter_names_field_in_error() {
        let mut form = PolicyForm::new(PolicyDoc::new(1.0), RecordingSink::new());
        form.doc.cif_costs
            .push(CostRow::new("f", Some("Flete"), 2.0, 1.0));

        let err = form
            .set_cost_exchange_rate(CostTable::CifCosts, "f", -1.0)
            .unwrap_err();

        assert!(err.to_string().contains("exchange_rate"));
        assert_eq!(form.doc().cif_costs[0].exchange_rate, 1.0);
        assert!(form.sink().targets().is_empty());
    }

    #[test]
    fn test_set_cost_type_moves_subtotal() {
        let mut form = form();
        form.add_cost(CostTable::CifCosts, cost("c", "Freight", 10.0))
            .unwrap();

        form.set_cost_type(CostTable::CifCosts, "c", Some("Insurance"))
            .unwrap();
        assert_eq!(form.doc().total_freight, 0.0);
        assert_eq!(form.doc().total_insurance, 10.0);

        form.set_cost_type(CostTable::CifCosts, "c", Some("Otro"))
            .unwrap();
        assert_eq!(form.doc().total_cif, 0.0);
    }

    #[test]
    fn test_remove_cost_recomputes_totals() {
        let mut form = form();
        form.add_cost(CostTable::CifCosts, cost("f", "Freight", 10.0))
            .unwrap();
        form.add_cost(CostTable::CifCosts, cost("g", "Freight", 5.0))
            .unwrap();

        form.remove_cost(CostTable::CifCosts, "f").unwrap();

        assert_eq!(form.doc().total_freight, 5.0);
        let err = form
            .remove_cost(CostTable::NationalizationCosts, "g")
            .unwrap_err();
        assert_eq!(err.to_string(), "Row 'g' not found in nationalization_costs");
    }

    #[test]
    fn test_set_exchange_rate_reprices_items() {
        let mut form = form();
        form.add_item(item("a", 1.0, 10.0)).unwrap();

        form.set_exchange_rate(40.0).unwrap();

        assert_eq!(form.doc().items[0].cif_total_nio, 400.0);
        assert!(form.set_exchange_rate(-1.0).is_err());
        assert_eq!(form.doc().exchange_rate, 40.0);
    }

    #[test]
    fn test_incremental_edits_match_full_recalculation() {
        let mut form = form();
        form.add_item(item("a", 3.0, 20.0)).unwrap();
        form.add_item(item("b", 1.0, 40.0)).unwrap();
        form.add_cost(CostTable::CifCosts, cost("f", "Flete", 12.0))
            .unwrap();
        form.add_cost(CostTable::CifCosts, cost("s", "Seguro", 3.0))
            .unwrap();
        form.add_cost(
            CostTable::NationalizationCosts,
            cost("t", "Impuestos Aduaneros", 8.0),
        )
        .unwrap();

        let incremental = form.doc().clone();
        form.recalculate_all();

        for (a, b) in incremental.items.iter().zip(&form.doc().items) {
            assert_relative_eq!(a.total_price, b.total_price, epsilon = 1e-9);
            assert_relative_eq!(a.unit_price, b.unit_price, epsilon = 1e-9);
        }
        assert_eq!(
            incremental.grand_total_nationalization,
            form.doc().grand_total_nationalization
        );
    }
}
