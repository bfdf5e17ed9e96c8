//! # Domain Types
//!
//! Core domain types for a customs Policy document.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  PolicyDoc                                                      │   │
//! │  │  exchange_rate, total_qty, total_fob, total_freight, ...        │   │
//! │  └──────┬───────────────────────┬───────────────────────┬──────────┘   │
//! │         │ items                 │ cif_costs             │ nationaliz.  │
//! │         ▼                       ▼                       ▼              │
//! │  ┌──────────────┐        ┌──────────────┐        ┌──────────────┐      │
//! │  │  PolicyItem  │        │   CostRow    │        │   CostRow    │      │
//! │  │  qty         │        │   type       │        │   type       │      │
//! │  │  fob_unit_.. │        │   amount_usd │        │   amount_usd │      │
//! │  │  (derived)   │        │   amount_nio │        │   amount_nio │      │
//! │  └──────────────┘        └──────────────┘        └──────────────┘      │
//! │                                                                         │
//! │  DocField / ChildTable / CostTable / AmountField                       │
//! │  ── compile-time names for everything the host refers to by string     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Field Names
//! Serialized names match the host form's field names exactly, so a
//! document exported by the form deserializes without mapping. Every field
//! defaults when absent: the host omits empty values.

use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Document Fields
// =============================================================================

/// A scalar field on the Policy document.
///
/// Replaces string-keyed field access (`doc["total_freight"]`) with an
/// exhaustive enum. See [`PolicyDoc::get`] and [`PolicyDoc::get_mut`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DocField {
    ExchangeRate,
    TotalQty,
    TotalFob,
    TotalFreight,
    TotalInsurance,
    TotalCif,
    TotalCustomsTaxes,
    TotalNationalizationCosts,
    GrandTotalNationalization,
}

impl DocField {
    /// Every document field, in form order.
    pub const ALL: [DocField; 9] = [
        DocField::ExchangeRate,
        DocField::TotalQty,
        DocField::TotalFob,
        DocField::TotalFreight,
        DocField::TotalInsurance,
        DocField::TotalCif,
        DocField::TotalCustomsTaxes,
        DocField::TotalNationalizationCosts,
        DocField::GrandTotalNationalization,
    ];

    /// The host form's field name.
    pub const fn name(self) -> &'static str {
        match self {
            DocField::ExchangeRate => "exchange_rate",
            DocField::TotalQty => "total_qty",
            DocField::TotalFob => "total_fob",
            DocField::TotalFreight => "total_freight",
            DocField::TotalInsurance => "total_insurance",
            DocField::TotalCif => "total_cif",
            DocField::TotalCustomsTaxes => "total_customs_taxes",
            DocField::TotalNationalizationCosts => "total_nationalization_costs",
            DocField::GrandTotalNationalization => "grand_total_nationalization",
        }
    }
}

impl fmt::Display for DocField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Child Tables
// =============================================================================

/// One of the three child tables on the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ChildTable {
    Items,
    CifCosts,
    NationalizationCosts,
}

impl ChildTable {
    /// The host form's table field name.
    pub const fn name(self) -> &'static str {
        match self {
            ChildTable::Items => "items",
            ChildTable::CifCosts => "cif_costs",
            ChildTable::NationalizationCosts => "nationalization_costs",
        }
    }
}

impl fmt::Display for ChildTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A child table holding [`CostRow`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CostTable {
    CifCosts,
    NationalizationCosts,
}

impl CostTable {
    pub const fn name(self) -> &'static str {
        ChildTable::from_cost_table(self).name()
    }
}

impl ChildTable {
    const fn from_cost_table(table: CostTable) -> Self {
        match table {
            CostTable::CifCosts => ChildTable::CifCosts,
            CostTable::NationalizationCosts => ChildTable::NationalizationCosts,
        }
    }
}

impl From<CostTable> for ChildTable {
    fn from(table: CostTable) -> Self {
        ChildTable::from_cost_table(table)
    }
}

impl fmt::Display for CostTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which amount of a [`CostRow`] is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum AmountField {
    AmountUsd,
    AmountNio,
}

// =============================================================================
// Cost Categories
// =============================================================================

/// A closed set of cost categories selectable in a cost table's `type`
/// column.
///
/// Rows store the raw label the user picked; a category is recognized only
/// when the label matches one of [`CostCategory::labels`] exactly. Rows
/// with no match stay out of every subtotal.
pub trait CostCategory: Copy + PartialEq + fmt::Debug + 'static {
    /// Every variant, in option order.
    const ALL: &'static [Self];

    /// Labels accepted for this variant. The first one is canonical.
    fn labels(self) -> &'static [&'static str];

    /// Canonical label.
    fn label(self) -> &'static str {
        self.labels()[0]
    }

    /// Parses a row's `type` value.
    fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|category| category.labels().contains(&label))
    }
}

/// Categories of the `cif_costs` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CifCostType {
    Freight,
    Insurance,
}

impl CostCategory for CifCostType {
    const ALL: &'static [Self] = &[CifCostType::Freight, CifCostType::Insurance];

    fn labels(self) -> &'static [&'static str] {
        match self {
            CifCostType::Freight => &["Freight", "Flete"],
            CifCostType::Insurance => &["Insurance", "Seguro"],
        }
    }
}

/// Categories of the `nationalization_costs` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NationalizationCostType {
    CustomsTaxes,
    NationalizationFee,
}

impl CostCategory for NationalizationCostType {
    const ALL: &'static [Self] = &[
        NationalizationCostType::CustomsTaxes,
        NationalizationCostType::NationalizationFee,
    ];

    fn labels(self) -> &'static [&'static str] {
        match self {
            NationalizationCostType::CustomsTaxes => {
                &["CustomsTaxes", "Customs Taxes", "Impuestos Aduaneros"]
            }
            NationalizationCostType::NationalizationFee => {
                &["NationalizationFee", "Nationalization Fee", "Nacionalizacion"]
            }
        }
    }
}

impl fmt::Display for CifCostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for NationalizationCostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Item Row
// =============================================================================

/// A line item of the policy.
///
/// Only `qty` and `fob_unit_price` are user inputs. Everything else is
/// rewritten by [`crate::recalc::recompute_item_totals`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct PolicyItem {
    /// Row identifier, unique within `items`.
    pub name: String,

    /// Quantity (≥ 0).
    pub qty: f64,

    /// FOB price per unit, USD (≥ 0).
    pub fob_unit_price: f64,

    /// qty × fob_unit_price.
    pub fob_total_price: f64,

    /// Share of the freight total.
    pub freight_cost: f64,

    /// Share of the insurance total.
    pub insurance_cost: f64,

    /// FOB + freight + insurance, USD.
    pub cif_total_usd: f64,

    /// CIF in local currency.
    pub cif_total_nio: f64,

    /// Share of the customs taxes.
    pub customs_taxes: f64,

    /// Share of the nationalization costs.
    pub nationalization_total: f64,

    /// Landed total for the row.
    pub total_price: f64,

    /// Landed cost per unit.
    pub unit_price: f64,
}

impl PolicyItem {
    /// Creates an item with its two inputs set and all derived fields zero.
    pub fn new(name: impl Into<String>, qty: f64, fob_unit_price: f64) -> Self {
        PolicyItem {
            name: name.into(),
            qty,
            fob_unit_price,
            ..Default::default()
        }
    }
}

// =============================================================================
// Cost Row
// =============================================================================

/// A row of `cif_costs` or `nationalization_costs`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct CostRow {
    /// Row identifier, unique within its table.
    pub name: String,

    /// Selected category label. `None` until the user picks one.
    #[serde(rename = "type")]
    pub cost_type: Option<String>,

    /// Amount in USD.
    pub amount_usd: f64,

    /// Rate used to derive `amount_nio`.
    pub exchange_rate: f64,

    /// Amount in local currency.
    pub amount_nio: f64,
}

impl CostRow {
    /// Creates a cost row. `amount_nio` is left at zero until exchange is
    /// applied.
    pub fn new(
        name: impl Into<String>,
        cost_type: Option<&str>,
        amount_usd: f64,
        exchange_rate: f64,
    ) -> Self {
        CostRow {
            name: name.into(),
            cost_type: cost_type.map(str::to_string),
            amount_usd,
            exchange_rate,
            amount_nio: 0.0,
        }
    }

    /// Reads one of the two amounts.
    #[inline]
    pub fn amount(&self, field: AmountField) -> f64 {
        match field {
            AmountField::AmountUsd => self.amount_usd,
            AmountField::AmountNio => self.amount_nio,
        }
    }

    /// Sets `amount_nio = amount_usd × exchange_rate`.
    ///
    /// ## Example
    /// ```rust
    /// use landed_core::CostRow;
    ///
    /// let mut row = CostRow::new("c1", Some("Freight"), 10.0, 36.5);
    /// row.apply_exchange();
    /// assert_eq!(row.amount_nio, 365.0);
    /// ```
    #[inline]
    pub fn apply_exchange(&mut self) {
        self.amount_nio = self.amount_usd * self.exchange_rate;
    }

    /// Parses `cost_type` into a category of `C`.
    pub fn category<C: CostCategory>(&self) -> Option<C> {
        self.cost_type.as_deref().and_then(C::from_label)
    }
}

// =============================================================================
// Policy Document
// =============================================================================

/// The customs Policy document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct PolicyDoc {
    /// USD → local currency rate applied to CIF totals.
    pub exchange_rate: f64,
    pub total_qty: f64,
    pub total_fob: f64,
    pub total_freight: f64,
    pub total_insurance: f64,
    pub total_cif: f64,
    pub total_customs_taxes: f64,
    pub total_nationalization_costs: f64,
    pub grand_total_nationalization: f64,

    pub items: Vec<PolicyItem>,
    pub cif_costs: Vec<CostRow>,
    pub nationalization_costs: Vec<CostRow>,
}

impl PolicyDoc {
    /// Creates an empty document with the given exchange rate.
    pub fn new(exchange_rate: f64) -> Self {
        PolicyDoc {
            exchange_rate,
            ..Default::default()
        }
    }

    /// Reads a scalar field.
    pub fn get(&self, field: DocField) -> f64 {
        match field {
            DocField::ExchangeRate => self.exchange_rate,
            DocField::TotalQty => self.total_qty,
            DocField::TotalFob => self.total_fob,
            DocField::TotalFreight => self.total_freight,
            DocField::TotalInsurance => self.total_insurance,
            DocField::TotalCif => self.total_cif,
            DocField::TotalCustomsTaxes => self.total_customs_taxes,
            DocField::TotalNationalizationCosts => self.total_nationalization_costs,
            DocField::GrandTotalNationalization => self.grand_total_nationalization,
        }
    }

    /// Mutable access to a scalar field.
    pub fn get_mut(&mut self, field: DocField) -> &mut f64 {
        match field {
            DocField::ExchangeRate => &mut self.exchange_rate,
            DocField::TotalQty => &mut self.total_qty,
            DocField::TotalFob => &mut self.total_fob,
            DocField::TotalFreight => &mut self.total_freight,
            DocField::TotalInsurance => &mut self.total_insurance,
            DocField::TotalCif => &mut self.total_cif,
            DocField::TotalCustomsTaxes => &mut self.total_customs_taxes,
            DocField::TotalNationalizationCosts => &mut self.total_nationalization_costs,
            DocField::GrandTotalNationalization => &mut self.grand_total_nationalization,
        }
    }

    /// Rows of a cost table.
    pub fn cost_rows(&self, table: CostTable) -> &[CostRow] {
        match table {
            CostTable::CifCosts => &self.cif_costs,
            CostTable::NationalizationCosts => &self.nationalization_costs,
        }
    }

    /// Mutable rows of a cost table.
    pub fn cost_rows_mut(&mut self, table: CostTable) -> &mut Vec<CostRow> {
        match table {
            CostTable::CifCosts => &mut self.cif_costs,
            CostTable::NationalizationCosts => &mut self.nationalization_costs,
        }
    }

    /// Position of the item named `name`.
    pub fn item_index(&self, name: &str) -> Option<usize> {
        self.items.iter().position(|item| item.name == name)
    }

    /// Position of the cost row named `name` in `table`.
    pub fn cost_index(&self, table: CostTable, name: &str) -> Option<usize> {
        self.cost_rows(table).iter().position(|row| row.name == name)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
