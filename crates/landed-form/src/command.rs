//! # Edit Scripts
//!
//! Form operations as data, so a whole editing session can be replayed
//! from a JSON file.
//!
//! ## Script Format
//! ```text
//! [
//!   { "op": "set_exchange_rate", "rate": 36.5 },
//!   { "op": "add_item", "name": "a", "qty": 2, "fob_unit_price": 50 },
//!   { "op": "add_cost", "table": "cif_costs", "type": "Flete", "amount_usd": 20 },
//!   { "op": "set_item_qty", "row": "a", "qty": 3 },
//!   { "op": "remove_cost", "table": "cif_costs", "row": "..." }
//! ]
//! ```
//!
//! Commands run in order. The first failure stops the script; commands
//! before it stay applied.

use landed_core::{CostTable, RefreshSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::FormResult;
use crate::form::{CostInput, ItemInput, PolicyForm};
use crate::sink::RefreshSink;

/// One scripted form operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum FormCommand {
    SetExchangeRate {
        rate: f64,
    },

    AddItem {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        qty: f64,
        #[serde(default)]
        fob_unit_price: f64,
    },
    SetItemQty {
        row: String,
        qty: f64,
    },
    SetItemFobUnitPrice {
        row: String,
        fob_unit_price: f64,
    },
    RemoveItem {
        row: String,
    },

    AddCost {
        table: CostTable,
        #[serde(default)]
        name: Option<String>,
        #[serde(default, rename = "type")]
        cost_type: Option<String>,
        #[serde(default)]
        amount_usd: f64,
        #[serde(default)]
        exchange_rate: Option<f64>,
        #[serde(default)]
        amount_nio: Option<f64>,
    },
    SetCostType {
        table: CostTable,
        row: String,
        #[serde(default, rename = "type")]
        cost_type: Option<String>,
    },
    SetCostAmountUsd {
        table: CostTable,
        row: String,
        amount_usd: f64,
    },
    SetCostExchangeRate {
        table: CostTable,
        row: String,
        exchange_rate: f64,
    },
    SetCostAmountNio {
        table: CostTable,
        row: String,
        amount_nio: f64,
    },
    RemoveCost {
        table: CostTable,
        row: String,
    },

    RecalculateAll,
}

impl FormCommand {
    /// The command's `op` tag.
    pub fn op(&self) -> &'static str {
        match self {
            FormCommand::SetExchangeRate { .. } => "set_exchange_rate",
            FormCommand::AddItem { .. } => "add_item",
            FormCommand::SetItemQty { .. } => "set_item_qty",
            FormCommand::SetItemFobUnitPrice { .. } => "set_item_fob_unit_price",
            FormCommand::RemoveItem { .. } => "remove_item",
            FormCommand::AddCost { .. } => "add_cost",
            FormCommand::SetCostType { .. } => "set_cost_type",
            FormCommand::SetCostAmountUsd { .. } => "set_cost_amount_usd",
            FormCommand::SetCostExchangeRate { .. } => "set_cost_exchange_rate",
            FormCommand::SetCostAmountNio { .. } => "set_cost_amount_nio",
            FormCommand::RemoveCost { .. } => "remove_cost",
            FormCommand::RecalculateAll => "recalculate_all",
        }
    }
}

/// Parses a JSON array of commands.
///
/// ## Example
/// ```rust
/// use landed_form::{parse_script, FormCommand};
///
/// let script = parse_script(r#"[{"op": "set_exchange_rate", "rate": 36.5}]"#)?;
/// assert_eq!(script, vec![FormCommand::SetExchangeRate { rate: 36.5 }]);
/// # Ok::<(), landed_form::FormError>(())
/// ```
pub fn parse_script(json: &str) -> FormResult<Vec<FormCommand>> {
    Ok(serde_json::from_str(json)?)
}

impl<S: RefreshSink> PolicyForm<S> {
    /// Runs one command.
    pub fn apply(&mut self, command: FormCommand) -> FormResult<RefreshSet> {
        debug!(op = command.op(), "applying command");

        match command {
            FormCommand::SetExchangeRate { rate } => self.set_exchange_rate(rate),

            FormCommand::AddItem {
                name,
                qty,
                fob_unit_price,
            } => {
                let (_, refresh) = self.insert_item(ItemInput {
                    name,
                    qty,
                    fob_unit_price,
                })?;
                Ok(refresh)
            }
            FormCommand::SetItemQty { row, qty } => self.set_item_qty(&row, qty),
            FormCommand::SetItemFobUnitPrice {
                row,
                fob_unit_price,
            } => self.set_item_fob_unit_price(&row, fob_unit_price),
            FormCommand::RemoveItem { row } => self.remove_item(&row),

            FormCommand::AddCost {
                table,
                name,
                cost_type,
                amount_usd,
                exchange_rate,
                amount_nio,
            } => {
                let (_, refresh) = self.insert_cost(
                    table,
                    CostInput {
                        name,
                        cost_type,
                        amount_usd,
                        exchange_rate,
                        amount_nio,
                    },
                )?;
                Ok(refresh)
            }
            FormCommand::SetCostType {
                table,
                row,
                cost_type,
            } => self.set_cost_type(table, &row, cost_type.as_deref()),
            FormCommand::SetCostAmountUsd {
                table,
                row,
                amount_usd,
            } => self.set_cost_amount_usd(table, &row, amount_usd),
            FormCommand::SetCostExchangeRate {
                table,
                row,
                exchange_rate,
            } => self.set_cost_exchange_rate(table, &row, exchange_rate),
            FormCommand::SetCostAmountNio {
                table,
                row,
                amount_nio,
            } => self.set_cost_amount_nio(table, &row, amount_nio),
            FormCommand::RemoveCost { table, row } => self.remove_cost(table, &row),

            FormCommand::RecalculateAll => Ok(self.recalculate_all()),
        }
    }

    /// Runs commands in order, stopping at the first failure.
    ///
    /// ## Returns
    /// The number of commands applied.
    pub fn apply_all(
        &mut self,
        commands: impl IntoIterator<Item = FormCommand>,
    ) -> FormResult<usize> {
        let mut applied = 0;
        for command in commands {
            let op = command.op();
            if let Err(err) = self.apply(command) {
                warn!(op, step = applied + 1, error = %err, "command failed");
                return Err(err);
            }
            applied += 1;
        }
        Ok(applied)
    }
}
