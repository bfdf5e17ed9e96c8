//! Fixed-width text summary of a recalculated Policy.
//!
//! ```text
//! POLICY SUMMARY (exchange rate 36.50)
//! ─────────────────────────────────────────────
//! FOB                                    200.00
//! Freight                                 20.00
//! ...
//!
//! Item                 Qty        FOB    CIF USD  ...   Unit Price
//! a                   2.00     100.00     110.00  ...       660.00
//! ```

use std::io::{self, Write};

use landed_core::PolicyDoc;

const NAME_WIDTH: usize = 16;
const NUM_WIDTH: usize = 14;

/// Writes the document totals followed by one line per item.
pub fn write_summary<W: Write>(out: &mut W, doc: &PolicyDoc, precision: usize) -> io::Result<()> {
    let p = precision;
    let rule = "─".repeat(NAME_WIDTH + NUM_WIDTH * 2);

    writeln!(out, "POLICY SUMMARY (exchange rate {:.p$})", doc.exchange_rate)?;
    writeln!(out, "{rule}")?;

    let totals = [
        ("Quantity", doc.total_qty),
        ("FOB", doc.total_fob),
        ("Freight", doc.total_freight),
        ("Insurance", doc.total_insurance),
        ("CIF", doc.total_cif),
        ("Customs taxes", doc.total_customs_taxes),
        ("Nationalization", doc.total_nationalization_costs),
        ("Nationalization total", doc.grand_total_nationalization),
    ];
    for (label, value) in totals {
        writeln!(
            out,
            "{label:<w$}{value:>n$.p$}",
            w = NAME_WIDTH + NUM_WIDTH,
            n = NUM_WIDTH
        )?;
    }

    if doc.items.is_empty() {
        return Ok(());
    }

    writeln!(out)?;
    let headers = [
        "Qty", "FOB", "CIF USD", "CIF NIO", "Customs", "National.", "Total", "Unit Price",
    ];
    write!(out, "{:<NAME_WIDTH$}", "Item")?;
    for header in headers {
        write!(out, "{header:>NUM_WIDTH$}")?;
    }
    writeln!(out)?;

    for item in &doc.items {
        write!(out, "{:<NAME_WIDTH$}", truncate(&item.name, NAME_WIDTH - 1))?;
        for value in [
            item.qty,
            item.fob_total_price,
            item.cif_total_usd,
            item.cif_total_nio,
            item.customs_taxes,
            item.nationalization_total,
            item.total_price,
            item.unit_price,
        ] {
            write!(out, "{value:>NUM_WIDTH$.p$}")?;
        }
        writeln!(out)?;
    }

    Ok(())
}

fn truncate(name: &str, max: usize) -> String {
    if name.chars().count() <= max {
        name.to_string()
    } else {
        let mut short: String = name.chars().take(max - 1).collect();
        short.push('…');
        short
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use landed_core::PolicyItem;

    fn render(doc: &PolicyDoc, precision: usize) -> String {
        let mut out = Vec::new();
        write_summary(&mut out, doc, precision).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_totals_only_for_empty_policy() {
        let text = render(&PolicyDoc::new(36.5), 2);

        assert!(text.starts_with("POLICY SUMMARY (exchange rate 36.50)"));
        assert!(text.contains("FOB"));
        assert!(!text.contains("Unit Price"));
    }

    #[test]
    fn test_item_rows_use_precision() {
        let mut doc = PolicyDoc::new(1.0);
        let mut item = PolicyItem::new("widget", 2.0, 50.0);
        item.unit_price = 65.0;
        doc.items.push(item);

        let text = render(&doc, 3);
        let row = text.lines().last().unwrap();

        assert!(row.starts_with("widget"));
        assert!(row.ends_with("65.000"));
    }

    #[test]
    fn test_long_names_are_cut() {
        assert_eq!(truncate("short", 15), "short");
        let cut = truncate("a-very-long-item-name-indeed", 15);
        assert_eq!(cut.chars().count(), 15);
        assert!(cut.ends_with('…'));
    }
}
