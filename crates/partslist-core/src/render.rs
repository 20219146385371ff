//! # Rendering
//!
//! Turns a [`TableView`] into something a host can display.
//!
//! ## Renderers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        TableRenderer                                    │
//! │                                                                         │
//! │  HtmlRenderer ──► <thead> / <tbody> / <tfoot id="table-footer">        │
//! │                   inner markup of the host page's <table>              │
//! │                                                                         │
//! │  TextRenderer ──► fixed-width columns for a terminal                   │
//! │                                                                         │
//! │  JsonRenderer ──► the TableView itself, for script-driven pages        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rendering is deterministic: the same table always produces the same bytes.

use std::borrow::Cow;
use std::fmt;

use crate::error::{CoreError, CoreResult};
use crate::format::format_currency;
use crate::table::{BodyRow, Column, TableView};

/// Id given to the `<tfoot>` element.
pub const FOOTER_ID: &str = "table-footer";

/// Something that can draw a table.
pub trait TableRenderer {
    /// Renders the complete table.
    fn render(&self, table: &TableView) -> CoreResult<String>;
}

// =============================================================================
// HTML
// =============================================================================

/// Renders the inner markup of a `<table>` element.
///
/// ## Example
/// ```rust
/// use partslist_core::{build_table, HtmlRenderer, TableRenderer, DEFAULT_TAX_RATE};
///
/// let html = HtmlRenderer.render(&build_table(&[], DEFAULT_TAX_RATE).unwrap()).unwrap();
/// assert!(html.starts_with("<thead>"));
/// assert!(html.contains(r#"<td colspan="4">Totals:</td>"#));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl TableRenderer for HtmlRenderer {
    fn render(&self, table: &TableView) -> CoreResult<String> {
        Ok(HtmlTable(table).to_string())
    }
}

struct HtmlTable<'a>(&'a TableView);

impl fmt::Display for HtmlTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.0;

        writeln!(f, "<thead>")?;
        writeln!(f, "  <tr>")?;
        for column in &table.columns {
            let heading = column
                .heading_lines()
                .iter()
                .map(|line| escape_html(line))
                .collect::<Vec<_>>()
                .join("<br>");
            writeln!(f, r#"    <th class="{}">{}</th>"#, column.css_class(), heading)?;
        }
        writeln!(f, "  </tr>")?;
        writeln!(f, "</thead>")?;

        writeln!(f, "<tbody>")?;
        for row in &table.body {
            write_html_row(f, row)?;
        }
        writeln!(f, "</tbody>")?;

        let footer = &table.footer;
        writeln!(f, r#"<tfoot id="{FOOTER_ID}">"#)?;
        writeln!(f, "  <tr>")?;
        writeln!(
            f,
            r#"    <td colspan="{}">{}</td>"#,
            footer.label_span,
            escape_html(&footer.label)
        )?;
        for amount in [
            footer.totals.subtotal,
            footer.totals.total_tax,
            footer.totals.grand_total,
        ] {
            writeln!(f, "    <td>{}</td>", format_currency(amount))?;
        }
        writeln!(f, "  </tr>")?;
        write!(f, "</tfoot>")
    }
}

fn write_html_row(f: &mut fmt::Formatter<'_>, row: &BodyRow) -> fmt::Result {
    writeln!(f, "  <tr>")?;
    writeln!(f, r#"    <td class="Quantity">{}</td>"#, row.quantity)?;
    writeln!(f, r#"    <td class="Item">{}</td>"#, escape_html(&row.item_code))?;

    write!(f, r#"    <td class="Title">{}<br>"#, escape_html(&row.title.title))?;
    for (i, detail) in row.title.details.iter().enumerate() {
        if i > 0 {
            write!(f, "<br>")?;
        }
        write!(
            f,
            r#"<br><span class="{}"><strong>{}</strong> {}</span>"#,
            detail.kind.css_class(),
            detail.kind.label(),
            escape_html(&detail.value)
        )?;
    }
    writeln!(f, "</td>")?;

    writeln!(
        f,
        r#"    <td class="StoreURL"><span class="StoreName"><a href="{}">{}</a></span><br></td>"#,
        escape_html(&row.store.url),
        escape_html(&row.store.name)
    )?;
    writeln!(f, "    <td>{}</td>", format_currency(row.unit_price))?;
    writeln!(f, r#"    <td class="Tax">{}</td>"#, format_currency(row.tax_amount))?;
    writeln!(f, r#"    <td class="Total">{}</td>"#, format_currency(row.total_with_tax))?;
    writeln!(f, "  </tr>")
}

/// Escapes text for use in element content and quoted attribute values.
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

// =============================================================================
// Plain Text
// =============================================================================

/// Renders a fixed-width text table.
///
/// Amount columns and the quantity are right-aligned; the title cell folds its
/// SKU / Model / Note lines into one line after the title.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl TableRenderer for TextRenderer {
    fn render(&self, table: &TableView) -> CoreResult<String> {
        let header: Vec<String> = table.columns.iter().map(|c| c.label().to_string()).collect();
        let rows: Vec<Vec<String>> = table
            .body
            .iter()
            .map(|row| table.columns.iter().map(|&c| text_cell(row, c)).collect())
            .collect();

        let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let totals = &table.footer.totals;
        let footer_amounts = [totals.subtotal, totals.total_tax, totals.grand_total].map(format_currency);
        let span = table.footer.label_span.min(widths.len());
        for (width, amount) in widths[span..].iter_mut().zip(&footer_amounts) {
            *width = (*width).max(amount.chars().count());
        }

        // The label spans the first columns plus the separators between them.
        let label_width = widths[..span].iter().sum::<usize>() + 3 * span.saturating_sub(1);
        let label_len = table.footer.label.chars().count();
        if label_len > label_width {
            if let Some(last) = widths[..span].last_mut() {
                *last += label_len - label_width;
            }
        }
        let label_width = label_width.max(label_len);

        let aligned = |cells: &[String]| -> String {
            table
                .columns
                .iter()
                .zip(cells)
                .zip(&widths)
                .map(|((column, cell), &width)| pad(cell, width, right_aligned(*column)))
                .collect::<Vec<_>>()
                .join(" | ")
        };
        let rule = widths.iter().map(|&w| "-".repeat(w)).collect::<Vec<_>>().join("-+-");

        let mut out = String::new();
        out.push_str(aligned(&header).trim_end());
        out.push('\n');
        out.push_str(&rule);
        out.push('\n');
        for row in &rows {
            out.push_str(aligned(row).trim_end());
            out.push('\n');
        }
        out.push_str(&rule);
        out.push('\n');

        let mut footer = vec![pad(&table.footer.label, label_width, false)];
        footer.extend(
            footer_amounts
                .iter()
                .zip(&widths[span..])
                .map(|(amount, &width)| pad(amount, width, true)),
        );
        out.push_str(&footer.join(" | "));
        out.push('\n');

        Ok(out)
    }
}

fn right_aligned(column: Column) -> bool {
    column.is_amount() || column == Column::Quantity
}

fn text_cell(row: &BodyRow, column: Column) -> String {
    match column {
        Column::Quantity => row.quantity.to_string(),
        Column::Item => row.item_code.clone(),
        Column::Title => {
            let details: Vec<String> = row
                .title
                .details
                .iter()
                .map(|d| format!("{} {}", d.kind.label(), d.value))
                .collect();
            format!("{} ({})", row.title.title, details.join("; "))
        }
        Column::StoreUrl => format!("{} <{}>", row.store.name, row.store.url),
        Column::Price => format_currency(row.unit_price),
        Column::Tax => format_currency(row.tax_amount),
        Column::Total => format_currency(row.total_with_tax),
    }
}

fn pad(text: &str, width: usize, right: bool) -> String {
    if right {
        format!("{text:>width$}")
    } else {
        format!("{text:<width$}")
    }
}

// =============================================================================
// JSON
// =============================================================================

/// Renders the table model as pretty-printed JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl TableRenderer for JsonRenderer {
    fn render(&self, table: &TableView) -> CoreResult<String> {
        serde_json::to_string_pretty(table).map_err(|e| CoreError::Render(e.to_string()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::build_table;
    use crate::types::LineItem;
    use crate::DEFAULT_TAX_RATE;

    fn items(json: &str) -> Vec<LineItem> {
        LineItem::parse_list(json).unwrap()
    }

    fn ram() -> Vec<LineItem> {
        items(
            r#"[{"qty": 2, "item": "RAM", "title": "32GB DDR5", "sku": "F5-6000",
                 "model": "Trident Z5", "note": "", "price": "10.00",
                 "buy_url": "https://example.com/ram", "store_name": "Newegg"}]"#,
        )
    }

    #[test]
    fn test_html_header() {
        let html = HtmlRenderer.render(&build_table(&[], DEFAULT_TAX_RATE).unwrap()).unwrap();
        assert!(html.contains(r#"<th class="Quantity">Quantity</th>"#));
        assert!(html.contains(r#"<th class="Item">Item</th>"#));
        assert!(html.contains(r#"<th class="Title"></th>"#));
        assert!(html.contains(r#"<th class="StoreURL">Buy URL</th>"#));
        assert!(html.contains(r#"<th class="Price">Price<br>per item</th>"#));
        assert!(html.contains(r#"<th class="Tax">Tax</th>"#));
        assert!(html.contains(r#"<th class="Total">Total with Tax</th>"#));
    }

    #[test]
    fn test_html_empty_table() {
        let html = HtmlRenderer.render(&build_table(&[], DEFAULT_TAX_RATE).unwrap()).unwrap();
        assert!(html.contains("<tbody>\n</tbody>"));
        assert!(html.contains(r#"<tfoot id="table-footer">"#));
        assert_eq!(html.matches("<td>$0.00</td>").count(), 3);
        assert!(html.ends_with("</tfoot>"));
    }

    #[test]
    fn test_html_row_and_footer() {
        let html = HtmlRenderer.render(&build_table(&ram(), DEFAULT_TAX_RATE).unwrap()).unwrap();

        assert!(html.contains(r#"<td class="Quantity">2</td>"#));
        assert!(html.contains(r#"<td class="Item">RAM</td>"#));
        assert!(html.contains(
            r#"<td class="Title">32GB DDR5<br><br><span class="SKU"><strong>SKU:</strong> F5-6000</span><br><br><span class="Model"><strong>Model:</strong> Trident Z5</span></td>"#
        ));
        assert!(html.contains(
            r#"<span class="StoreName"><a href="https://example.com/ram">Newegg</a></span>"#
        ));
        assert!(html.contains("<td>$10.00</td>"));
        assert!(html.contains(r#"<td class="Tax">$1.65</td>"#));
        assert!(html.contains(r#"<td class="Total">$21.65</td>"#));

        let footer = &html[html.find("<tfoot").unwrap()..];
        assert!(footer.contains(r#"<td colspan="4">Totals:</td>"#));
        assert!(footer.contains(
            "<td>$20.00</td>\n    <td>$1.65</td>\n    <td>$21.65</td>"
        ));
        assert!(!html.contains("Note:"));
    }

    #[test]
    fn test_html_note_line() {
        let mut with_note = ram();
        with_note[0].note = Some("Fragile".to_string());
        let html = HtmlRenderer.render(&build_table(&with_note, DEFAULT_TAX_RATE).unwrap()).unwrap();
        assert!(html.contains(
            r#"<strong>Model:</strong> Trident Z5</span><br><br><span class="Note"><strong>Note:</strong> Fragile</span></td>"#
        ));

        let mut blank = ram();
        blank[0].note = Some("  ".to_string());
        let blank_html = HtmlRenderer.render(&build_table(&blank, DEFAULT_TAX_RATE).unwrap()).unwrap();
        let absent_html = HtmlRenderer.render(&build_table(&ram(), DEFAULT_TAX_RATE).unwrap()).unwrap();
        assert_eq!(blank_html, absent_html);
    }

    #[test]
    fn test_html_escapes_text_and_attributes() {
        let mut hostile = ram();
        hostile[0].title = "<script>alert(1)</script>".to_string();
        hostile[0].purchase_url = r#"https://x.test/?a=1&b="2""#.to_string();
        hostile[0].store_name = "Tom & Jerry's".to_string();

        let html = HtmlRenderer.render(&build_table(&hostile, DEFAULT_TAX_RATE).unwrap()).unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains(r#"href="https://x.test/?a=1&amp;b=&quot;2&quot;""#));
        assert!(html.contains("Tom &amp; Jerry&#39;s"));
    }

    #[test]
    fn test_html_is_deterministic() {
        let table = build_table(&ram(), DEFAULT_TAX_RATE).unwrap();
        assert_eq!(
            HtmlRenderer.render(&table).unwrap(),
            HtmlRenderer.render(&table).unwrap()
        );
    }

    #[test]
    fn test_escape_html_borrows_clean_text() {
        assert!(matches!(escape_html("plain"), Cow::Borrowed("plain")));
        assert_eq!(escape_html("a<b"), "a&lt;b");
    }

    #[test]
    fn test_text_renderer() {
        let text = TextRenderer.render(&build_table(&ram(), DEFAULT_TAX_RATE).unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("Quantity | Item | Title"));
        assert!(lines[1].starts_with("---"));
        assert!(lines[2].contains("32GB DDR5 (SKU: F5-6000; Model: Trident Z5)"));
        assert!(lines[2].contains("Newegg <https://example.com/ram>"));
        assert!(lines[2].contains("$21.65"));
        assert!(lines[4].starts_with("Totals:"));
        assert!(lines[4].ends_with("$21.65"));

        // footer amounts line up with the body amounts
        assert_eq!(lines[2].len(), lines[4].len());
    }

    #[test]
    fn test_text_renderer_empty() {
        let text = TextRenderer.render(&build_table(&[], DEFAULT_TAX_RATE).unwrap()).unwrap();
        assert_eq!(text.lines().count(), 4);
        assert!(text.contains("$0.00"));
    }

    #[test]
    fn test_json_renderer() {
        let table = build_table(&ram(), DEFAULT_TAX_RATE).unwrap();
        let json = JsonRenderer.render(&table).unwrap();
        let back: TableView = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
        assert!(json.contains(r#""columns""#));
        assert!(json.contains(r#""store_url""#));
    }
}
