//! # Table Model
//!
//! What the table contains, independent of how it is drawn.
//!
//! ## Layout
//! ```text
//! ┌──────────┬──────┬──────────────┬─────────┬───────────┬───────┬───────────┐
//! │ Quantity │ Item │ (Title)      │ Buy URL │ Price     │ Tax   │ Total     │
//! │          │      │              │         │ per item  │       │ with Tax  │  header
//! ├──────────┼──────┼──────────────┼─────────┼───────────┼───────┼───────────┤
//! │ 2        │ RAM  │ 32GB DDR5    │ Newegg  │ $10.00    │ $1.65 │ $21.65    │  body
//! │          │      │ SKU: ...     │  (link) │           │       │           │  (one row
//! │          │      │ Model: ...   │         │           │       │           │   per item,
//! │          │      │ Note: ...    │         │           │       │           │   input order)
//! ├──────────┴──────┴──────────────┴─────────┼───────────┼───────┼───────────┤
//! │ Totals:                                  │ $20.00    │ $1.65 │ $21.65    │  footer
//! └──────────────────────────────────────────┴───────────┴───────┴───────────┘
//! ```
//!
//! Renderers in [`crate::render`] turn a [`TableView`] into markup or text.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreResult;
use crate::money::Money;
use crate::tax::{compute_tax, ComputedLine, Totals};
use crate::types::{LineItem, TaxRate};
use crate::TOTALS_LABEL;

// =============================================================================
// Columns
// =============================================================================

/// The fixed columns of the table, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Quantity,
    Item,
    Title,
    StoreUrl,
    Price,
    Tax,
    Total,
}

impl Column {
    /// Every column, left to right.
    pub const ALL: [Column; 7] = [
        Column::Quantity,
        Column::Item,
        Column::Title,
        Column::StoreUrl,
        Column::Price,
        Column::Tax,
        Column::Total,
    ];

    /// Columns covered by the footer's "Totals:" label.
    pub const LABEL_SPAN: usize = 4;

    /// Name of the column.
    pub const fn label(&self) -> &'static str {
        match self {
            Column::Quantity => "Quantity",
            Column::Item => "Item",
            Column::Title => "Title",
            Column::StoreUrl => "Buy URL",
            Column::Price => "Price per item",
            Column::Tax => "Tax",
            Column::Total => "Total with Tax",
        }
    }

    /// Lines shown in the header cell.
    ///
    /// The title column has no visible heading and the price heading breaks
    /// after "Price".
    pub const fn heading_lines(&self) -> &'static [&'static str] {
        match self {
            Column::Quantity => &["Quantity"],
            Column::Item => &["Item"],
            Column::Title => &[],
            Column::StoreUrl => &["Buy URL"],
            Column::Price => &["Price", "per item"],
            Column::Tax => &["Tax"],
            Column::Total => &["Total with Tax"],
        }
    }

    /// Class name the host page styles the column with.
    pub const fn css_class(&self) -> &'static str {
        match self {
            Column::Quantity => "Quantity",
            Column::Item => "Item",
            Column::Title => "Title",
            Column::StoreUrl => "StoreURL",
            Column::Price => "Price",
            Column::Tax => "Tax",
            Column::Total => "Total",
        }
    }

    /// True for the three money columns.
    pub const fn is_amount(&self) -> bool {
        matches!(self, Column::Price | Column::Tax | Column::Total)
    }
}

// =============================================================================
// Cells
// =============================================================================

/// Kind of a secondary line under the title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DetailKind {
    Sku,
    Model,
    Note,
}

impl DetailKind {
    /// Label shown before the value.
    pub const fn label(&self) -> &'static str {
        match self {
            DetailKind::Sku => "SKU:",
            DetailKind::Model => "Model:",
            DetailKind::Note => "Note:",
        }
    }

    /// Class name of the line's `<span>`.
    pub const fn css_class(&self) -> &'static str {
        match self {
            DetailKind::Sku => "SKU",
            DetailKind::Model => "Model",
            DetailKind::Note => "Note",
        }
    }
}

/// One labelled line under the title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DetailLine {
    pub kind: DetailKind,
    pub value: String,
}

/// The composite title cell: title plus SKU, Model and an optional Note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TitleCell {
    pub title: String,
    pub details: Vec<DetailLine>,
}

impl TitleCell {
    fn from_item(item: &LineItem) -> Self {
        let mut details = vec![
            DetailLine {
                kind: DetailKind::Sku,
                value: item.sku.clone(),
            },
            DetailLine {
                kind: DetailKind::Model,
                value: item.model.clone(),
            },
        ];

        if let Some(note) = item.note() {
            details.push(DetailLine {
                kind: DetailKind::Note,
                value: note.to_string(),
            });
        }

        TitleCell {
            title: item.title.clone(),
            details,
        }
    }

    /// The note line, when the item has one.
    pub fn note(&self) -> Option<&str> {
        self.details
            .iter()
            .find(|line| line.kind == DetailKind::Note)
            .map(|line| line.value.as_str())
    }
}

/// Store name linking to the vendor listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StoreLink {
    pub name: String,
    pub url: String,
}

// =============================================================================
// Rows
// =============================================================================

/// One body row, built from one line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BodyRow {
    pub quantity: u32,
    pub item_code: String,
    pub title: TitleCell,
    pub store: StoreLink,
    pub unit_price: Money,
    pub tax_amount: Money,
    pub total_with_tax: Money,
}

impl BodyRow {
    /// Builds a row from an item and the figures computed for it.
    pub fn new(item: &LineItem, line: &ComputedLine) -> Self {
        BodyRow {
            quantity: item.quantity,
            item_code: item.item_code.clone(),
            title: TitleCell::from_item(item),
            store: StoreLink {
                name: item.store_name.clone(),
                url: item.purchase_url.clone(),
            },
            unit_price: Money::from_decimal(item.unit_price),
            tax_amount: line.tax_amount,
            total_with_tax: line.total_with_tax,
        }
    }
}

/// The single footer row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FooterRow {
    /// "Totals:"
    pub label: String,

    /// Number of leading columns the label covers.
    pub label_span: usize,

    pub totals: Totals,
}

impl FooterRow {
    fn new(totals: Totals) -> Self {
        FooterRow {
            label: TOTALS_LABEL.to_string(),
            label_span: Column::LABEL_SPAN,
            totals,
        }
    }
}

// =============================================================================
// Table View
// =============================================================================

/// A complete table: header columns, body rows and exactly one footer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TableView {
    pub columns: Vec<Column>,
    pub body: Vec<BodyRow>,
    pub footer: FooterRow,
}

impl TableView {
    /// Number of body rows.
    pub fn row_count(&self) -> usize {
        self.body.len()
    }

    /// Checks if the table has no body rows.
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Builds the table for a list of items.
///
/// ## Algorithm
/// ```text
/// totals = 0
/// for item in items (input order):
///     line = compute_tax(item.unit_price, item.quantity, rate)?  ← once
///     body.push(BodyRow::new(item, &line))
///     totals.add(&line)?
/// footer = "Totals:" + totals
/// ```
///
/// ## Example
/// ```rust
/// use partslist_core::{build_table, DEFAULT_TAX_RATE};
///
/// let table = build_table(&[], DEFAULT_TAX_RATE).unwrap();
/// assert!(table.is_empty());
/// assert!(table.footer.totals.is_zero());
/// ```
pub fn build_table(items: &[LineItem], rate: TaxRate) -> CoreResult<TableView> {
    let mut totals = Totals::zero();
    let mut body = Vec::with_capacity(items.len());

    for item in items {
        let line = compute_tax(item.unit_price, item.quantity, rate)?;
        body.push(BodyRow::new(item, &line));
        totals.add(&line)?;
    }

    Ok(TableView {
        columns: Column::ALL.to_vec(),
        body,
        footer: FooterRow::new(totals),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
