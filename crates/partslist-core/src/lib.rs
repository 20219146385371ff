//! # partslist-core: Pure Logic for the Parts Table
//!
//! This crate turns a list of purchased parts into a priced table. It contains
//! every calculation and every formatting rule as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        partslist Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 apps/partslist (I/O shell)                      │   │
//! │  │    config ──► loader (file / http) ──► sink (host page)         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Vec<LineItem>                          │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ partslist-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌──────┐ │   │
//! │  │   │  types  │  │  money  │  │   tax   │  │  table  │  │render│ │   │
//! │  │   │LineItem │  │  Money  │  │compute_ │  │TableView│  │ HTML │ │   │
//! │  │   │ TaxRate │  │ format  │  │  tax    │  │ Totals  │  │ text │ │   │
//! │  │   └─────────┘  └─────────┘  └─────────┘  └─────────┘  └──────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Line items and the tax rate
//! - [`money`] - Money type on exact decimals (no floating point!)
//! - [`tax`] - Per-item tax and running totals
//! - [`table`] - The structured table model and its builder
//! - [`format`] - US dollar formatting
//! - [`render`] - Turning a table model into HTML, text or JSON
//! - [`validation`] - Numeric parsing rules for the data file
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use partslist_core::{build_table, LineItem, Money, DEFAULT_TAX_RATE};
//!
//! let items: Vec<LineItem> = LineItem::parse_list(
//!     r#"[{"qty": 2, "item": "RAM", "title": "32GB DDR5", "price": "10.00",
//!          "buy_url": "https://example.com", "store_name": "Example"}]"#,
//! )
//! .unwrap();
//!
//! let table = build_table(&items, DEFAULT_TAX_RATE).unwrap();
//! assert_eq!(table.footer.totals.grand_total, Money::from_cents(2165));
//! ```

pub mod error;
pub mod format;
pub mod money;
pub mod render;
pub mod table;
pub mod tax;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use format::format_currency;
pub use money::Money;
pub use rust_decimal::Decimal;
pub use render::{HtmlRenderer, JsonRenderer, TableRenderer, TextRenderer};
pub use table::{build_table, BodyRow, Column, FooterRow, TableView};
pub use tax::{compute_tax, ComputedLine, Totals};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Tax rate applied to every line of the table: 8.25 %.
///
/// The rate is a property of the whole table, never of a single item.
pub const DEFAULT_TAX_RATE: TaxRate = TaxRate::from_bps(825);

/// Label of the footer row.
pub const TOTALS_LABEL: &str = "Totals:";
