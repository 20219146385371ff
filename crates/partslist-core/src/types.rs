//! # Domain Types
//!
//! The records the table is built from.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────────┐          ┌─────────────────┐                 │
//! │  │      LineItem        │          │    TaxRate      │                 │
//! │  │  ──────────────────  │          │  ─────────────  │                 │
//! │  │  quantity   (qty)    │          │  bps (u32)      │                 │
//! │  │  item_code  (item)   │          │  825 = 8.25%    │                 │
//! │  │  title, sku, model   │          └─────────────────┘                 │
//! │  │  note (optional)     │                                              │
//! │  │  unit_price (price)  │   (wire names from the data file in parens)  │
//! │  │  purchase_url        │                                              │
//! │  │  store_name          │                                              │
//! │  └──────────────────────┘                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::validation::{parse_price, parse_quantity, parse_rate_bps};

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 825 bps = 8.25%, so a rate is an exact integer and never carries more
/// precision than a percentage with two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Parses a percentage such as `"8.25"` or `"8.25%"`.
    ///
    /// ## Example
    /// ```rust
    /// use partslist_core::types::TaxRate;
    ///
    /// assert_eq!(TaxRate::parse_percentage("8.25").unwrap().bps(), 825);
    /// assert!(TaxRate::parse_percentage("8.875").is_err()); // finer than a basis point
    /// assert!(TaxRate::parse_percentage("150").is_err());
    /// ```
    pub fn parse_percentage(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        let number = trimmed.strip_suffix('%').unwrap_or(trimmed);
        Ok(TaxRate(parse_rate_bps(number)?))
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// The rate as a fraction: 825 bps is `0.0825`.
    #[inline]
    pub fn fraction(&self) -> Decimal {
        Decimal::new(i64::from(self.0), 4)
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        crate::DEFAULT_TAX_RATE
    }
}

/// Shows the rate as a percentage: `8.25%`.
impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One purchased part, as listed in the data file.
///
/// Decoding goes through [`WireLineItem`], which keeps the data file's field
/// names and loose numeric types; `price` and `qty` are coerced on the way in.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "WireLineItem")]
pub struct LineItem {
    /// How many were bought.
    pub quantity: u32,

    /// Short identifying code (part number).
    pub item_code: String,

    /// Human-readable description.
    pub title: String,

    /// Stock keeping unit; empty when the file has none.
    pub sku: String,

    /// Model designation; empty when the file has none.
    pub model: String,

    /// Free-text annotation, kept exactly as written.
    pub note: Option<String>,

    /// Price of a single unit, exactly as the data file gives it.
    pub unit_price: Decimal,

    /// Vendor listing the part was bought from.
    pub purchase_url: String,

    /// Display name of the vendor.
    pub store_name: String,
}

impl LineItem {
    /// Decodes a data file: a JSON array of line item objects.
    ///
    /// ## Example
    /// ```rust
    /// use partslist_core::LineItem;
    /// use rust_decimal::Decimal;
    ///
    /// let items = LineItem::parse_list(r#"[{"qty": "3", "price": 4.5}]"#).unwrap();
    /// assert_eq!(items[0].quantity, 3);
    /// assert_eq!(items[0].unit_price, Decimal::new(45, 1));
    ///
    /// assert!(LineItem::parse_list(r#"{"qty": 1}"#).is_err());
    /// ```
    pub fn parse_list(json: &str) -> CoreResult<Vec<LineItem>> {
        Ok(serde_json::from_str(json)?)
    }

    /// The note, if there is one worth showing.
    ///
    /// A missing note and a note made only of whitespace are the same thing.
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref().filter(|note| !note.trim().is_empty())
    }
}

/// A line item exactly as it appears in the data file.
///
/// Text fields default to empty so a sparse record still renders; `qty` and
/// `price` stay raw JSON until [`LineItem::try_from`] coerces them.
#[derive(Debug, Clone, Deserialize)]
pub struct WireLineItem {
    #[serde(default)]
    pub qty: Value,
    #[serde(default)]
    pub item: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub price: Value,
    #[serde(default)]
    pub buy_url: String,
    #[serde(default)]
    pub store_name: String,
}

impl TryFrom<WireLineItem> for LineItem {
    type Error = ValidationError;

    fn try_from(wire: WireLineItem) -> Result<Self, Self::Error> {
        Ok(LineItem {
            quantity: parse_quantity(&wire.qty)?,
            item_code: wire.item,
            title: wire.title,
            sku: wire.sku,
            model: wire.model,
            note: wire.note,
            unit_price: parse_price(&wire.price)?,
            purchase_url: wire.buy_url,
            store_name: wire.store_name,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
