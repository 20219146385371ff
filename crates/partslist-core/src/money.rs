//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With binary floating point:                                            │
//! │    1.005.toFixed(2) = "1.00"   ❌ the half cent silently disappears     │
//! │    0.1 + 0.2 = 0.30000000000000004                                      │
//! │                                                                         │
//! │  OUR SOLUTION: base-10 Decimal                                          │
//! │    Prices keep every digit the data file gives them ("0.333").         │
//! │    Only tax and line totals are rounded, once, half away from zero.     │
//! │    Overflow is an error, never a wrap or a panic.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use partslist_core::money::Money;
//! use rust_decimal::Decimal;
//!
//! let exact = Money::from_decimal(Decimal::new(999, 3)); // 0.999
//! assert_eq!(exact.round_cents(), Money::from_cents(100));
//! assert_eq!(exact.to_string(), "$1.00");
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::format::format_currency;

/// Decimal places of a cent amount.
pub const CENT_PLACES: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in US dollars.
///
/// The amount is not forced to whole cents: an unrounded subtotal or unit
/// price keeps its sub-cent digits until it is displayed.
///
/// ## Where Money is Used
/// ```text
/// LineItem.unit_price ──► × quantity ──► ComputedLine.extended      (exact)
///                                              │
///                          compute_tax(rate) ──┴──► tax_amount, total_with_tax  (cents)
///                                                        │
///                                        Totals (subtotal, total_tax, grand_total)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(#[ts(type = "string")] Decimal);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use partslist_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // $10.99
    /// assert_eq!(price.to_string(), "$10.99");
    /// ```
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, CENT_PLACES))
    }

    /// Wraps an exact amount without rounding it.
    #[inline]
    pub const fn from_decimal(amount: Decimal) -> Self {
        Money(amount)
    }

    /// The exact amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Zero money.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the amount is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the amount is below zero. Negative zero is not.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Rounds to whole cents, half away from zero.
    ///
    /// ## Example
    /// ```rust
    /// use partslist_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// // $0.825 → $0.83, -$0.825 → -$0.83
    /// assert_eq!(Money::from_decimal(Decimal::new(825, 3)).round_cents(), Money::from_cents(83));
    /// assert_eq!(Money::from_decimal(Decimal::new(-825, 3)).round_cents(), Money::from_cents(-83));
    /// ```
    #[inline]
    pub fn round_cents(self) -> Self {
        Money(
            self.0
                .round_dp_with_strategy(CENT_PLACES, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Adds two amounts, or `None` if the sum does not fit.
    #[inline]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Money)
    }
}

/// Shows the amount as US dollars: `$1,234.56`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_currency(*self))
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
