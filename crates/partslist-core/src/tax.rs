//! # Tax Calculation
//!
//! Per-line tax and the running totals that feed the footer.
//!
//! ## One Computation Per Line
//! ```text
//! LineItem ──► compute_tax(unit_price, quantity, rate)? ──► ComputedLine
//!                                                              │
//!                            ┌─────────────────────────────────┤
//!                            ▼                                 ▼
//!                      BodyRow cells                 Totals::add(&line)
//! ```
//! The row and the footer read the same `ComputedLine`, so the tax and total
//! columns of the footer are always the exact sum of what the rows show. The
//! subtotal sums the unrounded extended prices.
//!
//! Every operation is checked: an amount that outgrows `Decimal` is a
//! [`CoreError::Overflow`], never a panic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::TaxRate;

// =============================================================================
// Computed Line
// =============================================================================

/// Tax figures derived from one line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ComputedLine {
    /// Unit price × quantity, not rounded.
    pub extended: Money,

    /// Tax on `extended`, rounded half away from zero to the cent.
    pub tax_amount: Money,

    /// `extended + tax_amount`, rounded half away from zero to the cent.
    pub total_with_tax: Money,
}

/// Computes tax and total for one line.
///
/// ## Formula
/// - `tax_amount = round2(unit_price × quantity × rate / 100)`
/// - `total_with_tax = round2(unit_price × quantity + tax_amount)`
///
/// The unit price is used at full precision, so a `0.333` part bought three
/// times costs `0.999` before tax, not `0.99`.
///
/// ## Example
/// ```rust
/// use partslist_core::{compute_tax, Money, DEFAULT_TAX_RATE};
/// use rust_decimal::Decimal;
///
/// let line = compute_tax(Decimal::new(10, 0), 2, DEFAULT_TAX_RATE).unwrap();
/// assert_eq!(line.tax_amount, Money::from_cents(165));      // $1.65
/// assert_eq!(line.total_with_tax, Money::from_cents(2165)); // $21.65
/// ```
pub fn compute_tax(unit_price: Decimal, quantity: u32, rate: TaxRate) -> CoreResult<ComputedLine> {
    let extended = unit_price
        .checked_mul(Decimal::from(quantity))
        .ok_or(CoreError::Overflow("extended price"))?;

    let tax = extended
        .checked_mul(rate.fraction())
        .ok_or(CoreError::Overflow("tax"))?;
    let tax_amount = Money::from_decimal(tax).round_cents();

    let total = extended
        .checked_add(tax_amount.amount())
        .ok_or(CoreError::Overflow("total with tax"))?;

    Ok(ComputedLine {
        extended: Money::from_decimal(extended),
        tax_amount,
        total_with_tax: Money::from_decimal(total).round_cents(),
    })
}

// =============================================================================
// Totals
// =============================================================================

/// Column sums for the footer row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Totals {
    /// Sum of unit price × quantity, not rounded.
    pub subtotal: Money,

    /// Sum of per-line tax.
    pub total_tax: Money,

    /// Sum of per-line totals with tax.
    pub grand_total: Money,
}

impl Totals {
    /// All-zero totals, the starting point of every table.
    pub const fn zero() -> Self {
        Totals {
            subtotal: Money::zero(),
            total_tax: Money::zero(),
            grand_total: Money::zero(),
        }
    }

    /// Adds one computed line.
    ///
    /// On overflow the totals are left as they were.
    pub fn add(&mut self, line: &ComputedLine) -> CoreResult<()> {
        let subtotal = self
            .subtotal
            .checked_add(line.extended)
            .ok_or(CoreError::Overflow("subtotal"))?;
        let total_tax = self
            .total_tax
            .checked_add(line.tax_amount)
            .ok_or(CoreError::Overflow("total tax"))?;
        let grand_total = self
            .grand_total
            .checked_add(line.total_with_tax)
            .ok_or(CoreError::Overflow("grand total"))?;

        *self = Totals {
            subtotal,
            total_tax,
            grand_total,
        };
        Ok(())
    }

    /// Checks if every total is zero.
    pub fn is_zero(&self) -> bool {
        self.subtotal.is_zero() && self.total_tax.is_zero() && self.grand_total.is_zero()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
