//! # Currency Formatting
//!
//! US dollars, en-US conventions: `$` prefix, `,` every three digits, exactly
//! two decimals, leading minus sign for negative amounts. Sub-cent digits are
//! rounded half away from zero before display.
//!
//! ```rust
//! use partslist_core::{format_currency, Money};
//!
//! assert_eq!(format_currency(Money::from_cents(123_456)), "$1,234.56");
//! assert_eq!(format_currency(Money::from_cents(-5)), "-$0.05");
//! ```

use crate::money::{Money, CENT_PLACES};

/// Currency symbol placed in front of every amount.
pub const CURRENCY_SYMBOL: &str = "$";

/// Formats an amount as US dollars.
pub fn format_currency(amount: Money) -> String {
    let rounded = amount.round_cents();
    let sign = if rounded.is_negative() { "-" } else { "" };

    let digits = format!("{:.*}", CENT_PLACES as usize, rounded.amount().abs());
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    format!(
        "{}{}{}.{}",
        sign,
        CURRENCY_SYMBOL,
        group_thousands(whole),
        fraction
    )
}

/// Inserts a `,` between every group of three digits.
fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_format_currency_positive() {
        assert_eq!(format_currency(Money::from_cents(1234)), "$12.34");
        assert_eq!(format_currency(Money::from_cents(100)), "$1.00");
        assert_eq!(format_currency(Money::from_cents(1)), "$0.01");
        assert_eq!(format_currency(Money::zero()), "$0.00");
    }

    #[test]
    fn test_format_currency_grouping() {
        assert_eq!(format_currency(Money::from_cents(99_999)), "$999.99");
        assert_eq!(format_currency(Money::from_cents(100_000)), "$1,000.00");
        assert_eq!(format_currency(Money::from_cents(123_456_789)), "$1,234,567.89");
        assert_eq!(format_currency(Money::from_cents(10_000_000_000)), "$100,000,000.00");
    }

    #[test]
    fn test_format_currency_negative() {
        assert_eq!(format_currency(Money::from_cents(-1234)), "-$12.34");
        assert_eq!(format_currency(Money::from_cents(-123_456)), "-$1,234.56");
    }

    #[test]
    fn test_format_currency_rounds_sub_cent_amounts() {
        assert_eq!(format_currency(Money::from_decimal(Decimal::new(999, 3))), "$1.00");
        assert_eq!(format_currency(Money::from_decimal(Decimal::new(333, 3))), "$0.33");
        assert_eq!(format_currency(Money::from_decimal(Decimal::new(1005, 3))), "$1.01");
        assert_eq!(format_currency(Money::from_decimal(Decimal::new(-1, 3))), "$0.00");
        assert_eq!(format_currency(Money::from_decimal(Decimal::new(5, 0))), "$5.00");
    }

    #[test]
    fn test_format_currency_extremes() {
        assert_eq!(
            format_currency(Money::from_cents(i64::MIN)),
            "-$92,233,720,368,547,758.08"
        );
        assert_eq!(
            format_currency(Money::from_decimal(Decimal::new(i64::MAX, 0))),
            "$9,223,372,036,854,775,807.00"
        );
    }
}
