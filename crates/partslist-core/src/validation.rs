//! # Validation Module
//!
//! Numeric coercion for the data file.
//!
//! ## What Gets Validated
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Data File Field Rules                              │
//! │                                                                         │
//! │  qty    ── JSON integer or integer string ("2")  ──► u32               │
//! │            negative → MustBeNonNegative                                 │
//! │            "2.5", "two" → InvalidFormat                                 │
//! │                                                                         │
//! │  price  ── JSON number or numeric string ("10.5") ──► Decimal          │
//! │            every digit is kept ("0.333" stays 0.333)                    │
//! │            negative → MustBeNonNegative                                 │
//! │                                                                         │
//! │  rate   ── percentage string ("8.25") ──► TaxRate (basis points)       │
//! │            more than two decimals → InvalidFormat                       │
//! │                                                                         │
//! │  Everything else (titles, URLs, SKUs) is taken as-is.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use partslist_core::validation::parse_decimal;
//! use rust_decimal::Decimal;
//!
//! assert_eq!(parse_decimal("10.5", "price").unwrap(), Decimal::new(105, 1));
//! assert_eq!(parse_decimal("1.5e2", "price").unwrap(), Decimal::new(150, 0));
//! assert!(parse_decimal("ten", "price").is_err());
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Decimal Parsing
// =============================================================================

/// Parses a decimal number without losing any digit.
///
/// Plain (`"12.345"`) and scientific (`"1.5e3"`) notation are accepted.
/// Anything that does not fit a 96-bit decimal exactly is rejected rather
/// than rounded.
pub fn parse_decimal(input: &str, field: &str) -> ValidationResult<Decimal> {
    let text = input.trim();
    if text.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    let parsed = if text.contains(|c: char| c == 'e' || c == 'E') {
        Decimal::from_scientific(text)
    } else {
        Decimal::from_str_exact(text)
    };

    parsed.map_err(|e| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: format!("{text:?} is not a number ({e})"),
    })
}

/// Returns the text of a JSON number or string field.
fn numeric_text(value: &Value, field: &str) -> ValidationResult<String> {
    match value {
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) => Ok(s.clone()),
        Value::Null => Err(ValidationError::Required {
            field: field.to_string(),
        }),
        other => Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("expected a number, got {other}"),
        }),
    }
}

fn ensure_non_negative(value: Decimal, field: &str) -> ValidationResult<Decimal> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }
    Ok(value.abs())
}

// =============================================================================
// Line Item Fields
// =============================================================================

/// Coerces a `qty` value into a quantity.
///
/// ## Rules
/// - JSON integers and integer strings are accepted (`2`, `"2"`, `2.0`)
/// - Must not be negative
pub fn parse_quantity(value: &Value) -> ValidationResult<u32> {
    let field = "qty";
    let text = numeric_text(value, field)?;
    let quantity = ensure_non_negative(parse_decimal(&text, field)?, field)?;

    if !quantity.fract().is_zero() {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("must be a whole number: {text:?}"),
        });
    }

    quantity.to_u32().ok_or_else(|| ValidationError::OutOfRange {
        field: field.to_string(),
        min: 0,
        max: i64::from(u32::MAX),
    })
}

/// Coerces a `price` value into a unit price.
///
/// ## Rules
/// - JSON numbers and numeric strings are accepted (`10.5`, `"10.50"`)
/// - The value is kept exactly; rounding happens on tax and totals only
/// - Must not be negative
pub fn parse_price(value: &Value) -> ValidationResult<Decimal> {
    let field = "price";
    let text = numeric_text(value, field)?;
    ensure_non_negative(parse_decimal(&text, field)?, field)
}

// =============================================================================
// Tax Rate
// =============================================================================

/// Parses a percentage such as `"8.25"` into basis points.
///
/// ## Rules
/// - At most two decimals (one basis point)
/// - Between 0 and 100
pub fn parse_rate_bps(input: &str) -> ValidationResult<u32> {
    let field = "tax_rate";
    let percent = parse_decimal(input, field)?;

    if percent.normalize().scale() > 2 {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("{} is finer than 0.01%", input.trim()),
        });
    }
    if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: 100,
        });
    }

    (percent * Decimal::ONE_HUNDRED)
        .to_u32()
        .ok_or_else(|| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("{} is not a percentage", input.trim()),
        })
}

// =============================================================================
// Unit Tests
// =============================================================================
