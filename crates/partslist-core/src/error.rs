//! # Error Types
//!
//! Domain-specific error types for partslist-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  partslist-core errors (this file)                                     │
//! │  ├── CoreError        - Decoding, arithmetic and rendering failures    │
//! │  └── ValidationError  - A price, quantity or rate that does not parse  │
//! │                                                                         │
//! │  apps/partslist errors (separate crate)                                │
//! │  └── PipelineError    - DataUnavailable, sink, config                  │
//! │                                                                         │
//! │  Flow: ValidationError → serde_json::Error → CoreError                 │
//! │        → PipelineError::DataUnavailable                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised by the pure table logic.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The data file is not a JSON array of line items.
    ///
    /// ## When This Occurs
    /// - The document is not valid JSON
    /// - The top level is not an array
    /// - A `price` or `qty` cannot be parsed as a number
    #[error("Invalid line item data: {0}")]
    InvalidData(#[from] serde_json::Error),

    /// A table could not be rendered to the requested format.
    #[error("Failed to render table: {0}")]
    Render(String),

    /// An amount grew past what a decimal can hold.
    ///
    /// Only reachable with absurd inputs, such as a price near 10^28 times a
    /// large quantity. The table is not built.
    #[error("Amount too large while computing {0}")]
    Overflow(&'static str),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Numeric coercion is the only validation applied to the data file: anything
/// that is not a number where a number is needed ends up here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Invalid format (e.g. "ten dollars" where a price is expected).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
