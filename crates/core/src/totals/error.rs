//! Validation error types for totals calculation.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while validating line items or computing totals.
///
/// `line` is the zero-based index of the offending item.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TotalsError {
    /// Item name is empty or whitespace.
    #[error("Line {line}: item name is required")]
    EmptyItemName {
        /// Offending line index.
        line: usize,
    },

    /// Quantity is negative.
    #[error("Line {line}: quantity cannot be negative (got {quantity})")]
    NegativeQuantity {
        /// Offending line index.
        line: usize,
        /// The rejected quantity.
        quantity: Decimal,
    },

    /// Unit price is negative.
    #[error("Line {line}: unit price cannot be negative (got {unit_price})")]
    NegativeUnitPrice {
        /// Offending line index.
        line: usize,
        /// The rejected unit price.
        unit_price: Decimal,
    },

    /// Discount value is negative.
    #[error("Line {line}: discount cannot be negative (got {discount})")]
    NegativeDiscount {
        /// Offending line index.
        line: usize,
        /// The rejected discount value.
        discount: Decimal,
    },

    /// Percentage discount exceeds 100.
    #[error("Line {line}: percentage discount cannot exceed 100 (got {rate})")]
    DiscountRateAboveCap {
        /// Offending line index.
        line: usize,
        /// The rejected percentage.
        rate: Decimal,
    },

    /// A tax component has a negative rate.
    #[error("Line {line}: tax component {name} has a negative rate ({rate})")]
    NegativeTaxRate {
        /// Offending line index.
        line: usize,
        /// Component name.
        name: String,
        /// The rejected rate.
        rate: Decimal,
    },

    /// Two tax components on the same line share a name.
    #[error("Line {line}: duplicate tax component {name}")]
    DuplicateTaxComponent {
        /// Offending line index.
        line: usize,
        /// The duplicated component name.
        name: String,
    },
}
