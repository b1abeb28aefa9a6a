//! Monetary rounding helpers with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All monetary values are `rust_decimal::Decimal`. Intermediate
//! calculations keep full precision; rounding happens exactly once,
//! at the display/persistence boundary, through [`round_display`].

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Number of decimal places stored and displayed for monetary values.
pub const DISPLAY_SCALE: u32 = 2;

/// Rounds a monetary value to the display/persistence scale.
///
/// Uses `RoundingStrategy::MidpointAwayFromZero` (commercial rounding:
/// 2.125 → 2.13), the convention existing invoices were issued under.
/// Apply only at the boundary, never mid-calculation.
#[must_use]
pub fn round_display(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns true if the value is negative.
#[must_use]
pub fn is_negative(value: Decimal) -> bool {
    value.is_sign_negative() && !value.is_zero()
}
