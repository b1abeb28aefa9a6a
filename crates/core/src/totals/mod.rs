//! Line-item and document totals calculation.
//!
//! This module implements the pricing pipeline for quotations and
//! invoices: quantity × unit price, discount (fixed or percentage,
//! clamped to the line subtotal), then per-component taxes on the
//! taxable amount.
//!
//! # Modules
//!
//! - `types` - Line items, tax components, and computed totals
//! - `error` - Validation error types
//! - `service` - The pure totals calculator

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::TotalsError;
pub use service::TotalsCalculator;
pub use types::{
    DiscountType, DocumentTotals, ItemKind, LineItem, LineTotals, TaxAmount, TaxComponent,
};
