//! Payment records and balance reconciliation math.
//!
//! Payments are append-only: once recorded they are immutable except
//! for a void operation that reverses their effect on the invoice
//! balance while preserving the audit record. All balance and status
//! derivations here are pure; the engine crate owns persistence and
//! serialization of concurrent applications.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::PaymentError;
pub use service::ReconciliationService;
pub use types::{OverpaymentPolicy, Payment, PaymentMode, PaymentStatus};
