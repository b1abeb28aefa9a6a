//! Quotation and invoice status state machines.
//!
//! This module implements the legal status transitions for financial
//! documents, plus the read-time projection that reports Expired and
//! Overdue from stored dates instead of persisting them.
//!
//! # Modules
//!
//! - `types` - Status and event enums
//! - `error` - Transition error types
//! - `quotation` - Quotation transition rules
//! - `invoice` - Invoice transition rules
//! - `projection` - Date-derived effective status

pub mod error;
pub mod invoice;
pub mod projection;
pub mod quotation;
pub mod types;

#[cfg(test)]
mod projection_props;

pub use error::LifecycleError;
pub use invoice::InvoiceMachine;
pub use projection::{effective_invoice_status, effective_quotation_status};
pub use quotation::QuotationMachine;
pub use types::{InvoiceEvent, InvoiceStatus, QuotationEvent, QuotationStatus};
