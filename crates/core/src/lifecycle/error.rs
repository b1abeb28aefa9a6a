//! Transition error types for document lifecycles.

use thiserror::Error;

use super::types::{InvoiceEvent, InvoiceStatus, QuotationEvent, QuotationStatus};

/// Errors raised by the document state machines.
///
/// Transitions are rejected, never silently ignored; the error carries
/// the effective status the attempt was evaluated against.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LifecycleError {
    /// The event is not legal from the quotation's current status.
    #[error("Cannot {event} a {from} quotation")]
    InvalidQuotationTransition {
        /// Effective status at the time of the attempt.
        from: QuotationStatus,
        /// The rejected event.
        event: QuotationEvent,
    },

    /// The event is not legal from the invoice's current status.
    #[error("Cannot {event} a {from} invoice")]
    InvalidInvoiceTransition {
        /// Effective status at the time of the attempt.
        from: InvoiceStatus,
        /// The rejected event.
        event: InvoiceEvent,
    },

    /// Cancellation requires zero applied, non-voided payments.
    #[error("Cannot cancel an invoice with {count} non-voided payment(s)")]
    CancelBlockedByPayments {
        /// Number of non-voided payments applied.
        count: usize,
    },
}
