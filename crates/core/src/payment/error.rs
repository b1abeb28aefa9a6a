//! Reconciliation error types.

use rust_decimal::Decimal;
use thiserror::Error;

use saral_shared::types::PaymentId;

use crate::lifecycle::InvoiceStatus;

/// Errors raised while applying or voiding payments.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaymentError {
    /// Payment amount must be strictly positive.
    #[error("Payment amount must be positive (got {amount})")]
    NonPositiveAmount {
        /// The rejected amount.
        amount: Decimal,
    },

    /// The invoice is not in a payable status.
    #[error("Cannot apply a payment to a {status} invoice")]
    InvoiceNotPayable {
        /// Effective invoice status at the time of the attempt.
        status: InvoiceStatus,
    },

    /// The payment would exceed the outstanding balance without an
    /// explicit overpayment override.
    #[error("Payment of {attempted} exceeds outstanding balance {balance}")]
    Overpayment {
        /// The attempted payment amount.
        attempted: Decimal,
        /// The outstanding balance before the attempt.
        balance: Decimal,
    },

    /// The payment has already been voided.
    #[error("Payment {id} is already voided")]
    AlreadyVoided {
        /// The payment in question.
        id: PaymentId,
    },
}
