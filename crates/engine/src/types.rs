//! Operation inputs and projected read views.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use saral_core::contract::{AmcContract, ContractStatus};
use saral_core::document::{DocumentStatus, FinancialDocument};
use saral_core::payment::{OverpaymentPolicy, Payment, PaymentMode};

/// Events accepted by [`crate::Engine::transition`].
///
/// Quotation conversion is not a `transition` event: it produces a
/// second entity and has its own operation,
/// [`crate::Engine::convert_quotation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionEvent {
    /// Send the document to the client.
    Send,
    /// Record that the client opened a quotation.
    ClientViewed,
    /// Approve a quotation.
    Approve,
    /// Reject a quotation.
    Reject,
    /// Cancel an invoice.
    Cancel,
    /// Pull the document back to Draft for editing.
    Revise,
}

impl fmt::Display for TransitionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Send => "send",
            Self::ClientViewed => "client_viewed",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Cancel => "cancel",
            Self::Revise => "revise",
        };
        write!(f, "{s}")
    }
}

/// Input for [`crate::Engine::apply_payment`].
#[derive(Debug, Clone)]
pub struct ApplyPaymentInput {
    /// Amount received (> 0).
    pub amount: Decimal,
    /// How the payment was made.
    pub mode: PaymentMode,
    /// Value date of the payment; also selects its numbering period.
    pub date: NaiveDate,
    /// Optional external transaction reference (UTR, cheque no).
    pub reference: Option<String>,
    /// Whether the payment may exceed the outstanding balance. The
    /// choice is recorded per call; the default rejects.
    pub policy: OverpaymentPolicy,
}

/// A document as reported to readers: stored state plus the projected
/// status and, for invoices, the reconciled amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentView {
    /// The stored document.
    pub document: FinancialDocument,
    /// Status after date projection (Expired/Overdue).
    pub effective_status: DocumentStatus,
    /// Sum of non-voided payments; `None` for quotations.
    pub amount_paid: Option<Decimal>,
    /// Outstanding balance; `None` for quotations.
    pub balance: Option<Decimal>,
}

/// A contract as reported to readers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractView {
    /// The stored contract.
    pub contract: AmcContract,
    /// Status after date projection (Expired).
    pub effective_status: ContractStatus,
}

/// Result of [`crate::Engine::convert_quotation`].
#[derive(Debug, Clone)]
pub struct Conversion {
    /// The quotation, now ConvertedToInvoice.
    pub quotation: FinancialDocument,
    /// The freshly numbered Draft invoice seeded from it.
    pub invoice: FinancialDocument,
}

/// Result of [`crate::Engine::apply_payment`] and
/// [`crate::Engine::void_payment`].
#[derive(Debug, Clone)]
pub struct Reconciled {
    /// The payment record created or voided.
    pub payment: Payment,
    /// The invoice after reconciliation, as a read view.
    pub invoice: DocumentView,
}

/// Result of [`crate::Engine::renew_contract`].
#[derive(Debug, Clone)]
pub struct ContractRenewal {
    /// The original contract, now Renewed.
    pub retired: AmcContract,
    /// The successor contract, Active for the following period.
    pub successor: AmcContract,
}
