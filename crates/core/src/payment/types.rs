//! Payment domain types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use saral_shared::types::{DocumentId, PaymentId, UserId};

use crate::numbering::DocumentNumber;

/// How a payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    /// Cash in hand.
    Cash,
    /// Cheque (the external reference holds the cheque number).
    Cheque,
    /// NEFT/RTGS/IMPS bank transfer.
    BankTransfer,
    /// UPI transfer.
    Upi,
    /// Card payment.
    Card,
}

impl PaymentMode {
    /// Returns the string representation of the mode.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Cheque => "cheque",
            Self::BankTransfer => "bank_transfer",
            Self::Upi => "upi",
            Self::Card => "card",
        }
    }

    /// Parses a mode from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cash" => Some(Self::Cash),
            "cheque" => Some(Self::Cheque),
            "bank_transfer" => Some(Self::BankTransfer),
            "upi" => Some(Self::Upi),
            "card" => Some(Self::Card),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Applied to the invoice balance.
    Received,
    /// Reversed; excluded from the balance but kept for audit.
    Voided,
}

impl PaymentStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Voided => "voided",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether a payment may push the cumulative applied amount past the
/// invoice grand total.
///
/// The policy travels with each `apply_payment` call; the default is
/// to reject.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverpaymentPolicy {
    /// Reject payments that would exceed the outstanding balance.
    #[default]
    Reject,
    /// Accept the excess (recorded against the same invoice).
    Allow,
}

/// An immutable payment record against exactly one invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier.
    pub id: PaymentId,
    /// Human-readable payment number (own sequence, never reused).
    pub number: DocumentNumber,
    /// The invoice this payment settles (one-way reference).
    pub invoice_id: DocumentId,
    /// Amount received (> 0).
    pub amount: Decimal,
    /// How the payment was made.
    pub mode: PaymentMode,
    /// Value date of the payment.
    pub date: NaiveDate,
    /// Optional external transaction reference (UTR, cheque no).
    pub reference: Option<String>,
    /// Received or Voided.
    pub status: PaymentStatus,
    /// User who recorded the payment.
    pub created_by: UserId,
    /// When the payment was recorded.
    pub created_at: DateTime<Utc>,
    /// User who voided the payment, if voided.
    pub voided_by: Option<UserId>,
    /// When the payment was voided, if voided.
    pub voided_at: Option<DateTime<Utc>>,
}

impl Payment {
    /// Returns true if the payment counts toward the invoice balance.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == PaymentStatus::Received
    }
}
