//! Status and event enums for document lifecycles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Quotation status.
///
/// Valid transitions (initial state is always Draft):
/// - Draft → Sent (send)
/// - Sent → Viewed (client_viewed)
/// - Sent/Viewed → Approved (approve)
/// - Sent/Viewed → Rejected (reject)
/// - Sent/Viewed → Draft (revise)
/// - Approved → ConvertedToInvoice (convert)
///
/// Expired is never stored: Sent/Viewed quotations past their validity
/// date report Expired at read time via projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotationStatus {
    /// Being drafted; line items are editable.
    Draft,
    /// Sent to the client.
    Sent,
    /// Opened by the client.
    Viewed,
    /// Accepted by the client; convertible to an invoice.
    Approved,
    /// Declined by the client (terminal).
    Rejected,
    /// Validity date elapsed (computed, terminal).
    Expired,
    /// Converted into an invoice (terminal).
    ConvertedToInvoice,
}

impl QuotationStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Viewed => "viewed",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Expired => "expired",
            Self::ConvertedToInvoice => "converted_to_invoice",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "sent" => Some(Self::Sent),
            "viewed" => Some(Self::Viewed),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            "expired" => Some(Self::Expired),
            "converted_to_invoice" => Some(Self::ConvertedToInvoice),
            _ => None,
        }
    }

    /// Returns true if no further transitions are possible.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Expired | Self::ConvertedToInvoice)
    }

    /// Returns true if line items can be edited directly.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Draft)
    }
}

impl fmt::Display for QuotationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Events that drive quotation transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotationEvent {
    /// Send the quotation to the client.
    Send,
    /// Record that the client opened it.
    ClientViewed,
    /// Client accepted.
    Approve,
    /// Client declined.
    Reject,
    /// Produce an invoice from the approved quotation.
    Convert,
    /// Pull the quotation back to Draft for editing.
    Revise,
}

impl fmt::Display for QuotationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Send => "send",
            Self::ClientViewed => "client_viewed",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Convert => "convert",
            Self::Revise => "revise",
        };
        write!(f, "{s}")
    }
}

/// Invoice status.
///
/// Valid transitions (initial state is always Draft):
/// - Draft → Unpaid (send)
/// - Unpaid → PartiallyPaid → Paid (driven by payment reconciliation)
/// - Paid → PartiallyPaid/Unpaid (driven by payment voids)
/// - Unpaid/Overdue (no payments) → Draft (revise)
/// - Draft/Unpaid/PartiallyPaid/Overdue → Cancelled (cancel; requires
///   zero non-voided payments, which rules PartiallyPaid out in
///   practice)
///
/// Overdue is never stored: Unpaid/PartiallyPaid invoices past their
/// due date with a balance report Overdue at read time via projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Being drafted; line items are editable.
    Draft,
    /// Sent, no payment received yet.
    Unpaid,
    /// Some, but not all, of the balance received.
    PartiallyPaid,
    /// Balance fully settled (terminal, modulo payment voids).
    Paid,
    /// Due date elapsed with outstanding balance (computed).
    Overdue,
    /// Cancelled before settlement (terminal).
    Cancelled,
}

impl InvoiceStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Unpaid => "unpaid",
            Self::PartiallyPaid => "partially_paid",
            Self::Paid => "paid",
            Self::Overdue => "overdue",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "unpaid" => Some(Self::Unpaid),
            "partially_paid" => Some(Self::PartiallyPaid),
            "paid" => Some(Self::Paid),
            "overdue" => Some(Self::Overdue),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true if payments may be applied in this status.
    #[must_use]
    pub fn is_payable(&self) -> bool {
        matches!(self, Self::Unpaid | Self::PartiallyPaid | Self::Overdue)
    }

    /// Returns true if line items can be edited directly.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if no further transitions are possible.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Events that drive invoice transitions.
///
/// Payment-driven moves (Unpaid ↔ PartiallyPaid ↔ Paid) are not
/// events; they are computed by the reconciliation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceEvent {
    /// Issue the invoice to the client.
    Send,
    /// Cancel the invoice (requires zero non-voided payments).
    Cancel,
    /// Pull the invoice back to Draft for editing.
    Revise,
}

impl fmt::Display for InvoiceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Send => "send",
            Self::Cancel => "cancel",
            Self::Revise => "revise",
        };
        write!(f, "{s}")
    }
}
