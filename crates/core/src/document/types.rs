//! The financial document aggregate.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use saral_shared::types::{ClientId, DocumentId, UserId};

use crate::lifecycle::{InvoiceStatus, QuotationStatus};
use crate::numbering::DocumentNumber;
use crate::totals::{DocumentTotals, LineItem};

/// Financial document kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// A quotation offered to a client.
    Quotation,
    /// An invoice raised against a client.
    Invoice,
}

impl DocumentKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Quotation => "quotation",
            Self::Invoice => "invoice",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind-specific document status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// Status of a quotation.
    Quotation(QuotationStatus),
    /// Status of an invoice.
    Invoice(InvoiceStatus),
}

impl DocumentStatus {
    /// Returns true if line items can be edited directly.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        match self {
            Self::Quotation(s) => s.is_editable(),
            Self::Invoice(s) => s.is_editable(),
        }
    }

    /// The kind this status belongs to.
    #[must_use]
    pub fn kind(&self) -> DocumentKind {
        match self {
            Self::Quotation(_) => DocumentKind::Quotation,
            Self::Invoice(_) => DocumentKind::Invoice,
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quotation(s) => write!(f, "{s}"),
            Self::Invoice(s) => write!(f, "{s}"),
        }
    }
}

/// A quotation or invoice.
///
/// Created once in Draft; mutated only through explicit transitions or
/// Draft-time line-item edits; never hard-deleted once numbered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialDocument {
    /// Unique identifier.
    pub id: DocumentId,
    /// Quotation or invoice.
    pub kind: DocumentKind,
    /// Issued document number; assigned exactly once, never reused.
    pub number: DocumentNumber,
    /// Owning client (one-way reference).
    pub client_id: ClientId,
    /// Ordered priced rows.
    pub line_items: Vec<LineItem>,
    /// Stored status; reads go through projection for Expired/Overdue.
    pub status: DocumentStatus,
    /// Date the document was issued.
    pub issue_date: NaiveDate,
    /// Quotation validity date / invoice due date.
    pub expiry_date: Option<NaiveDate>,
    /// Derived totals, rounded to the persistence scale.
    pub totals: DocumentTotals,
    /// Quotation this invoice was converted from, if any (one-way).
    pub source_quotation: Option<DocumentId>,
    /// Incremented by each revise; invalidates previously sent copies.
    pub revision: u32,
    /// Optimistic concurrency token, managed by the store.
    pub version: u64,
    /// User who created the document.
    pub created_by: UserId,
    /// User who last mutated the document.
    pub updated_by: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl FinancialDocument {
    /// Returns the quotation status, or `None` for invoices.
    #[must_use]
    pub fn quotation_status(&self) -> Option<QuotationStatus> {
        match self.status {
            DocumentStatus::Quotation(s) => Some(s),
            DocumentStatus::Invoice(_) => None,
        }
    }

    /// Returns the invoice status, or `None` for quotations.
    #[must_use]
    pub fn invoice_status(&self) -> Option<InvoiceStatus> {
        match self.status {
            DocumentStatus::Invoice(s) => Some(s),
            DocumentStatus::Quotation(_) => None,
        }
    }
}

/// Input for creating a document.
#[derive(Debug, Clone)]
pub struct CreateDocumentInput {
    /// Owning client.
    pub client_id: ClientId,
    /// Line items (at least one).
    pub line_items: Vec<LineItem>,
    /// Issue date; also selects the numbering period.
    pub issue_date: NaiveDate,
    /// Quotation validity date / invoice due date.
    pub expiry_date: Option<NaiveDate>,
}
