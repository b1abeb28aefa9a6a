//! Date-derived effective status.
//!
//! Expired and Overdue are never persisted; they are projected from
//! stored dates on every read. This avoids the clock-skew and missed-
//! job staleness of a background status sweeper: there is no moment
//! where a document is "due for" a transition nobody has run yet.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::types::{InvoiceStatus, QuotationStatus};

/// Projects the effective quotation status as of `as_of`.
///
/// A Sent or Viewed quotation whose validity date has passed reports
/// Expired; every other status passes through unchanged. `valid_until`
/// of `None` means the quotation never expires.
#[must_use]
pub fn effective_quotation_status(
    stored: QuotationStatus,
    valid_until: Option<NaiveDate>,
    as_of: NaiveDate,
) -> QuotationStatus {
    match stored {
        QuotationStatus::Sent | QuotationStatus::Viewed => match valid_until {
            Some(deadline) if as_of > deadline => QuotationStatus::Expired,
            _ => stored,
        },
        other => other,
    }
}

/// Projects the effective invoice status as of `as_of`.
///
/// An Unpaid or PartiallyPaid invoice past its due date with an
/// outstanding balance reports Overdue. A settled or cancelled invoice
/// never reports Overdue regardless of dates.
#[must_use]
pub fn effective_invoice_status(
    stored: InvoiceStatus,
    due_date: Option<NaiveDate>,
    balance: Decimal,
    as_of: NaiveDate,
) -> InvoiceStatus {
    match stored {
        InvoiceStatus::Unpaid | InvoiceStatus::PartiallyPaid => match due_date {
            Some(deadline) if as_of > deadline && balance > Decimal::ZERO => {
                InvoiceStatus::Overdue
            }
            _ => stored,
        },
        other => other,
    }
}
