//! Document error types.

use chrono::NaiveDate;
use thiserror::Error;

use super::types::{DocumentKind, DocumentStatus};
use crate::lifecycle::LifecycleError;
use crate::totals::TotalsError;

/// Errors raised by document construction and mutation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    /// A line item failed validation.
    #[error(transparent)]
    Totals(#[from] TotalsError),

    /// A status transition was rejected.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// A document needs at least one line item.
    #[error("A document requires at least one line item")]
    NoLineItems,

    /// Validity/due date precedes the issue date.
    #[error("Expiry date {expiry} is before issue date {issue}")]
    InvalidDates {
        /// The issue date.
        issue: NaiveDate,
        /// The rejected expiry/due date.
        expiry: NaiveDate,
    },

    /// The operation targets the wrong document kind.
    #[error("Document kind mismatch: expected {expected}, found {actual}")]
    KindMismatch {
        /// The kind required by the operation.
        expected: DocumentKind,
        /// The kind actually found.
        actual: DocumentKind,
    },

    /// Line items can only be edited in Draft; use revise first.
    #[error("Cannot edit line items of a {status} document; revise it first")]
    EditOutsideDraft {
        /// Effective status at the time of the attempt.
        status: DocumentStatus,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::InvoiceStatus;

    #[test]
    fn test_error_messages() {
        let err = DocumentError::KindMismatch {
            expected: DocumentKind::Invoice,
            actual: DocumentKind::Quotation,
        };
        assert_eq!(
            err.to_string(),
            "Document kind mismatch: expected invoice, found quotation"
        );

        let err = DocumentError::EditOutsideDraft {
            status: DocumentStatus::Invoice(InvoiceStatus::Unpaid),
        };
        assert!(err.to_string().contains("unpaid"));
    }
}
