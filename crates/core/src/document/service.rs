//! Document construction, edits, revision, and event application.
//!
//! Stateless associated functions, all pure: the engine supplies the
//! issued number, the acting user, and the clock, and persists the
//! returned value. Totals are re-derived on every path that touches
//! line items.

use chrono::{DateTime, Utc};

use saral_shared::types::{DocumentId, UserId};

use super::error::DocumentError;
use super::types::{CreateDocumentInput, DocumentKind, DocumentStatus, FinancialDocument};
use crate::lifecycle::{
    InvoiceEvent, InvoiceMachine, InvoiceStatus, QuotationEvent, QuotationMachine, QuotationStatus,
};
use crate::numbering::DocumentNumber;
use crate::totals::{LineItem, TotalsCalculator};

/// Stateless service for financial document construction and mutation.
pub struct DocumentService;

impl DocumentService {
    /// Builds a new Draft document from creation input.
    ///
    /// Validates line items and dates, derives totals, and stamps the
    /// audit trail. The caller has already drawn `number` from the
    /// sequence generator; a document never exists without one.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError` if the input fails validation.
    pub fn build(
        kind: DocumentKind,
        number: DocumentNumber,
        input: CreateDocumentInput,
        actor: UserId,
        now: DateTime<Utc>,
    ) -> Result<FinancialDocument, DocumentError> {
        Self::validate_dates(&input)?;
        let totals = Self::derive_totals(&input.line_items)?;

        let status = match kind {
            DocumentKind::Quotation => DocumentStatus::Quotation(QuotationStatus::Draft),
            DocumentKind::Invoice => DocumentStatus::Invoice(InvoiceStatus::Draft),
        };

        Ok(FinancialDocument {
            id: DocumentId::new(),
            kind,
            number,
            client_id: input.client_id,
            line_items: input.line_items,
            status,
            issue_date: input.issue_date,
            expiry_date: input.expiry_date,
            totals,
            source_quotation: None,
            revision: 0,
            version: 1,
            created_by: actor,
            updated_by: actor,
            created_at: now,
            updated_at: now,
        })
    }

    /// Builds the Draft invoice produced by converting a quotation.
    ///
    /// Line items are seeded from the quotation; the invoice gets its
    /// own fresh number and a one-way lineage reference back to the
    /// quotation.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::KindMismatch` if `quotation` is not a
    /// quotation.
    pub fn build_from_quotation(
        quotation: &FinancialDocument,
        number: DocumentNumber,
        due_date: Option<chrono::NaiveDate>,
        actor: UserId,
        now: DateTime<Utc>,
    ) -> Result<FinancialDocument, DocumentError> {
        if quotation.kind != DocumentKind::Quotation {
            return Err(DocumentError::KindMismatch {
                expected: DocumentKind::Quotation,
                actual: quotation.kind,
            });
        }

        let mut invoice = Self::build(
            DocumentKind::Invoice,
            number,
            CreateDocumentInput {
                client_id: quotation.client_id,
                line_items: quotation.line_items.clone(),
                issue_date: now.date_naive(),
                expiry_date: due_date,
            },
            actor,
            now,
        )?;
        invoice.source_quotation = Some(quotation.id);
        Ok(invoice)
    }

    /// Replaces a Draft document's line items and re-derives totals.
    ///
    /// `effective_status` is the projected status; edits outside Draft
    /// are rejected; a sent document must be revised first.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::EditOutsideDraft` or a validation error.
    pub fn edit_line_items(
        document: &FinancialDocument,
        effective_status: DocumentStatus,
        line_items: Vec<LineItem>,
        actor: UserId,
        now: DateTime<Utc>,
    ) -> Result<FinancialDocument, DocumentError> {
        if !effective_status.is_editable() {
            return Err(DocumentError::EditOutsideDraft {
                status: effective_status,
            });
        }

        let totals = Self::derive_totals(&line_items)?;

        let mut updated = document.clone();
        updated.line_items = line_items;
        updated.totals = totals;
        updated.updated_by = actor;
        updated.updated_at = now;
        Ok(updated)
    }

    /// Applies a quotation event against the projected status.
    ///
    /// Revise increments the revision counter, invalidating any
    /// previously sent copy.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::KindMismatch` for invoices or a
    /// lifecycle error for illegal transitions.
    pub fn apply_quotation_event(
        document: &FinancialDocument,
        effective_status: QuotationStatus,
        event: QuotationEvent,
        actor: UserId,
        now: DateTime<Utc>,
    ) -> Result<FinancialDocument, DocumentError> {
        if document.kind != DocumentKind::Quotation {
            return Err(DocumentError::KindMismatch {
                expected: DocumentKind::Quotation,
                actual: document.kind,
            });
        }

        let next = QuotationMachine::apply(effective_status, event)?;

        let mut updated = document.clone();
        updated.status = DocumentStatus::Quotation(next);
        if event == QuotationEvent::Revise {
            updated.revision += 1;
        }
        updated.updated_by = actor;
        updated.updated_at = now;
        Ok(updated)
    }

    /// Applies an invoice event against the projected status.
    ///
    /// `non_voided_payments` gates cancellation and revision.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::KindMismatch` for quotations or a
    /// lifecycle error for illegal transitions.
    pub fn apply_invoice_event(
        document: &FinancialDocument,
        effective_status: InvoiceStatus,
        event: InvoiceEvent,
        non_voided_payments: usize,
        actor: UserId,
        now: DateTime<Utc>,
    ) -> Result<FinancialDocument, DocumentError> {
        if document.kind != DocumentKind::Invoice {
            return Err(DocumentError::KindMismatch {
                expected: DocumentKind::Invoice,
                actual: document.kind,
            });
        }

        let next = InvoiceMachine::apply(effective_status, event, non_voided_payments)?;

        let mut updated = document.clone();
        updated.status = DocumentStatus::Invoice(next);
        if event == InvoiceEvent::Revise {
            updated.revision += 1;
        }
        updated.updated_by = actor;
        updated.updated_at = now;
        Ok(updated)
    }

    /// Replaces the stored invoice status after reconciliation.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::KindMismatch` for quotations.
    pub fn with_invoice_status(
        document: &FinancialDocument,
        status: InvoiceStatus,
        actor: UserId,
        now: DateTime<Utc>,
    ) -> Result<FinancialDocument, DocumentError> {
        if document.kind != DocumentKind::Invoice {
            return Err(DocumentError::KindMismatch {
                expected: DocumentKind::Invoice,
                actual: document.kind,
            });
        }

        let mut updated = document.clone();
        updated.status = DocumentStatus::Invoice(status);
        updated.updated_by = actor;
        updated.updated_at = now;
        Ok(updated)
    }

    /// Validates creation input without building a document.
    ///
    /// Callers that must pay for a side effect between validation and
    /// construction (drawing a document number) use this to fail fast;
    /// [`Self::build`] re-runs the same checks.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError` if the input fails validation.
    pub fn validate_input(input: &CreateDocumentInput) -> Result<(), DocumentError> {
        Self::validate_dates(input)?;
        Self::derive_totals(&input.line_items)?;
        Ok(())
    }

    fn validate_dates(input: &CreateDocumentInput) -> Result<(), DocumentError> {
        if let Some(expiry) = input.expiry_date
            && expiry < input.issue_date
        {
            return Err(DocumentError::InvalidDates {
                issue: input.issue_date,
                expiry,
            });
        }
        Ok(())
    }

    fn derive_totals(
        line_items: &[LineItem],
    ) -> Result<crate::totals::DocumentTotals, DocumentError> {
        if line_items.is_empty() {
            return Err(DocumentError::NoLineItems);
        }
        let (_, totals) = TotalsCalculator::document_totals(line_items)?;
        // Rounding happens here, at the persistence boundary.
        Ok(totals.rounded())
    }
}
