//! Document operations: creation, edits, transitions, conversion,
//! projected reads.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;

use saral_core::document::{
    CreateDocumentInput, DocumentKind, DocumentService, DocumentStatus, FinancialDocument,
};
use saral_core::lifecycle::{
    effective_invoice_status, effective_quotation_status, InvoiceEvent, QuotationEvent,
};
use saral_core::numbering::{DocumentNumber, SequenceKind};
use saral_core::payment::{Payment, ReconciliationService};
use saral_core::totals::LineItem;
use saral_shared::types::{DocumentId, UserId};
use saral_store::{ContractStore, CounterStore, DocumentStore, PaymentStore};

use crate::error::{EngineError, EngineResult};
use crate::types::{Conversion, DocumentView, TransitionEvent};
use crate::Engine;

/// Projects a document for reading: effective status plus, for
/// invoices, the reconciled amounts.
pub(crate) fn project(
    document: FinancialDocument,
    payments: &[Payment],
    as_of: NaiveDate,
) -> DocumentView {
    match document.status {
        DocumentStatus::Quotation(stored) => {
            let effective = effective_quotation_status(stored, document.expiry_date, as_of);
            DocumentView {
                document,
                effective_status: DocumentStatus::Quotation(effective),
                amount_paid: None,
                balance: None,
            }
        }
        DocumentStatus::Invoice(stored) => {
            let paid = ReconciliationService::amount_paid(payments);
            let balance = ReconciliationService::balance(document.totals.grand_total, paid);
            let effective =
                effective_invoice_status(stored, document.expiry_date, balance, as_of);
            DocumentView {
                document,
                effective_status: DocumentStatus::Invoice(effective),
                amount_paid: Some(paid),
                balance: Some(balance),
            }
        }
    }
}

impl<S> Engine<S>
where
    S: CounterStore + DocumentStore + PaymentStore + ContractStore,
{
    /// Creates a Draft quotation with a freshly issued number.
    #[tracing::instrument(skip(self, input, actor))]
    pub async fn create_quotation(
        &self,
        input: CreateDocumentInput,
        actor: UserId,
    ) -> EngineResult<FinancialDocument> {
        self.create_document(DocumentKind::Quotation, SequenceKind::Quotation, input, actor)
            .await
    }

    /// Creates a Draft invoice with a freshly issued number.
    #[tracing::instrument(skip(self, input, actor))]
    pub async fn create_invoice(
        &self,
        input: CreateDocumentInput,
        actor: UserId,
    ) -> EngineResult<FinancialDocument> {
        self.create_document(DocumentKind::Invoice, SequenceKind::Invoice, input, actor)
            .await
    }

    async fn create_document(
        &self,
        kind: DocumentKind,
        sequence: SequenceKind,
        input: CreateDocumentInput,
        actor: UserId,
    ) -> EngineResult<FinancialDocument> {
        // Fail fast before drawing a number; issued numbers are never
        // reclaimed, so invalid input must not reach the counter.
        DocumentService::validate_input(&input)?;

        let number = self.next_number(sequence, input.issue_date).await?;
        let document = DocumentService::build(kind, number, input, actor, Utc::now())?;

        self.store_call(self.store().insert_document(document.clone()))
            .await?;
        tracing::debug!(document = %document.id, number = %document.number, "document created");
        Ok(document)
    }

    /// Replaces a Draft document's line items, re-deriving totals.
    #[tracing::instrument(skip(self, line_items, actor), fields(document = %document_id))]
    pub async fn edit_line_items(
        &self,
        document_id: DocumentId,
        line_items: Vec<LineItem>,
        actor: UserId,
    ) -> EngineResult<FinancialDocument> {
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            match self
                .try_edit_line_items(document_id, line_items.clone(), actor)
                .await
            {
                Err(err) if err.is_conflict() && attempts <= self.max_conflict_retries() => {
                    tracing::warn!(document = %document_id, attempts, "edit conflict, retrying");
                }
                Err(err) if err.is_conflict() => return Err(err.with_attempts(attempts)),
                other => return other,
            }
        }
    }

    async fn try_edit_line_items(
        &self,
        document_id: DocumentId,
        line_items: Vec<LineItem>,
        actor: UserId,
    ) -> EngineResult<FinancialDocument> {
        let document = self
            .store_call(self.store().get_document(document_id))
            .await?;
        let payments = self.payments_if_invoice(&document).await?;
        let view = project(document.clone(), &payments, Self::today());

        let updated = DocumentService::edit_line_items(
            &document,
            view.effective_status,
            line_items,
            actor,
            Utc::now(),
        )?;
        self.store_call(self.store().update_document(updated, document.version))
            .await
    }

    /// Applies a lifecycle event to a document.
    ///
    /// Guards evaluate against the projected status, so e.g. approving
    /// a date-expired quotation fails even though its stored status is
    /// still Sent.
    #[tracing::instrument(skip(self, actor), fields(document = %document_id, event = %event))]
    pub async fn transition(
        &self,
        document_id: DocumentId,
        event: TransitionEvent,
        actor: UserId,
    ) -> EngineResult<DocumentView> {
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            match self.try_transition(document_id, event, actor).await {
                Err(err) if err.is_conflict() && attempts <= self.max_conflict_retries() => {
                    tracing::warn!(document = %document_id, attempts, "transition conflict, retrying");
                }
                Err(err) if err.is_conflict() => return Err(err.with_attempts(attempts)),
                other => return other,
            }
        }
    }

    async fn try_transition(
        &self,
        document_id: DocumentId,
        event: TransitionEvent,
        actor: UserId,
    ) -> EngineResult<DocumentView> {
        let document = self
            .store_call(self.store().get_document(document_id))
            .await?;
        let payments = self.payments_if_invoice(&document).await?;
        let as_of = Self::today();
        let view = project(document.clone(), &payments, as_of);

        let updated = match view.effective_status {
            DocumentStatus::Quotation(effective) => {
                let quotation_event = match event {
                    TransitionEvent::Send => QuotationEvent::Send,
                    TransitionEvent::ClientViewed => QuotationEvent::ClientViewed,
                    TransitionEvent::Approve => QuotationEvent::Approve,
                    TransitionEvent::Reject => QuotationEvent::Reject,
                    TransitionEvent::Revise => QuotationEvent::Revise,
                    TransitionEvent::Cancel => {
                        return Err(EngineError::UnsupportedEvent {
                            kind: document.kind,
                            event,
                        })
                    }
                };
                DocumentService::apply_quotation_event(
                    &document,
                    effective,
                    quotation_event,
                    actor,
                    Utc::now(),
                )?
            }
            DocumentStatus::Invoice(effective) => {
                let invoice_event = match event {
                    TransitionEvent::Send => InvoiceEvent::Send,
                    TransitionEvent::Cancel => InvoiceEvent::Cancel,
                    TransitionEvent::Revise => InvoiceEvent::Revise,
                    TransitionEvent::ClientViewed
                    | TransitionEvent::Approve
                    | TransitionEvent::Reject => {
                        return Err(EngineError::UnsupportedEvent {
                            kind: document.kind,
                            event,
                        })
                    }
                };
                let non_voided = payments.iter().filter(|p| p.is_active()).count();
                DocumentService::apply_invoice_event(
                    &document,
                    effective,
                    invoice_event,
                    non_voided,
                    actor,
                    Utc::now(),
                )?
            }
        };

        let saved = self
            .store_call(self.store().update_document(updated, document.version))
            .await?;
        Ok(project(saved, &payments, as_of))
    }

    /// Converts an Approved quotation into a fresh Draft invoice.
    ///
    /// The quotation moves to ConvertedToInvoice and the invoice is
    /// seeded from its line items under a new number; both writes
    /// commit atomically.
    #[tracing::instrument(skip(self, actor), fields(quotation = %quotation_id))]
    pub async fn convert_quotation(
        &self,
        quotation_id: DocumentId,
        due_date: Option<NaiveDate>,
        actor: UserId,
    ) -> EngineResult<Conversion> {
        // The invoice number is minted once and reused across retries;
        // a conversion that ultimately fails leaves a gap, never a
        // reused number.
        let mut invoice_number: Option<DocumentNumber> = None;
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            match self
                .try_convert_quotation(quotation_id, due_date, actor, &mut invoice_number)
                .await
            {
                Err(err) if err.is_conflict() && attempts <= self.max_conflict_retries() => {
                    tracing::warn!(quotation = %quotation_id, attempts, "conversion conflict, retrying");
                }
                Err(err) if err.is_conflict() => return Err(err.with_attempts(attempts)),
                other => return other,
            }
        }
    }

    async fn try_convert_quotation(
        &self,
        quotation_id: DocumentId,
        due_date: Option<NaiveDate>,
        actor: UserId,
        invoice_number: &mut Option<DocumentNumber>,
    ) -> EngineResult<Conversion> {
        let quotation = self
            .store_call(self.store().get_document(quotation_id))
            .await?;
        let as_of = Self::today();
        let view = project(quotation.clone(), &[], as_of);

        let DocumentStatus::Quotation(effective) = view.effective_status else {
            return Err(saral_core::document::DocumentError::KindMismatch {
                expected: DocumentKind::Quotation,
                actual: quotation.kind,
            }
            .into());
        };

        let now = Utc::now();
        let converted = DocumentService::apply_quotation_event(
            &quotation,
            effective,
            QuotationEvent::Convert,
            actor,
            now,
        )?;

        let number = match invoice_number {
            Some(number) => number.clone(),
            None => {
                let minted = self
                    .next_number(SequenceKind::Invoice, now.date_naive())
                    .await?;
                *invoice_number = Some(minted.clone());
                minted
            }
        };

        let invoice =
            DocumentService::build_from_quotation(&quotation, number, due_date, actor, now)?;

        let saved_quotation = self
            .store_call(self.store().commit_conversion(
                converted,
                quotation.version,
                invoice.clone(),
            ))
            .await?;
        tracing::debug!(
            quotation = %quotation_id,
            invoice = %invoice.id,
            number = %invoice.number,
            "quotation converted"
        );
        Ok(Conversion {
            quotation: saved_quotation,
            invoice,
        })
    }

    /// Loads a document with its projected status and, for invoices,
    /// reconciled amounts.
    #[tracing::instrument(skip(self), fields(document = %document_id))]
    pub async fn get_document(&self, document_id: DocumentId) -> EngineResult<DocumentView> {
        let document = self
            .store_call(self.store().get_document(document_id))
            .await?;
        let payments = self.payments_if_invoice(&document).await?;
        Ok(project(document, &payments, Self::today()))
    }

    /// Outstanding balance of an invoice, for callers that only need
    /// the number.
    #[tracing::instrument(skip(self), fields(document = %invoice_id))]
    pub async fn invoice_balance(&self, invoice_id: DocumentId) -> EngineResult<Decimal> {
        let view = self.get_document(invoice_id).await?;
        view.balance.ok_or_else(|| {
            EngineError::Document(saral_core::document::DocumentError::KindMismatch {
                expected: DocumentKind::Invoice,
                actual: DocumentKind::Quotation,
            })
        })
    }

    pub(crate) async fn payments_if_invoice(
        &self,
        document: &FinancialDocument,
    ) -> EngineResult<Vec<Payment>> {
        if document.kind == DocumentKind::Invoice {
            self.store_call(self.store().payments_for_invoice(document.id))
                .await
        } else {
            Ok(Vec::new())
        }
    }
}
