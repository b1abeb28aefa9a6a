//! Payment operations: application, voiding, reads.

use chrono::Utc;

use saral_core::document::{DocumentKind, DocumentService, DocumentStatus};
use saral_core::numbering::{DocumentNumber, SequenceKind};
use saral_core::payment::{Payment, PaymentStatus, ReconciliationService};
use saral_shared::types::{DocumentId, PaymentId, UserId};
use saral_store::{ContractStore, CounterStore, DocumentStore, PaymentStore};

use crate::documents::project;
use crate::error::{EngineError, EngineResult};
use crate::types::{ApplyPaymentInput, Reconciled};
use crate::Engine;

impl<S> Engine<S>
where
    S: CounterStore + DocumentStore + PaymentStore + ContractStore,
{
    /// Applies a payment to an invoice.
    ///
    /// Creates an immutable numbered payment record, recomputes the
    /// balance, and drives the invoice status (Unpaid → PartiallyPaid
    /// → Paid). The payment insert and invoice update commit
    /// atomically; concurrent applications against the same invoice
    /// serialize through the version check and are retried against
    /// fresh state.
    #[tracing::instrument(skip(self, input, actor), fields(invoice = %invoice_id))]
    pub async fn apply_payment(
        &self,
        invoice_id: DocumentId,
        input: ApplyPaymentInput,
        actor: UserId,
    ) -> EngineResult<Reconciled> {
        // Minted once and reused across retries; a failed application
        // leaves a gap in the payment sequence, never a reused number.
        let mut payment_number: Option<DocumentNumber> = None;
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            match self
                .try_apply_payment(invoice_id, &input, actor, &mut payment_number)
                .await
            {
                Err(err) if err.is_conflict() && attempts <= self.max_conflict_retries() => {
                    tracing::warn!(invoice = %invoice_id, attempts, "payment conflict, retrying");
                }
                Err(err) if err.is_conflict() => return Err(err.with_attempts(attempts)),
                other => return other,
            }
        }
    }

    async fn try_apply_payment(
        &self,
        invoice_id: DocumentId,
        input: &ApplyPaymentInput,
        actor: UserId,
        payment_number: &mut Option<DocumentNumber>,
    ) -> EngineResult<Reconciled> {
        let invoice = self
            .store_call(self.store().get_document(invoice_id))
            .await?;

        let mut payments = self
            .store_call(self.store().payments_for_invoice(invoice_id))
            .await?;
        let as_of = Self::today();
        let view = project(invoice.clone(), &payments, as_of);
        let DocumentStatus::Invoice(effective) = view.effective_status else {
            return Err(saral_core::document::DocumentError::KindMismatch {
                expected: DocumentKind::Invoice,
                actual: invoice.kind,
            }
            .into());
        };

        let paid = ReconciliationService::amount_paid(&payments);
        ReconciliationService::check_applicable(
            effective,
            invoice.totals.grand_total,
            paid,
            input.amount,
            input.policy,
        )?;

        let number = match payment_number {
            Some(number) => number.clone(),
            None => {
                let minted = self.next_number(SequenceKind::Payment, input.date).await?;
                *payment_number = Some(minted.clone());
                minted
            }
        };

        let now = Utc::now();
        let payment = Payment {
            id: PaymentId::new(),
            number,
            invoice_id,
            amount: input.amount,
            mode: input.mode,
            date: input.date,
            reference: input.reference.clone(),
            status: PaymentStatus::Received,
            created_by: actor,
            created_at: now,
            voided_by: None,
            voided_at: None,
        };

        payments.push(payment.clone());
        let new_status =
            ReconciliationService::derive_status(invoice.totals.grand_total, &payments);
        let updated_invoice =
            DocumentService::with_invoice_status(&invoice, new_status, actor, now)?;

        let saved = self
            .store_call(self.store().commit_payment(
                updated_invoice,
                invoice.version,
                payment.clone(),
            ))
            .await?;
        tracing::debug!(
            invoice = %invoice_id,
            payment = %payment.number,
            amount = %payment.amount,
            status = %new_status,
            "payment applied"
        );

        Ok(Reconciled {
            payment,
            invoice: project(saved, &payments, as_of),
        })
    }

    /// Voids a payment, reversing its effect on the invoice balance.
    ///
    /// The payment record is marked Voided (never deleted) and the
    /// invoice status is recomputed from the remaining payments, which
    /// may revert Paid to PartiallyPaid or Unpaid.
    #[tracing::instrument(skip(self, actor), fields(payment = %payment_id))]
    pub async fn void_payment(
        &self,
        payment_id: PaymentId,
        actor: UserId,
    ) -> EngineResult<Reconciled> {
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            match self.try_void_payment(payment_id, actor).await {
                Err(err) if err.is_conflict() && attempts <= self.max_conflict_retries() => {
                    tracing::warn!(payment = %payment_id, attempts, "void conflict, retrying");
                }
                Err(err) if err.is_conflict() => return Err(err.with_attempts(attempts)),
                other => return other,
            }
        }
    }

    async fn try_void_payment(
        &self,
        payment_id: PaymentId,
        actor: UserId,
    ) -> EngineResult<Reconciled> {
        let payment = self.store_call(self.store().get_payment(payment_id)).await?;
        if payment.status == PaymentStatus::Voided {
            return Err(EngineError::Payment(
                saral_core::payment::PaymentError::AlreadyVoided { id: payment_id },
            ));
        }

        let invoice = self
            .store_call(self.store().get_document(payment.invoice_id))
            .await?;
        let payments = self
            .store_call(self.store().payments_for_invoice(payment.invoice_id))
            .await?;

        let now = Utc::now();
        let mut voided = payment;
        voided.status = PaymentStatus::Voided;
        voided.voided_by = Some(actor);
        voided.voided_at = Some(now);

        let remaining: Vec<Payment> = payments
            .into_iter()
            .map(|p| {
                if p.id == payment_id {
                    voided.clone()
                } else {
                    p
                }
            })
            .collect();

        let new_status =
            ReconciliationService::derive_status(invoice.totals.grand_total, &remaining);
        let updated_invoice =
            DocumentService::with_invoice_status(&invoice, new_status, actor, now)?;

        let saved = self
            .store_call(self.store().commit_void(
                voided.clone(),
                updated_invoice,
                invoice.version,
            ))
            .await?;
        tracing::debug!(
            payment = %voided.number,
            invoice = %voided.invoice_id,
            status = %new_status,
            "payment voided"
        );

        Ok(Reconciled {
            payment: voided,
            invoice: project(saved, &remaining, Self::today()),
        })
    }

    /// Loads a payment record.
    #[tracing::instrument(skip(self), fields(payment = %payment_id))]
    pub async fn get_payment(&self, payment_id: PaymentId) -> EngineResult<Payment> {
        self.store_call(self.store().get_payment(payment_id)).await
    }
}
