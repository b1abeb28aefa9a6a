//! End-to-end engine tests over the in-memory store.
//!
//! These exercise the full operation surface: numbering, totals,
//! lifecycle transitions, projections, reconciliation, and contracts.

use std::sync::Arc;

use chrono::{Datelike, Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use saral_core::contract::{ContractStatus, CreateContractInput, ServiceFrequency, VisitStatus};
use saral_core::document::{CreateDocumentInput, DocumentStatus};
use saral_core::lifecycle::{InvoiceStatus, QuotationStatus};
use saral_core::payment::{OverpaymentPolicy, PaymentMode, PaymentStatus};
use saral_core::totals::{DiscountType, ItemKind, LineItem, TaxComponent};
use saral_engine::{ApplyPaymentInput, Engine, EngineError, TransitionEvent};
use saral_shared::types::{ClientId, UserId};
use saral_store::InMemoryStore;

fn engine() -> Engine<InMemoryStore> {
    Engine::with_defaults(Arc::new(InMemoryStore::new()))
}

fn actor() -> UserId {
    UserId::new()
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn plain_item(name: &str, quantity: Decimal, unit_price: Decimal) -> LineItem {
    LineItem {
        kind: ItemKind::Service,
        name: name.to_string(),
        description: None,
        quantity,
        unit_price,
        discount_type: DiscountType::Fixed,
        discount_value: Decimal::ZERO,
        tax_components: vec![],
    }
}

fn gst_item() -> LineItem {
    LineItem {
        kind: ItemKind::Service,
        name: "AC servicing".to_string(),
        description: None,
        quantity: dec!(2),
        unit_price: dec!(100),
        discount_type: DiscountType::Percentage,
        discount_value: dec!(10),
        tax_components: vec![
            TaxComponent::new("CGST", dec!(9)),
            TaxComponent::new("SGST", dec!(9)),
        ],
    }
}

fn document_input(items: Vec<LineItem>) -> CreateDocumentInput {
    CreateDocumentInput {
        client_id: ClientId::new(),
        line_items: items,
        issue_date: today(),
        expiry_date: Some(today() + Days::new(30)),
    }
}

fn payment(amount: Decimal) -> ApplyPaymentInput {
    ApplyPaymentInput {
        amount,
        mode: PaymentMode::Upi,
        date: today(),
        reference: Some("UTR123".to_string()),
        policy: OverpaymentPolicy::Reject,
    }
}

#[tokio::test]
async fn test_quotation_full_lifecycle_to_invoice() {
    let engine = engine();
    let user = actor();

    let quotation = engine
        .create_quotation(document_input(vec![gst_item()]), user)
        .await
        .unwrap();

    let expected_number = format!("QTN{:04}{:02}00001", today().year(), today().month());
    assert_eq!(quotation.number.as_str(), expected_number);
    assert_eq!(quotation.totals.grand_total, dec!(212.40));
    assert_eq!(
        quotation.status,
        DocumentStatus::Quotation(QuotationStatus::Draft)
    );

    for event in [
        TransitionEvent::Send,
        TransitionEvent::ClientViewed,
        TransitionEvent::Approve,
    ] {
        engine.transition(quotation.id, event, user).await.unwrap();
    }

    let conversion = engine
        .convert_quotation(quotation.id, Some(today() + Days::new(15)), user)
        .await
        .unwrap();

    assert_eq!(
        conversion.quotation.status,
        DocumentStatus::Quotation(QuotationStatus::ConvertedToInvoice)
    );
    let invoice = conversion.invoice;
    assert_eq!(invoice.status, DocumentStatus::Invoice(InvoiceStatus::Draft));
    assert_eq!(invoice.line_items, quotation.line_items);
    assert_eq!(invoice.totals, quotation.totals);
    assert_eq!(invoice.source_quotation, Some(quotation.id));
    assert!(invoice.number.as_str().starts_with("INV"));

    // The converted quotation is terminal.
    let err = engine
        .transition(quotation.id, TransitionEvent::Approve, user)
        .await
        .unwrap_err();
    assert_eq!(err.to_app_error().error_code(), "INVALID_TRANSITION");
}

#[tokio::test]
async fn test_invoice_payment_flow_partial_then_paid_then_void() {
    let engine = engine();
    let user = actor();

    let invoice = engine
        .create_invoice(document_input(vec![plain_item("Install", dec!(1), dec!(1000))]), user)
        .await
        .unwrap();
    assert_eq!(invoice.totals.grand_total, dec!(1000.00));

    engine
        .transition(invoice.id, TransitionEvent::Send, user)
        .await
        .unwrap();

    // 400 → PartiallyPaid, balance 600.
    let first = engine
        .apply_payment(invoice.id, payment(dec!(400)), user)
        .await
        .unwrap();
    assert_eq!(
        first.invoice.effective_status,
        DocumentStatus::Invoice(InvoiceStatus::PartiallyPaid)
    );
    assert_eq!(first.invoice.amount_paid, Some(dec!(400)));
    assert_eq!(first.invoice.balance, Some(dec!(600.00)));

    // +600 → Paid, balance 0.
    let second = engine
        .apply_payment(invoice.id, payment(dec!(600)), user)
        .await
        .unwrap();
    assert_eq!(
        second.invoice.effective_status,
        DocumentStatus::Invoice(InvoiceStatus::Paid)
    );
    assert_eq!(second.invoice.balance, Some(dec!(0)));

    // Void the 600 → back to PartiallyPaid, balance 600.
    let voided = engine.void_payment(second.payment.id, user).await.unwrap();
    assert_eq!(voided.payment.status, PaymentStatus::Voided);
    assert!(voided.payment.voided_at.is_some());
    assert_eq!(
        voided.invoice.effective_status,
        DocumentStatus::Invoice(InvoiceStatus::PartiallyPaid)
    );
    assert_eq!(voided.invoice.balance, Some(dec!(600.00)));

    // Voiding twice fails; the record is preserved, not deleted.
    let err = engine.void_payment(second.payment.id, user).await.unwrap_err();
    assert!(matches!(err, EngineError::Payment(_)));
    assert_eq!(
        engine.get_payment(second.payment.id).await.unwrap().status,
        PaymentStatus::Voided
    );

    // Payment numbers are drawn from their own sequence.
    assert!(first.payment.number.as_str().starts_with("PAY"));
    assert_ne!(first.payment.number, second.payment.number);
}

#[tokio::test]
async fn test_voiding_only_payment_reverts_paid_to_unpaid() {
    let engine = engine();
    let user = actor();

    let invoice = engine
        .create_invoice(document_input(vec![plain_item("Install", dec!(1), dec!(1000))]), user)
        .await
        .unwrap();
    engine
        .transition(invoice.id, TransitionEvent::Send, user)
        .await
        .unwrap();

    let paid = engine
        .apply_payment(invoice.id, payment(dec!(1000)), user)
        .await
        .unwrap();
    assert_eq!(
        paid.invoice.effective_status,
        DocumentStatus::Invoice(InvoiceStatus::Paid)
    );

    let voided = engine.void_payment(paid.payment.id, user).await.unwrap();
    assert_eq!(
        voided.invoice.effective_status,
        DocumentStatus::Invoice(InvoiceStatus::Unpaid)
    );
    assert_eq!(voided.invoice.amount_paid, Some(dec!(0)));
    assert_eq!(voided.invoice.balance, Some(dec!(1000.00)));
}

#[tokio::test]
async fn test_overpayment_rejected_unless_overridden() {
    let engine = engine();
    let user = actor();

    let invoice = engine
        .create_invoice(document_input(vec![plain_item("Install", dec!(1), dec!(1000))]), user)
        .await
        .unwrap();
    engine
        .transition(invoice.id, TransitionEvent::Send, user)
        .await
        .unwrap();

    let err = engine
        .apply_payment(invoice.id, payment(dec!(1200)), user)
        .await
        .unwrap_err();
    assert_eq!(err.to_app_error().error_code(), "OVERPAYMENT");

    // Nothing was applied by the failed attempt.
    let view = engine.get_document(invoice.id).await.unwrap();
    assert_eq!(view.amount_paid, Some(dec!(0)));

    let mut overpay = payment(dec!(1200));
    overpay.policy = OverpaymentPolicy::Allow;
    let applied = engine.apply_payment(invoice.id, overpay, user).await.unwrap();
    assert_eq!(
        applied.invoice.effective_status,
        DocumentStatus::Invoice(InvoiceStatus::Paid)
    );
    assert_eq!(applied.invoice.amount_paid, Some(dec!(1200)));
    // Balance clamps at zero for overpaid invoices.
    assert_eq!(applied.invoice.balance, Some(dec!(0)));
}

#[tokio::test]
async fn test_illegal_transitions_rejected_with_state_preserved() {
    let engine = engine();
    let user = actor();

    let quotation = engine
        .create_quotation(document_input(vec![gst_item()]), user)
        .await
        .unwrap();

    // Draft cannot be approved.
    let err = engine
        .transition(quotation.id, TransitionEvent::Approve, user)
        .await
        .unwrap_err();
    assert_eq!(err.to_app_error().error_code(), "INVALID_TRANSITION");

    engine
        .transition(quotation.id, TransitionEvent::Send, user)
        .await
        .unwrap();
    engine
        .transition(quotation.id, TransitionEvent::Approve, user)
        .await
        .unwrap();

    // Rejecting an approved quotation fails and leaves it Approved.
    let err = engine
        .transition(quotation.id, TransitionEvent::Reject, user)
        .await
        .unwrap_err();
    assert_eq!(err.to_app_error().error_code(), "INVALID_TRANSITION");
    let view = engine.get_document(quotation.id).await.unwrap();
    assert_eq!(
        view.effective_status,
        DocumentStatus::Quotation(QuotationStatus::Approved)
    );
}

#[tokio::test]
async fn test_expired_quotation_projection_blocks_approval() {
    let engine = engine();
    let user = actor();

    let mut input = document_input(vec![gst_item()]);
    input.issue_date = today() - Days::new(60);
    input.expiry_date = Some(today() - Days::new(30));
    let quotation = engine.create_quotation(input, user).await.unwrap();

    engine
        .transition(quotation.id, TransitionEvent::Send, user)
        .await
        .unwrap();

    // Stored status is Sent; any read reports Expired.
    let view = engine.get_document(quotation.id).await.unwrap();
    assert_eq!(
        view.document.status,
        DocumentStatus::Quotation(QuotationStatus::Sent)
    );
    assert_eq!(
        view.effective_status,
        DocumentStatus::Quotation(QuotationStatus::Expired)
    );

    let err = engine
        .transition(quotation.id, TransitionEvent::Approve, user)
        .await
        .unwrap_err();
    assert_eq!(err.to_app_error().error_code(), "INVALID_TRANSITION");
}

#[tokio::test]
async fn test_overdue_invoice_projection_and_settlement() {
    let engine = engine();
    let user = actor();

    let mut input = document_input(vec![plain_item("Install", dec!(1), dec!(500))]);
    input.issue_date = today() - Days::new(45);
    input.expiry_date = Some(today() - Days::new(15));
    let invoice = engine.create_invoice(input, user).await.unwrap();

    engine
        .transition(invoice.id, TransitionEvent::Send, user)
        .await
        .unwrap();

    let view = engine.get_document(invoice.id).await.unwrap();
    assert_eq!(
        view.effective_status,
        DocumentStatus::Invoice(InvoiceStatus::Overdue)
    );
    assert_eq!(
        view.document.status,
        DocumentStatus::Invoice(InvoiceStatus::Unpaid)
    );

    // Overdue invoices still take payments; settling clears Overdue.
    let settled = engine
        .apply_payment(invoice.id, payment(dec!(500)), user)
        .await
        .unwrap();
    assert_eq!(
        settled.invoice.effective_status,
        DocumentStatus::Invoice(InvoiceStatus::Paid)
    );
}

#[tokio::test]
async fn test_cancel_requires_zero_active_payments() {
    let engine = engine();
    let user = actor();

    let invoice = engine
        .create_invoice(document_input(vec![plain_item("Install", dec!(1), dec!(1000))]), user)
        .await
        .unwrap();
    engine
        .transition(invoice.id, TransitionEvent::Send, user)
        .await
        .unwrap();

    let applied = engine
        .apply_payment(invoice.id, payment(dec!(300)), user)
        .await
        .unwrap();

    let err = engine
        .transition(invoice.id, TransitionEvent::Cancel, user)
        .await
        .unwrap_err();
    assert_eq!(err.to_app_error().error_code(), "INVALID_TRANSITION");

    // After voiding the payment, cancellation goes through.
    engine.void_payment(applied.payment.id, user).await.unwrap();
    let cancelled = engine
        .transition(invoice.id, TransitionEvent::Cancel, user)
        .await
        .unwrap();
    assert_eq!(
        cancelled.effective_status,
        DocumentStatus::Invoice(InvoiceStatus::Cancelled)
    );

    // A cancelled invoice takes no further payments.
    let err = engine
        .apply_payment(invoice.id, payment(dec!(100)), user)
        .await
        .unwrap_err();
    assert_eq!(err.to_app_error().error_code(), "INVALID_TRANSITION");
}

#[tokio::test]
async fn test_edit_revise_edit_flow() {
    let engine = engine();
    let user = actor();

    let invoice = engine
        .create_invoice(document_input(vec![plain_item("Install", dec!(1), dec!(1000))]), user)
        .await
        .unwrap();

    // Draft edits re-derive totals.
    let edited = engine
        .edit_line_items(
            invoice.id,
            vec![plain_item("Install", dec!(2), dec!(1000))],
            user,
        )
        .await
        .unwrap();
    assert_eq!(edited.totals.grand_total, dec!(2000.00));

    engine
        .transition(invoice.id, TransitionEvent::Send, user)
        .await
        .unwrap();

    // Sent documents cannot be edited directly.
    let err = engine
        .edit_line_items(
            invoice.id,
            vec![plain_item("Install", dec!(3), dec!(1000))],
            user,
        )
        .await
        .unwrap_err();
    assert_eq!(err.to_app_error().error_code(), "VALIDATION_ERROR");

    // Revise pulls it back to Draft with a version bump for the sent copy.
    let revised = engine
        .transition(invoice.id, TransitionEvent::Revise, user)
        .await
        .unwrap();
    assert_eq!(
        revised.effective_status,
        DocumentStatus::Invoice(InvoiceStatus::Draft)
    );
    assert_eq!(revised.document.revision, 1);

    let edited = engine
        .edit_line_items(
            invoice.id,
            vec![plain_item("Install", dec!(3), dec!(1000))],
            user,
        )
        .await
        .unwrap();
    assert_eq!(edited.totals.grand_total, dec!(3000.00));
}

#[tokio::test]
async fn test_payment_against_draft_rejected() {
    let engine = engine();
    let user = actor();

    let invoice = engine
        .create_invoice(document_input(vec![plain_item("Install", dec!(1), dec!(1000))]), user)
        .await
        .unwrap();

    let err = engine
        .apply_payment(invoice.id, payment(dec!(100)), user)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Payment(_)));
}

#[tokio::test]
async fn test_unsupported_events_per_kind() {
    let engine = engine();
    let user = actor();

    let quotation = engine
        .create_quotation(document_input(vec![gst_item()]), user)
        .await
        .unwrap();
    let err = engine
        .transition(quotation.id, TransitionEvent::Cancel, user)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::UnsupportedEvent { .. }));

    let invoice = engine
        .create_invoice(document_input(vec![gst_item()]), user)
        .await
        .unwrap();
    let err = engine
        .transition(invoice.id, TransitionEvent::Approve, user)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::UnsupportedEvent { .. }));
}

#[tokio::test]
async fn test_validation_failure_does_not_burn_a_number() {
    let engine = engine();
    let user = actor();

    let mut bad = document_input(vec![plain_item("Install", dec!(-1), dec!(100))]);
    bad.issue_date = today();
    let err = engine.create_quotation(bad, user).await.unwrap_err();
    assert_eq!(err.to_app_error().error_code(), "VALIDATION_ERROR");

    // The first valid creation still gets sequence 00001.
    let quotation = engine
        .create_quotation(document_input(vec![gst_item()]), user)
        .await
        .unwrap();
    assert!(quotation.number.as_str().ends_with("00001"));
}

#[tokio::test]
async fn test_sequences_are_per_kind_and_per_month() {
    let engine = engine();
    let user = actor();

    let first = engine
        .create_invoice(document_input(vec![gst_item()]), user)
        .await
        .unwrap();
    let second = engine
        .create_invoice(document_input(vec![gst_item()]), user)
        .await
        .unwrap();
    assert!(first.number.as_str().ends_with("00001"));
    assert!(second.number.as_str().ends_with("00002"));

    // A different kind draws from its own sequence.
    let quotation = engine
        .create_quotation(document_input(vec![gst_item()]), user)
        .await
        .unwrap();
    assert!(quotation.number.as_str().ends_with("00001"));

    // A different month resets the sequence.
    let mut next_month = document_input(vec![gst_item()]);
    next_month.issue_date = today() + Days::new(40);
    next_month.expiry_date = Some(today() + Days::new(70));
    let later = engine.create_invoice(next_month, user).await.unwrap();
    assert!(later.number.as_str().ends_with("00001"));
    assert_ne!(later.number, first.number);
}

#[tokio::test]
async fn test_contract_lifecycle_with_visits_and_renewal() {
    let engine = engine();
    let user = actor();

    let contract = engine
        .create_contract(
            CreateContractInput {
                client_id: ClientId::new(),
                contract_value: dec!(24000),
                start_date: today(),
                end_date: today() + Days::new(365),
                frequency: ServiceFrequency::Quarterly,
            },
            user,
        )
        .await
        .unwrap();
    assert!(contract.number.as_str().starts_with("AMC"));
    assert_eq!(contract.status, ContractStatus::Draft);
    assert_eq!(contract.visits.len(), 4);

    let active = engine.activate_contract(contract.id, user).await.unwrap();
    assert_eq!(active.status, ContractStatus::Active);

    let technician = actor();
    let visit_id = active.visits[0].id;
    let after_visit = engine
        .complete_visit(contract.id, visit_id, technician)
        .await
        .unwrap();
    assert_eq!(after_visit.visits[0].status, VisitStatus::Completed);
    assert_eq!(after_visit.visits[0].completed_by, Some(technician));
    assert_eq!(after_visit.pending_visits(), 3);

    let renewal = engine.renew_contract(contract.id, user).await.unwrap();
    assert_eq!(renewal.retired.status, ContractStatus::Renewed);
    assert_eq!(renewal.successor.status, ContractStatus::Active);
    assert_eq!(renewal.successor.renewed_from, Some(contract.id));
    assert_eq!(renewal.successor.start_date, renewal.retired.end_date);
    assert_ne!(renewal.successor.number, contract.number);

    let err = engine.renew_contract(contract.id, user).await.unwrap_err();
    assert_eq!(err.to_app_error().error_code(), "INVALID_TRANSITION");
}

#[tokio::test]
async fn test_expired_contract_projection_still_renews() {
    let engine = engine();
    let user = actor();

    let contract = engine
        .create_contract(
            CreateContractInput {
                client_id: ClientId::new(),
                contract_value: dec!(12000),
                start_date: today() - Days::new(400),
                end_date: today() - Days::new(35),
                frequency: ServiceFrequency::Yearly,
            },
            user,
        )
        .await
        .unwrap();
    engine.activate_contract(contract.id, user).await.unwrap();

    // Stored Active, projected Expired.
    let view = engine.get_contract(contract.id).await.unwrap();
    assert_eq!(view.contract.status, ContractStatus::Active);
    assert_eq!(view.effective_status, ContractStatus::Expired);

    // Renewal guards on stored state, so the lapsed contract renews.
    let renewal = engine.renew_contract(contract.id, user).await.unwrap();
    assert_eq!(renewal.successor.status, ContractStatus::Active);
}

#[tokio::test]
async fn test_contract_validation() {
    let engine = engine();
    let user = actor();

    let err = engine
        .create_contract(
            CreateContractInput {
                client_id: ClientId::new(),
                contract_value: dec!(1000),
                start_date: today(),
                end_date: today(),
                frequency: ServiceFrequency::Monthly,
            },
            user,
        )
        .await
        .unwrap_err();
    assert_eq!(err.to_app_error().error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_totals_are_persisted_rounded() {
    let engine = engine();
    let user = actor();

    // 3 × 33.333 with 3.333% tax: full-precision math, rounded at rest.
    let mut item = plain_item("Odd pricing", dec!(3), dec!(33.333));
    item.tax_components = vec![TaxComponent::new("Tax", dec!(3.333))];
    let invoice = engine
        .create_invoice(document_input(vec![item]), user)
        .await
        .unwrap();

    assert_eq!(invoice.totals.subtotal, dec!(100.00));
    assert_eq!(invoice.totals.tax_total, dec!(3.33));
    assert_eq!(invoice.totals.grand_total, dec!(103.33));
}
