//! Property-based tests for reconciliation math.

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use saral_shared::types::{DocumentId, PaymentId, UserId};

use super::service::ReconciliationService;
use super::types::{Payment, PaymentMode, PaymentStatus};
use crate::lifecycle::InvoiceStatus;
use crate::numbering::{CounterKey, DocumentNumber, Period, SequenceKind};

fn make_payment(amount: Decimal, voided: bool) -> Payment {
    let key = CounterKey {
        kind: SequenceKind::Payment,
        period: Period {
            year: 2026,
            month: 8,
        },
    };
    Payment {
        id: PaymentId::new(),
        number: DocumentNumber::compose("PAY", &key, 1).unwrap(),
        invoice_id: DocumentId::new(),
        amount,
        mode: PaymentMode::Cash,
        date: NaiveDate::from_ymd_opt(2026, 8, 7).unwrap(),
        reference: None,
        status: if voided {
            PaymentStatus::Voided
        } else {
            PaymentStatus::Received
        },
        created_by: UserId::new(),
        created_at: Utc::now(),
        voided_by: None,
        voided_at: None,
    }
}

/// Strategy: a payment set of positive amounts, each possibly voided.
fn payment_set() -> impl Strategy<Value = Vec<Payment>> {
    prop::collection::vec((1i64..1_000_000i64, any::<bool>()), 0..8).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(cents, voided)| make_payment(Decimal::new(cents, 2), voided))
            .collect()
    })
}

fn grand_total() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|v| Decimal::new(v, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// amount_paid is exactly the sum of non-voided amounts.
    #[test]
    fn prop_amount_paid_sums_active_payments(payments in payment_set()) {
        let expected: Decimal = payments
            .iter()
            .filter(|p| p.status == PaymentStatus::Received)
            .map(|p| p.amount)
            .sum();
        prop_assert_eq!(ReconciliationService::amount_paid(&payments), expected);
    }

    /// balance == max(grand_total − amount_paid, 0), never negative.
    #[test]
    fn prop_balance_never_negative(grand in grand_total(), payments in payment_set()) {
        let paid = ReconciliationService::amount_paid(&payments);
        let balance = ReconciliationService::balance(grand, paid);
        prop_assert!(balance >= Decimal::ZERO);
        prop_assert_eq!(balance, (grand - paid).max(Decimal::ZERO));
    }

    /// Status is Paid iff balance is zero AND at least one non-voided
    /// payment exists; PartiallyPaid iff 0 < paid < grand.
    #[test]
    fn prop_derived_status_matches_definition(grand in grand_total(), payments in payment_set()) {
        let paid = ReconciliationService::amount_paid(&payments);
        let has_active = payments.iter().any(|p| p.status == PaymentStatus::Received);
        let status = ReconciliationService::derive_status(grand, &payments);

        match status {
            InvoiceStatus::Paid => {
                prop_assert!(has_active);
                prop_assert_eq!(ReconciliationService::balance(grand, paid), Decimal::ZERO);
            }
            InvoiceStatus::PartiallyPaid => {
                prop_assert!(has_active);
                prop_assert!(paid > Decimal::ZERO);
                prop_assert!(paid < grand);
            }
            InvoiceStatus::Unpaid => {
                prop_assert!(!has_active || paid.is_zero());
            }
            other => prop_assert!(false, "derive_status returned {}", other),
        }
    }

    /// Voiding every payment always lands back on Unpaid.
    #[test]
    fn prop_voiding_all_payments_reverts_to_unpaid(
        grand in grand_total(),
        payments in payment_set(),
    ) {
        let voided: Vec<Payment> = payments
            .into_iter()
            .map(|mut p| {
                p.status = PaymentStatus::Voided;
                p
            })
            .collect();
        prop_assert_eq!(
            ReconciliationService::derive_status(grand, &voided),
            InvoiceStatus::Unpaid
        );
    }
}
