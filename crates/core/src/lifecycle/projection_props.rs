//! Property-based tests for status projection.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::projection::{effective_invoice_status, effective_quotation_status};
use super::quotation::QuotationMachine;
use super::types::{InvoiceStatus, QuotationEvent, QuotationStatus};

fn any_date() -> impl Strategy<Value = NaiveDate> {
    (2020i32..2035, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn quotation_status() -> impl Strategy<Value = QuotationStatus> {
    prop_oneof![
        Just(QuotationStatus::Draft),
        Just(QuotationStatus::Sent),
        Just(QuotationStatus::Viewed),
        Just(QuotationStatus::Approved),
        Just(QuotationStatus::Rejected),
        Just(QuotationStatus::Expired),
        Just(QuotationStatus::ConvertedToInvoice),
    ]
}

fn quotation_event() -> impl Strategy<Value = QuotationEvent> {
    prop_oneof![
        Just(QuotationEvent::Send),
        Just(QuotationEvent::ClientViewed),
        Just(QuotationEvent::Approve),
        Just(QuotationEvent::Reject),
        Just(QuotationEvent::Convert),
        Just(QuotationEvent::Revise),
    ]
}

fn balance() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|v| Decimal::new(v, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Projection is idempotent: projecting an already projected
    /// status at the same instant changes nothing.
    #[test]
    fn prop_quotation_projection_idempotent(
        stored in quotation_status(),
        deadline in proptest::option::of(any_date()),
        as_of in any_date(),
    ) {
        let once = effective_quotation_status(stored, deadline, as_of);
        let twice = effective_quotation_status(once, deadline, as_of);
        prop_assert_eq!(once, twice);
    }

    /// A projected Expired quotation admits no transitions at all.
    #[test]
    fn prop_expired_quotation_rejects_every_event(
        stored in prop_oneof![Just(QuotationStatus::Sent), Just(QuotationStatus::Viewed)],
        event in quotation_event(),
        deadline in any_date(),
    ) {
        let after = deadline.succ_opt().unwrap();
        let effective = effective_quotation_status(stored, Some(deadline), after);
        prop_assert_eq!(effective, QuotationStatus::Expired);
        prop_assert!(QuotationMachine::apply(effective, event).is_err());
    }

    /// Overdue projection never fires with a zero balance and never
    /// touches settled/cancelled/draft invoices.
    #[test]
    fn prop_overdue_requires_outstanding_balance(
        due in any_date(),
        as_of in any_date(),
        bal in balance(),
    ) {
        let projected = effective_invoice_status(InvoiceStatus::Unpaid, Some(due), bal, as_of);
        if projected == InvoiceStatus::Overdue {
            prop_assert!(bal > Decimal::ZERO);
            prop_assert!(as_of > due);
        }
        for fixed in [InvoiceStatus::Draft, InvoiceStatus::Paid, InvoiceStatus::Cancelled] {
            prop_assert_eq!(
                effective_invoice_status(fixed, Some(due), bal, as_of),
                fixed
            );
        }
    }
}
