//! Pure reconciliation math.
//!
//! Everything here derives from two inputs: the invoice grand total
//! and the set of payments applied to it. The engine loads both,
//! computes through this service, and persists the result atomically.

use rust_decimal::Decimal;

use super::error::PaymentError;
use super::types::{OverpaymentPolicy, Payment};
use crate::lifecycle::InvoiceStatus;

/// Stateless service for payment reconciliation.
pub struct ReconciliationService;

impl ReconciliationService {
    /// Sum of all non-voided payment amounts.
    #[must_use]
    pub fn amount_paid(payments: &[Payment]) -> Decimal {
        payments
            .iter()
            .filter(|p| p.is_active())
            .map(|p| p.amount)
            .sum()
    }

    /// Outstanding balance, clamped at zero for overpaid invoices.
    #[must_use]
    pub fn balance(grand_total: Decimal, amount_paid: Decimal) -> Decimal {
        (grand_total - amount_paid).max(Decimal::ZERO)
    }

    /// Validates a proposed payment amount.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::NonPositiveAmount` for zero or negative
    /// amounts.
    pub fn validate_amount(amount: Decimal) -> Result<(), PaymentError> {
        if amount <= Decimal::ZERO {
            return Err(PaymentError::NonPositiveAmount { amount });
        }
        Ok(())
    }

    /// Checks a proposed payment against the invoice's effective
    /// status and outstanding balance.
    ///
    /// # Errors
    ///
    /// - `PaymentError::InvoiceNotPayable` if the status does not
    ///   accept payments (Draft, Paid, Cancelled). A Paid invoice is
    ///   payable again only under `OverpaymentPolicy::Allow`.
    /// - `PaymentError::Overpayment` if the cumulative applied amount
    ///   would exceed the grand total without the override.
    pub fn check_applicable(
        effective_status: InvoiceStatus,
        grand_total: Decimal,
        amount_paid: Decimal,
        amount: Decimal,
        policy: OverpaymentPolicy,
    ) -> Result<(), PaymentError> {
        Self::validate_amount(amount)?;

        let payable = effective_status.is_payable()
            || (effective_status == InvoiceStatus::Paid && policy == OverpaymentPolicy::Allow);
        if !payable {
            return Err(PaymentError::InvoiceNotPayable {
                status: effective_status,
            });
        }

        if policy == OverpaymentPolicy::Reject && amount_paid + amount > grand_total {
            return Err(PaymentError::Overpayment {
                attempted: amount,
                balance: Self::balance(grand_total, amount_paid),
            });
        }

        Ok(())
    }

    /// Derives the stored invoice status from its payment set.
    ///
    /// Applies only to issued invoices: Paid iff the balance is zero
    /// and at least one non-voided payment exists; PartiallyPaid for a
    /// partial balance; Unpaid otherwise. A zero-total invoice with no
    /// payments stays Unpaid.
    #[must_use]
    pub fn derive_status(grand_total: Decimal, payments: &[Payment]) -> InvoiceStatus {
        let paid = Self::amount_paid(payments);
        let has_active = payments.iter().any(Payment::is_active);

        if has_active && paid >= grand_total {
            InvoiceStatus::Paid
        } else if has_active && paid > Decimal::ZERO {
            InvoiceStatus::PartiallyPaid
        } else {
            InvoiceStatus::Unpaid
        }
    }
}
