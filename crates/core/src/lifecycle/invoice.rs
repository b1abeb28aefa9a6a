//! Invoice transition rules.

use super::error::LifecycleError;
use super::types::{InvoiceEvent, InvoiceStatus};

/// Stateless state machine for invoice transitions.
///
/// Only explicit business events live here; payment-driven moves
/// (Unpaid → PartiallyPaid → Paid and back on void) are computed by
/// the reconciliation engine from the payment set. Callers pass the
/// *effective* status (after projection), so an Overdue invoice is
/// handled by the same arms as Unpaid/PartiallyPaid.
pub struct InvoiceMachine;

impl InvoiceMachine {
    /// Applies an event to the current status.
    ///
    /// `non_voided_payments` is the number of applied, non-voided
    /// payments; cancellation and revision both require it to be zero.
    ///
    /// # Errors
    ///
    /// Returns `LifecycleError::InvalidInvoiceTransition` for an
    /// illegal move, or `LifecycleError::CancelBlockedByPayments` when
    /// cancellation is blocked by applied payments.
    pub fn apply(
        current: InvoiceStatus,
        event: InvoiceEvent,
        non_voided_payments: usize,
    ) -> Result<InvoiceStatus, LifecycleError> {
        use InvoiceEvent as E;
        use InvoiceStatus as S;

        match (current, event) {
            (S::Draft, E::Send) => Ok(S::Unpaid),
            (S::Draft | S::Unpaid | S::PartiallyPaid | S::Overdue, E::Cancel) => {
                if non_voided_payments > 0 {
                    return Err(LifecycleError::CancelBlockedByPayments {
                        count: non_voided_payments,
                    });
                }
                Ok(S::Cancelled)
            }
            (S::Unpaid | S::Overdue, E::Revise) => {
                if non_voided_payments > 0 {
                    return Err(LifecycleError::InvalidInvoiceTransition {
                        from: current,
                        event,
                    });
                }
                Ok(S::Draft)
            }
            _ => Err(LifecycleError::InvalidInvoiceTransition {
                from: current,
                event,
            }),
        }
    }

    /// Returns true if the event would be accepted from `current`.
    #[must_use]
    pub fn permits(current: InvoiceStatus, event: InvoiceEvent, non_voided_payments: usize) -> bool {
        Self::apply(current, event, non_voided_payments).is_ok()
    }
}
