//! Quotation transition rules.

use super::error::LifecycleError;
use super::types::{QuotationEvent, QuotationStatus};

/// Stateless state machine for quotation transitions.
///
/// Callers pass the *effective* status (after projection), so an
/// expired quotation cannot be approved even though its stored status
/// is still Sent or Viewed.
pub struct QuotationMachine;

impl QuotationMachine {
    /// Applies an event to the current status.
    ///
    /// # Errors
    ///
    /// Returns `LifecycleError::InvalidQuotationTransition` if the
    /// event is not legal from `current`.
    pub fn apply(
        current: QuotationStatus,
        event: QuotationEvent,
    ) -> Result<QuotationStatus, LifecycleError> {
        use QuotationEvent as E;
        use QuotationStatus as S;

        let next = match (current, event) {
            (S::Draft, E::Send) => S::Sent,
            (S::Sent, E::ClientViewed) => S::Viewed,
            // Approval and rejection may arrive without the view event
            // ever being recorded (e.g. accepted over the phone).
            (S::Sent | S::Viewed, E::Approve) => S::Approved,
            (S::Sent | S::Viewed, E::Reject) => S::Rejected,
            (S::Sent | S::Viewed, E::Revise) => S::Draft,
            (S::Approved, E::Convert) => S::ConvertedToInvoice,
            _ => {
                return Err(LifecycleError::InvalidQuotationTransition {
                    from: current,
                    event,
                })
            }
        };
        Ok(next)
    }

    /// Returns true if the event would be accepted from `current`.
    #[must_use]
    pub fn permits(current: QuotationStatus, event: QuotationEvent) -> bool {
        Self::apply(current, event).is_ok()
    }
}
