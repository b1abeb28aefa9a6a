//! Contract error types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use saral_shared::types::VisitId;

use super::types::{ContractEvent, ContractStatus};

/// Errors raised by contract operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContractError {
    /// End date must be strictly after the start date.
    #[error("Contract end date {end} must be after start date {start}")]
    InvalidPeriod {
        /// The start date.
        start: NaiveDate,
        /// The rejected end date.
        end: NaiveDate,
    },

    /// Contract value cannot be negative.
    #[error("Contract value cannot be negative (got {value})")]
    NegativeValue {
        /// The rejected value.
        value: Decimal,
    },

    /// The event is not legal from the contract's current status.
    #[error("Cannot {event} a {from} contract")]
    InvalidTransition {
        /// Status at the time of the attempt.
        from: ContractStatus,
        /// The rejected event.
        event: ContractEvent,
    },

    /// No visit with that id exists on the contract.
    #[error("Visit {id} not found on contract")]
    VisitNotFound {
        /// The missing visit.
        id: VisitId,
    },

    /// The visit has already been completed.
    #[error("Visit {id} is already completed")]
    VisitAlreadyCompleted {
        /// The visit in question.
        id: VisitId,
    },
}
