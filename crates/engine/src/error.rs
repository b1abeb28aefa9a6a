//! Engine error types.

use thiserror::Error;

use saral_core::contract::ContractError;
use saral_core::document::{DocumentError, DocumentKind};
use saral_core::numbering::NumberingError;
use saral_core::payment::PaymentError;
use saral_shared::AppError;
use saral_store::StoreError;

use crate::types::TransitionEvent;

/// Result type alias using `EngineError`.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced by engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Document validation or transition failure.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Payment validation or reconciliation failure.
    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// Contract validation or transition failure.
    #[error(transparent)]
    Contract(#[from] ContractError),

    /// A document number could not be issued; nothing was persisted.
    #[error(transparent)]
    Numbering(#[from] NumberingError),

    /// The event does not apply to this document kind.
    #[error("Event {event} does not apply to a {kind}")]
    UnsupportedEvent {
        /// The document kind the event was sent to.
        kind: DocumentKind,
        /// The rejected event.
        event: TransitionEvent,
    },

    /// Entity not found.
    #[error("{0}")]
    NotFound(String),

    /// Version conflict that survived the bounded retries.
    #[error("{entity}: concurrent modification persisted across {attempts} attempts")]
    Conflict {
        /// Description of the contended entity.
        entity: String,
        /// How many attempts were made.
        attempts: u32,
    },

    /// Store unreachable, refused the operation, or timed out.
    #[error("Persistence unavailable: {0}")]
    Unavailable(String),

    /// Unexpected store failure (e.g. duplicate id on a fresh UUID).
    #[error("Store invariant violated: {0}")]
    Store(StoreError),
}

impl EngineError {
    /// Maps a store error into the engine taxonomy.
    ///
    /// Conflicts are mapped with an attempt count of 1; the retry loop
    /// rewrites the count if it gives up.
    #[must_use]
    pub fn from_store(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity } => Self::NotFound(entity),
            StoreError::Conflict { entity, .. } => Self::Conflict {
                entity,
                attempts: 1,
            },
            StoreError::Unavailable(reason) => Self::Unavailable(reason),
            other @ StoreError::Duplicate { .. } => Self::Store(other),
        }
    }

    /// Returns true if the operation should be retried against fresh
    /// state.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Rewrites the attempt count on a conflict that exhausted its
    /// retries; other errors pass through unchanged.
    #[must_use]
    pub fn with_attempts(self, attempts: u32) -> Self {
        match self {
            Self::Conflict { entity, .. } => Self::Conflict { entity, attempts },
            other => other,
        }
    }

    /// Maps this error to the boundary taxonomy for the API layer.
    #[must_use]
    pub fn to_app_error(&self) -> AppError {
        match self {
            Self::Document(DocumentError::Lifecycle(e)) => AppError::InvalidTransition(e.to_string()),
            Self::Document(e) => AppError::Validation(e.to_string()),
            Self::Payment(PaymentError::Overpayment { .. }) => AppError::Overpayment(self.to_string()),
            Self::Payment(PaymentError::NonPositiveAmount { .. }) => {
                AppError::Validation(self.to_string())
            }
            Self::Payment(e) => AppError::InvalidTransition(e.to_string()),
            Self::Contract(ContractError::InvalidPeriod { .. } | ContractError::NegativeValue { .. }) => {
                AppError::Validation(self.to_string())
            }
            Self::Contract(ContractError::VisitNotFound { .. }) => AppError::NotFound(self.to_string()),
            Self::Contract(e) => AppError::InvalidTransition(e.to_string()),
            Self::Numbering(e) => AppError::Numbering(e.to_string()),
            Self::UnsupportedEvent { .. } => AppError::InvalidTransition(self.to_string()),
            Self::NotFound(msg) => AppError::NotFound(msg.clone()),
            Self::Conflict { .. } => AppError::Conflict(self.to_string()),
            Self::Unavailable(msg) => AppError::Unavailable(msg.clone()),
            Self::Store(e) => AppError::Internal(e.to_string()),
        }
    }
}
