//! Store error types.

use thiserror::Error;

/// Errors surfaced by store implementations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// No entity with that identity exists.
    #[error("{entity} not found")]
    NotFound {
        /// Description of the missing entity (kind + id).
        entity: String,
    },

    /// An entity with that identity already exists.
    #[error("{entity} already exists")]
    Duplicate {
        /// Description of the duplicated entity (kind + id).
        entity: String,
    },

    /// Version mismatch on a conditional update; the caller read stale
    /// state and should retry against fresh state.
    #[error("Concurrent modification of {entity}: expected version {expected}, found {actual}")]
    Conflict {
        /// Description of the contended entity (kind + id).
        entity: String,
        /// The version the caller updated against.
        expected: u64,
        /// The version actually stored.
        actual: u64,
    },

    /// The store is unreachable or refused the operation.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Returns true if the operation may be retried against fresh
    /// state.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}
