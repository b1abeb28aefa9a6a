//! Replay failure classification.

use thiserror::Error;

/// Why a replayed mutation failed.
///
/// Both kinds leave the entry queued; the distinction exists so the
/// client can tell "try again on next reconnect" from "the server
/// rejected this, show it to the user".
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReplayError {
    /// The request never reached the server (still offline, timeout).
    #[error("Connectivity failure: {0}")]
    Connectivity(String),

    /// The server rejected the mutation (e.g. the invoice was
    /// cancelled while offline). Not retried automatically with any
    /// different input; surfaced to the user.
    #[error("Domain rejection: {0}")]
    Domain(String),
}
